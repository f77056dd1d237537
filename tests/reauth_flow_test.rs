//! End-to-end token handling through the public client: cache hits, the
//! single re-login on a kicked session and terminal API errors.

use chrono::{Duration, Utc};
use mockito::{Matcher, Server};
use tempfile::TempDir;
use vico_cli::auth::{CredentialSource, Credentials};
use vico_cli::configuration::Configuration;
use vico_cli::exit_codes::ErrorCategory;
use vico_cli::token_cache::TokenCache;
use vico_cli::vicohome::VicoApiClient;

const DEVICES_OK: &str = r#"{"result":0,"msg":"success","data":{"list":[
    {"serialNumber":"SN1","deviceName":"Feeder","batteryLevel":80}
]}}"#;

fn client(server: &Server, cache: &TokenCache, credentials: Credentials) -> VicoApiClient {
    let mut configuration = Configuration::default();
    configuration.set_api_base_url(&server.url());
    VicoApiClient::assemble(
        &configuration,
        CredentialSource::Fixed(credentials),
        Some(cache.clone()),
    )
    .unwrap()
}

fn credentials() -> Credentials {
    Credentials::new("birder@example.com", "hunter2")
}

fn login_body(token: &str) -> String {
    format!(
        r#"{{"result":0,"msg":"success","data":{{"token":{{"token":"{}"}}}}}}"#,
        token
    )
}

#[tokio::test]
async fn test_cached_token_is_used_without_login() {
    let dir = TempDir::new().unwrap();
    let cache = TokenCache::in_dir(dir.path());
    std::fs::write(
        cache.path(),
        format!(
            r#"{{"token":"T","expires_at":"{}"}}"#,
            (Utc::now() + Duration::hours(1)).to_rfc3339()
        ),
    )
    .unwrap();

    let mut server = Server::new_async().await;
    let login = server
        .mock("POST", "/account/login")
        .expect(0)
        .create_async()
        .await;
    let devices = server
        .mock("POST", "/device/listuserdevices")
        .match_header("authorization", "T")
        .with_body(DEVICES_OK)
        .expect(1)
        .create_async()
        .await;

    let list = client(&server, &cache, credentials())
        .list_devices()
        .await
        .unwrap();

    assert_eq!(list.len(), 1);
    login.assert_async().await;
    devices.assert_async().await;
}

#[tokio::test]
async fn test_kicked_session_logs_in_once_and_retries() {
    let dir = TempDir::new().unwrap();
    let cache = TokenCache::in_dir(dir.path());
    cache.save("stale", 24).unwrap();

    let mut server = Server::new_async().await;
    let login = server
        .mock("POST", "/account/login")
        .match_body(Matcher::PartialJsonString(
            r#"{"email":"birder@example.com","password":"hunter2","loginType":0}"#.to_string(),
        ))
        .with_body(login_body("fresh"))
        .expect(1)
        .create_async()
        .await;
    let kicked = server
        .mock("POST", "/device/listuserdevices")
        .match_header("authorization", "stale")
        .with_body(r#"{"result":-1025,"msg":"account kicked","data":null}"#)
        .expect(1)
        .create_async()
        .await;
    let retried = server
        .mock("POST", "/device/listuserdevices")
        .match_header("authorization", "fresh")
        .with_body(DEVICES_OK)
        .expect(1)
        .create_async()
        .await;

    let list = client(&server, &cache, credentials())
        .list_devices()
        .await
        .unwrap();

    assert_eq!(list.devices()[0].serial_number, "SN1");
    login.assert_async().await;
    kicked.assert_async().await;
    retried.assert_async().await;
    assert_eq!(cache.load().as_deref(), Some("fresh"));
}

#[tokio::test]
async fn test_other_api_error_is_not_retried() {
    let dir = TempDir::new().unwrap();
    let cache = TokenCache::in_dir(dir.path());
    cache.save("T", 24).unwrap();

    let mut server = Server::new_async().await;
    let login = server
        .mock("POST", "/account/login")
        .expect(0)
        .create_async()
        .await;
    let device = server
        .mock("POST", "/device/selectsingledevice")
        .with_body(r#"{"result":-2000,"msg":"Resource not found"}"#)
        .expect(1)
        .create_async()
        .await;

    let error = client(&server, &cache, credentials())
        .get_device("SN404")
        .await
        .unwrap_err();

    assert_eq!(error.category(), ErrorCategory::Api);
    assert!(error.to_string().contains("Resource not found"));
    login.assert_async().await;
    device.assert_async().await;
    // a plain API error leaves the cached token alone
    assert_eq!(cache.load().as_deref(), Some("T"));
}

#[tokio::test]
async fn test_missing_credentials_make_no_requests() {
    let dir = TempDir::new().unwrap();
    let cache = TokenCache::in_dir(dir.path());

    let mut server = Server::new_async().await;
    let any = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let error = client(&server, &cache, Credentials::new("", ""))
        .list_devices()
        .await
        .unwrap_err();

    let message = error.to_string();
    assert!(message.contains("VICOHOME_EMAIL"));
    assert!(message.contains("VICOHOME_PASSWORD"));
    assert_eq!(error.category(), ErrorCategory::Configuration);
    any.assert_async().await;
}
