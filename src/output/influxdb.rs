//! Bird sightings as InfluxDB points.
//!
//! Points are written through the InfluxDB v2 HTTP write API in line
//! protocol with second precision.

use super::{OutputConfig, OutputError, OutputHandler};
use super::{INFLUX_BUCKET_ENV, INFLUX_ORG_ENV, INFLUX_TOKEN_ENV, INFLUX_URL_ENV};
use crate::error_utils;
use crate::model::Event;
use crate::time_utils;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

pub const MEASUREMENT: &str = "bird_sighting";

pub struct InfluxDbHandler {
    client: Client,
    write_url: Url,
    token: String,
}

impl InfluxDbHandler {
    pub fn new(config: &OutputConfig, timeout: Duration) -> Result<Self, OutputError> {
        let required = [
            (&config.influx_url, "InfluxDB URL", INFLUX_URL_ENV),
            (&config.influx_org, "InfluxDB organization", INFLUX_ORG_ENV),
            (&config.influx_bucket, "InfluxDB bucket", INFLUX_BUCKET_ENV),
            (&config.influx_token, "InfluxDB token", INFLUX_TOKEN_ENV),
        ];
        for (value, name, env) in required {
            if value.trim().is_empty() {
                return Err(OutputError::MissingConfig(name, env));
            }
        }

        let base = format!("{}/", config.influx_url.trim().trim_end_matches('/'));
        let mut write_url = Url::parse(&base)
            .and_then(|base| base.join("api/v2/write"))
            .map_err(|_| OutputError::InvalidUrl(config.influx_url.clone()))?;
        write_url
            .query_pairs_mut()
            .append_pair("org", &config.influx_org)
            .append_pair("bucket", &config.influx_bucket)
            .append_pair("precision", "s");

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            write_url,
            token: config.influx_token.clone(),
        })
    }

    /// Line protocol for the events that carry a parseable timestamp.
    /// Returns the body and the number of points in it.
    pub fn line_protocol(events: &[Event]) -> (String, usize) {
        let mut lines = Vec::with_capacity(events.len());
        for event in events {
            match time_utils::parse_timestamp(&event.timestamp) {
                Ok(time) => lines.push(point(event, time.timestamp())),
                Err(e) => error_utils::report_warning(&format!(
                    "Invalid timestamp '{}' for event with TraceID '{}': {}",
                    event.timestamp, event.trace_id, e
                )),
            }
        }
        let count = lines.len();
        (lines.join("\n"), count)
    }
}

fn point(event: &Event, seconds: i64) -> String {
    // tags in key order
    let tags = [
        ("bird_latin", &event.bird_latin),
        ("bird_name", &event.bird_name),
        ("device", &event.device_name),
        ("serial", &event.serial_number),
        ("trace_id", &event.trace_id),
    ];

    let mut line = String::from(MEASUREMENT);
    for (key, value) in tags {
        if value.is_empty() {
            continue;
        }
        line.push(',');
        line.push_str(key);
        line.push('=');
        line.push_str(&escape_tag(value));
    }
    line.push_str(&format!(
        " confidence={} {}",
        float_field(event.bird_confidence),
        seconds
    ));
    line
}

fn escape_tag(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            ',' | '=' | ' ' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\n' | '\r' | '\t' => escaped.push(' '),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn float_field(value: f64) -> String {
    if value.is_finite() {
        format!("{}", value)
    } else {
        "0".to_string()
    }
}

#[async_trait]
impl OutputHandler for InfluxDbHandler {
    async fn write(&self, events: &[Event]) -> Result<(), OutputError> {
        if events.is_empty() {
            println!("No events to write to InfluxDB");
            return Ok(());
        }

        println!("Writing {} events to InfluxDB...", events.len());
        let (body, count) = Self::line_protocol(events);
        if count == 0 {
            println!("No events with valid timestamps to write to InfluxDB");
            return Ok(());
        }

        trace!("POST {}\n{}", self.write_url, body);
        let response = self
            .client
            .post(self.write_url.clone())
            .header(AUTHORIZATION, format!("Token {}", self.token))
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        debug!("InfluxDB responded with HTTP {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OutputError::Write {
                status: status.as_u16(),
                body,
            });
        }

        println!("Successfully wrote {} events to InfluxDB", count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn config(url: &str) -> OutputConfig {
        OutputConfig {
            influx_url: url.to_string(),
            influx_org: "home".to_string(),
            influx_bucket: "birds".to_string(),
            influx_token: "secret".to_string(),
        }
    }

    fn sighting() -> Event {
        Event {
            trace_id: "T1".to_string(),
            timestamp: "2025-05-18T14:59:25Z".to_string(),
            device_name: "Back Yard".to_string(),
            serial_number: "SN1".to_string(),
            bird_name: "Blue Jay".to_string(),
            bird_latin: "Cyanocitta cristata".to_string(),
            bird_confidence: 0.87,
            ..Default::default()
        }
    }

    #[test]
    fn test_point_escapes_tags() {
        assert_eq!(
            point(&sighting(), 1747580365),
            "bird_sighting,bird_latin=Cyanocitta\\ cristata,bird_name=Blue\\ Jay,\
             device=Back\\ Yard,serial=SN1,trace_id=T1 confidence=0.87 1747580365"
        );
        assert_eq!(escape_tag("a,b=c"), "a\\,b\\=c");
    }

    #[test]
    fn test_empty_tags_are_omitted() {
        let event = Event {
            trace_id: "T2".to_string(),
            ..Default::default()
        };
        assert_eq!(point(&event, 10), "bird_sighting,trace_id=T2 confidence=0 10");
    }

    #[test]
    fn test_invalid_timestamps_are_skipped() {
        let mut broken = sighting();
        broken.timestamp = "not a time".to_string();

        let (body, count) = InfluxDbHandler::line_protocol(&[broken, sighting()]);
        assert_eq!(count, 1);
        assert!(body.ends_with(" 1747580365"));
    }

    #[test]
    fn test_missing_config_is_rejected() {
        let mut incomplete = config("http://localhost:8086");
        incomplete.influx_bucket.clear();

        let error = InfluxDbHandler::new(&incomplete, Duration::from_secs(5))
            .err()
            .unwrap();
        assert_eq!(error.to_string(), "InfluxDB bucket is required (set INFLUX_BUCKET)");
    }

    #[tokio::test]
    async fn test_write_posts_line_protocol() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v2/write")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("org".into(), "home".into()),
                Matcher::UrlEncoded("bucket".into(), "birds".into()),
                Matcher::UrlEncoded("precision".into(), "s".into()),
            ]))
            .match_header("authorization", "Token secret")
            .match_body(Matcher::Regex("^bird_sighting,.*confidence=0.87 1747580365$".into()))
            .with_status(204)
            .expect(1)
            .create_async()
            .await;

        let handler = InfluxDbHandler::new(&config(&server.url()), Duration::from_secs(5)).unwrap();
        handler.write(&[sighting()]).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_write_failure_surfaces_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v2/write")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body("unauthorized access")
            .create_async()
            .await;

        let handler = InfluxDbHandler::new(&config(&server.url()), Duration::from_secs(5)).unwrap();
        let error = handler.write(&[sighting()]).await.unwrap_err();
        assert!(matches!(error, OutputError::Write { status: 401, .. }));
    }
}
