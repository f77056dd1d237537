use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;
use url::Url;

pub const DEFAULT_APPLICATION_ID: &str = "vico-cli";
pub const DEFAULT_CONFIGURATION_FILE_NAME: &str = "config.yml";
pub const DEFAULT_API_BASE_URL: &str = "https://api-us.vicohome.io/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_COUNTRY_NO: &str = "US";
/// Upper bound for `token_validity_hours` (one year).
pub const MAX_TOKEN_VALIDITY_HOURS: i64 = 24 * 365;

pub const CONFIG_DIR_ENV: &str = "VICO_CLI_CONFIG_DIR";
pub const API_ENDPOINT_ENV: &str = "VICOHOME_API_ENDPOINT";
pub const TIMEOUT_ENV: &str = "VICOHOME_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("failed to resolve the configuration directory")]
    FailedToFindConfigurationDirectory,
    #[error("failed to load configuration data, because of: {cause:?}")]
    FailedToLoadData { cause: Box<dyn std::error::Error + Send + Sync> },
    #[error("invalid value {value:?} for property {name:?}")]
    InvalidPropertyValue { name: String, value: String },
}

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    api_base_url: String,
    timeout_secs: u64,
    language: String,
    country_no: String,
    token_validity_hours: i64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            language: DEFAULT_LANGUAGE.to_string(),
            country_no: DEFAULT_COUNTRY_NO.to_string(),
            token_validity_hours: crate::token_cache::DEFAULT_TOKEN_VALIDITY_HOURS,
        }
    }
}

impl Configuration {
    /// Base URL of the API, always ending with a slash so that endpoint
    /// paths can be joined onto it.
    pub fn api_base_url(&self) -> Result<Url, ConfigurationError> {
        let mut base = self.api_base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base).map_err(|_| ConfigurationError::InvalidPropertyValue {
            name: "api_base_url".to_string(),
            value: self.api_base_url.clone(),
        })
    }

    pub fn set_api_base_url(&mut self, url: &str) {
        self.api_base_url = url.to_string();
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }

    pub fn set_timeout_secs(&mut self, timeout_secs: u64) {
        self.timeout_secs = timeout_secs;
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country_no(&self) -> &str {
        &self.country_no
    }

    pub fn token_validity_hours(&self) -> i64 {
        self.token_validity_hours
    }

    pub fn get_default_configuration_file_path() -> Result<PathBuf, ConfigurationError> {
        if let Ok(config_dir_str) = std::env::var(CONFIG_DIR_ENV) {
            let mut config_path = PathBuf::from(config_dir_str);
            config_path.push(DEFAULT_CONFIGURATION_FILE_NAME);
            return Ok(config_path);
        }

        match config_dir() {
            Some(configuration_directory) => {
                let mut default_config_file_path = configuration_directory;
                default_config_file_path.push(DEFAULT_APPLICATION_ID);
                default_config_file_path.push(DEFAULT_CONFIGURATION_FILE_NAME);
                Ok(default_config_file_path)
            }
            None => Err(ConfigurationError::FailedToFindConfigurationDirectory),
        }
    }

    /// Load the configuration file if there is one, then apply environment
    /// overrides. A missing file (or config directory) means defaults.
    pub fn load_default() -> Result<Configuration, ConfigurationError> {
        let configuration = match Configuration::get_default_configuration_file_path() {
            Ok(path) if path.exists() => {
                debug!("Loading configuration from {:?}...", path);
                Configuration::load_from_file(path)?
            }
            Ok(path) => {
                debug!("No configuration file at {:?}, using defaults", path);
                Configuration::default()
            }
            Err(e) => {
                debug!("{}; using defaults", e);
                Configuration::default()
            }
        };

        configuration.with_env_overrides(|name| std::env::var(name).ok())
    }

    pub fn load_from_file(path: PathBuf) -> Result<Configuration, ConfigurationError> {
        let data = fs::read_to_string(path).map_err(|cause| ConfigurationError::FailedToLoadData {
            cause: Box::new(cause),
        })?;
        serde_yaml::from_str(&data).map_err(|cause| ConfigurationError::FailedToLoadData {
            cause: Box::new(cause),
        })
    }

    /// Apply `VICOHOME_API_ENDPOINT` and `VICOHOME_TIMEOUT_SECS`, then check
    /// the values that cannot be checked while deserializing.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Configuration, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(API_ENDPOINT_ENV).filter(|v| !v.is_empty()) {
            self.api_base_url = endpoint;
        }

        if let Some(timeout) = lookup(TIMEOUT_ENV).filter(|v| !v.is_empty()) {
            self.timeout_secs =
                timeout
                    .parse()
                    .map_err(|_| ConfigurationError::InvalidPropertyValue {
                        name: TIMEOUT_ENV.to_string(),
                        value: timeout.clone(),
                    })?;
        }

        // fail early on a bad URL rather than on the first request
        self.api_base_url()?;

        if self.token_validity_hours > MAX_TOKEN_VALIDITY_HOURS {
            return Err(ConfigurationError::InvalidPropertyValue {
                name: "token_validity_hours".to_string(),
                value: self.token_validity_hours.to_string(),
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let configuration = Configuration::default();
        assert_eq!(
            configuration.api_base_url().unwrap().as_str(),
            "https://api-us.vicohome.io/"
        );
        assert_eq!(configuration.timeout(), std::time::Duration::from_secs(30));
        assert_eq!(configuration.language(), "en");
        assert_eq!(configuration.country_no(), "US");
        assert_eq!(configuration.token_validity_hours(), 24);
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let mut configuration = Configuration::default();
        configuration.set_api_base_url("http://127.0.0.1:8080");
        let url = configuration.api_base_url().unwrap();
        assert_eq!(url.join("account/login").unwrap().as_str(), "http://127.0.0.1:8080/account/login");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (API_ENDPOINT_ENV, "http://localhost:9999/api"),
            (TIMEOUT_ENV, "5"),
        ]
        .into_iter()
        .collect();

        let configuration = Configuration::default()
            .with_env_overrides(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(
            configuration.api_base_url().unwrap().as_str(),
            "http://localhost:9999/api/"
        );
        assert_eq!(configuration.timeout(), std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_timeout_override() {
        let result = Configuration::default().with_env_overrides(|name| {
            (name == TIMEOUT_ENV).then(|| "soon".to_string())
        });
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidPropertyValue { .. })
        ));
    }

    #[test]
    fn test_load_partial_yaml_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIGURATION_FILE_NAME);
        std::fs::write(&path, "timeout_secs: 10\nlanguage: de\n").unwrap();

        let configuration = Configuration::load_from_file(path).unwrap();
        assert_eq!(configuration.timeout(), std::time::Duration::from_secs(10));
        assert_eq!(configuration.language(), "de");
        assert_eq!(configuration.country_no(), "US");
    }

    #[test]
    fn test_oversized_token_validity_is_rejected() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIGURATION_FILE_NAME);
        std::fs::write(&path, "token_validity_hours: 100000000000\n").unwrap();

        let result = Configuration::load_from_file(path)
            .unwrap()
            .with_env_overrides(|_| None);
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidPropertyValue { ref name, .. }) if name == "token_validity_hours"
        ));
    }
}
