use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use url::Url;

const CONFIG_DIR_PREFIX: &str = "revolut-business";

/// Which Revolut Business deployment to talk to
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    pub fn api_base_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => "https://sandbox-b2b.revolut.com/api/1.0",
            Environment::Production => "https://b2b.revolut.com/api/1.0",
        }
    }

    /// Page where a business user grants the application access
    pub fn consent_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => "https://sandbox-business.revolut.com/app-confirm",
            Environment::Production => "https://business.revolut.com/app-confirm",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    pub revolut: RevolutConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RevolutConfig {
    #[serde(default)]
    pub environment: Environment,
    pub client_id: String,
    pub redirect_url: String,
    /// Path to the PEM encoded RSA key used to sign client assertions
    pub private_key: PathBuf,
}

impl RevolutConfig {
    /// The JWT issuer is the host of the registered redirect URL
    pub fn issuer(&self) -> Result<String> {
        let url = Url::parse(&self.redirect_url)
            .map_err(|e| Error::Config(format!("Invalid redirect_url: {}", e)))?;

        url.host_str()
            .map(str::to_string)
            .ok_or_else(|| Error::Config("redirect_url has no host".to_string()))
    }

    pub fn authorize_url(&self) -> Result<Url> {
        Url::parse_with_params(
            self.environment.consent_url(),
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("response_type", "code"),
            ],
        )
        .map_err(|e| Error::Config(format!("Invalid consent URL: {}", e)))
    }

    fn validate(&self) -> Result<()> {
        if self.client_id.is_empty() || self.redirect_url.is_empty() {
            return Err(Error::Config(
                "Revolut client_id and redirect_url must be set in config file".to_string(),
            ));
        }

        if self.private_key.as_os_str().is_empty() {
            return Err(Error::Config(
                "Revolut private_key path must be set in config file".to_string(),
            ));
        }

        self.issuer().map(|_| ())
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file()?;

        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found at {:?}. Please create one.",
                config_path
            )));
        }

        let contents = fs::read_to_string(&config_path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;

        config.revolut.validate()?;

        Ok(config)
    }

    fn xdg_dirs() -> xdg::BaseDirectories {
        xdg::BaseDirectories::with_prefix(CONFIG_DIR_PREFIX)
    }

    /// Get the config file path
    pub fn config_file() -> Result<PathBuf> {
        let xdg_dirs = Self::xdg_dirs();
        xdg_dirs
            .place_config_file("config.toml")
            .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))
    }

    /// Get the cache directory path
    pub fn cache_dir() -> Result<PathBuf> {
        let xdg = Self::xdg_dirs();
        xdg.get_cache_home()
            .ok_or_else(|| Error::Config("Failed to determine cache directory".to_string()))
    }

    /// Get a cache file path
    pub fn cache_file(filename: &str) -> Result<PathBuf> {
        let xdg = Self::xdg_dirs();
        xdg.place_cache_file(filename)
            .map_err(|e| Error::Config(format!("Failed to create cache file path: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> RevolutConfig {
        RevolutConfig {
            environment: Environment::Sandbox,
            client_id: "client_123".to_string(),
            redirect_url: "https://example.com/callback".to_string(),
            private_key: PathBuf::from("/tmp/privatekey.pem"),
        }
    }

    #[test]
    fn test_config_serialization() {
        let config = Config {
            revolut: sample_config(),
        };

        let serialized = toml::to_string(&config).unwrap();
        let deserialized = Config::parse(&serialized).unwrap();

        assert_eq!(config.revolut.client_id, deserialized.revolut.client_id);
        assert_eq!(deserialized.revolut.environment, Environment::Sandbox);
        assert!(serialized.contains("environment = \"sandbox\""));
    }

    #[test]
    fn test_environment_defaults_to_sandbox() {
        let config = Config::parse(
            r#"
            [revolut]
            client_id = "abc"
            redirect_url = "https://example.com"
            private_key = "/keys/privatekey.pem"
            "#,
        )
        .unwrap();

        assert_eq!(config.revolut.environment, Environment::Sandbox);
    }

    #[test]
    fn test_missing_fields_rejected() {
        let result = Config::parse(
            r#"
            [revolut]
            environment = "production"
            client_id = ""
            redirect_url = "https://example.com"
            private_key = "/keys/privatekey.pem"
            "#,
        );

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_environment_urls() {
        assert_eq!(
            Environment::Sandbox.api_base_url(),
            "https://sandbox-b2b.revolut.com/api/1.0"
        );
        assert_eq!(
            Environment::Production.api_base_url(),
            "https://b2b.revolut.com/api/1.0"
        );
        assert_eq!(
            Environment::Production.consent_url(),
            "https://business.revolut.com/app-confirm"
        );
    }

    #[test]
    fn test_issuer_is_redirect_host() {
        let config = sample_config();
        assert_eq!(config.issuer().unwrap(), "example.com");
    }

    #[test]
    fn test_authorize_url() {
        let url = sample_config().authorize_url().unwrap();
        assert_eq!(url.host_str(), Some("sandbox-business.revolut.com"));
        assert!(url.query_pairs().any(|(k, v)| k == "client_id" && v == "client_123"));
        assert!(url.query_pairs().any(|(k, v)| k == "response_type" && v == "code"));
    }
}
