//! Front-end configuration
//!
//! [`ConsoleConfig`] is assembled from built-in defaults, an optional
//! configuration file and `AGENDIFY_`-prefixed environment variables, in
//! that order of precedence.

use agendify_core::validation::{ValidateConfig, validators};
use agendify_http::{AgendifyClient, ClientError};
use agendify_http::client::DEFAULT_BASE_URL;
use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Authentication configuration
pub struct AuthConfig;

impl AuthConfig {
    /// Storage slot holding the bearer credential
    pub const TOKEN_KEY: &'static str = "@Agendify:token";

    /// Storage slot holding the serialized identity
    pub const USER_KEY: &'static str = "@Agendify:user";
}

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_TIMEOUT_SECS: u64 = 300;

/// Settings for the API connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Paths whose 401 responses do not end the session, in addition to
    /// the password-change endpoint
    #[serde(default)]
    pub exempt_paths: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            exempt_paths: Vec::new(),
        }
    }
}

impl ValidateConfig for ApiConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        validators::validate_http_url(&self.base_url, "api.base_url")?;
        validators::validate_range(self.timeout_secs, 1, MAX_TIMEOUT_SECS, "api.timeout_secs")?;
        if let Some(agent) = &self.user_agent {
            validators::validate_not_empty(agent, "api.user_agent")?;
        }
        for path in &self.exempt_paths {
            validators::validate_api_path(path, "api.exempt_paths")?;
        }
        Ok(())
    }
}

/// Console configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub api: ApiConfig,
    /// Where the session file and the log file live
    pub data_dir: PathBuf,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            data_dir: default_data_dir(),
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from defaults, `path` (when given) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("api.base_url", defaults.api.base_url)?
            .set_default("api.timeout_secs", defaults.api.timeout_secs)?
            .set_default("api.exempt_paths", Vec::<String>::new())?
            .set_default("data_dir", defaults.data_dir.to_string_lossy().into_owned())?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("AGENDIFY")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("api.exempt_paths")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// File backing the durable session slots
    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("agendify.log")
    }

    /// Build an API client from these settings
    pub fn build_client(&self) -> Result<AgendifyClient, ClientError> {
        let mut builder = AgendifyClient::builder()
            .base_url(&self.api.base_url)
            .timeout(Duration::from_secs(self.api.timeout_secs));
        if let Some(agent) = &self.api.user_agent {
            builder = builder.user_agent(agent);
        }
        for path in &self.api.exempt_paths {
            builder = builder.exempt_path(path);
        }
        builder.build()
    }
}

impl ValidateConfig for ConsoleConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Message("data_dir cannot be empty".into()));
        }
        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("app", "Agendify", "agendify")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".agendify"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = ConsoleConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:3333");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
data_dir = "/tmp/agendify-test"

[api]
base_url = "https://api.example.com/"
timeout_secs = 5
exempt_paths = ["/api/users/pin"]
"#
        )
        .unwrap();

        let config = ConsoleConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.api.base_url, "https://api.example.com/");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api.exempt_paths, vec!["/api/users/pin".to_string()]);
        assert_eq!(config.session_file(), PathBuf::from("/tmp/agendify-test/session.json"));

        let client = config.build_client().unwrap();
        assert_eq!(client.base_url(), "https://api.example.com");
        assert!(client.is_exempt("/api/users/pin"));
        assert!(client.is_exempt("/api/users/password"));
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let config = ConsoleConfig {
            api: ApiConfig {
                timeout_secs: 0,
                ..ApiConfig::default()
            },
            ..ConsoleConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let config = ConsoleConfig {
            api: ApiConfig {
                base_url: "localhost:3333".into(),
                ..ApiConfig::default()
            },
            ..ConsoleConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
