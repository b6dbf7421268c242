//! Console configuration
//!
//! Read from a TOML file; every section and key is optional.
//!
//! ```toml
//! [server]
//! base_url = "https://admin.example.org"
//! auth_cookie = "access_token"
//! token = "..."
//!
//! [behaviour]
//! update_failure = "keep-open"
//! reload_on_reveal = false
//!
//! [logging]
//! level = "debug"
//! ```

use gridkeeper_client::{ApiClient, DEFAULT_AUTH_COOKIE};
use gridkeeper_core::{ConsoleError, ConsoleResult};
use gridkeeper_grid::UpdateFailurePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "gridkeeper.toml";

/// Server used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub server: ServerConfig,
    pub behaviour: BehaviourConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Backend root, endpoint paths are appended to it
    pub base_url: String,

    /// Name of the session cookie carrying `token`
    pub auth_cookie: String,

    /// Session token; requests are anonymous without one
    pub token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_cookie: DEFAULT_AUTH_COOKIE.to_string(),
            token: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviourConfig {
    pub update_failure: UpdateFailurePolicy,
    pub reload_on_reveal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ConsoleConfig {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] when it exists
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> ConsoleResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(&default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse a configuration file
    pub fn from_file(path: &Path) -> ConsoleResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConsoleError::config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
            .map_err(|e| ConsoleError::config(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration text
    pub fn from_toml_str(content: &str) -> ConsoleResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, base_url: Option<String>, token: Option<String>) -> Self {
        if let Some(base_url) = base_url {
            self.server.base_url = base_url;
        }
        if let Some(token) = token {
            self.server.token = Some(token);
        }
        self
    }

    /// HTTP client for the configured server
    pub fn api_client(&self) -> ApiClient {
        let api = ApiClient::new(&self.server.base_url);
        match &self.server.token {
            Some(token) => api.with_cookie(&self.server.auth_cookie, token),
            None => api,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.server.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.server.auth_cookie, "access_token");
        assert_eq!(config.behaviour.update_failure, UpdateFailurePolicy::Close);
        assert!(!config.behaviour.reload_on_reveal);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nbase_url = \"https://admin.example.org\"\n\n\
             [behaviour]\nupdate_failure = \"keep-open\""
        )
        .unwrap();

        let config = ConsoleConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.server.base_url, "https://admin.example.org");
        assert_eq!(config.server.auth_cookie, "access_token");
        assert_eq!(config.behaviour.update_failure, UpdateFailurePolicy::KeepOpen);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_file_names_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[behaviour]\nupdate_failure = \"sometimes\"").unwrap();

        let err = ConsoleConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConsoleError::Config(_)));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            ConsoleConfig::load(Some(&missing)),
            Err(ConsoleError::Config(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let config = ConsoleConfig::default()
            .with_overrides(Some("http://10.0.0.5:9000".into()), Some("abc".into()));
        assert_eq!(config.server.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.server.token.as_deref(), Some("abc"));
        assert_eq!(config.api_client().base_url(), "http://10.0.0.5:9000");

        let untouched = ConsoleConfig::default().with_overrides(None, None);
        assert_eq!(untouched, ConsoleConfig::default());
    }
}
