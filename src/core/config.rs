//! Configuration management for the Copilot proxy server.
//!
//! Configuration is loaded from a JSON file (`config.json` by default) and
//! validated before the server starts. A handful of environment variables can
//! override file values.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Long-lived GitHub credential exchanged for short-lived Copilot tokens
    pub refresh_token: String,

    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Caller-facing bearer tokens accepted by this proxy
    pub auth_tokens: Vec<String>,

    /// Request timeout in seconds for upstream completion calls
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    300
}

impl AppConfig {
    /// Load configuration from a JSON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use copilot_proxy_rust::core::config::AppConfig;
    ///
    /// let config = AppConfig::load("config.json").expect("Failed to load config");
    /// ```
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| {
            format!(
                "Failed to read config file: {}. Create one using config.json.example as a template.",
                path
            )
        })?;

        let mut config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        // Override with environment variables (env vars take precedence)

        // Server host override
        if let Ok(host) = std::env::var("HOST") {
            config.host = host;
        }

        // Server port override
        if let Ok(port_str) = std::env::var("PORT") {
            if let Ok(port) = port_str.parse::<u16>() {
                config.port = port;
            }
        }

        // Request timeout override
        if let Ok(timeout_str) = std::env::var("REQUEST_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout_str.parse::<u64>() {
                config.request_timeout_secs = timeout;
            }
        }

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.refresh_token.is_empty() {
            bail!("refresh_token must not be empty");
        }

        if self.auth_tokens.is_empty() {
            bail!("auth_tokens array cannot be empty");
        }

        if self.auth_tokens.iter().any(|t| t.is_empty()) {
            bail!("auth_tokens entries must be non-empty strings");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    #[serial]
    fn test_load_valid_config() {
        let file = write_config(
            r#"{
                "refresh_token": "gho_test",
                "host": "127.0.0.1",
                "port": 9191,
                "auth_tokens": ["sk-local-1", "sk-local-2"]
            }"#,
        );

        let config = AppConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.refresh_token, "gho_test");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9191);
        assert_eq!(config.auth_tokens.len(), 2);
        assert_eq!(config.request_timeout_secs, 300);
    }

    #[test]
    #[serial]
    fn test_load_missing_file() {
        let result = AppConfig::load("/nonexistent/config.json");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("config.json.example"));
    }

    #[test]
    #[serial]
    fn test_load_missing_required_field() {
        let file = write_config(
            r#"{
                "host": "127.0.0.1",
                "port": 9191,
                "auth_tokens": ["sk-local-1"]
            }"#,
        );

        let result = AppConfig::load(file.path().to_str().unwrap());
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_load_empty_auth_tokens() {
        let file = write_config(
            r#"{
                "refresh_token": "gho_test",
                "host": "127.0.0.1",
                "port": 9191,
                "auth_tokens": []
            }"#,
        );

        let result = AppConfig::load(file.path().to_str().unwrap());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("auth_tokens"));
    }

    #[test]
    #[serial]
    fn test_load_empty_refresh_token() {
        let file = write_config(
            r#"{
                "refresh_token": "",
                "host": "127.0.0.1",
                "port": 9191,
                "auth_tokens": ["sk-local-1"]
            }"#,
        );

        let result = AppConfig::load(file.path().to_str().unwrap());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("refresh_token"));
    }

    #[test]
    #[serial]
    fn test_load_non_string_auth_tokens() {
        let file = write_config(
            r#"{
                "refresh_token": "gho_test",
                "host": "127.0.0.1",
                "port": 9191,
                "auth_tokens": [42]
            }"#,
        );

        let result = AppConfig::load(file.path().to_str().unwrap());
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let file = write_config(
            r#"{
                "refresh_token": "gho_test",
                "host": "127.0.0.1",
                "port": 9191,
                "auth_tokens": ["sk-local-1"]
            }"#,
        );

        std::env::set_var("HOST", "0.0.0.0");
        std::env::set_var("PORT", "18080");
        let config = AppConfig::load(file.path().to_str().unwrap()).unwrap();
        std::env::remove_var("HOST");
        std::env::remove_var("PORT");

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 18080);
    }
}
