//! Typed configuration for the NLM chat gateway.
//!
//! Configuration is loaded from `~/.nlm/config.json` when present, then
//! overridden by environment variables:
//! - `OPENROUTER_API_KEY` - completion provider credential
//! - `PORT` - listening port
//! - `NLM_LOG_LEVEL` - base log level
//!
//! Every field has a default, so an empty or missing file yields a fully
//! usable configuration (minus the provider credential, which is validated
//! at startup).

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Top-level gateway configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub observability: ObservabilityConfig,
    pub transcript: TranscriptConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Upstream completion provider settings.
///
/// The sampling parameters are fixed per deployment and sent unchanged on
/// every completion request.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API key for the provider. Usually supplied via `OPENROUTER_API_KEY`.
    pub api_key: Option<String>,
    /// Base URL of the provider endpoint (overridable for tests).
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Maximum tokens to generate per reply.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
    /// Nucleus-sampling top-p.
    pub top_p: f64,
    /// `HTTP-Referer` header value sent to the provider.
    pub referer: String,
    /// `X-Title` header value sent to the provider.
    pub title: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://openrouter.ai".to_string(),
            model: "mistralai/mixtral-8x7b-instruct".to_string(),
            max_tokens: 400,
            temperature: 0.4,
            top_p: 0.9,
            referer: "http://localhost:5000".to_string(),
            title: "NLM Chatbot".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

/// Q&A transcript sink settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    pub path: PathBuf,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("chat_log.txt"),
        }
    }
}

/// Directory holding the gateway configuration file.
pub fn config_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".nlm"))
        .unwrap_or_else(|| PathBuf::from(".nlm"))
}

impl Config {
    /// Load configuration from the default config directory plus
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(None)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific directory (used by tests),
    /// falling back to defaults when no file exists. Does not consult the
    /// environment.
    pub fn load_from(dir: Option<PathBuf>) -> Result<Self> {
        let cfg_dir = dir.unwrap_or_else(config_dir);
        let path = cfg_dir.join("config.json");

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("invalid {}: {e}", path.display())))
    }

    /// Apply environment variable overrides on top of file values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = env::var("OPENROUTER_API_KEY") {
            if !key.is_empty() {
                self.provider.api_key = Some(key);
            }
        }

        if let Ok(port) = env::var("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(port = %port, "Ignoring unparseable PORT override"),
            }
        }

        if let Ok(level) = env::var("NLM_LOG_LEVEL") {
            if !level.is_empty() {
                self.observability.log_level = level;
            }
        }
    }

    /// Validate that the configuration is complete enough to serve traffic.
    pub fn validate(&self) -> Result<()> {
        match self.provider.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err(Error::Config(
                "provider API key is not set; configure provider.api_key or OPENROUTER_API_KEY"
                    .to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.provider.model, "mistralai/mixtral-8x7b-instruct");
        assert_eq!(config.provider.max_tokens, 400);
        assert!((config.provider.temperature - 0.4).abs() < f64::EPSILON);
        assert!((config.provider.top_p - 0.9).abs() < f64::EPSILON);
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.transcript.path, PathBuf::from("chat_log.txt"));
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_load_partial_file_merges_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.json"),
            r#"{"server": {"port": 8080}, "provider": {"api_key": "sk-test"}}"#,
        )
        .unwrap();

        let config = Config::load_from(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.provider.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.provider.model, "mistralai/mixtral-8x7b-instruct");
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.json"), "{not json").unwrap();

        let err = Config::load_from(Some(dir.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        // This is the only test that touches these variables, so the
        // process-global environment mutation is safe under parallel runs.
        env::set_var("OPENROUTER_API_KEY", "sk-from-env");
        env::set_var("PORT", "9001");
        env::set_var("NLM_LOG_LEVEL", "debug");

        let mut config = Config::default();
        config.apply_env_overrides();

        env::remove_var("OPENROUTER_API_KEY");
        env::remove_var("PORT");
        env::remove_var("NLM_LOG_LEVEL");

        assert_eq!(config.provider.api_key.as_deref(), Some("sk-from-env"));
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_validate_requires_api_key() {
        let mut config = Config::default();
        assert!(config.validate().is_err());

        config.provider.api_key = Some("  ".to_string());
        assert!(config.validate().is_err());

        config.provider.api_key = Some("sk-test".to_string());
        assert!(config.validate().is_ok());
    }
}
