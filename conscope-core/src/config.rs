//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/conscope/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/conscope/` (~/.config/conscope/)
//! - State/Logs: `$XDG_STATE_HOME/conscope/` (~/.local/state/conscope/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Transcript archive endpoints
    #[serde(default)]
    pub archive: ArchiveConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the static transcript archive lives.
///
/// The archive is a plain file server: one directory of transcript files
/// (with an HTML index) and a sibling directory of analysis files.
#[derive(Debug, Deserialize, Clone)]
pub struct ArchiveConfig {
    /// Base URL of the archive server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory of transcript files, relative to the base URL
    #[serde(default = "default_transcripts_dir")]
    pub transcripts_dir: String,

    /// Directory of analysis files, relative to the base URL
    #[serde(default = "default_analyses_dir")]
    pub analyses_dir: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            transcripts_dir: default_transcripts_dir(),
            analyses_dir: default_analyses_dir(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ArchiveConfig {
    /// Full URL of the transcripts directory, without a trailing slash.
    pub fn transcripts_url(&self) -> String {
        join_url(&self.base_url, &self.transcripts_dir)
    }

    /// Full URL of the analyses directory, without a trailing slash.
    pub fn analyses_url(&self) -> String {
        join_url(&self.base_url, &self.analyses_dir)
    }

    /// Validate configuration, returning an error message if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::Config(
                "archive.base_url must not be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "archive.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn join_url(base: &str, segment: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        segment.trim_matches('/')
    )
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_transcripts_dir() -> String {
    "conversation_transcripts".to_string()
}

fn default_analyses_dir() -> String {
    "monitoring_responses".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.archive.validate()?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/conscope/config.toml` (~/.config/conscope/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("conscope").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/conscope/` (~/.local/state/conscope/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("conscope")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/conscope/conscope.log` (~/.local/state/conscope/conscope.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("conscope.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.archive.base_url, "http://localhost:8000");
        assert_eq!(config.archive.transcripts_dir, "conversation_transcripts");
        assert_eq!(config.archive.analyses_dir, "monitoring_responses");
        assert_eq!(config.archive.timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[archive]
base_url = "https://archive.example.com/"
analyses_dir = "evals"
timeout_secs = 10

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.archive.base_url, "https://archive.example.com/");
        assert_eq!(config.archive.timeout_secs, 10);
        assert_eq!(config.logging.level, "debug");
        // Unset fields keep their defaults.
        assert_eq!(config.archive.transcripts_dir, "conversation_transcripts");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[archive]\nbase_url = \"http://127.0.0.1:9000\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.archive.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_rejects_invalid_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[archive]\ntimeout_secs = 0\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_url_joining_normalizes_slashes() {
        let archive = ArchiveConfig {
            base_url: "https://archive.example.com/".to_string(),
            transcripts_dir: "/conversation_transcripts/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            archive.transcripts_url(),
            "https://archive.example.com/conversation_transcripts"
        );
        assert_eq!(
            archive.analyses_url(),
            "https://archive.example.com/monitoring_responses"
        );
    }

    #[test]
    fn test_validation_rejects_empty_base_url() {
        let archive = ArchiveConfig {
            base_url: "  ".to_string(),
            ..Default::default()
        };
        assert!(archive.validate().is_err());

        let archive = ArchiveConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(archive.validate().is_err());
    }
}
