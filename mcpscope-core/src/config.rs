//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/mcpscope/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/mcpscope/` (~/.config/mcpscope/)
//! - State/Logs: `$XDG_STATE_HOME/mcpscope/` (~/.local/state/mcpscope/)

use crate::analytics::ReportOptions;
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
    /// Analytics report configuration
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analytics report configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsConfig {
    /// How many tools the top-performing list holds
    #[serde(default = "default_top_tools_count")]
    pub top_tools_count: usize,

    /// Error-rate fraction above which a tool requires attention
    #[serde(default = "default_attention_error_rate")]
    pub attention_error_rate: f64,

    /// Average latency in milliseconds above which a tool requires attention
    #[serde(default = "default_attention_latency_ms")]
    pub attention_latency_ms: i64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_tools_count: default_top_tools_count(),
            attention_error_rate: default_attention_error_rate(),
            attention_latency_ms: default_attention_latency_ms(),
        }
    }
}

impl AnalyticsConfig {
    /// Report options for the analytics aggregator.
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            top_tools_count: self.top_tools_count,
            attention_error_rate: self.attention_error_rate,
            attention_latency_ms: self.attention_latency_ms,
        }
    }
}

fn default_top_tools_count() -> usize {
    5
}

fn default_attention_error_rate() -> f64 {
    0.05
}

fn default_attention_latency_ms() -> i64 {
    1000
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of rotated log files to keep
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("mcpscope").join("config.toml")
    }

    /// Get the state directory path (for logs)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("mcpscope")
    }

    /// Get the log file path
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("mcpscope.log")
    }
}
