//! Configuration for the chat viewer
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/chat-ui/config.toml)
//! 3. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod logging;
mod serialization;


pub use logging::{FileLogging, FileSink, LogRotation, LoggingConfig};

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Env var overriding the theme
pub const THEME_ENV: &str = "CHAT_UI_THEME";
/// Env var overriding the copy feedback window in milliseconds
pub const COPY_TIMEOUT_ENV: &str = "CHAT_UI_COPY_TIMEOUT_MS";

const DEFAULT_COPY_TIMEOUT_MS: u64 = 2000;
const DEFAULT_TICK_RATE_MS: u64 = 100;
const DEFAULT_DRAWER_WIDTH_PERCENT: u16 = 60;

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// How long the copy action shows its check mark
    pub copy_timeout_ms: u64,

    /// Theme name: "dark", "light", "terminal" or a file in the themes dir
    pub theme: String,

    /// Redraw interval of the event loop
    pub tick_rate_ms: u64,

    /// Width of the preview drawer as a share of the terminal
    pub drawer_width_percent: u16,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            copy_timeout_ms: DEFAULT_COPY_TIMEOUT_MS,
            theme: "dark".to_string(),
            tick_rate_ms: DEFAULT_TICK_RATE_MS,
            drawer_width_percent: DEFAULT_DRAWER_WIDTH_PERCENT,
            logging: LoggingConfig::default(),
        }
    }
}

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub copy_timeout_ms: Option<u64>,
    pub theme: Option<String>,
    pub tick_rate_ms: Option<u64>,
    pub drawer_width_percent: Option<u16>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

impl Config {
    /// Get the config file path: ~/.config/chat-ui/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("chat-ui").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        // Config::default().to_toml() is the single source of truth
        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Overwrite the config file with defaults
    pub fn reset() -> Result<PathBuf> {
        let path = Self::config_path().context("Cannot determine home directory")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&path, Self::default().to_toml())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Read the config file if it exists
    ///
    /// A file that exists but cannot be read or parsed is an error; a broken
    /// config must not silently fall back to defaults.
    fn load_file_config(path: Option<&Path>) -> Result<FileConfig> {
        let Some(path) = path else {
            return Ok(FileConfig::default());
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => parse_file_config(&contents)
                .with_context(|| format!("Failed to parse configuration file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => Err(e)
                .with_context(|| format!("Cannot read configuration file {}", path.display())),
        }
    }

    /// Load configuration: env vars -> file -> defaults
    pub fn load() -> Result<Self> {
        let file = Self::load_file_config(Self::config_path().as_deref())?;
        Ok(Self::from_sources(file, |key| std::env::var(key).ok()))
    }

    /// Merge a parsed file with environment lookups
    pub(crate) fn from_sources(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        // Copy timeout: env > file > default
        let copy_timeout_ms = env(COPY_TIMEOUT_ENV)
            .and_then(|v| v.trim().parse().ok())
            .or(file.copy_timeout_ms)
            .unwrap_or(DEFAULT_COPY_TIMEOUT_MS);

        // Theme: env > file > default
        let theme = env(THEME_ENV)
            .filter(|v| !v.trim().is_empty())
            .or(file.theme)
            .unwrap_or_else(|| "dark".to_string());

        let tick_rate_ms = file
            .tick_rate_ms
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_TICK_RATE_MS);

        let drawer_width_percent = file
            .drawer_width_percent
            .unwrap_or(DEFAULT_DRAWER_WIDTH_PERCENT)
            .clamp(20, 100);

        Self {
            copy_timeout_ms,
            theme,
            tick_rate_ms,
            drawer_width_percent,
            logging: LoggingConfig::from_file(file.logging),
        }
    }

    pub fn copy_timeout(&self) -> Duration {
        Duration::from_millis(self.copy_timeout_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

pub(crate) fn parse_file_config(contents: &str) -> Result<FileConfig, toml::de::Error> {
    toml::from_str(contents)
}
