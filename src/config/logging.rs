//! Logging configuration: filter level and the optional rolling log file

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// How often the log file rolls over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    /// Single file, never rotated
    Never,
}

impl FromStr for LogRotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "never" => Ok(Self::Never),
            other => Err(format!("unknown log rotation '{}'", other)),
        }
    }
}

impl fmt::Display for LogRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        })
    }
}

/// Where JSON log lines are written when file logging is on
#[derive(Debug, Clone, PartialEq)]
pub struct FileSink {
    pub dir: PathBuf,
    pub rotation: LogRotation,
    /// "chat-ui" -> "chat-ui.2026-01-15"
    pub prefix: String,
}

impl Default for FileSink {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./logs"),
            rotation: LogRotation::Daily,
            prefix: "chat-ui".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// None keeps logs in the in-app buffer only
    pub file: Option<FileSink>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// `[logging]` as written in the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    /// Fill gaps in the file section with defaults
    ///
    /// An unrecognized rotation falls back to daily.
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let file = file.unwrap_or_default();
        let sink = file.file_enabled.unwrap_or(false).then(|| {
            let defaults = FileSink::default();
            FileSink {
                dir: file.file_dir.map(PathBuf::from).unwrap_or(defaults.dir),
                rotation: file
                    .file_rotation
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.rotation),
                prefix: file.file_prefix.unwrap_or(defaults.prefix),
            }
        });

        Self {
            level: file.level.unwrap_or_else(|| Self::default().level),
            file: sink,
        }
    }

    /// The sink that is or would be used, for writing the config template
    pub fn sink_or_default(&self) -> FileSink {
        self.file.clone().unwrap_or_default()
    }
}
