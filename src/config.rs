//! # Configuration Management Module
//!
//! Persists the three user settings (log file path, serial port, poll delay)
//! as `config.json` in the working directory:
//!
//! ```json
//! {
//!     "LogPath": "/home/user/bme280.txt",
//!     "Port": "ttyUSB0",
//!     "Delay": "1"
//! }
//! ```
//!
//! `Delay` is accepted as either a JSON string or a JSON number and written
//! back in the same shape it was read. Keys other than the three above are
//! kept in file order and saved back after them. Numbers are rewritten in
//! their shortest form (`1.50` becomes `1.5`), so a canonically formatted
//! file survives a load/save cycle unchanged. The delay text typed in the UI
//! is stored verbatim.
//!
//! ## Failure policy
//!
//! [`LoggerConfig::load`] never fails: a missing or corrupt file is logged and
//! replaced by defaults so the window still opens. The explicit
//! [`LoggerConfig::load_from`] / [`LoggerConfig::save_to`] pair propagates
//! errors to the caller.

use crate::constants::{CONFIG_FILE_NAME, DEFAULT_DELAY_SECONDS};
use crate::logger::log;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid delay '{0}': expected a positive number of seconds")]
    InvalidDelay(String),
}

/// Poll delay as stored in the file: either `"1.5"` or `1.5`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DelaySetting {
    Number(serde_json::Number),
    Text(String),
}

impl DelaySetting {
    /// Text to show in the delay input field
    pub fn as_text(&self) -> String {
        match self {
            DelaySetting::Number(n) => n.to_string(),
            DelaySetting::Text(s) => s.clone(),
        }
    }

    pub fn to_poll_delay(&self) -> Result<PollDelay, ConfigError> {
        PollDelay::parse(&self.as_text())
    }
}

impl From<&str> for DelaySetting {
    fn from(text: &str) -> Self {
        DelaySetting::Text(text.to_string())
    }
}

impl Default for DelaySetting {
    fn default() -> Self {
        DelaySetting::Number(serde_json::Number::from(DEFAULT_DELAY_SECONDS))
    }
}

/// Interval between two emissions of the reader thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollDelay(Duration);

impl PollDelay {
    /// Parse a delay in seconds.
    ///
    /// Both `.` and `,` are accepted as decimal separator. The value is
    /// truncated to whole milliseconds; anything that ends up below one
    /// millisecond is rejected along with negative and non-finite input.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let normalized = text.trim().replace(',', ".");
        let seconds: f64 = normalized
            .parse()
            .map_err(|_| ConfigError::InvalidDelay(text.to_string()))?;

        if !seconds.is_finite() || seconds < 0.0 {
            return Err(ConfigError::InvalidDelay(text.to_string()));
        }

        let millis = (seconds * 1000.0) as u64;
        if millis == 0 {
            return Err(ConfigError::InvalidDelay(text.to_string()));
        }

        Ok(PollDelay(Duration::from_millis(millis)))
    }

    pub fn from_duration(duration: Duration) -> Self {
        PollDelay(duration)
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

/// Persistent user settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// CSV file samples are written to
    #[serde(rename = "LogPath")]
    pub log_path: String,

    /// Serial port name as reported by the OS (`COM3`, `/dev/ttyUSB0`)
    #[serde(rename = "Port")]
    pub port: String,

    /// Poll delay in seconds
    #[serde(rename = "Delay")]
    pub delay: DelaySetting,

    /// Keys this application does not use, carried through unchanged
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LoggerConfig {
    /// Load `config.json` from the working directory, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();
        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default configuration: {}", e);
                Self::default()
            }
        }
    }

    /// Save to `config.json` in the working directory
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path();
        self.save_to(&path)?;
        log::info!("Configuration saved to: {}", path.display());
        Ok(())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write pretty-printed JSON with four-space indentation
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json()?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn poll_delay(&self) -> Result<PollDelay, ConfigError> {
        self.delay.to_poll_delay()
    }

    fn config_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE_NAME)
    }
}
