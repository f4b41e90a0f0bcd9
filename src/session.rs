//! # Logging Session Control
//!
//! Ties a [`SensorReader`] to a [`LogSession`] and implements the Run / Pause /
//! Stop buttons:
//!
//! ```text
//!            start (new log + header)
//!   Idle ─────────────────────────────► Running
//!    ▲                                  │    ▲
//!    │ stop                       pause │    │ start (same log, no header)
//!    │                                  ▼    │
//!    └──────────────────────────────── Paused
//!                  stop
//! ```
//!
//! Pausing stops the reader thread (closing the port) but keeps the log file
//! open; resuming re-opens the port with the current port and delay settings.

use crate::config::{ConfigError, PollDelay};
use crate::logger::log;
use crate::recorder::{FileLogOpener, LogOpener, LogSession, RecorderError, Sample};
use crate::sensor::reader::{SensorReader, SerialOpener, SourceOpener};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Paused,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Stopped"),
            SessionState::Running => write!(f, "Running"),
            SessionState::Paused => write!(f, "Paused"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no log file selected")]
    NoLogFile,

    #[error("no serial port selected")]
    NoPort,

    #[error(transparent)]
    Delay(#[from] ConfigError),

    #[error("could not open port {port}: {source}")]
    Port {
        port: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Recorder(#[from] RecorderError),
}

/// What a run should use; read from the UI fields at the moment Run is pressed
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub port: String,
    pub delay: PollDelay,
    pub log_path: PathBuf,
}

impl RunSettings {
    /// Validate raw UI values
    pub fn from_inputs(port: &str, delay_text: &str, log_path: &str) -> Result<Self, SessionError> {
        if log_path.trim().is_empty() {
            return Err(SessionError::NoLogFile);
        }
        if port.trim().is_empty() {
            return Err(SessionError::NoPort);
        }
        Ok(Self {
            port: port.trim().to_string(),
            delay: PollDelay::parse(delay_text)?,
            log_path: PathBuf::from(log_path),
        })
    }
}

pub struct SessionController {
    opener: Box<dyn SourceOpener>,
    log_opener: Box<dyn LogOpener>,
    state: SessionState,
    reader: Option<SensorReader>,
    log: Option<LogSession>,
    last_sample: Option<Sample>,
    last_error: Option<String>,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController {
    /// Controller reading from real serial ports
    pub fn new() -> Self {
        Self::with_opener(Box::new(SerialOpener))
    }

    pub fn with_opener(opener: Box<dyn SourceOpener>) -> Self {
        Self {
            opener,
            log_opener: Box::new(FileLogOpener),
            state: SessionState::Idle,
            reader: None,
            log: None,
            last_sample: None,
            last_error: None,
        }
    }

    /// Replace how new logs are created
    pub fn with_log_opener(mut self, log_opener: Box<dyn LogOpener>) -> Self {
        self.log_opener = log_opener;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Most recent sample, kept across pause so the displays keep their values
    pub fn last_sample(&self) -> Option<&Sample> {
        self.last_sample.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn rows_written(&self) -> u64 {
        self.log.as_ref().map_or(0, |l| l.rows_written())
    }

    /// Whether the reader thread is alive; false after a port error
    pub fn reader_alive(&self) -> bool {
        self.reader.as_ref().is_some_and(|r| r.is_running())
    }

    /// Run button. A new log is started from `Idle`; from `Paused` the current
    /// log continues. Ignored while already running. On error nothing changes.
    pub fn start(&mut self, settings: &RunSettings) -> Result<(), SessionError> {
        if self.state == SessionState::Running {
            return Ok(());
        }

        let result = self.try_start(settings);
        match &result {
            Ok(()) => self.last_error = None,
            Err(e) => {
                log::error!("Failed to start logging: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
        result
    }

    fn try_start(&mut self, settings: &RunSettings) -> Result<(), SessionError> {
        // Paused with a log for a different file counts as a fresh start
        let resume = self.state == SessionState::Paused
            && self.log.as_ref().is_some_and(|l| l.path() == settings.log_path);

        // Port first: a failed open must not truncate the previous log
        let reader = SensorReader::open(self.opener.as_ref(), &settings.port, settings.delay)
            .map_err(|source| SessionError::Port {
                port: settings.port.clone(),
                source,
            })?;

        let log = if resume {
            None
        } else {
            Some(self.log_opener.create(&settings.log_path)?)
        };

        if let Some(log) = log {
            self.log = Some(log);
        }
        self.reader = Some(reader);
        self.state = SessionState::Running;
        log::info!(
            "Logging {} from {} to {}",
            if resume { "resumed" } else { "started" },
            settings.port,
            settings.log_path.display()
        );
        Ok(())
    }

    /// Pause button: close the port, keep the log
    pub fn pause(&mut self) {
        if self.state != SessionState::Running {
            return;
        }
        self.stop_reader();
        self.state = SessionState::Paused;
        log::info!("Logging paused");
    }

    /// Stop button: close the port and the log
    pub fn stop(&mut self) {
        if self.state == SessionState::Idle {
            return;
        }
        self.stop_reader();
        if let Some(log) = self.log.take() {
            log::info!("Closed {} after {} rows", log.path().display(), log.rows_written());
        }
        self.state = SessionState::Idle;
    }

    /// Collect whatever the reader posted, log it, and return the newest sample
    ///
    /// A failed write is reported through [`last_error`](Self::last_error);
    /// the session keeps running.
    pub fn poll(&mut self) -> Option<Sample> {
        let reader = self.reader.take()?;
        let newest = self.drain(&reader);

        if !reader.is_running() {
            if let Some(e) = reader.last_error() {
                self.last_error = Some(format!("Port {}: {}", reader.port(), e));
            }
        }

        self.reader = Some(reader);
        newest
    }

    fn drain(&mut self, reader: &SensorReader) -> Option<Sample> {
        let mut newest = None;

        while let Some(reading) = reader.try_recv() {
            let sample = Sample::now(reading);
            if let Some(log) = self.log.as_mut() {
                if let Err(e) = log.record(&sample) {
                    log::error!("Failed to write sample: {}", e);
                    self.last_error = Some(e.to_string());
                }
            }
            newest = Some(sample);
        }

        if newest.is_some() {
            self.last_sample = newest;
        }
        newest
    }

    /// Stop the thread, then log the reading it may have posted last
    fn stop_reader(&mut self) {
        if let Some(mut reader) = self.reader.take() {
            reader.stop();
            self.drain(&reader);
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.stop_reader();
    }
}
