//! # CSV Recorder
//!
//! Writes samples to the user's log file:
//!
//! ```text
//! Time,Temperature[C],Humidity[%],Pressure[Pa]
//! 18.10.2026 14:03:07.123456,21.53,40.12,101325.00
//! ```
//!
//! A [`LogSession`] holds the file open for as long as logging runs and
//! flushes after every row, so the file is complete up to the last sample
//! even if the application is killed.

use crate::constants::{CSV_HEADER, TIMESTAMP_FORMAT};
use crate::logger::log;
use crate::sensor::Reading;
use chrono::{Local, NaiveDateTime};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("could not open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write log file: {0}")]
    Write(#[from] csv::Error),

    #[error("could not flush log file: {0}")]
    Flush(#[from] std::io::Error),
}

/// A reading stamped with the local wall-clock time it was received
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub reading: Reading,
}

impl Sample {
    pub fn new(timestamp: NaiveDateTime, reading: Reading) -> Self {
        Self { timestamp, reading }
    }

    pub fn now(reading: Reading) -> Self {
        Self::new(Local::now().naive_local(), reading)
    }

    /// CSV fields: time, then the three values with two decimals
    pub fn to_record(&self) -> [String; 4] {
        [
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            format!("{:.2}", self.reading.temperature),
            format!("{:.2}", self.reading.humidity),
            format!("{:.2}", self.reading.pressure),
        ]
    }
}

/// Anything a log can be written to; a [`File`] outside of tests
pub type LogSink = Box<dyn Write + Send>;

/// An open log file receiving samples in arrival order
pub struct LogSession {
    path: PathBuf,
    writer: csv::Writer<LogSink>,
    rows: u64,
}

impl LogSession {
    /// Start a new log: truncates `path` and writes the header row
    pub fn create(path: &Path) -> Result<Self, RecorderError> {
        let file = File::create(path).map_err(|source| RecorderError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut session = Self::with_sink(path, Box::new(file));
        session.writer.write_record(CSV_HEADER)?;
        session.writer.flush()?;
        log::info!("Created log file {}", path.display());
        Ok(session)
    }

    /// Continue an existing log without writing another header
    pub fn append_to(path: &Path) -> Result<Self, RecorderError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| RecorderError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("Appending to log file {}", path.display());
        Ok(Self::with_sink(path, Box::new(file)))
    }

    /// Log into an already open sink; no header is written
    pub fn with_sink(path: &Path, sink: LogSink) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(sink);
        Self {
            path: path.to_path_buf(),
            writer,
            rows: 0,
        }
    }

    pub fn record(&mut self, sample: &Sample) -> Result<(), RecorderError> {
        self.writer.write_record(sample.to_record())?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows written through this session, header excluded
    pub fn rows_written(&self) -> u64 {
        self.rows
    }
}

/// Creates the log for a new run
pub trait LogOpener {
    fn create(&self, path: &Path) -> Result<LogSession, RecorderError>;
}

/// Truncates the file on disk and writes the header
pub struct FileLogOpener;

impl LogOpener for FileLogOpener {
    fn create(&self, path: &Path) -> Result<LogSession, RecorderError> {
        LogSession::create(path)
    }
}
