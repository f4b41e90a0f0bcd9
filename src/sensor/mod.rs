//! # Sensor Module
//!
//! Everything between the serial wire and a [`Reading`]:
//!
//! ```text
//! serial bytes ──► LineBuffer ──► decode_line ──► SensorState ──► reader mailbox
//!                  (framing)      (ASCII + parse)  (last good)      (size one)
//! ```
//!
//! The device prints one sentence per line:
//!
//! ```text
//! $<temperature>,<humidity>,<pressure>#\r\n
//! ```
//!
//! Temperature is in °C, humidity in %, pressure in Pa. The firmware already
//! applies the BME280 compensation, so values are used as received.

pub mod ports;
pub mod reader;

use crate::constants::{MAX_LINE_BYTES, SENTENCE_END, SENTENCE_START};
use crate::logger::log;
use std::fmt;
use thiserror::Error;

/// One temperature/humidity/pressure triple
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Reading {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
}

impl Reading {
    pub fn new(temperature: f64, humidity: f64, pressure: f64) -> Self {
        Self { temperature, humidity, pressure }
    }

    /// True once every channel has reported something other than zero
    pub fn is_complete(&self) -> bool {
        self.temperature != 0.0 && self.humidity != 0.0 && self.pressure != 0.0
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} C, {:.2} %, {:.2} Pa", self.temperature, self.humidity, self.pressure)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("line is not ASCII")]
    NotAscii,

    #[error("missing '$' or '#' marker")]
    MissingMarker,

    #[error("expected three comma separated fields, got {0}")]
    FieldCount(usize),

    #[error("field {field} is not a number: {text:?}")]
    InvalidNumber { field: &'static str, text: String },
}

/// Parse a `$t,h,p#` sentence.
///
/// Fields beyond the third are ignored. Surrounding whitespace inside a field
/// is tolerated, text after `#` is not inspected.
pub fn parse_line(line: &str) -> Result<Reading, ParseError> {
    if !line.contains(SENTENCE_START) || !line.contains(SENTENCE_END) {
        return Err(ParseError::MissingMarker);
    }

    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 3 {
        return Err(ParseError::FieldCount(fields.len()));
    }

    // text between the first '$' and the next one, if any
    let temperature = fields[0]
        .split(SENTENCE_START)
        .nth(1)
        .ok_or(ParseError::MissingMarker)?;
    let humidity = fields[1];
    let pressure = fields[2]
        .trim_end_matches(['\n', '\r'])
        .split(SENTENCE_END)
        .next()
        .unwrap_or_default();

    Ok(Reading {
        temperature: parse_field("temperature", temperature)?,
        humidity: parse_field("humidity", humidity)?,
        pressure: parse_field("pressure", pressure)?,
    })
}

/// Decode raw bytes from the port and parse them as a sentence
pub fn decode_line(bytes: &[u8]) -> Result<Reading, ParseError> {
    if !bytes.is_ascii() {
        return Err(ParseError::NotAscii);
    }
    let line = std::str::from_utf8(bytes).map_err(|_| ParseError::NotAscii)?;
    parse_line(line)
}

fn parse_field(field: &'static str, text: &str) -> Result<f64, ParseError> {
    text.trim().parse::<f64>().map_err(|_| ParseError::InvalidNumber {
        field,
        text: text.to_string(),
    })
}

/// Last successfully parsed reading
///
/// Starts at all zeros. Lines that fail to decode or parse are dropped and the
/// previous reading stays in place.
#[derive(Debug, Default, Clone)]
pub struct SensorState {
    last: Reading,
}

impl SensorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one line from the device. Returns whether the reading changed.
    pub fn apply_line(&mut self, bytes: &[u8]) -> bool {
        match decode_line(bytes) {
            Ok(reading) => {
                self.last = reading;
                true
            }
            Err(e) => {
                log::debug!("Discarding serial line ({}): {:?}", e, String::from_utf8_lossy(bytes));
                false
            }
        }
    }

    /// Current values, including the all-zero start state
    pub fn current(&self) -> Reading {
        self.last
    }

    pub fn ready(&self) -> bool {
        self.last.is_complete()
    }

    /// The reading to publish, or `None` until every channel is non-zero
    pub fn publishable(&self) -> Option<Reading> {
        self.ready().then_some(self.last)
    }
}

/// Frames arbitrary serial chunks into `\n` terminated lines
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
    }

    /// Pop the next complete line, terminator included
    pub fn next_line(&mut self) -> Option<Vec<u8>> {
        match self.pending.iter().position(|&b| b == b'\n') {
            Some(pos) => Some(self.pending.drain(..=pos).collect()),
            None => {
                if self.pending.len() > MAX_LINE_BYTES {
                    log::debug!("Dropping {} bytes without line terminator", self.pending.len());
                    self.pending.clear();
                }
                None
            }
        }
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
