//! # Application Constants
//!
//! Application-wide constants: serial link parameters, log file format,
//! configuration file name and window geometry. Anything that has to agree
//! between the reader thread, the CSV recorder and the UI lives here.

/// Baud rate the sensor firmware transmits at
pub const SERIAL_BAUD_RATE: u32 = 9600;

/// Read timeout for the serial port (milliseconds)
/// Bounds how long the poll thread takes to notice a stop request
pub const SERIAL_READ_TIMEOUT_MS: u64 = 50;

/// Longest line accepted from the device before the partial buffer is dropped
pub const MAX_LINE_BYTES: usize = 256;

/// Marker that opens a sensor sentence
pub const SENTENCE_START: char = '$';

/// Marker that closes a sensor sentence
pub const SENTENCE_END: char = '#';

/// Header row written at the top of every new log file
pub const CSV_HEADER: [&str; 4] = ["Time", "Temperature[C]", "Humidity[%]", "Pressure[Pa]"];

/// chrono format for the time column, e.g. `18.10.2026 14:03:07.123456`
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S%.6f";

/// Configuration file, resolved against the working directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Poll delay used when no configuration is available (seconds)
pub const DEFAULT_DELAY_SECONDS: u64 = 1;

/// How often the UI wakes up to drain the reader mailbox while running
pub const UI_REFRESH_INTERVAL_MS: u64 = 100;

/// Initial window size
pub const WINDOW_SIZE: (f32, f32) = (500.0, 500.0);

/// Minimum window size so that all controls stay visible
pub const WINDOW_MIN_SIZE: (f32, f32) = (360.0, 420.0);

pub const APP_NAME: &str = "LoggerBME280";
