//! # BME280 Logger
//!
//! Desktop logger for a BME280 temperature/humidity/pressure sensor attached
//! through a serial link. The device prints `$t,h,p#` sentences; a background
//! thread parses them and hands the latest reading to the UI at a fixed poll
//! delay, and every reading the UI receives is appended to a CSV file.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ sensor       │    │ session      │    │ gui          │
//! │ • ports      │───►│ • Run/Pause/ │◄──►│ • displays   │
//! │ • parser     │    │   Stop       │    │ • settings   │
//! │ • reader     │    │ • recorder   │    │ • menu       │
//! └──────────────┘    └──────────────┘    └──────────────┘
//!                            │
//!                     ┌──────────────┐
//!                     │ config       │
//!                     │ config.json  │
//!                     └──────────────┘
//! ```

pub mod config;
pub mod constants;
pub mod gui;
pub mod logger;
pub mod recorder;
pub mod sensor;
pub mod session;
