//! # LoggerBME280
//!
//! Entry point: initialise diagnostic logging, configure the native window and
//! hand control to eframe's event loop. All application logic lives in the
//! `bme280_logger` library crate.

use bme280_logger::constants::{APP_NAME, WINDOW_MIN_SIZE, WINDOW_SIZE};
use bme280_logger::gui::app::LoggerApp;
use bme280_logger::logger;
use eframe::egui::ViewportBuilder;

fn main() -> eframe::Result<()> {
    // Before anything else so startup problems are visible
    logger::init_logger().expect("Failed to initialize logger");

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size(WINDOW_SIZE)
            .with_min_inner_size(WINDOW_MIN_SIZE)
            .with_title(APP_NAME),
        centered: true,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        options,
        Box::new(|cc| Ok(Box::new(LoggerApp::new(cc)))),
    )
}
