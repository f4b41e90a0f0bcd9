use bme280_logger::logger;
use serial_test::serial;
use std::sync::Once;

static INIT: Once = Once::new();

fn ensure_logger_init() {
    INIT.call_once(|| {
        let _ = logger::init_logger();
    });
}

#[test]
#[serial]
fn test_logger_initialization() {
    let result = logger::init_logger();
    assert!(result.is_ok(), "Logger initialization should succeed");
}

#[test]
#[serial]
fn test_logger_multiple_initialization() {
    ensure_logger_init();

    let result1 = logger::init_logger();
    let result2 = logger::init_logger();

    assert!(result1.is_ok(), "First logger init should succeed");
    assert!(result2.is_ok(), "Second logger init should not panic");
}

#[test]
#[serial]
fn test_log_macros_with_formatting() {
    ensure_logger_init();

    let port = "/dev/ttyUSB0";
    let rows = 42;
    let delay = 0.5;

    bme280_logger::logger::log::info!("Opening serial port {} at {} baud", port, 9600);
    bme280_logger::logger::log::warn!("Port {} not found, keeping previous selection", port);
    bme280_logger::logger::log::error!("Failed to write sample: {}", "disk full");
    bme280_logger::logger::log::debug!("Wrote {} rows with delay {}s", rows, delay);
}

#[test]
#[serial]
fn test_structured_fields() {
    ensure_logger_init();

    bme280_logger::logger::log::info!(
        port = "COM3",
        temperature = 21.5,
        humidity = 40.25,
        pressure = 101325.0,
        "Reading emitted"
    );
}

#[test]
#[serial]
fn test_logging_from_worker_thread() {
    ensure_logger_init();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                bme280_logger::logger::log::debug!("worker {} discarded a line", i);
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().is_ok());
    }
}
