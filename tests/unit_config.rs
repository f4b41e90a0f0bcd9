use bme280_logger::config::*;
use serial_test::serial;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
#[serial]
fn test_logger_config_default() {
    let config = LoggerConfig::default();

    assert_eq!(config.log_path, "");
    assert_eq!(config.port, "");
    assert_eq!(config.poll_delay().unwrap().as_duration(), Duration::from_secs(1));
    assert_eq!(config.delay.as_text(), "1");
    assert!(config.extra.is_empty());

    let value: serde_json::Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();
    assert!(value["Delay"].is_u64());
}

#[test]
#[serial]
fn test_config_json_field_names() {
    let config = LoggerConfig {
        log_path: "/tmp/log.txt".to_string(),
        port: "ttyUSB0".to_string(),
        delay: DelaySetting::from("2.5"),
        ..Default::default()
    };

    let json = config.to_json().expect("Failed to serialize config");
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["LogPath"], "/tmp/log.txt");
    assert_eq!(value["Port"], "ttyUSB0");
    assert_eq!(value["Delay"], "2.5");
}

#[test]
#[serial]
fn test_config_roundtrip_save_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.json");

    let original_config = LoggerConfig {
        log_path: "C:\\logs\\bme280.txt".to_string(),
        port: "COM4".to_string(),
        delay: DelaySetting::from("0,5"),
        ..Default::default()
    };

    original_config.save_to(&config_path).expect("Failed to save config");
    let loaded_config = LoggerConfig::load_from(&config_path).expect("Failed to load config");

    assert_eq!(original_config, loaded_config);
    assert_eq!(
        loaded_config.poll_delay().unwrap().as_duration(),
        Duration::from_millis(500)
    );
}

#[test]
#[serial]
fn test_config_file_unchanged_after_load_and_save() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    // Both shapes of Delay must survive a load/save cycle byte for byte
    let files = [
        "{\n    \"LogPath\": \"/home/user/log.txt\",\n    \"Port\": \"ttyUSB0\",\n    \"Delay\": \"1\"\n}",
        "{\n    \"LogPath\": \"\",\n    \"Port\": \"COM3\",\n    \"Delay\": 0.5\n}",
        "{\n    \"LogPath\": \"a.txt\",\n    \"Port\": \"\",\n    \"Delay\": 3\n}",
    ];

    for (i, content) in files.iter().enumerate() {
        let path = temp_dir.path().join(format!("config_{}.json", i));
        fs::write(&path, content).unwrap();

        let config = LoggerConfig::load_from(&path).expect("Failed to load config");
        config.save_to(&path).expect("Failed to save config");

        assert_eq!(&fs::read_to_string(&path).unwrap(), content);
    }
}

#[test]
#[serial]
fn test_config_keeps_unknown_keys() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"Theme": "dark", "LogPath": "a.txt", "Port": "COM3", "Delay": "1", "Window": {"x": 10}}"#,
    )
    .unwrap();

    let config = LoggerConfig::load_from(&path).expect("Failed to load config");
    assert_eq!(config.extra.len(), 2);
    config.save_to(&path).expect("Failed to save config");

    let expected = "{\n    \"LogPath\": \"a.txt\",\n    \"Port\": \"COM3\",\n    \"Delay\": \"1\",\n    \"Theme\": \"dark\",\n    \"Window\": {\n        \"x\": 10\n    }\n}";
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
}

#[test]
#[serial]
fn test_config_numeric_delay() {
    let config: LoggerConfig =
        serde_json::from_str(r#"{"LogPath": "x.txt", "Port": "COM1", "Delay": 0.25}"#).unwrap();

    assert_eq!(config.delay.as_text(), "0.25");
    assert_eq!(config.poll_delay().unwrap().as_duration(), Duration::from_millis(250));
}

#[test]
#[serial]
fn test_config_load_missing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let result = LoggerConfig::load_from(&temp_dir.path().join("missing.json"));

    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
#[serial]
fn test_config_load_invalid_json() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("config.json");

    for content in ["not json", "{\"LogPath\": \"x\"}", "{\"LogPath\": 1, \"Port\": \"\", \"Delay\": 1}"] {
        fs::write(&path, content).unwrap();
        let result = LoggerConfig::load_from(&path);
        assert!(matches!(result, Err(ConfigError::Json(_))), "accepted {:?}", content);
    }
}

#[test]
#[serial]
fn test_config_load_falls_back_to_defaults() {
    // load() resolves config.json against the working directory
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(temp_dir.path()).unwrap();

    let missing = LoggerConfig::load();

    fs::write("config.json", "{ broken").unwrap();
    let corrupt = LoggerConfig::load();

    std::env::set_current_dir(previous).unwrap();

    assert_eq!(missing, LoggerConfig::default());
    assert_eq!(corrupt, LoggerConfig::default());
}

#[test]
#[serial]
fn test_config_save_writes_working_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(temp_dir.path()).unwrap();

    let config = LoggerConfig {
        log_path: "samples.txt".to_string(),
        port: "ttyACM0".to_string(),
        delay: DelaySetting::from("2"),
        ..Default::default()
    };
    let saved = config.save();
    let loaded = LoggerConfig::load();

    std::env::set_current_dir(previous).unwrap();

    assert!(saved.is_ok());
    assert!(temp_dir.path().join("config.json").exists());
    assert_eq!(loaded, config);
}

#[test]
fn test_poll_delay_parsing() {
    assert_eq!(PollDelay::parse("1").unwrap().as_duration(), Duration::from_secs(1));
    assert_eq!(PollDelay::parse(" 2.5 ").unwrap().as_duration(), Duration::from_millis(2500));
    assert_eq!(PollDelay::parse("0,1").unwrap().as_duration(), Duration::from_millis(100));
    assert!(matches!(PollDelay::parse("soon"), Err(ConfigError::InvalidDelay(_))));
}
