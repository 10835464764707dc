use hookwire_logging::{find_config_file_in, load_config, parse_config, Error, LogFormat};
use pretty_assertions::assert_eq;
use std::fs;
use tracing_core::metadata::LevelFilter;

#[test]
fn test_full_config_parses() {
  let yaml = r#"
version: 1
level: warn
format: json
ansi: false
targets:
  hookwire: debug
  hookwire_ioc: trace
"#;

  let config = parse_config(yaml).unwrap();

  assert_eq!(config.level, LevelFilter::WARN);
  assert_eq!(config.format, LogFormat::Json);
  assert!(!config.ansi);
  assert!(config.with_target);
  assert_eq!(config.targets.get("hookwire"), Some(&LevelFilter::DEBUG));
  assert_eq!(config.directives(), "warn,hookwire=debug,hookwire_ioc=trace");
}

#[test]
fn test_empty_document_uses_defaults() {
  let config = parse_config("{}").unwrap();
  assert_eq!(config.level, LevelFilter::INFO);
  assert_eq!(config.format, LogFormat::Full);
}

#[test]
fn test_invalid_values_are_rejected() {
  assert!(matches!(
    parse_config("level: loud"),
    Err(Error::InvalidConfigValue { ref field, .. }) if field == "level"
  ));
  assert!(matches!(
    parse_config("format: xml"),
    Err(Error::InvalidConfigValue { ref field, .. }) if field == "format"
  ));
  assert!(matches!(
    parse_config("targets: { hookwire: chatty }"),
    Err(Error::InvalidConfigValue { ref field, .. }) if field == "targets.hookwire"
  ));
  assert!(matches!(parse_config("unknown_key: 1"), Err(Error::ConfigParse(_))));
}

#[test]
fn test_environment_specific_file_wins() {
  // Arrange
  let dir = tempfile::tempdir().unwrap();
  fs::write(dir.path().join("hookwire_logging.yaml"), "level: info").unwrap();
  fs::write(dir.path().join("hookwire_logging.staging.yaml"), "level: debug").unwrap();

  // Act
  let staging = find_config_file_in(dir.path(), Some("staging")).unwrap();
  let other = find_config_file_in(dir.path(), Some("production")).unwrap();

  // Assert
  assert!(staging.ends_with("hookwire_logging.staging.yaml"));
  assert!(other.ends_with("hookwire_logging.yaml"));
  assert_eq!(load_config(&staging).unwrap().level, LevelFilter::DEBUG);
}

#[test]
fn test_missing_file_is_reported() {
  let dir = tempfile::tempdir().unwrap();
  assert!(matches!(
    find_config_file_in(dir.path(), Some("dev")),
    Err(Error::ConfigNotFound(_))
  ));
}
