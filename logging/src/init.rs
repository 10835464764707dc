// Public initialization functions.

use crate::config::{process_raw_config, LogFormat, LoggingConfig, LoggingConfigRaw};
use crate::error::{Error, Result};

use std::{
  env,
  fs,
  path::{Path, PathBuf},
};

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*, Layer, Registry};

const DEFAULT_CONFIG_BASE_NAME: &str = "hookwire_logging";
const DEFAULT_CONFIG_EXTENSION: &str = "yaml";

/// Finds the configuration file in the working directory.
pub fn find_config_file(environment_suffix: Option<&str>) -> Result<PathBuf> {
  find_config_file_in(Path::new("."), environment_suffix)
}

/// Finds the configuration file in `dir`, preferring the environment-specific
/// variant (`hookwire_logging.<env>.yaml`). The environment comes from the
/// argument, then `HOOKWIRE_ENV`, then `APP_ENV`.
pub fn find_config_file_in(dir: &Path, environment_suffix: Option<&str>) -> Result<PathBuf> {
  let env_from_var = environment_suffix
    .map(|s| s.to_string())
    .or_else(|| env::var("HOOKWIRE_ENV").ok())
    .or_else(|| env::var("APP_ENV").ok());

  let mut files_to_check: Vec<String> = Vec::new();
  if let Some(env_str) = &env_from_var {
    if !env_str.is_empty() {
      files_to_check.push(format!(
        "{}.{}.{}",
        DEFAULT_CONFIG_BASE_NAME, env_str, DEFAULT_CONFIG_EXTENSION
      ));
    }
  }
  files_to_check.push(format!("{}.{}", DEFAULT_CONFIG_BASE_NAME, DEFAULT_CONFIG_EXTENSION));

  for file_name in &files_to_check {
    let path = dir.join(file_name);
    if path.is_file() {
      return Ok(path);
    }
  }

  Err(Error::ConfigNotFound(format!(
    "looked for {:?} in {}",
    files_to_check,
    dir.display()
  )))
}

/// Parses and validates a YAML document.
pub fn parse_config(yaml: &str) -> Result<LoggingConfig> {
  let raw: LoggingConfigRaw =
    serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse(e.to_string()))?;
  process_raw_config(raw)
}

/// Reads, parses and validates a configuration file.
pub fn load_config(config_path: &Path) -> Result<LoggingConfig> {
  let contents = fs::read_to_string(config_path)?;
  parse_config(&contents)
}

/// Initializes logging from a configuration file path.
pub fn init_from_file(config_path: &Path) -> Result<()> {
  init(&load_config(config_path)?)
}

/// Initializes from the discovered configuration file, falling back to the
/// defaults when there is none.
pub fn init_auto(environment_suffix: Option<&str>) -> Result<()> {
  match find_config_file(environment_suffix) {
    Ok(path) => init_from_file(&path),
    Err(Error::ConfigNotFound(_)) => init(&LoggingConfig::default()),
    Err(e) => Err(e),
  }
}

/// Installs the global subscriber and the `log` bridge. Can succeed only once
/// per process.
pub fn init(config: &LoggingConfig) -> Result<()> {
  let filter = build_filter(config)?;

  let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
    LogFormat::Full => fmt::layer()
      .with_ansi(config.ansi)
      .with_target(config.with_target)
      .with_filter(filter)
      .boxed(),
    LogFormat::Compact => fmt::layer()
      .compact()
      .with_ansi(config.ansi)
      .with_target(config.with_target)
      .with_filter(filter)
      .boxed(),
    LogFormat::Pretty => fmt::layer()
      .pretty()
      .with_ansi(config.ansi)
      .with_target(config.with_target)
      .with_filter(filter)
      .boxed(),
    LogFormat::Json => fmt::layer()
      .json()
      .with_ansi(false)
      .with_target(config.with_target)
      .with_filter(filter)
      .boxed(),
  };

  let subscriber = tracing_subscriber::registry().with(layer);
  tracing::subscriber::set_global_default(subscriber)
    .map_err(|e| Error::SubscriberInstall(e.to_string()))?;

  tracing_log::LogTracer::init().map_err(|e| Error::LogBridge(e.to_string()))?;

  tracing::debug!(directives = %config.directives(), "logging initialized");
  Ok(())
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
  if config.respect_rust_log {
    if let Ok(from_env) = env::var(EnvFilter::DEFAULT_ENV) {
      if !from_env.trim().is_empty() {
        return EnvFilter::try_new(from_env).map_err(|e| Error::InvalidConfigValue {
          field: EnvFilter::DEFAULT_ENV.to_string(),
          message: e.to_string(),
        });
      }
    }
  }
  EnvFilter::try_new(config.directives()).map_err(|e| Error::InvalidConfigValue {
    field: "targets".to_string(),
    message: e.to_string(),
  })
}
