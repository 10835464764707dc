use crate::config::raw::LoggingConfigRaw;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing_core::metadata::LevelFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Full,
  Compact,
  Pretty,
  Json,
}

impl FromStr for LogFormat {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "full" => Ok(LogFormat::Full),
      "compact" => Ok(LogFormat::Compact),
      "pretty" => Ok(LogFormat::Pretty),
      "json" => Ok(LogFormat::Json),
      other => Err(Error::InvalidConfigValue {
        field: "format".to_string(),
        message: format!("unknown format '{}', expected full, compact, pretty or json", other),
      }),
    }
  }
}

// --- Processed Top Level Config ---
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
  pub level: LevelFilter,
  pub format: LogFormat,
  pub ansi: bool,
  pub with_target: bool,
  pub respect_rust_log: bool,
  pub targets: BTreeMap<String, LevelFilter>,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    // The raw defaults always validate.
    Self {
      level: LevelFilter::INFO,
      format: LogFormat::Full,
      ansi: true,
      with_target: true,
      respect_rust_log: false,
      targets: BTreeMap::new(),
    }
  }
}

impl LoggingConfig {
  /// Renders the levels as an `EnvFilter` directive string, root level first.
  pub fn directives(&self) -> String {
    let mut directives = vec![self.level.to_string().to_lowercase()];
    for (target, level) in &self.targets {
      directives.push(format!("{}={}", target, level.to_string().to_lowercase()));
    }
    directives.join(",")
  }
}

fn parse_level(field: &str, value: &str) -> Result<LevelFilter> {
  LevelFilter::from_str(value).map_err(|_| Error::InvalidConfigValue {
    field: field.to_string(),
    message: format!("unknown level '{}'", value),
  })
}

pub fn process_raw_config(raw: LoggingConfigRaw) -> Result<LoggingConfig> {
  if raw.version != 1 {
    return Err(Error::InvalidConfigValue {
      field: "version".to_string(),
      message: format!("unsupported version {}", raw.version),
    });
  }

  let mut targets = BTreeMap::new();
  for (target, level) in &raw.targets {
    if target.trim().is_empty() {
      return Err(Error::InvalidConfigValue {
        field: "targets".to_string(),
        message: "target names cannot be empty".to_string(),
      });
    }
    targets.insert(target.clone(), parse_level(&format!("targets.{}", target), level)?);
  }

  Ok(LoggingConfig {
    level: parse_level("level", &raw.level)?,
    format: raw.format.parse()?,
    ansi: raw.ansi,
    with_target: raw.with_target,
    respect_rust_log: raw.respect_rust_log,
    targets,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn directives_list_root_then_targets() {
    let mut config = LoggingConfig::default();
    config.targets.insert("hookwire_ioc".into(), LevelFilter::TRACE);
    config.targets.insert("hookwire".into(), LevelFilter::DEBUG);

    assert_eq!(config.directives(), "info,hookwire=debug,hookwire_ioc=trace");
  }

  #[test]
  fn raw_defaults_process_to_defaults() {
    let processed = process_raw_config(LoggingConfigRaw::default()).unwrap();
    assert_eq!(processed, LoggingConfig::default());
  }
}
