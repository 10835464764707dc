use serde::Deserialize;
use std::collections::BTreeMap;

// --- Top Level Config ---
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfigRaw {
  #[serde(default = "default_version")]
  pub version: u32,
  /// Root level: "off", "error", "warn", "info", "debug" or "trace".
  #[serde(default = "default_level")]
  pub level: String,
  /// "full", "compact", "pretty" or "json".
  #[serde(default = "default_format")]
  pub format: String,
  #[serde(default = "default_true")]
  pub ansi: bool,
  #[serde(default = "default_true")]
  pub with_target: bool,
  /// When set, a non-empty `RUST_LOG` replaces the configured levels.
  #[serde(default)]
  pub respect_rust_log: bool,
  /// Per-target levels, e.g. `hookwire_ioc: trace`.
  #[serde(default)]
  pub targets: BTreeMap<String, String>,
}

impl Default for LoggingConfigRaw {
  fn default() -> Self {
    Self {
      version: default_version(),
      level: default_level(),
      format: default_format(),
      ansi: true,
      with_target: true,
      respect_rust_log: false,
      targets: BTreeMap::new(),
    }
  }
}

fn default_version() -> u32 {
  1
}

fn default_level() -> String {
  "info".to_string()
}

fn default_format() -> String {
  "full".to_string()
}

fn default_true() -> bool {
  true
}
