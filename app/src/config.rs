//! Application configuration.
//!
//! The YAML document is deserialized into the `*Raw` structs, then validated
//! into [`AppConfig`]. Every field has a default, so an empty document is a
//! valid configuration.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_LOAD_TAG: &str = "plugins_loaded";
pub const DEFAULT_LOAD_PRIORITY: i32 = 200;
pub const DEFAULT_HOOK_PRIORITY: i32 = 10;
pub const DEFAULT_ACCEPTED_ARGS: usize = 1;
pub const DEFAULT_METHOD: &str = "invoke";

// --- Raw Config ---

#[derive(Debug, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct AppConfigRaw {
  #[serde(default)]
  pub load: LoadConfigRaw,
  #[serde(default)]
  pub hooks: HooksConfigRaw,
  #[serde(default)]
  pub providers: ProvidersConfigRaw,
}

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoadTrigger {
  /// Load when the host fires the configured tag.
  #[default]
  Hook,
  /// Load as soon as the application boots.
  Immediate,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoadConfigRaw {
  #[serde(default)]
  pub trigger: LoadTrigger,
  #[serde(default = "default_load_tag")]
  pub tag: String,
  #[serde(default = "default_load_priority")]
  pub priority: i32,
}

impl Default for LoadConfigRaw {
  fn default() -> Self {
    Self {
      trigger: LoadTrigger::default(),
      tag: default_load_tag(),
      priority: default_load_priority(),
    }
  }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HooksConfigRaw {
  #[serde(default = "default_hook_priority")]
  pub default_priority: i32,
  #[serde(default = "default_accepted_args")]
  pub default_accepted_args: usize,
  #[serde(default = "default_method")]
  pub default_method: String,
}

impl Default for HooksConfigRaw {
  fn default() -> Self {
    Self {
      default_priority: default_hook_priority(),
      default_accepted_args: default_accepted_args(),
      default_method: default_method(),
    }
  }
}

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
  /// Adding an identifier twice is an error.
  #[default]
  Reject,
  /// Adding an identifier twice runs it twice.
  Allow,
}

#[derive(Debug, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProvidersConfigRaw {
  #[serde(default)]
  pub duplicates: DuplicatePolicy,
}

fn default_load_tag() -> String {
  DEFAULT_LOAD_TAG.to_string()
}

fn default_load_priority() -> i32 {
  DEFAULT_LOAD_PRIORITY
}

fn default_hook_priority() -> i32 {
  DEFAULT_HOOK_PRIORITY
}

fn default_accepted_args() -> usize {
  DEFAULT_ACCEPTED_ARGS
}

fn default_method() -> String {
  DEFAULT_METHOD.to_string()
}

// --- Processed Config ---

/// When the provider load pass runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStrategy {
  OnHook { tag: String, priority: i32 },
  Immediate,
}

/// Defaults applied by the hook binder when a call leaves them out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookDefaults {
  pub priority: i32,
  pub accepted_args: usize,
  pub method: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
  pub load: LoadStrategy,
  pub hooks: HookDefaults,
  pub duplicates: DuplicatePolicy,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      load: LoadStrategy::OnHook {
        tag: DEFAULT_LOAD_TAG.to_string(),
        priority: DEFAULT_LOAD_PRIORITY,
      },
      hooks: HookDefaults {
        priority: DEFAULT_HOOK_PRIORITY,
        accepted_args: DEFAULT_ACCEPTED_ARGS,
        method: DEFAULT_METHOD.to_string(),
      },
      duplicates: DuplicatePolicy::Reject,
    }
  }
}

impl AppConfig {
  /// A configuration that loads providers as soon as the application boots.
  pub fn immediate() -> Self {
    Self {
      load: LoadStrategy::Immediate,
      ..Self::default()
    }
  }

  pub fn from_yaml_str(yaml: &str) -> Result<Self> {
    let raw: AppConfigRaw = serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
    Self::try_from(raw)
  }

  pub fn from_file(path: &Path) -> Result<Self> {
    let contents = fs::read_to_string(path)?;
    Self::from_yaml_str(&contents)
  }
}

impl TryFrom<AppConfigRaw> for AppConfig {
  type Error = Error;

  fn try_from(raw: AppConfigRaw) -> Result<Self> {
    let load = match raw.load.trigger {
      LoadTrigger::Immediate => LoadStrategy::Immediate,
      LoadTrigger::Hook => {
        if raw.load.tag.trim().is_empty() {
          return Err(Error::Config("load.tag cannot be empty".to_string()));
        }
        LoadStrategy::OnHook {
          tag: raw.load.tag,
          priority: raw.load.priority,
        }
      }
    };

    if raw.hooks.default_accepted_args == 0 {
      return Err(Error::Config(
        "hooks.default_accepted_args must be at least 1".to_string(),
      ));
    }
    if raw.hooks.default_method.trim().is_empty() {
      return Err(Error::Config("hooks.default_method cannot be empty".to_string()));
    }

    Ok(AppConfig {
      load,
      hooks: HookDefaults {
        priority: raw.hooks.default_priority,
        accepted_args: raw.hooks.default_accepted_args,
        method: raw.hooks.default_method,
      },
      duplicates: raw.providers.duplicates,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn empty_document_is_the_default() {
    assert_eq!(AppConfig::from_yaml_str("{}").unwrap(), AppConfig::default());
  }

  #[test]
  fn full_document_parses() {
    let yaml = r#"
load:
  trigger: hook
  tag: init
  priority: 5
hooks:
  default_priority: 20
  default_accepted_args: 3
  default_method: handle
providers:
  duplicates: allow
"#;
    let config = AppConfig::from_yaml_str(yaml).unwrap();

    assert_eq!(
      config.load,
      LoadStrategy::OnHook {
        tag: "init".to_string(),
        priority: 5
      }
    );
    assert_eq!(config.hooks.priority, 20);
    assert_eq!(config.hooks.accepted_args, 3);
    assert_eq!(config.hooks.method, "handle");
    assert_eq!(config.duplicates, DuplicatePolicy::Allow);
  }

  #[test]
  fn immediate_trigger_ignores_tag() {
    let config = AppConfig::from_yaml_str("load: { trigger: immediate, tag: '' }").unwrap();
    assert_eq!(config.load, LoadStrategy::Immediate);
  }

  #[test]
  fn invalid_documents_are_rejected() {
    for yaml in [
      "load: { tag: '  ' }",
      "hooks: { default_accepted_args: 0 }",
      "hooks: { default_method: '' }",
      "providers: { duplicates: sometimes }",
      "surprise: true",
    ] {
      assert!(
        matches!(AppConfig::from_yaml_str(yaml), Err(Error::Config(_))),
        "accepted: {yaml}"
      );
    }
  }

  #[test]
  fn loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hookwire.yaml");
    fs::write(&path, "load: { trigger: immediate }").unwrap();

    assert_eq!(AppConfig::from_file(&path).unwrap(), AppConfig::immediate());
  }
}
