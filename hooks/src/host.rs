//! The callback-registration capability a host exposes.

use crate::error::CallbackError;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Identifies one registered callback on a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(pub(crate) u64);

impl CallbackId {
  pub fn get(self) -> u64 {
    self.0
  }
}

impl fmt::Display for CallbackId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// A callback whose return value is ignored.
pub type Action = Arc<dyn Fn(&[Value]) -> Result<(), CallbackError> + Send + Sync>;

/// A callback that receives the filtered value first and returns its replacement.
pub type Filter = Arc<dyn Fn(&[Value]) -> Result<Value, CallbackError> + Send + Sync>;

/// Wraps a closure as an [`Action`].
pub fn action<F>(f: F) -> Action
where
  F: Fn(&[Value]) -> Result<(), CallbackError> + Send + Sync + 'static,
{
  Arc::new(f)
}

/// Wraps a closure as a [`Filter`].
pub fn filter<F>(f: F) -> Filter
where
  F: Fn(&[Value]) -> Result<Value, CallbackError> + Send + Sync + 'static,
{
  Arc::new(f)
}

/// Anything that can hold callbacks and fire them by tag later.
///
/// Lower priorities run first. A callback never sees more than
/// `accepted_args` arguments.
pub trait EventHost: Send + Sync {
  fn add_action(&self, tag: &str, callback: Action, priority: i32, accepted_args: usize) -> CallbackId;

  fn add_filter(&self, tag: &str, callback: Filter, priority: i32, accepted_args: usize) -> CallbackId;
}

/// Slices `args` down to what a callback accepts.
pub fn truncate_args(args: &[Value], accepted_args: usize) -> &[Value] {
  &args[..accepted_args.min(args.len())]
}
