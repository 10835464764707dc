//! The service-provider contract.

use crate::application::Application;
use std::fmt;

/// The error type a provider phase may return.
pub type ProviderError = Box<dyn std::error::Error + Send + Sync>;

/// A unit of startup logic with two phases.
///
/// The application builds each registered provider with `Default`, calls
/// `register` on all of them in registration order, then `boot` on all of
/// them in the same order, and drops them afterwards.
pub trait ServiceProvider {
  /// Declares bindings. Must not assume any other provider has registered yet.
  fn register(&mut self, app: &Application) -> Result<(), ProviderError>;

  /// Runs after every provider has registered, so any binding is available.
  fn boot(&mut self, app: &Application) -> Result<(), ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Register,
  Boot,
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Phase::Register => f.write_str("register"),
      Phase::Boot => f.write_str("boot"),
    }
  }
}
