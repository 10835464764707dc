use thiserror::Error;

/// Errors returned while binding or resolving services.
#[derive(Debug, Error)]
pub enum ContainerError {
  #[error("Nothing is bound to '{abstract_id}'")]
  NotBound { abstract_id: String },

  #[error("'{abstract_id}' is bound, but not as a value of type {expected}")]
  TypeMismatch {
    abstract_id: String,
    expected: &'static str,
  },

  #[error("Circular dependency detected while resolving '{abstract_id}'")]
  CircularDependency { abstract_id: String },

  #[error("Invalid parameter '{name}': {reason}")]
  InvalidParameter { name: String, reason: String },

  #[error("Factory for '{abstract_id}' failed: {source}")]
  Factory {
    abstract_id: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ContainerError {
  /// Wraps an arbitrary error raised inside a factory.
  pub fn factory(
    abstract_id: impl Into<String>,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
  ) -> Self {
    ContainerError::Factory {
      abstract_id: abstract_id.into(),
      source: source.into(),
    }
  }
}

/// A specialized `Result` type for container operations.
pub type Result<T, E = ContainerError> = std::result::Result<T, E>;
