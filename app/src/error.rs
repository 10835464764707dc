use crate::provider::{Phase, ProviderError};
use hookwire_ioc::ContainerError;
use thiserror::Error;

/// The main error type for `hookwire`.
#[derive(Debug, Error)]
pub enum Error {
  #[error("{class_id} class must implement the ServiceProvider interface")]
  InvalidServiceProvider { class_id: String },

  #[error("The method {method} does not exist in {class_id}")]
  InvalidArgument { class_id: String, method: String },

  #[error("{class_id} is already registered as a service provider")]
  DuplicateServiceProvider { class_id: String },

  #[error("Cannot add {class_id}: service providers have already been loaded")]
  ProvidersAlreadyLoaded { class_id: String },

  #[error("Service provider {provider} failed during {phase}: {source}")]
  Provider {
    provider: String,
    phase: Phase,
    #[source]
    source: ProviderError,
  },

  #[error(transparent)]
  Container(#[from] ContainerError),

  #[error("Invalid configuration: {0}")]
  Config(String),

  #[error("Failed to read configuration file: {0}")]
  Io(#[from] std::io::Error),
}

/// A specialized `Result` type for `hookwire` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
