use thiserror::Error;

/// Everything that can go wrong while setting up logging.
#[derive(Debug, Error)]
pub enum Error {
  #[error("No logging configuration found ({0})")]
  ConfigNotFound(String),

  #[error("Could not read logging configuration: {0}")]
  ConfigRead(#[from] std::io::Error),

  #[error("Malformed logging configuration: {0}")]
  ConfigParse(String),

  #[error("Bad value for `{field}`: {message}")]
  InvalidConfigValue { field: String, message: String },

  #[error("Could not bridge `log` records into tracing: {0}")]
  LogBridge(String),

  #[error("A global tracing subscriber is already installed: {0}")]
  SubscriberInstall(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
