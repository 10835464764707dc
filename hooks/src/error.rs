use thiserror::Error;

/// The error type a hook callback may return.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned while dispatching a hook.
#[derive(Debug, Error)]
pub enum HookError {
  #[error("Callback {id} on '{tag}' failed: {source}")]
  Callback {
    tag: String,
    id: u64,
    #[source]
    source: CallbackError,
  },
}

/// A specialized `Result` type for dispatch operations.
pub type Result<T, E = HookError> = std::result::Result<T, E>;
