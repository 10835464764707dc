//! `hookwire_logging` - configuration-driven `tracing` setup.
//!
//! The library crates of the workspace only emit `tracing` events; an
//! application decides where they go by calling one of the `init*` functions
//! once at startup.

pub mod config;
pub mod error;
pub mod init;

pub use config::{LogFormat, LoggingConfig};
pub use error::{Error, Result};
pub use init::{find_config_file, find_config_file_in, init, init_auto, init_from_file, load_config, parse_config};
