// Configuration parsing and validation.

pub mod processed; // Validated configuration, ready for the subscriber
pub mod raw; // Structs directly mapping to the YAML structure

pub use processed::{process_raw_config, LogFormat, LoggingConfig};
pub use raw::LoggingConfigRaw;
