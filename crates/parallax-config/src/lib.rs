#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Configuration block container and nested-block helpers.
pub mod block;

/// Error types for configuration access and parsing.
pub mod error;

/// Plain-text reading and writing of configuration blocks.
pub mod io;

/// Typed configuration values and conversions.
pub mod value;

pub use block::ConfigBlock;
pub use error::ConfigError;
pub use io::{parse_config_string, write_config_string};
pub use value::{ConfigValue, FromConfigValue};
