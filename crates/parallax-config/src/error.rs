/// Errors raised by configuration access and parsing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A value was requested for a key that is not present in the block.
    #[error("no such configuration value: {key}")]
    NoSuchValue {
        /// The key that was looked up.
        key: String,
    },

    /// A value is present but cannot be read as the requested type.
    #[error("configuration value '{key}' stored as {stored} cannot be read as {requested}")]
    BadValueCast {
        /// The key whose value failed to convert.
        key: String,
        /// Name of the requested Rust type.
        requested: &'static str,
        /// Name of the stored value kind.
        stored: &'static str,
    },

    /// A line of configuration text could not be parsed.
    #[error("configuration parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number of the offending line.
        line: usize,
        /// Explanation of what went wrong.
        message: String,
    },
}
