//! Error types for fabric configuration loading and validation.

/// Errors that can occur when loading or validating a fabric configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A stream-port side name is not one of the recognized values.
    #[error("unknown stream-port side '{0}'")]
    UnknownSide(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}
