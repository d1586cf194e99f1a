//! Configuration error types for the simulation pipeline

use std::fmt;

/// Configuration errors detected before any simulation work begins.
///
/// Every variant is fatal to the invocation that raised it; the pipeline
/// produces no partial results. Stochastic stages have no recoverable error
/// classes of their own, and interpolation outside the track's time range
/// yields missing values, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A parameter required by the selected model/protocol is absent
    MissingParameter { parameter: String, context: String },
    /// A supplied parameter is outside its valid domain
    InvalidParameter { parameter: String, value: String, reason: String },
    /// Configuration file I/O error
    IoError { message: String },
    /// JSON serialization/deserialization error
    SerializationError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingParameter { parameter, context } => {
                write!(f, "Missing parameter '{}' required by {}", parameter, context)
            }
            ConfigError::InvalidParameter { parameter, value, reason } => {
                write!(f, "Invalid parameter {} = {}: {}", parameter, value, reason)
            }
            ConfigError::IoError { message } => {
                write!(f, "Configuration I/O error: {}", message)
            }
            ConfigError::SerializationError { message } => {
                write!(f, "Configuration serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Result type for configuration and simulation entry points
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Missing-parameter error for the given model/protocol context
    pub fn missing(parameter: &str, context: &str) -> Self {
        ConfigError::MissingParameter {
            parameter: parameter.to_string(),
            context: context.to_string(),
        }
    }

    /// Out-of-domain parameter error
    pub fn invalid(parameter: &str, value: f64, reason: &str) -> Self {
        ConfigError::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Resolve an optional parameter, failing if the selected model/protocol
/// requires it and it was not supplied.
pub fn require(value: Option<f64>, parameter: &str, context: &str) -> ConfigResult<f64> {
    value.ok_or_else(|| ConfigError::missing(parameter, context))
}
