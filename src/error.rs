use thiserror::Error;

use crate::parameters::ConfigurationError;

/// Error types for the reparam-rs library.
#[derive(Error, Debug)]
pub enum ReparamError {
    /// Invalid parameter configuration (bounds, initial value, sigma, restraint).
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Parameter not found in a registry.
    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    /// Error indicating a mismatch between a flat vector and the registry size.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// I/O error wrapper.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error for cases that don't fit the other categories.
    #[error("Error: {0}")]
    Other(String),
}

impl ReparamError {
    /// Whether this error stems from invalid parameter configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ReparamError::Configuration(_))
    }
}

/// Result type alias for reparam-rs operations.
pub type Result<T> = std::result::Result<T, ReparamError>;

impl From<String> for ReparamError {
    fn from(s: String) -> Self {
        ReparamError::Other(s)
    }
}

impl From<&str> for ReparamError {
    fn from(s: &str) -> Self {
        ReparamError::Other(s.to_string())
    }
}
