use std::fmt;

/// Errors that can occur while splitting a table into chunks
#[derive(Debug, Clone)]
pub enum SplitError {
    /// Invalid splitter configuration, surfaced at construction
    ConfigError { message: String },

    /// The MIN and MAX split key values have different domain types
    KeyTypeMismatch { min_type: String, max_type: String },

    /// An operation is not supported for the given key domain
    TypeError { expected: String, actual: String },

    /// A stride advance would exceed the key domain
    Overflow { key_type: String },

    /// Database adapter failure, propagated unchanged
    Driver { message: String },
}

impl fmt::Display for SplitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitError::ConfigError { message } => {
                write!(f, "Split configuration error: {}", message)
            }
            SplitError::KeyTypeMismatch { min_type, max_type } => {
                write!(
                    f,
                    "Unsupported operation, the MIN value type {} is different from the MAX value type {}",
                    min_type, max_type
                )
            }
            SplitError::TypeError { expected, actual } => {
                write!(f, "Key type error: expected {}, got {}", expected, actual)
            }
            SplitError::Overflow { key_type } => {
                write!(f, "Arithmetic overflow advancing a {} split key", key_type)
            }
            SplitError::Driver { message } => {
                write!(f, "Source driver error: {}", message)
            }
        }
    }
}

impl std::error::Error for SplitError {}

impl SplitError {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        SplitError::ConfigError {
            message: message.into(),
        }
    }

    /// Create a MIN/MAX domain mismatch error
    pub fn key_type_mismatch(min_type: impl Into<String>, max_type: impl Into<String>) -> Self {
        SplitError::KeyTypeMismatch {
            min_type: min_type.into(),
            max_type: max_type.into(),
        }
    }

    /// Create a key type error
    pub fn type_error(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        SplitError::TypeError {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a stride overflow error
    pub fn overflow(key_type: impl Into<String>) -> Self {
        SplitError::Overflow {
            key_type: key_type.into(),
        }
    }

    /// Create a driver error
    pub fn driver(message: impl Into<String>) -> Self {
        SplitError::Driver {
            message: message.into(),
        }
    }
}

/// Result type for split operations
pub type SplitResult<T> = Result<T, SplitError>;
