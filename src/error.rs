//! Error types for the container codec and the grid queries.

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller-supplied input violates a precondition
    #[error("Validation error: {0}")]
    Validation(String),

    /// Container bytes are truncated or structurally inconsistent
    #[error("Format error: {0}")]
    Format(String),

    /// No record with the given name exists in the store
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// Underlying read/write failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Create a format error
    pub fn format(msg: impl Into<String>) -> Self {
        Error::Format(msg.into())
    }

    /// Create a record-not-found error
    pub fn record_not_found(name: impl Into<String>) -> Self {
        Error::RecordNotFound(name.into())
    }

    /// Whether this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Whether this is a format error
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            Error::validation("line width must be positive").to_string(),
            "Validation error: line width must be positive"
        );
        assert_eq!(
            Error::format("truncated").to_string(),
            "Format error: truncated"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_format());
    }
}
