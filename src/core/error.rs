//! Error types for hexgen

use thiserror::Error;

/// Main error type for terrain generation
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown side: {0}")]
    UnknownSide(String),

    #[error("Unknown builder type: {0}")]
    UnknownBuilder(String),

    #[error("Invalid parameter '{key}': {reason}")]
    InvalidParameter { key: String, reason: String },

    #[error("Malformed declaration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generation error: {0}")]
    Generation(String),
}

impl Error {
    /// Shorthand for an out-of-range or otherwise unusable parameter value.
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid("width", "must be positive");
        assert_eq!(err.to_string(), "Invalid parameter 'width': must be positive");
        assert_eq!(Error::UnknownSide("NNE".into()).to_string(), "Unknown side: NNE");
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }
}
