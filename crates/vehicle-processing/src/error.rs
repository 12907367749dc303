//! Error types for the vehicle imputation pipeline.
//!
//! Errors are serializable so a dashboard frontend can display them as a
//! `{ code, message }` pair.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for loading and imputing the vehicle dataset.
#[derive(Error, Debug)]
pub enum ImputationError {
    /// A column the pipeline consumes is absent from the dataset.
    #[error("Required column '{0}' is missing from the dataset")]
    MissingColumn(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ImputationError>,
    },
}

impl ImputationError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ImputationError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingColumn(_) => "MISSING_COLUMN",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Name of the missing column, looking through any added context.
    pub fn missing_column(&self) -> Option<&str> {
        match self {
            Self::MissingColumn(name) => Some(name),
            Self::WithContext { source, .. } => source.missing_column(),
            _ => None,
        }
    }
}

impl From<crate::config::ConfigValidationError> for ImputationError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        ImputationError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ImputationError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ImputationError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for imputation operations.
pub type Result<T> = std::result::Result<T, ImputationError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ImputationError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            ImputationError::MissingColumn("odometer".to_string()).error_code(),
            "MISSING_COLUMN"
        );
        assert_eq!(
            ImputationError::InvalidConfig("bad".to_string()).error_code(),
            "INVALID_CONFIG"
        );
    }

    #[test]
    fn test_missing_column_message_names_column() {
        let error = ImputationError::MissingColumn("cylinders".to_string());
        assert!(error.to_string().contains("cylinders"));
        assert_eq!(error.missing_column(), Some("cylinders"));
    }

    #[test]
    fn test_error_serialization() {
        let error = ImputationError::MissingColumn("model".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("MISSING_COLUMN"));
        assert!(json.contains("model"));
    }

    #[test]
    fn test_with_context_preserves_code_and_column() {
        let error = ImputationError::MissingColumn("fuel".to_string())
            .with_context("While preparing dataset");
        assert!(error.to_string().contains("While preparing dataset"));
        assert_eq!(error.error_code(), "MISSING_COLUMN");
        assert_eq!(error.missing_column(), Some("fuel"));
    }

    #[test]
    fn test_io_error_is_not_missing_column() {
        let error = ImputationError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "vehicles_us.csv",
        ));
        assert_eq!(error.error_code(), "IO_ERROR");
        assert_eq!(error.missing_column(), None);
    }
}
