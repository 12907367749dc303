//! Error types for the dashboard layer.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;
use vehicle_processing::{ImputationError, UnknownFieldError};

/// Errors raised while driving the dashboard state or rendering figures.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Loading or imputing the dataset failed.
    #[error(transparent)]
    Processing(#[from] ImputationError),

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Unknown plot template '{0}'")]
    UnknownTemplate(String),

    #[error("Unknown panel '{0}'")]
    UnknownPanel(String),

    #[error("Unknown page '{0}'")]
    UnknownPage(String),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl DashboardError {
    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Processing(inner) => inner.error_code(),
            Self::UnknownField(_) => "UNKNOWN_FIELD",
            Self::UnknownTemplate(_) => "UNKNOWN_TEMPLATE",
            Self::UnknownPanel(_) => "UNKNOWN_PANEL",
            Self::UnknownPage(_) => "UNKNOWN_PAGE",
            Self::Polars(_) => "POLARS_ERROR",
        }
    }
}

impl From<UnknownFieldError> for DashboardError {
    fn from(err: UnknownFieldError) -> Self {
        DashboardError::UnknownField(err.0)
    }
}

impl Serialize for DashboardError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("DashboardError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;
