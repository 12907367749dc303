//! Configuration types for loading and imputing the vehicle dataset.
//!
//! This module provides configuration options using the builder pattern.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Location of the dataset, relative to the process working directory.
pub const DEFAULT_DATA_PATH: &str = "./vehicles_us.csv";

/// Category written into missing `paint_color` values.
pub const DEFAULT_UNKNOWN_PAINT_COLOR: &str = "unknown";

/// Configuration for dataset preparation.
///
/// Use [`ImputationConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use vehicle_processing::config::ImputationConfig;
///
/// let config = ImputationConfig::builder()
///     .data_path("data/vehicles_us.csv")
///     .unknown_paint_color("unknown")
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImputationConfig {
    /// Path of the comma-separated input file.
    /// Default: "./vehicles_us.csv"
    pub data_path: PathBuf,

    /// Category used for missing paint colors.
    /// Default: "unknown"
    pub unknown_paint_color: String,

    /// Value used for missing four-wheel-drive flags (0 or 1).
    /// Default: 0.0
    pub default_is_4wd: f64,

    /// Number of rows scanned when inferring the CSV schema.
    /// `None` scans the whole file.
    /// Default: None
    pub infer_schema_length: Option<usize>,
}

impl Default for ImputationConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            unknown_paint_color: DEFAULT_UNKNOWN_PAINT_COLOR.to_string(),
            default_is_4wd: 0.0,
            infer_schema_length: None,
        }
    }
}

impl ImputationConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ImputationConfigBuilder {
        ImputationConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.data_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyDataPath);
        }

        if self.unknown_paint_color.trim().is_empty() {
            return Err(ConfigValidationError::EmptyPaintColorLabel);
        }

        if self.default_is_4wd != 0.0 && self.default_is_4wd != 1.0 {
            return Err(ConfigValidationError::InvalidFourWheelDriveDefault(
                self.default_is_4wd,
            ));
        }

        if self.infer_schema_length == Some(0) {
            return Err(ConfigValidationError::InvalidSchemaLength);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Data path must not be empty")]
    EmptyDataPath,

    #[error("Unknown paint color label must not be empty")]
    EmptyPaintColorLabel,

    #[error("Invalid is_4wd default: {0} (must be 0 or 1)")]
    InvalidFourWheelDriveDefault(f64),

    #[error("Schema inference length must be at least 1 row")]
    InvalidSchemaLength,
}

/// Builder for [`ImputationConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ImputationConfigBuilder {
    data_path: Option<PathBuf>,
    unknown_paint_color: Option<String>,
    default_is_4wd: Option<f64>,
    infer_schema_length: Option<usize>,
}

impl ImputationConfigBuilder {
    /// Set the path of the input CSV file.
    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    /// Set the category written into missing paint colors.
    pub fn unknown_paint_color(mut self, label: impl Into<String>) -> Self {
        self.unknown_paint_color = Some(label.into());
        self
    }

    /// Set the value written into missing four-wheel-drive flags.
    pub fn default_is_4wd(mut self, value: f64) -> Self {
        self.default_is_4wd = Some(value);
        self
    }

    /// Limit schema inference to the first `rows` rows of the file.
    pub fn infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ImputationConfig` or an error if validation fails.
    pub fn build(self) -> Result<ImputationConfig, ConfigValidationError> {
        let config = ImputationConfig {
            data_path: self
                .data_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            unknown_paint_color: self
                .unknown_paint_color
                .unwrap_or_else(|| DEFAULT_UNKNOWN_PAINT_COLOR.to_string()),
            default_is_4wd: self.default_is_4wd.unwrap_or(0.0),
            infer_schema_length: self.infer_schema_length,
        };

        config.validate()?;
        Ok(config)
    }
}
