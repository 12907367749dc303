//! Vehicle Sales Imputation Library
//!
//! Loads the vehicle listings dataset and fills missing values with grouped
//! statistical fallbacks, producing the read-only dataset the dashboard
//! draws from.
//!
//! # Overview
//!
//! Five columns are filled, strictly in this order, each rule observing the
//! fills of the rules before it:
//!
//! 1. **model_year**: median year of the same model
//! 2. **odometer**: median of the same (model, model_year, condition,
//!    days_listed), then the median of the whole column
//! 3. **cylinders**: mode of the same (model, model_year, fuel), then the
//!    mode of the whole column
//! 4. **paint_color**: the category `"unknown"`
//! 5. **is_4wd**: `0`
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use vehicle_processing::{ImputationConfig, VehicleDataset};
//!
//! let config = ImputationConfig::builder()
//!     .data_path("./vehicles_us.csv")
//!     .build()?;
//!
//! let dataset = VehicleDataset::prepare(&config)?;
//! for step in &dataset.report().steps {
//!     println!("{}", step.describe());
//! }
//! ```
//!
//! # Progress Reporting
//!
//! ```rust,ignore
//! use vehicle_processing::ImputationPipeline;
//!
//! let outcome = ImputationPipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:?}] {}", update.stage, update.message);
//!     })
//!     .build()?
//!     .process(df)?;
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod imputers;
pub mod loader;
pub mod pipeline;
pub mod records;
pub mod schema;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{ConfigValidationError, DEFAULT_DATA_PATH, ImputationConfig, ImputationConfigBuilder};
pub use dataset::VehicleDataset;
pub use error::{ImputationError, Result as ImputationResult, ResultExt};
pub use imputers::{GroupAggregate, GroupFill, GroupedImputer, StatisticalImputer};
pub use loader::{load_vehicles_csv, parse_vehicles_csv};
pub use pipeline::{
    ClosureProgressReporter, ImputationOutcome, ImputationPipeline, ImputationPipelineBuilder,
    ImputationStage, ProgressReporter, ProgressUpdate,
};
pub use records::Record;
pub use schema::{UnknownFieldError, VehicleField};
pub use types::{ColumnFillSummary, ImputationMethod, ImputationReport, ImputationStep};
pub use utils::{first_mode, is_numeric_dtype, numeric_values, string_values, to_float64};
