//! Pipeline module.
//!
//! This module provides the ordered imputation pipeline and its progress
//! reporting.

mod builder;
pub mod progress;

pub use builder::{
    ImputationOutcome, ImputationPipeline, ImputationPipelineBuilder, target_null_counts,
    validate_columns,
};
pub use progress::{ClosureProgressReporter, ImputationStage, ProgressReporter, ProgressUpdate};
