//! Progress reporting for the imputation pipeline.
//!
//! The pipeline runs to completion on the calling thread; reporters only
//! observe it. A dashboard can forward updates to a loading indicator, the
//! CLI logs them.
//!
//! # Example
//!
//! ```rust,ignore
//! use vehicle_processing::ImputationPipeline;
//!
//! let outcome = ImputationPipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .process(df)?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the imputation pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationStage {
    /// Checking that every consumed column is present
    Validating,
    /// Filling model_year by model
    ModelYear,
    /// Filling odometer by group, then globally
    Odometer,
    /// Filling cylinders by group, then globally
    Cylinders,
    /// Filling paint_color with the unknown category
    PaintColor,
    /// Filling is_4wd with the default flag
    FourWheelDrive,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl ImputationStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Validating => "Validating Columns",
            Self::ModelYear => "Imputing Model Year",
            Self::Odometer => "Imputing Odometer",
            Self::Cylinders => "Imputing Cylinders",
            Self::PaintColor => "Imputing Paint Color",
            Self::FourWheelDrive => "Imputing 4WD Flag",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of the overall run spent in this stage (0.0 - 1.0).
    ///
    /// The working stages sum to 1.0. Grouped stages carry most of the
    /// weight since they build a hash map over the whole dataset.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Validating => 0.05,
            Self::ModelYear => 0.20,
            Self::Odometer => 0.30,
            Self::Cylinders => 0.35,
            Self::PaintColor => 0.05,
            Self::FourWheelDrive => 0.05,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Returns the cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Validating => 0.0,
            Self::ModelYear => 0.05,
            Self::Odometer => 0.25,
            Self::Cylinders => 0.55,
            Self::PaintColor => 0.90,
            Self::FourWheelDrive => 0.95,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// A progress update emitted between pipeline steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current pipeline stage
    pub stage: ImputationStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    /// Human-readable message describing current activity
    pub message: String,
}

impl ProgressUpdate {
    /// Creates a new progress update for a stage.
    pub fn new(stage: ImputationStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    /// Creates a completion progress update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: ImputationStage::Complete,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
        }
    }

    /// Creates a failed progress update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: ImputationStage::Failed,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

/// Trait for receiving progress updates during imputation.
///
/// Implementations must be `Send + Sync` so a prepared pipeline can be
/// handed to whichever thread loads the dataset.
pub trait ProgressReporter: Send + Sync {
    /// Called when a stage starts or finishes.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
