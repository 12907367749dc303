//! The prepared, read-only vehicle dataset.

use crate::config::ImputationConfig;
use crate::error::{Result, ResultExt};
use crate::loader::load_vehicles_csv;
use crate::pipeline::ImputationPipeline;
use crate::records::{Record, records_from_frame};
use crate::types::ImputationReport;
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// The dataset after imputation.
///
/// Built once at startup and only read afterwards; the frame is not
/// exposed mutably.
#[derive(Debug, Clone)]
pub struct VehicleDataset {
    df: DataFrame,
    source: Option<PathBuf>,
    report: ImputationReport,
}

impl VehicleDataset {
    /// Load the configured CSV file and impute it.
    pub fn prepare(config: &ImputationConfig) -> Result<Self> {
        let df = load_vehicles_csv(&config.data_path, config.infer_schema_length)
            .context("While loading dataset")?;
        let mut dataset = Self::from_frame(df, config)?;
        dataset.source = Some(config.data_path.clone());
        Ok(dataset)
    }

    /// Impute an already loaded frame.
    pub fn from_frame(df: DataFrame, config: &ImputationConfig) -> Result<Self> {
        let pipeline = ImputationPipeline::builder().config(config.clone()).build()?;
        Self::with_pipeline(df, &pipeline)
    }

    /// Impute an already loaded frame with a preconfigured pipeline.
    pub fn with_pipeline(df: DataFrame, pipeline: &ImputationPipeline) -> Result<Self> {
        let outcome = pipeline.process(df).context("While imputing dataset")?;
        Ok(Self {
            df: outcome.data,
            source: None,
            report: outcome.report,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn report(&self) -> &ImputationReport {
        &self.report
    }

    /// File the dataset was read from, if it came from disk.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Typed rows of the dataset.
    pub fn records(&self) -> Result<Vec<Record>> {
        records_from_frame(&self.df)
    }
}
