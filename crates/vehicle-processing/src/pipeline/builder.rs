//! The vehicle imputation pipeline.
//!
//! Fills the five target columns in a fixed order. Each rule sees the
//! dataset as left by every rule before it.

use crate::config::ImputationConfig;
use crate::error::{ImputationError, Result};
use crate::imputers::{GroupAggregate, GroupedImputer, StatisticalImputer};
use crate::pipeline::progress::{
    ClosureProgressReporter, ImputationStage, ProgressReporter, ProgressUpdate,
};
use crate::schema::VehicleField;
use crate::types::{ColumnFillSummary, ImputationReport};
use polars::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

const MODEL: &str = "model";
const MODEL_YEAR: &str = "model_year";
const CONDITION: &str = "condition";
const DAYS_LISTED: &str = "days_listed";
const FUEL: &str = "fuel";
const ODOMETER: &str = "odometer";
const CYLINDERS: &str = "cylinders";
const PAINT_COLOR: &str = "paint_color";
const IS_4WD: &str = "is_4wd";

const ODOMETER_GROUP: [&str; 4] = [MODEL, MODEL_YEAR, CONDITION, DAYS_LISTED];
const CYLINDERS_GROUP: [&str; 3] = [MODEL, MODEL_YEAR, FUEL];

/// The filled dataset together with a record of how it was filled.
#[derive(Debug, Clone)]
pub struct ImputationOutcome {
    pub data: DataFrame,
    pub report: ImputationReport,
}

/// The ordered missing-value imputation pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use vehicle_processing::{ImputationConfig, ImputationPipeline};
///
/// let outcome = ImputationPipeline::builder()
///     .config(ImputationConfig::default())
///     .on_progress(|update| println!("{}", update.message))
///     .build()?
///     .process(df)?;
///
/// assert_eq!(outcome.data.column("odometer")?.null_count(), 0);
/// ```
pub struct ImputationPipeline {
    config: ImputationConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(ImputationPipeline: Send, Sync);

impl ImputationPipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> ImputationPipelineBuilder {
        ImputationPipelineBuilder::default()
    }

    /// Get the pipeline configuration.
    pub fn config(&self) -> &ImputationConfig {
        &self.config
    }

    /// Fill the missing values of `df`.
    ///
    /// # Errors
    ///
    /// Returns [`ImputationError::MissingColumn`] before touching any data
    /// when a consumed column is absent.
    pub fn process(&self, df: DataFrame) -> Result<ImputationOutcome> {
        match self.process_internal(df) {
            Ok(outcome) => {
                self.report_progress(ProgressUpdate::complete(format!(
                    "Imputation complete: {} values filled",
                    outcome.report.total_filled()
                )));
                Ok(outcome)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Imputation error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn begin(&self, stage: ImputationStage) {
        debug!("{}", stage.display_name());
        self.report_progress(ProgressUpdate::new(stage, 0.0, stage.display_name()));
    }

    fn finish(&self, stage: ImputationStage, message: impl Into<String>) {
        self.report_progress(ProgressUpdate::new(stage, 1.0, message));
    }

    fn process_internal(&self, mut df: DataFrame) -> Result<ImputationOutcome> {
        let start_time = Instant::now();
        info!("Starting imputation of {} rows...", df.height());

        self.begin(ImputationStage::Validating);
        validate_columns(&df)?;
        let nulls_before = target_null_counts(&df)?;
        self.finish(ImputationStage::Validating, "All required columns present");

        let mut report = ImputationReport::new(df.height());

        // Step 1: model_year by model
        self.begin(ImputationStage::ModelYear);
        let (step, outcome) =
            GroupedImputer::apply(&mut df, MODEL_YEAR, &[MODEL], GroupAggregate::Median)?;
        info!("{}", step.describe());
        if outcome.empty_groups > 0 {
            let warning = format!(
                "{} '{}' value(s) left missing: no known year for their model",
                outcome.empty_groups, MODEL_YEAR
            );
            warn!("{}", warning);
            report.add_warning(warning);
        }
        let year_missing = outcome.remaining;
        report.add_step(step);
        self.finish(
            ImputationStage::ModelYear,
            format!("{} model years still missing", year_missing),
        );

        // Step 2: odometer by (model, model_year, condition, days_listed), then global median
        self.begin(ImputationStage::Odometer);
        let (step, _) =
            GroupedImputer::apply(&mut df, ODOMETER, &ODOMETER_GROUP, GroupAggregate::Median)?;
        info!("{}", step.describe());
        report.add_step(step);
        if let Some(step) = StatisticalImputer::apply_numeric_median(&mut df, ODOMETER)? {
            info!("{}", step.describe());
            report.add_step(step);
        }
        self.finish(ImputationStage::Odometer, "Odometer readings filled");

        // Step 3: cylinders by (model, model_year, fuel), then global mode
        self.begin(ImputationStage::Cylinders);
        let (step, _) =
            GroupedImputer::apply(&mut df, CYLINDERS, &CYLINDERS_GROUP, GroupAggregate::Mode)?;
        info!("{}", step.describe());
        report.add_step(step);
        if let Some(step) = StatisticalImputer::apply_numeric_mode(&mut df, CYLINDERS)? {
            info!("{}", step.describe());
            report.add_step(step);
        }
        self.finish(ImputationStage::Cylinders, "Cylinder counts filled");

        // Step 4: paint_color constant
        self.begin(ImputationStage::PaintColor);
        let step = StatisticalImputer::apply_category_constant(
            &mut df,
            PAINT_COLOR,
            &self.config.unknown_paint_color,
        )?;
        info!("{}", step.describe());
        report.add_step(step);
        self.finish(ImputationStage::PaintColor, "Paint colors filled");

        // Step 5: is_4wd constant
        self.begin(ImputationStage::FourWheelDrive);
        let step =
            StatisticalImputer::apply_numeric_constant(&mut df, IS_4WD, self.config.default_is_4wd)?;
        info!("{}", step.describe());
        report.add_step(step);
        self.finish(ImputationStage::FourWheelDrive, "Four-wheel-drive flags filled");

        let nulls_after = target_null_counts(&df)?;
        report.columns = nulls_before
            .into_iter()
            .zip(nulls_after)
            .map(|((column, nulls_before), (_, nulls_after))| ColumnFillSummary {
                column,
                nulls_before,
                nulls_after,
            })
            .collect();
        report.duration_ms = elapsed_ms(start_time.elapsed());

        info!(
            "Imputation finished in {}ms: {} values filled",
            report.duration_ms,
            report.total_filled()
        );

        Ok(ImputationOutcome { data: df, report })
    }
}

/// Check every consumed column is present, naming the first absent one.
pub fn validate_columns(df: &DataFrame) -> Result<()> {
    for field in VehicleField::CONSUMED {
        let name = field.column_name();
        if df.column(name).is_err() {
            return Err(ImputationError::MissingColumn(name.to_string()));
        }
    }
    Ok(())
}

/// Null counts of the five target columns, in processing order.
pub fn target_null_counts(df: &DataFrame) -> Result<Vec<(String, usize)>> {
    VehicleField::IMPUTED
        .iter()
        .map(|field| {
            let name = field.column_name();
            Ok((name.to_string(), df.column(name)?.null_count()))
        })
        .collect()
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
fn elapsed_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Builder for [`ImputationPipeline`].
#[derive(Default)]
pub struct ImputationPipelineBuilder {
    config: Option<ImputationConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl ImputationPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: ImputationConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback using a closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline, validating the configuration.
    pub fn build(self) -> Result<ImputationPipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(ImputationPipeline {
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImputationMethod;
    use crate::utils::{numeric_values, string_values};
    use std::sync::Mutex;

    fn numbers(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        numeric_values(df.column(name).unwrap().as_materialized_series()).unwrap()
    }

    fn frame(
        model: &[Option<&str>],
        model_year: &[Option<f64>],
        odometer: &[Option<f64>],
        cylinders: &[Option<f64>],
    ) -> DataFrame {
        let n = model.len();
        df![
            "price" => vec![Some(10000i64); n],
            "model_year" => model_year.to_vec(),
            "model" => model.to_vec(),
            "condition" => vec![Some("good"); n],
            "cylinders" => cylinders.to_vec(),
            "fuel" => vec![Some("gas"); n],
            "odometer" => odometer.to_vec(),
            "transmission" => vec![Some("automatic"); n],
            "type" => vec![Some("sedan"); n],
            "paint_color" => vec![Option::<&str>::None; n],
            "is_4wd" => vec![Option::<f64>::None; n],
            "date_posted" => vec![Some("2018-06-23"); n],
            "days_listed" => vec![Some(19i64); n],
        ]
        .unwrap()
    }

    fn run(df: DataFrame) -> ImputationOutcome {
        ImputationPipeline::builder()
            .build()
            .unwrap()
            .process(df)
            .unwrap()
    }

    #[test]
    fn test_model_year_group_median() {
        let df = frame(
            &[Some("X"), Some("X"), Some("X")],
            &[Some(2010.0), None, Some(2012.0)],
            &[Some(1.0), Some(2.0), Some(3.0)],
            &[Some(4.0), Some(4.0), Some(4.0)],
        );

        let outcome = run(df);

        assert_eq!(numbers(&outcome.data, "model_year")[1], Some(2011.0));
    }

    #[test]
    fn test_model_year_empty_group_stays_missing() {
        let df = frame(
            &[Some("X"), Some("Y")],
            &[None, Some(2015.0)],
            &[Some(1.0), Some(2.0)],
            &[Some(4.0), Some(4.0)],
        );

        let outcome = run(df);

        assert_eq!(numbers(&outcome.data, "model_year"), vec![None, Some(2015.0)]);
        assert_eq!(outcome.report.warnings.len(), 1);
        assert_eq!(outcome.report.column("model_year").unwrap().nulls_after, 1);
    }

    #[test]
    fn test_odometer_fallback_uses_post_group_median() {
        // Rows 0-2 share a group (2010); row 3 has no peers (2012).
        // Raw median of [100, 200] is 150; after the group fill the present
        // values are [100, 100, 200], whose median is 100.
        let df = frame(
            &[Some("X"), Some("X"), Some("X"), Some("X")],
            &[Some(2010.0), Some(2010.0), Some(2012.0), Some(2014.0)],
            &[Some(100.0), None, Some(200.0), None],
            &[Some(4.0); 4],
        );

        let outcome = run(df);

        let odometer = numbers(&outcome.data, "odometer");
        assert_eq!(odometer[1], Some(100.0));
        assert_eq!(odometer[3], Some(100.0));

        let fallback = outcome
            .report
            .step("odometer", ImputationMethod::GlobalMedian)
            .unwrap();
        assert_eq!(fallback.filled, 1);
        assert_eq!(fallback.fill_value.as_deref(), Some("100"));
    }

    #[test]
    fn test_cylinders_group_then_global_mode() {
        let df = frame(
            &[Some("A"), Some("A"), Some("A"), Some("B"), Some("C"), Some("C")],
            &[Some(2010.0); 6],
            &[Some(1.0); 6],
            &[Some(6.0), Some(6.0), None, None, Some(8.0), None],
        );

        let outcome = run(df);

        let cylinders = numbers(&outcome.data, "cylinders");
        assert_eq!(cylinders[2], Some(6.0));
        assert_eq!(cylinders[5], Some(8.0));
        // "B" has no known count; global mode over [6, 6, 6, 8, 8] is 6
        assert_eq!(cylinders[3], Some(6.0));
    }

    #[test]
    fn test_constant_fills() {
        let df = frame(
            &[Some("X"), Some("X")],
            &[Some(2010.0), Some(2011.0)],
            &[Some(1.0), Some(2.0)],
            &[Some(4.0), Some(4.0)],
        );

        let outcome = run(df);

        let colors = string_values(
            outcome
                .data
                .column("paint_color")
                .unwrap()
                .as_materialized_series(),
        )
        .unwrap();
        assert!(colors.iter().all(|c| c.as_deref() == Some("unknown")));
        assert!(numbers(&outcome.data, "is_4wd").iter().all(|v| *v == Some(0.0)));
    }

    #[test]
    fn test_missing_column_error_names_column() {
        let df = frame(&[Some("X")], &[Some(2010.0)], &[Some(1.0)], &[Some(4.0)])
            .drop("fuel")
            .unwrap();

        let err = ImputationPipeline::builder()
            .build()
            .unwrap()
            .process(df)
            .unwrap_err();

        assert!(matches!(err, ImputationError::MissingColumn(ref c) if c == "fuel"));
    }

    #[test]
    fn test_progress_reports_each_stage_then_complete() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let seen = stages.clone();

        let df = frame(&[Some("X")], &[Some(2010.0)], &[Some(1.0)], &[Some(4.0)]);
        ImputationPipeline::builder()
            .on_progress(move |update| seen.lock().unwrap().push(update.stage))
            .build()
            .unwrap()
            .process(df)
            .unwrap();

        let stages = stages.lock().unwrap();
        assert_eq!(stages.first(), Some(&ImputationStage::Validating));
        assert_eq!(stages.last(), Some(&ImputationStage::Complete));
        assert!(stages.contains(&ImputationStage::FourWheelDrive));
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let config = ImputationConfig {
            unknown_paint_color: String::new(),
            ..ImputationConfig::default()
        };

        let result = ImputationPipeline::builder().config(config).build();
        assert!(matches!(result, Err(ImputationError::InvalidConfig(_))));
    }

    #[test]
    fn test_elapsed_ms_saturates() {
        assert_eq!(elapsed_ms(Duration::from_millis(1500)), 1500);
        assert_eq!(elapsed_ms(Duration::MAX), u64::MAX);
    }
}
