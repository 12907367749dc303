//! Statistical imputation methods.
//!
//! Whole-column fallbacks (median, mode) and constant fills.

use crate::error::Result;
use crate::types::{ImputationMethod, ImputationStep};
use crate::utils::{
    count_missing, fill_numeric_nulls, fill_string_nulls, mode_of_present, numeric_values,
    to_float64,
};
use polars::prelude::*;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill a numeric column with the median of its current values.
    ///
    /// Returns `None` when the column has no value to take a median of.
    pub fn apply_numeric_median(df: &mut DataFrame, col_name: &str) -> Result<Option<ImputationStep>> {
        let series = to_float64(df.column(col_name)?.as_materialized_series())?;
        let Some(median_val) = series.median() else {
            return Ok(None);
        };
        let step = Self::fill_with_value(df, col_name, median_val, ImputationMethod::GlobalMedian)?;
        Ok(Some(step))
    }

    /// Fill a numeric column with the most frequent of its current values.
    ///
    /// Returns `None` when the column has no value to take a mode of.
    pub fn apply_numeric_mode(df: &mut DataFrame, col_name: &str) -> Result<Option<ImputationStep>> {
        let values = numeric_values(df.column(col_name)?.as_materialized_series())?;
        let Some(mode_val) = mode_of_present(&values) else {
            return Ok(None);
        };
        let step = Self::fill_with_value(df, col_name, mode_val, ImputationMethod::GlobalMode)?;
        Ok(Some(step))
    }

    /// Fill a numeric column with a constant.
    pub fn apply_numeric_constant(df: &mut DataFrame, col_name: &str, value: f64) -> Result<ImputationStep> {
        Self::fill_with_value(df, col_name, value, ImputationMethod::Constant)
    }

    /// Fill a categorical column with a constant category.
    pub fn apply_category_constant(df: &mut DataFrame, col_name: &str, label: &str) -> Result<ImputationStep> {
        let series = df.column(col_name)?.as_materialized_series().clone();
        let missing = series.null_count();

        let filled = fill_string_nulls(&series, label)?;
        df.replace(col_name, filled)?;

        Ok(ImputationStep::new(col_name, ImputationMethod::Constant)
            .with_counts(missing, 0)
            .with_fill_value(label))
    }

    /// Fill numeric column with a specific value.
    fn fill_with_value(
        df: &mut DataFrame,
        col_name: &str,
        fill_value: f64,
        method: ImputationMethod,
    ) -> Result<ImputationStep> {
        let series = df.column(col_name)?.as_materialized_series().clone();
        let missing = count_missing(&numeric_values(&series)?);

        let filled = fill_numeric_nulls(&series, fill_value)?;
        df.replace(col_name, filled)?;

        Ok(ImputationStep::new(col_name, method)
            .with_counts(missing, 0)
            .with_fill_value(fill_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_f64(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        numeric_values(df.column(name).unwrap().as_materialized_series()).unwrap()
    }

    // ========================================================================
    // apply_numeric_median() tests
    // ========================================================================

    #[test]
    fn test_apply_numeric_median_basic() {
        let mut df = df![
            "odometer" => [Some(1.0), None, Some(3.0), None, Some(5.0)],
        ]
        .unwrap();

        let step = StatisticalImputer::apply_numeric_median(&mut df, "odometer")
            .unwrap()
            .unwrap();

        // Median of [1, 3, 5] = 3
        assert_eq!(
            column_f64(&df, "odometer"),
            vec![Some(1.0), Some(3.0), Some(3.0), Some(3.0), Some(5.0)]
        );
        assert_eq!(step.filled, 2);
        assert_eq!(step.fill_value.as_deref(), Some("3"));
    }

    #[test]
    fn test_apply_numeric_median_no_nulls() {
        let mut df = df![
            "odometer" => [1.0, 2.0, 3.0],
        ]
        .unwrap();

        let step = StatisticalImputer::apply_numeric_median(&mut df, "odometer")
            .unwrap()
            .unwrap();

        assert_eq!(step.filled, 0);
        assert_eq!(column_f64(&df, "odometer"), vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_apply_numeric_median_all_nulls() {
        let mut df = df![
            "odometer" => [Option::<f64>::None, None, None],
        ]
        .unwrap();

        let step = StatisticalImputer::apply_numeric_median(&mut df, "odometer").unwrap();

        assert!(step.is_none());
        assert_eq!(df.column("odometer").unwrap().null_count(), 3);
    }

    #[test]
    fn test_apply_numeric_median_nonexistent_column() {
        let mut df = df![
            "other" => [1.0, 2.0, 3.0],
        ]
        .unwrap();

        assert!(StatisticalImputer::apply_numeric_median(&mut df, "odometer").is_err());
    }

    #[test]
    fn test_apply_numeric_median_rejects_text_values() {
        let mut df = df![
            "odometer" => [Some("1000.0"), Some("n/a"), None],
        ]
        .unwrap();

        let err = StatisticalImputer::apply_numeric_median(&mut df, "odometer").unwrap_err();
        assert_eq!(err.error_code(), "POLARS_ERROR");
        assert_eq!(df.column("odometer").unwrap().null_count(), 1);
    }

    // ========================================================================
    // apply_numeric_mode() tests
    // ========================================================================

    #[test]
    fn test_apply_numeric_mode_basic() {
        let mut df = df![
            "cylinders" => [Some(6.0), Some(8.0), Some(8.0), None],
        ]
        .unwrap();

        let step = StatisticalImputer::apply_numeric_mode(&mut df, "cylinders")
            .unwrap()
            .unwrap();

        assert_eq!(column_f64(&df, "cylinders")[3], Some(8.0));
        assert_eq!(step.method, ImputationMethod::GlobalMode);
    }

    #[test]
    fn test_apply_numeric_mode_tie_breaking() {
        let mut df = df![
            "cylinders" => [Some(4.0), Some(6.0), None],
        ]
        .unwrap();

        StatisticalImputer::apply_numeric_mode(&mut df, "cylinders").unwrap();

        // When there's a tie, the first encountered value wins
        assert_eq!(column_f64(&df, "cylinders")[2], Some(4.0));
    }

    // ========================================================================
    // constant fills
    // ========================================================================

    #[test]
    fn test_apply_numeric_constant() {
        let mut df = df![
            "is_4wd" => [Some(1.0), None, None],
        ]
        .unwrap();

        let step = StatisticalImputer::apply_numeric_constant(&mut df, "is_4wd", 0.0).unwrap();

        assert_eq!(column_f64(&df, "is_4wd"), vec![Some(1.0), Some(0.0), Some(0.0)]);
        assert_eq!(step.filled, 2);
    }

    #[test]
    fn test_apply_category_constant() {
        let mut df = df![
            "paint_color" => [None, Some("black"), None],
        ]
        .unwrap();

        let step =
            StatisticalImputer::apply_category_constant(&mut df, "paint_color", "unknown").unwrap();

        let colors: Vec<Option<String>> = df
            .column("paint_color")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();
        assert_eq!(
            colors,
            vec![
                Some("unknown".to_string()),
                Some("black".to_string()),
                Some("unknown".to_string()),
            ]
        );
        assert_eq!(step.filled, 2);
        assert_eq!(step.fill_value.as_deref(), Some("unknown"));
    }

    #[test]
    fn test_fill_with_value_preserves_type() {
        let mut df = df![
            "odometer" => [Some(10i64), None, Some(20)],
        ]
        .unwrap();

        StatisticalImputer::apply_numeric_median(&mut df, "odometer").unwrap();

        let odometer = df.column("odometer").unwrap();
        assert!(matches!(odometer.dtype(), DataType::Float64));
        assert_eq!(column_f64(&df, "odometer")[1], Some(15.0));
    }
}
