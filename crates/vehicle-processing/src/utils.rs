//! Shared utilities for the imputation pipeline.
//!
//! Column extraction, aggregate statistics and null filling used by the
//! grouped and statistical imputers.

use polars::prelude::*;
use std::collections::HashMap;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

// =============================================================================
// Column Extraction Utilities
// =============================================================================

/// Cast a column to `Float64`, failing on any value that is not a number.
///
/// Nulls stay null; an entry such as `"n/a"` is a cast error rather than a
/// new null.
pub fn to_float64(series: &Series) -> PolarsResult<Series> {
    series.strict_cast(&DataType::Float64)
}

/// Read a column as `f64` values, casting integers and booleans.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let casted = to_float64(series)?;
    Ok(casted.f64()?.into_iter().collect())
}

/// Read a column as owned strings, casting non-string columns.
pub fn string_values(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let casted = series.cast(&DataType::String)?;
    Ok(casted
        .str()?
        .into_iter()
        .map(|val| val.map(str::to_string))
        .collect())
}

/// Number of missing entries in a slice.
pub fn count_missing<T>(values: &[Option<T>]) -> usize {
    values.iter().filter(|v| v.is_none()).count()
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// Most frequent value. Ties go to the value seen first.
pub fn first_mode(values: &[f64]) -> Option<f64> {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    let mut order: Vec<f64> = Vec::new();

    for &value in values {
        let count = counts.entry(normalized_bits(value)).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let mut best: Option<(f64, usize)> = None;
    for value in order {
        let count = counts[&normalized_bits(value)];
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }

    best.map(|(value, _)| value)
}

/// Mode of the non-missing entries of a column.
pub fn mode_of_present(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    first_mode(&present)
}

/// Bit pattern of a float with `-0.0` folded onto `0.0`, for hashing.
fn normalized_bits(value: f64) -> u64 {
    if value == 0.0 { 0.0f64.to_bits() } else { value.to_bits() }
}

// =============================================================================
// Grouping Utilities
// =============================================================================

/// One component of a composite group key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    Text(String),
    Number(u64),
}

/// A composite group key; `None` when any component is missing.
pub type GroupKey = Option<Vec<KeyPart>>;

/// Read a column as key components, numeric columns comparing by value.
pub fn key_parts(series: &Series) -> PolarsResult<Vec<Option<KeyPart>>> {
    if is_numeric_dtype(series.dtype()) {
        Ok(numeric_values(series)?
            .into_iter()
            .map(|val| val.map(|v| KeyPart::Number(normalized_bits(v))))
            .collect())
    } else {
        Ok(string_values(series)?
            .into_iter()
            .map(|val| val.map(KeyPart::Text))
            .collect())
    }
}

/// Build the composite key of every row from the named columns.
///
/// Rows with a missing value in any key column get `None` and belong to
/// no group.
pub fn group_keys(df: &DataFrame, columns: &[&str]) -> PolarsResult<Vec<GroupKey>> {
    let parts = columns
        .iter()
        .map(|name| key_parts(df.column(name)?.as_materialized_series()))
        .collect::<PolarsResult<Vec<_>>>()?;

    Ok((0..df.height())
        .map(|row| {
            parts
                .iter()
                .map(|column| column[row].clone())
                .collect::<Option<Vec<KeyPart>>>()
        })
        .collect())
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let filled: Vec<Option<f64>> = numeric_values(series)?
        .into_iter()
        .map(|val| val.or(Some(fill_value)))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

/// Fill null values in a string Series with a specific value.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let filled: Vec<Option<String>> = string_values(series)?
        .into_iter()
        .map(|val| val.or_else(|| Some(fill_value.to_string())))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

// =============================================================================
// Tests
// =============================================================================
