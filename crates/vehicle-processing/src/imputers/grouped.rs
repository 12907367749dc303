//! Grouped imputation.
//!
//! Rows are partitioned by a composite key, an aggregate is computed per
//! partition, and the aggregate is written back to members lacking a value.
//! Aggregates are computed from the column as it was before the step, so
//! fills within one step never feed each other. A row with a missing key
//! component belongs to no partition.

use crate::error::Result;
use crate::types::{ImputationMethod, ImputationStep};
use crate::utils::{GroupKey, KeyPart, count_missing, first_mode, group_keys, numeric_values, to_float64};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Aggregate computed for each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupAggregate {
    Median,
    /// Most frequent value, ties going to the value seen first.
    Mode,
}

impl GroupAggregate {
    fn method(&self) -> ImputationMethod {
        match self {
            Self::Median => ImputationMethod::GroupMedian,
            Self::Mode => ImputationMethod::GroupMode,
        }
    }
}

/// Outcome of filling one column by group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupFill {
    /// Values written.
    pub filled: usize,
    /// Values still missing afterwards.
    pub remaining: usize,
    /// Missing rows whose group had no value to offer.
    pub empty_groups: usize,
}

/// True where every key column holds a value.
fn keys_present(key_columns: &[&str]) -> Expr {
    key_columns
        .iter()
        .map(|name| col(*name).is_not_null())
        .reduce(|acc, present| acc.and(present))
        .unwrap_or_else(|| lit(true))
}

/// Group-by imputation for numeric columns.
pub struct GroupedImputer;

impl GroupedImputer {
    /// Fill `values` in place with the first-seen mode of each row's group.
    ///
    /// Rows with a `None` key are left untouched, as are rows whose group
    /// holds no present value.
    pub fn fill_mode(values: &mut [Option<f64>], keys: &[GroupKey]) -> GroupFill {
        let mut members: HashMap<&[KeyPart], Vec<f64>> = HashMap::new();
        for (value, key) in values.iter().zip(keys) {
            if let (Some(value), Some(key)) = (value, key) {
                members.entry(key.as_slice()).or_default().push(*value);
            }
        }

        let modes: HashMap<&[KeyPart], f64> = members
            .into_iter()
            .filter_map(|(key, group)| first_mode(&group).map(|mode| (key, mode)))
            .collect();

        let mut outcome = GroupFill::default();
        for (value, key) in values.iter_mut().zip(keys) {
            if value.is_some() {
                continue;
            }
            match key.as_deref().and_then(|k| modes.get(k)) {
                Some(mode) => {
                    *value = Some(*mode);
                    outcome.filled += 1;
                }
                None => {
                    if key.is_some() {
                        outcome.empty_groups += 1;
                    }
                    outcome.remaining += 1;
                }
            }
        }

        outcome
    }

    /// Fill `target` in `df` by the aggregate over `key_columns`.
    ///
    /// The column is rewritten as `Float64`; a value that is not a number
    /// fails the cast.
    pub fn apply(
        df: &mut DataFrame,
        target: &str,
        key_columns: &[&str],
        aggregate: GroupAggregate,
    ) -> Result<(ImputationStep, GroupFill)> {
        let outcome = match aggregate {
            GroupAggregate::Median => Self::apply_median(df, target, key_columns)?,
            GroupAggregate::Mode => Self::apply_mode(df, target, key_columns)?,
        };

        let step = ImputationStep::new(target, aggregate.method())
            .with_group_by(key_columns)
            .with_counts(outcome.filled, outcome.remaining);

        Ok((step, outcome))
    }

    fn apply_median(df: &mut DataFrame, target: &str, key_columns: &[&str]) -> Result<GroupFill> {
        let values = to_float64(df.column(target)?.as_materialized_series())?;
        let missing_before = values.null_count();
        df.replace(target, values)?;

        debug!(
            "Grouping '{}' by {:?}: {} missing before",
            target, key_columns, missing_before
        );

        let partition: Vec<Expr> = key_columns.iter().map(|name| col(*name)).collect();
        let filled = df
            .clone()
            .lazy()
            .with_column(
                when(keys_present(key_columns))
                    .then(col(target).fill_null(col(target).median().over(partition)))
                    .otherwise(col(target))
                    .alias(target),
            )
            .collect()?;

        let empty_groups = filled
            .clone()
            .lazy()
            .filter(col(target).is_null().and(keys_present(key_columns)))
            .collect()?
            .height();
        let remaining = filled.column(target)?.null_count();
        *df = filled;

        Ok(GroupFill {
            filled: missing_before - remaining,
            remaining,
            empty_groups,
        })
    }

    fn apply_mode(df: &mut DataFrame, target: &str, key_columns: &[&str]) -> Result<GroupFill> {
        let keys = group_keys(df, key_columns)?;
        let mut values = numeric_values(df.column(target)?.as_materialized_series())?;

        debug!(
            "Grouping '{}' by {:?}: {} missing before",
            target,
            key_columns,
            count_missing(&values)
        );

        let outcome = Self::fill_mode(&mut values, &keys);
        df.replace(target, Series::new(target.into(), values))?;

        Ok(outcome)
    }
}
