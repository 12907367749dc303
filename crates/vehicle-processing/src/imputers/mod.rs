//! Imputation module for handling missing values.
//!
//! This module provides the two building blocks of the vehicle pipeline:
//! - Grouped imputation (median or mode per composite key)
//! - Statistical imputation (global median, global mode, constants)

mod grouped;
mod statistical;

pub use grouped::{GroupAggregate, GroupFill, GroupedImputer};
pub use statistical::StatisticalImputer;
