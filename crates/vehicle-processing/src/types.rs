use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Imputation Report Types
// ============================================================================

/// How a step chose the values it wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationMethod {
    /// Median of the rows sharing a composite key.
    GroupMedian,
    /// Most frequent value among the rows sharing a composite key.
    GroupMode,
    /// Median of the whole column.
    GlobalMedian,
    /// Most frequent value of the whole column.
    GlobalMode,
    /// A fixed value.
    Constant,
}

impl fmt::Display for ImputationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::GroupMedian => "group median",
            Self::GroupMode => "group mode",
            Self::GlobalMedian => "global median",
            Self::GlobalMode => "global mode",
            Self::Constant => "constant",
        };
        f.write_str(label)
    }
}

/// One executed fill rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImputationStep {
    /// Column that was filled.
    pub column: String,
    /// Rule used to choose the fill values.
    pub method: ImputationMethod,
    /// Grouping key columns (empty for global and constant fills).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<String>,
    /// Number of missing values this step replaced.
    pub filled: usize,
    /// Number of values still missing after this step.
    pub remaining: usize,
    /// The single value written, for global and constant fills.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_value: Option<String>,
}

impl ImputationStep {
    pub fn new(column: impl Into<String>, method: ImputationMethod) -> Self {
        Self {
            column: column.into(),
            method,
            group_by: Vec::new(),
            filled: 0,
            remaining: 0,
            fill_value: None,
        }
    }

    pub fn with_group_by(mut self, columns: &[&str]) -> Self {
        self.group_by = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_counts(mut self, filled: usize, remaining: usize) -> Self {
        self.filled = filled;
        self.remaining = remaining;
        self
    }

    pub fn with_fill_value(mut self, value: impl fmt::Display) -> Self {
        self.fill_value = Some(value.to_string());
        self
    }

    /// Human-readable description used in logs and the CLI summary.
    pub fn describe(&self) -> String {
        let mut text = format!("Filled {} '{}' value(s) with {}", self.filled, self.column, self.method);
        if !self.group_by.is_empty() {
            text.push_str(&format!(" by ({})", self.group_by.join(", ")));
        }
        if let Some(value) = &self.fill_value {
            text.push_str(&format!(": {}", value));
        }
        text
    }
}

/// Missing-value counts of one target column before and after imputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFillSummary {
    pub column: String,
    pub nulls_before: usize,
    pub nulls_after: usize,
}

impl ColumnFillSummary {
    pub fn filled(&self) -> usize {
        self.nulls_before.saturating_sub(self.nulls_after)
    }
}

/// Summary of what the imputation pipeline did.
///
/// Printed as-is by the CLI `--json` flag and sent to the
/// dashboard for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImputationReport {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,
    /// Number of rows processed.
    pub rows: usize,
    /// Executed steps in order.
    pub steps: Vec<ImputationStep>,
    /// Per-target missing counts.
    pub columns: Vec<ColumnFillSummary>,
    /// Residual missing data that no rule could fill.
    pub warnings: Vec<String>,
}

impl ImputationReport {
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn add_step(&mut self, step: ImputationStep) {
        self.steps.push(step);
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Total number of values written across all steps.
    pub fn total_filled(&self) -> usize {
        self.steps.iter().map(|s| s.filled).sum()
    }

    /// First step for `column` that used `method`.
    pub fn step(&self, column: &str, method: ImputationMethod) -> Option<&ImputationStep> {
        self.steps
            .iter()
            .find(|s| s.column == column && s.method == method)
    }

    /// Missing-value counts for a target column.
    pub fn column(&self, column: &str) -> Option<&ColumnFillSummary> {
        self.columns.iter().find(|c| c.column == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_describe_grouped() {
        let step = ImputationStep::new("odometer", ImputationMethod::GroupMedian)
            .with_group_by(&["model", "model_year"])
            .with_counts(3, 1);
        let text = step.describe();
        assert!(text.contains("Filled 3 'odometer'"));
        assert!(text.contains("group median"));
        assert!(text.contains("(model, model_year)"));
    }

    #[test]
    fn test_step_describe_constant() {
        let step = ImputationStep::new("paint_color", ImputationMethod::Constant)
            .with_counts(2, 0)
            .with_fill_value("unknown");
        assert!(step.describe().ends_with(": unknown"));
    }

    #[test]
    fn test_report_totals_and_lookup() {
        let mut report = ImputationReport::new(10);
        report.add_step(ImputationStep::new("cylinders", ImputationMethod::GroupMode).with_counts(4, 1));
        report.add_step(ImputationStep::new("cylinders", ImputationMethod::GlobalMode).with_counts(1, 0));
        report.columns.push(ColumnFillSummary {
            column: "cylinders".to_string(),
            nulls_before: 5,
            nulls_after: 0,
        });

        assert_eq!(report.total_filled(), 5);
        assert_eq!(
            report.step("cylinders", ImputationMethod::GlobalMode).unwrap().filled,
            1
        );
        assert!(report.step("odometer", ImputationMethod::GlobalMode).is_none());
        assert_eq!(report.column("cylinders").unwrap().filled(), 5);
    }

    #[test]
    fn test_method_serializes_snake_case() {
        let json = serde_json::to_string(&ImputationMethod::GroupMedian).unwrap();
        assert_eq!(json, "\"group_median\"");
    }
}
