//! Histogram and scatter figure factories.
//!
//! Figures serialize to the JSON shape Plotly expects (`{ data, layout }`),
//! so any frontend holding a Plotly renderer can draw them directly.

use crate::error::Result;
use crate::panels::{ChartKind, ChartSpec};
use crate::settings::{ChartTemplate, DisplaySettings};
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use vehicle_processing::{ImputationError, VehicleField, numeric_values, string_values};

/// Number of equal-width bins of a numeric histogram.
pub const HISTOGRAM_BINS: usize = 30;

/// Horizontal position of the figure title.
pub const TITLE_X: f64 = 0.35;

pub const MARKER_OPACITY: f64 = 0.5;

/// Label of a missing category.
pub const MISSING_LABEL: &str = "null";

// ============================================================================
// FIGURE MODEL
// ============================================================================

/// Axis values of a trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Values {
    Numbers(Vec<f64>),
    Labels(Vec<String>),
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Self::Numbers(v) => v.len(),
            Self::Labels(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceType {
    Bar,
    Scatter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
}

impl Title {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            x: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Continuous color per point; `None` entries render with no color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Vec<Option<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showscale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorbar: Option<ColorBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub trace_type: TraceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
    pub x: Values,
    pub y: Values,
    /// Bar width in data units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textposition: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<&'static str>,
    pub xaxis: Axis,
    pub yaxis: Axis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
}

impl Layout {
    fn new(title: &str, template: ChartTemplate, x_title: &str, y_title: &str) -> Self {
        Self {
            title: Title {
                text: title.to_string(),
                x: Some(TITLE_X),
            },
            template: template.layout_name(),
            xaxis: Axis {
                title: Title::plain(x_title),
            },
            yaxis: Axis {
                title: Title::plain(y_title),
            },
            barmode: None,
            legend: None,
        }
    }

    fn with_legend(mut self, title: &str) -> Self {
        self.legend = Some(Legend {
            title: Title::plain(title),
        });
        self
    }
}

/// A complete figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

// ============================================================================
// COLUMN ACCESS
// ============================================================================

fn column<'a>(df: &'a DataFrame, field: VehicleField) -> Result<&'a Series> {
    df.column(field.column_name())
        .map(|c| c.as_materialized_series())
        .map_err(|_| ImputationError::MissingColumn(field.column_name().to_string()).into())
}

fn numbers(df: &DataFrame, field: VehicleField) -> Result<Vec<Option<f64>>> {
    Ok(numeric_values(column(df, field)?)?)
}

fn labels(df: &DataFrame, field: VehicleField) -> Result<Vec<Option<String>>> {
    Ok(string_values(column(df, field)?)?)
}

fn label_or_missing(label: Option<String>) -> String {
    label.unwrap_or_else(|| MISSING_LABEL.to_string())
}

/// Values keyed by label, remembering first-appearance order.
struct Ordered<T> {
    index: HashMap<String, usize>,
    entries: Vec<(String, T)>,
}

impl<T> Ordered<T> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, label: &str, init: impl FnOnce() -> T) -> &mut T {
        let position = match self.index.get(label) {
            Some(&position) => position,
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push((label.to_string(), init()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[position].1
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn into_entries(self) -> Vec<(String, T)> {
        self.entries
    }
}

// ============================================================================
// HISTOGRAM
// ============================================================================

/// Equal-width bins over `[min, max]`; the last bin also holds `max`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bins {
    start: f64,
    width: f64,
}

impl Bins {
    fn spanning(values: impl Iterator<Item = f64>) -> Option<Self> {
        let (min, max) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        })?;
        let span = max - min;
        let width = if span > 0.0 {
            span / HISTOGRAM_BINS as f64
        } else {
            1.0
        };
        Some(Self { start: min, width })
    }

    fn index(&self, value: f64) -> usize {
        let raw = ((value - self.start) / self.width).floor();
        (raw.max(0.0) as usize).min(HISTOGRAM_BINS - 1)
    }

    fn center(&self, index: usize) -> f64 {
        self.start + self.width * (index as f64 + 0.5)
    }
}

fn bar_trace(
    name: String,
    x: Values,
    counts: Vec<usize>,
    width: Option<f64>,
    bar_text: bool,
) -> Trace {
    let (text, textposition): (Option<Vec<String>>, Option<&'static str>) = if bar_text {
        (
            Some(counts.iter().map(|c| c.to_string()).collect()),
            Some("outside"),
        )
    } else {
        (None, None)
    };
    Trace {
        trace_type: TraceType::Bar,
        name: Some(name),
        mode: None,
        x,
        y: Values::Numbers(counts.into_iter().map(|c| c as f64).collect()),
        width,
        text,
        textposition,
        marker: None,
    }
}

fn numeric_histogram(values: &[Option<f64>], conditions: Vec<String>, bar_text: bool) -> Vec<Trace> {
    let Some(bins) = Bins::spanning(values.iter().flatten().copied()) else {
        return Vec::new();
    };

    let mut groups: Ordered<Vec<usize>> = Ordered::new();
    for (value, condition) in values.iter().zip(conditions) {
        let counts = groups.entry(&condition, || vec![0; HISTOGRAM_BINS]);
        if let Some(value) = value {
            counts[bins.index(*value)] += 1;
        }
    }

    groups
        .into_entries()
        .into_iter()
        .filter(|(_, counts)| counts.iter().any(|c| *c > 0))
        .map(|(condition, counts)| {
            let (x, y): (Vec<f64>, Vec<usize>) = counts
                .into_iter()
                .enumerate()
                .filter(|(_, count)| *count > 0)
                .map(|(i, count)| (bins.center(i), count))
                .unzip();
            bar_trace(condition, Values::Numbers(x), y, Some(bins.width), bar_text)
        })
        .collect()
}

fn categorical_histogram(
    values: Vec<Option<String>>,
    conditions: Vec<String>,
    bar_text: bool,
) -> Vec<Trace> {
    let mut categories: Ordered<()> = Ordered::new();
    for value in values.iter().flatten() {
        categories.entry(value, || ());
    }

    let mut groups: Ordered<Vec<usize>> = Ordered::new();
    for (value, condition) in values.iter().zip(conditions) {
        let counts = groups.entry(&condition, || vec![0; categories.len()]);
        if let Some(position) = value.as_deref().and_then(|v| categories.position(v)) {
            counts[position] += 1;
        }
    }

    let names: Vec<String> = categories
        .into_entries()
        .into_iter()
        .map(|(name, _)| name)
        .collect();

    groups
        .into_entries()
        .into_iter()
        .filter(|(_, counts)| counts.iter().any(|c| *c > 0))
        .map(|(condition, counts)| {
            let (x, y): (Vec<String>, Vec<usize>) = names
                .iter()
                .zip(counts)
                .filter(|(_, count)| *count > 0)
                .map(|(name, count)| (name.clone(), count))
                .unzip();
            bar_trace(condition, Values::Labels(x), y, None, bar_text)
        })
        .collect()
}

/// Distribution of `field`, one stacked bar trace per vehicle condition.
///
/// Numeric fields are split into [`HISTOGRAM_BINS`] equal-width bins;
/// categorical fields are counted per value in first-appearance order.
/// Rows where `field` is missing are not counted.
pub fn histogram(
    df: &DataFrame,
    field: VehicleField,
    title: &str,
    settings: &DisplaySettings,
) -> Result<Figure> {
    let conditions: Vec<String> = labels(df, VehicleField::Condition)?
        .into_iter()
        .map(label_or_missing)
        .collect();

    let data = if field.is_numeric() {
        numeric_histogram(&numbers(df, field)?, conditions, settings.show_bar_text)
    } else {
        categorical_histogram(labels(df, field)?, conditions, settings.show_bar_text)
    };

    let mut layout = Layout::new(title, settings.template, field.column_name(), "count")
        .with_legend(VehicleField::Condition.column_name());
    layout.barmode = Some("relative");

    Ok(Figure { data, layout })
}

// ============================================================================
// SCATTER
// ============================================================================

fn scatter_trace(name: Option<String>, x: Vec<f64>, y: Vec<f64>, marker: Marker) -> Trace {
    Trace {
        trace_type: TraceType::Scatter,
        name,
        mode: Some("markers"),
        x: Values::Numbers(x),
        y: Values::Numbers(y),
        width: None,
        text: None,
        textposition: None,
        marker: Some(marker),
    }
}

/// `y` against `x`, colored by the configured color field.
///
/// A categorical color field yields one trace per category; a numeric one a
/// single trace with a continuous color scale. Rows missing `x` or `y` are
/// skipped.
pub fn scatter(
    df: &DataFrame,
    x: VehicleField,
    y: VehicleField,
    title: &str,
    settings: &DisplaySettings,
) -> Result<Figure> {
    let xs = numbers(df, x)?;
    let ys = numbers(df, y)?;
    let points: Vec<(usize, f64, f64)> = xs
        .iter()
        .zip(&ys)
        .enumerate()
        .filter_map(|(row, (x, y))| Some((row, (*x)?, (*y)?)))
        .collect();

    let color_field = settings.color_field;
    let data = if color_field.is_numeric() {
        let colors = numbers(df, color_field)?;
        let marker = Marker {
            opacity: Some(MARKER_OPACITY),
            color: Some(points.iter().map(|(row, _, _)| colors[*row]).collect()),
            showscale: Some(true),
            colorbar: Some(ColorBar {
                title: Title::plain(color_field.column_name()),
            }),
        };
        vec![scatter_trace(
            None,
            points.iter().map(|(_, x, _)| *x).collect(),
            points.iter().map(|(_, _, y)| *y).collect(),
            marker,
        )]
    } else {
        let categories = labels(df, color_field)?;
        let mut groups: Ordered<(Vec<f64>, Vec<f64>)> = Ordered::new();
        for (row, x, y) in &points {
            let label = label_or_missing(categories[*row].clone());
            let (gx, gy) = groups.entry(&label, || (Vec::new(), Vec::new()));
            gx.push(*x);
            gy.push(*y);
        }
        groups
            .into_entries()
            .into_iter()
            .map(|(label, (gx, gy))| {
                let marker = Marker {
                    opacity: Some(MARKER_OPACITY),
                    ..Marker::default()
                };
                scatter_trace(Some(label), gx, gy, marker)
            })
            .collect()
    };

    let mut layout = Layout::new(title, settings.template, x.column_name(), y.column_name());
    if !color_field.is_numeric() {
        layout = layout.with_legend(color_field.column_name());
    }

    Ok(Figure { data, layout })
}

/// Render a panel's chart definition.
pub fn render(df: &DataFrame, chart: &ChartSpec, settings: &DisplaySettings) -> Result<Figure> {
    match chart.kind {
        ChartKind::Histogram { field } => histogram(df, field, chart.title, settings),
        ChartKind::Scatter { x, y } => scatter(df, x, y, chart.title, settings),
    }
}
