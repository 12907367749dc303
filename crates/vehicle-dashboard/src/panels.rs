//! The six collapsible chart panels and their expanded flags.

use crate::error::DashboardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use vehicle_processing::VehicleField;

/// Identifies one chart panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelId {
    Price,
    Odometer,
    DaysListed,
    Condition,
    ScatterPriceOdometer,
    ScatterPriceCylinders,
}

/// What a panel draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartKind {
    /// Distribution of one field, stacked by condition.
    Histogram { field: VehicleField },
    /// `y` against `x`, colored by the sidebar color field.
    Scatter { x: VehicleField, y: VehicleField },
}

/// A panel's chart definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartSpec {
    #[serde(flatten)]
    pub kind: ChartKind,
    pub title: &'static str,
}

impl PanelId {
    /// Panels in page order.
    pub const ALL: [PanelId; 6] = [
        PanelId::Price,
        PanelId::Odometer,
        PanelId::DaysListed,
        PanelId::Condition,
        PanelId::ScatterPriceOdometer,
        PanelId::ScatterPriceCylinders,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Odometer => "odometer",
            Self::DaysListed => "days_listed",
            Self::Condition => "condition",
            Self::ScatterPriceOdometer => "scatter_price_odometer",
            Self::ScatterPriceCylinders => "scatter_price_cylinders",
        }
    }

    /// Header text of the collapsible panel.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Price => "Distribution of Vehicle Prices (Histogram)",
            Self::Odometer => "Distribution of Odometer Readings (Histogram)",
            Self::DaysListed => "Days Listed (Histogram)",
            Self::Condition => "Distribution of Vehicle Conditions (Histogram)",
            Self::ScatterPriceOdometer => "Price vs. Odometer Reading (Scatter)",
            Self::ScatterPriceCylinders => "Price vs. Cylinder Count (Scatter)",
        }
    }

    pub fn chart(&self) -> ChartSpec {
        use VehicleField as F;

        let (kind, title) = match self {
            Self::Price => (
                ChartKind::Histogram { field: F::Price },
                "Distribution of Vehicle Prices",
            ),
            Self::Odometer => (
                ChartKind::Histogram { field: F::Odometer },
                "Distribution of Odometer Readings",
            ),
            Self::DaysListed => (
                ChartKind::Histogram { field: F::DaysListed },
                "Distribution of Days Listed",
            ),
            Self::Condition => (
                ChartKind::Histogram { field: F::Condition },
                "Distribution of Vehicle Conditions",
            ),
            Self::ScatterPriceOdometer => (
                ChartKind::Scatter { x: F::Odometer, y: F::Price },
                "Price vs. Odometer Reading",
            ),
            Self::ScatterPriceCylinders => (
                ChartKind::Scatter { x: F::Cylinders, y: F::Price },
                "Price vs. Cylinder Count",
            ),
        };
        ChartSpec { kind, title }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PanelId {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        PanelId::ALL
            .into_iter()
            .find(|panel| panel.key().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DashboardError::UnknownPanel(needle.to_string()))
    }
}

/// Expanded flags of every panel. All panels start collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelStates {
    expanded: [bool; PanelId::ALL.len()],
}

/// Serializable snapshot of one panel's header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelState {
    pub id: PanelId,
    pub label: &'static str,
    pub expanded: bool,
}

impl PanelStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expand_all(&mut self) {
        self.expanded = [true; PanelId::ALL.len()];
    }

    pub fn collapse_all(&mut self) {
        self.expanded = [false; PanelId::ALL.len()];
    }

    pub fn set_expanded(&mut self, panel: PanelId, expanded: bool) {
        self.expanded[panel.index()] = expanded;
    }

    /// Flip one panel and return its new state.
    pub fn toggle(&mut self, panel: PanelId) -> bool {
        let slot = &mut self.expanded[panel.index()];
        *slot = !*slot;
        *slot
    }

    pub fn is_expanded(&self, panel: PanelId) -> bool {
        self.expanded[panel.index()]
    }

    /// Panels with their expanded flag, in page order.
    pub fn iter(&self) -> impl Iterator<Item = (PanelId, bool)> + '_ {
        PanelId::ALL
            .into_iter()
            .map(move |panel| (panel, self.is_expanded(panel)))
    }

    pub fn snapshot(&self) -> Vec<PanelState> {
        self.iter()
            .map(|(id, expanded)| PanelState {
                id,
                label: id.label(),
                expanded,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_all_panels_start_collapsed() {
        let panels = PanelStates::new();
        assert!(panels.iter().all(|(_, expanded)| !expanded));
        assert_eq!(panels.iter().count(), 6);
    }

    #[test]
    fn test_expand_and_collapse_all() {
        let mut panels = PanelStates::new();
        panels.expand_all();
        assert!(PanelId::ALL.iter().all(|p| panels.is_expanded(*p)));

        panels.collapse_all();
        assert!(PanelId::ALL.iter().all(|p| !panels.is_expanded(*p)));
    }

    #[test]
    fn test_toggle_and_set_touch_one_panel() {
        let mut panels = PanelStates::new();
        assert!(panels.toggle(PanelId::Condition));
        panels.set_expanded(PanelId::Price, true);

        let expanded: Vec<PanelId> = panels
            .iter()
            .filter(|(_, expanded)| *expanded)
            .map(|(panel, _)| panel)
            .collect();
        assert_eq!(expanded, vec![PanelId::Price, PanelId::Condition]);

        assert!(!panels.toggle(PanelId::Condition));
        assert!(!panels.is_expanded(PanelId::Condition));
    }

    #[test]
    fn test_panel_parsing() {
        assert_eq!(
            "scatter_price_cylinders".parse::<PanelId>().unwrap(),
            PanelId::ScatterPriceCylinders
        );
        let err = "mileage".parse::<PanelId>().unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_PANEL");
    }

    #[test]
    fn test_chart_definitions() {
        assert_eq!(
            PanelId::DaysListed.chart(),
            ChartSpec {
                kind: ChartKind::Histogram {
                    field: VehicleField::DaysListed
                },
                title: "Distribution of Days Listed",
            }
        );
        assert_eq!(
            PanelId::ScatterPriceOdometer.chart().kind,
            ChartKind::Scatter {
                x: VehicleField::Odometer,
                y: VehicleField::Price
            }
        );
        assert_eq!(PanelId::DaysListed.label(), "Days Listed (Histogram)");
    }

    #[test]
    fn test_snapshot_serialization() {
        let mut panels = PanelStates::new();
        panels.set_expanded(PanelId::Odometer, true);
        let json = serde_json::to_value(panels.snapshot()).unwrap();
        assert_eq!(json[1]["id"], "odometer");
        assert_eq!(json[1]["expanded"], true);
        assert_eq!(json[0]["expanded"], false);
    }
}
