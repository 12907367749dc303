//! Dashboard session state.
//!
//! The prepared dataset is shared read-only; the sidebar widgets, panel flags
//! and current page are per-session and live behind `parking_lot` locks so
//! the state can be handed to any UI runtime.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    DashboardState                    │
//! ├──────────────────────────┬───────────────────────────┤
//! │  dataset: Arc            │  settings: RwLock         │
//! │  (VehicleDataset, r/o)   │  (DisplaySettings)        │
//! ├──────────────────────────┼───────────────────────────┤
//! │  panels: RwLock          │  page: RwLock             │
//! │  (PanelStates)           │  (NavPage)                │
//! └──────────────────────────┴───────────────────────────┘
//! ```

use crate::charts::Figure;
use crate::error::DashboardError;
use crate::panels::{PanelId, PanelStates};
use crate::settings::DisplaySettings;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use static_assertions::assert_impl_all;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use vehicle_processing::VehicleDataset;

// ============================================================================
// NAVIGATION
// ============================================================================

/// Page selected in the top navigation menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavPage {
    /// The chart panels.
    #[default]
    Plots,
    Correlations,
    Contact,
}

impl NavPage {
    pub const ALL: [NavPage; 3] = [NavPage::Plots, NavPage::Correlations, NavPage::Contact];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Plots => "plots",
            Self::Correlations => "correlations",
            Self::Contact => "contact",
        }
    }
}

impl fmt::Display for NavPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NavPage {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        NavPage::ALL
            .into_iter()
            .find(|page| page.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DashboardError::UnknownPage(needle.to_string()))
    }
}

// ============================================================================
// RENDERED VIEW
// ============================================================================

/// One panel as the frontend draws it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub id: PanelId,
    pub label: &'static str,
    pub expanded: bool,
    /// Present only for expanded panels on the plots page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub figure: Option<Figure>,
}

/// Everything needed to draw the dashboard for the current session state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub page: NavPage,
    pub settings: DisplaySettings,
    /// Rows in the prepared dataset.
    pub rows: usize,
    pub panels: Vec<PanelView>,
}

// ============================================================================
// SESSION STATE
// ============================================================================

/// Session state of one dashboard.
pub struct DashboardState {
    /// Prepared once at startup, never mutated.
    pub dataset: Arc<VehicleDataset>,

    /// Sidebar widget values.
    pub settings: RwLock<DisplaySettings>,

    /// Expanded flag of every chart panel.
    pub panels: RwLock<PanelStates>,

    /// Page selected in the navigation menu.
    pub page: RwLock<NavPage>,
}

assert_impl_all!(DashboardState: Send, Sync);

impl DashboardState {
    pub fn new(dataset: VehicleDataset) -> Self {
        Self::with_shared(Arc::new(dataset))
    }

    /// Build a session over a dataset shared with other sessions.
    pub fn with_shared(dataset: Arc<VehicleDataset>) -> Self {
        Self {
            dataset,
            settings: RwLock::new(DisplaySettings::default()),
            panels: RwLock::new(PanelStates::new()),
            page: RwLock::new(NavPage::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_page_defaults_to_plots() {
        assert_eq!(NavPage::default(), NavPage::Plots);
        assert_eq!("Correlations".parse::<NavPage>().unwrap(), NavPage::Correlations);
        assert_eq!(
            "home".parse::<NavPage>().unwrap_err().error_code(),
            "UNKNOWN_PAGE"
        );
    }

    #[test]
    fn test_panel_view_omits_missing_figure() {
        let view = PanelView {
            id: PanelId::Price,
            label: PanelId::Price.label(),
            expanded: false,
            figure: None,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], "price");
        assert!(json.get("figure").is_none());
    }
}
