//! Vehicle Sales Explorer Dashboard
//!
//! The state and rendering layer of the explorer: sidebar display settings,
//! six collapsible chart panels, a navigation menu, and histogram / scatter
//! figure factories producing Plotly figures from the prepared dataset.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use vehicle_dashboard::{DashboardState, commands};
//! use vehicle_processing::{ImputationConfig, VehicleDataset};
//!
//! let dataset = VehicleDataset::prepare(&ImputationConfig::default())?;
//! let state = DashboardState::new(dataset);
//!
//! commands::set_template(&state, "ggplot2")?;
//! commands::expand_all_panels(&state);
//! let view = commands::render_dashboard(&state)?;
//! println!("{}", serde_json::to_string(&view)?);
//! ```

pub mod charts;
pub mod commands;
pub mod error;
pub mod panels;
pub mod settings;
pub mod state;

// Re-exports for convenient access
pub use charts::{Figure, Layout, Trace, Values};
pub use error::{DashboardError, Result};
pub use panels::{ChartKind, ChartSpec, PanelId, PanelState, PanelStates};
pub use settings::{ChartTemplate, DisplaySettings};
pub use state::{DashboardState, DashboardView, NavPage, PanelView};
