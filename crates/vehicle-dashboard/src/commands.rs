//! Operations a UI invokes against the dashboard state.
//!
//! Each function mirrors one widget interaction: a sidebar control, a panel
//! header click or a navigation menu entry. Locks are held only for the copy
//! or the write; rendering works on snapshots.

use crate::charts::{self, Figure};
use crate::error::Result;
use crate::panels::{PanelId, PanelState};
use crate::settings::{ChartTemplate, DisplaySettings};
use crate::state::{DashboardState, DashboardView, NavPage, PanelView};
use tracing::{debug, info};
use vehicle_processing::{ImputationReport, VehicleField};

// ============================================================================
// SIDEBAR SETTINGS
// ============================================================================

pub fn get_settings(state: &DashboardState) -> DisplaySettings {
    state.settings.read().clone()
}

/// Select the plot template by name.
pub fn set_template(state: &DashboardState, template: &str) -> Result<ChartTemplate> {
    let template: ChartTemplate = template.parse()?;
    state.settings.write().template = template;
    debug!("Template set to {}", template);
    Ok(template)
}

pub fn set_show_bar_text(state: &DashboardState, enabled: bool) {
    state.settings.write().show_bar_text = enabled;
}

/// Select the field that colors scatter plots.
pub fn set_color_field(state: &DashboardState, field: &str) -> Result<VehicleField> {
    let field: VehicleField = field.parse()?;
    state.settings.write().color_field = field;
    debug!("Scatter color field set to {}", field);
    Ok(field)
}

// ============================================================================
// PANELS
// ============================================================================

pub fn get_panels(state: &DashboardState) -> Vec<PanelState> {
    state.panels.read().snapshot()
}

/// "Expand All" button.
pub fn expand_all_panels(state: &DashboardState) {
    state.panels.write().expand_all();
}

/// "Minimize All" button.
pub fn collapse_all_panels(state: &DashboardState) {
    state.panels.write().collapse_all();
}

pub fn set_panel_expanded(state: &DashboardState, panel: &str, expanded: bool) -> Result<PanelId> {
    let panel: PanelId = panel.parse()?;
    state.panels.write().set_expanded(panel, expanded);
    Ok(panel)
}

/// Flip a panel and return whether it is now expanded.
pub fn toggle_panel(state: &DashboardState, panel: &str) -> Result<bool> {
    let panel: PanelId = panel.parse()?;
    Ok(state.panels.write().toggle(panel))
}

// ============================================================================
// NAVIGATION
// ============================================================================

pub fn current_page(state: &DashboardState) -> NavPage {
    *state.page.read()
}

pub fn navigate(state: &DashboardState, page: &str) -> Result<NavPage> {
    let page: NavPage = page.parse()?;
    *state.page.write() = page;
    Ok(page)
}

// ============================================================================
// RENDERING
// ============================================================================

/// Render one panel's figure regardless of whether it is expanded.
pub fn render_panel(state: &DashboardState, panel: &str) -> Result<Figure> {
    let panel: PanelId = panel.parse()?;
    let settings = get_settings(state);
    charts::render(state.dataset.frame(), &panel.chart(), &settings)
}

/// Render the whole dashboard for the current session state.
///
/// Figures are produced only for expanded panels on the plots page.
pub fn render_dashboard(state: &DashboardState) -> Result<DashboardView> {
    let settings = get_settings(state);
    let panels = *state.panels.read();
    let page = current_page(state);

    let mut views = Vec::with_capacity(PanelId::ALL.len());
    for (id, expanded) in panels.iter() {
        let figure = if expanded && page == NavPage::Plots {
            Some(charts::render(state.dataset.frame(), &id.chart(), &settings)?)
        } else {
            None
        };
        views.push(PanelView {
            id,
            label: id.label(),
            expanded,
            figure,
        });
    }

    info!(
        "Rendered {} page with {} figure(s)",
        page,
        views.iter().filter(|v| v.figure.is_some()).count()
    );

    Ok(DashboardView {
        page,
        settings,
        rows: state.dataset.len(),
        panels: views,
    })
}

/// Imputation report of the prepared dataset.
pub fn get_report(state: &DashboardState) -> ImputationReport {
    state.dataset.report().clone()
}
