//! Integration tests for the dashboard over the prepared sample dataset.

use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::Arc;
use vehicle_dashboard::{DashboardState, NavPage, PanelId, Values, commands};
use vehicle_processing::{ImputationConfig, VehicleDataset};

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn sample_dataset() -> VehicleDataset {
    let config = ImputationConfig::builder()
        .data_path(fixtures_path().join("vehicles_sample.csv"))
        .build()
        .unwrap();
    VehicleDataset::prepare(&config).expect("Sample should prepare")
}

fn bar_total(values: &Values) -> f64 {
    match values {
        Values::Numbers(v) => v.iter().sum(),
        Values::Labels(_) => panic!("bar heights should be numbers"),
    }
}

#[test]
fn test_expand_all_renders_six_figures() {
    let state = DashboardState::new(sample_dataset());
    commands::expand_all_panels(&state);

    let view = commands::render_dashboard(&state).unwrap();
    assert_eq!(view.page, NavPage::Plots);
    assert_eq!(view.rows, 19);

    let ids: Vec<PanelId> = view.panels.iter().map(|p| p.id).collect();
    assert_eq!(ids, PanelId::ALL.to_vec());
    assert!(view.panels.iter().all(|p| p.figure.is_some()));
}

#[test]
fn test_histogram_counts_every_listing() {
    let state = DashboardState::new(sample_dataset());

    for panel in ["price", "odometer", "days_listed", "condition"] {
        let figure = commands::render_panel(&state, panel).unwrap();
        let total: f64 = figure.data.iter().map(|t| bar_total(&t.y)).sum();
        // price, days_listed and condition are complete; odometer is imputed.
        assert_eq!(total, 19.0, "{} histogram", panel);
    }
}

#[test]
fn test_condition_histogram_traces_follow_first_appearance() {
    let state = DashboardState::new(sample_dataset());
    let figure = commands::render_panel(&state, "condition").unwrap();

    let names: Vec<String> = figure.data.iter().filter_map(|t| t.name.clone()).collect();
    assert_eq!(names, vec!["good", "like new", "fair", "excellent"]);
}

#[test]
fn test_scatter_colored_by_imputed_paint_color() {
    let state = DashboardState::new(sample_dataset());
    commands::set_color_field(&state, "paint_color").unwrap();

    let figure = commands::render_panel(&state, "scatter_price_cylinders").unwrap();
    let names: Vec<String> = figure.data.iter().filter_map(|t| t.name.clone()).collect();

    assert_eq!(names.first().map(String::as_str), Some("unknown"));
    assert!(!names.iter().any(|n| n == "null"));
    let points: usize = figure.data.iter().map(|t| t.x.len()).sum();
    assert_eq!(points, 19);
}

#[test]
fn test_view_json_shape() {
    let state = DashboardState::new(sample_dataset());
    commands::set_template(&state, "ggplot2").unwrap();
    commands::set_show_bar_text(&state, true);
    commands::set_panel_expanded(&state, "price", true).unwrap();

    let view = commands::render_dashboard(&state).unwrap();
    let json = serde_json::to_value(&view).unwrap();

    assert_eq!(json["page"], "plots");
    assert_eq!(json["settings"]["template"], "ggplot2");
    let figure = &json["panels"][0]["figure"];
    assert_eq!(figure["layout"]["template"], "ggplot2");
    assert_eq!(figure["layout"]["title"]["text"], "Distribution of Vehicle Prices");
    assert_eq!(figure["layout"]["title"]["x"], 0.35);
    assert_eq!(figure["data"][0]["textposition"], "outside");
    assert!(json["panels"][1].get("figure").is_none());
}

#[test]
fn test_sessions_share_one_dataset() {
    let dataset = Arc::new(sample_dataset());
    let first = DashboardState::with_shared(Arc::clone(&dataset));
    let second = DashboardState::with_shared(Arc::clone(&dataset));

    commands::expand_all_panels(&first);
    assert!(commands::get_panels(&second).iter().all(|p| !p.expanded));
    assert_eq!(Arc::strong_count(&dataset), 3);
}
