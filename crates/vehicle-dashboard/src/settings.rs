//! Sidebar display settings.

use crate::error::DashboardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use vehicle_processing::VehicleField;

/// Plot styling template offered in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartTemplate {
    #[default]
    Plotly,
    Ggplot2,
    Seaborn,
    SimpleWhite,
    /// No template; figures use the renderer's bare defaults.
    None,
}

impl ChartTemplate {
    /// Templates in sidebar order.
    pub const ALL: [ChartTemplate; 5] = [
        ChartTemplate::Plotly,
        ChartTemplate::Ggplot2,
        ChartTemplate::Seaborn,
        ChartTemplate::SimpleWhite,
        ChartTemplate::None,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Plotly => "plotly",
            Self::Ggplot2 => "ggplot2",
            Self::Seaborn => "seaborn",
            Self::SimpleWhite => "simple_white",
            Self::None => "none",
        }
    }

    /// Name to put in a figure layout, absent for [`ChartTemplate::None`].
    pub fn layout_name(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            other => Some(other.name()),
        }
    }
}

impl fmt::Display for ChartTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartTemplate {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ChartTemplate::ALL
            .into_iter()
            .find(|template| template.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DashboardError::UnknownTemplate(needle.to_string()))
    }
}

/// Widget values of the sidebar.
///
/// Session-only; nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub template: ChartTemplate,
    /// Print the count above each histogram bar.
    pub show_bar_text: bool,
    /// Field used to color scatter plot markers.
    pub color_field: VehicleField,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_sidebar() {
        let settings = DisplaySettings::default();
        assert_eq!(settings.template, ChartTemplate::Plotly);
        assert!(!settings.show_bar_text);
        assert_eq!(settings.color_field, VehicleField::Price);
    }

    #[test]
    fn test_template_parsing() {
        assert_eq!("ggplot2".parse::<ChartTemplate>().unwrap(), ChartTemplate::Ggplot2);
        assert_eq!(
            " Simple_White ".parse::<ChartTemplate>().unwrap(),
            ChartTemplate::SimpleWhite
        );
        assert_eq!("none".parse::<ChartTemplate>().unwrap(), ChartTemplate::None);

        let err = "solarized".parse::<ChartTemplate>().unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_TEMPLATE");
    }

    #[test]
    fn test_layout_name_omits_none() {
        assert_eq!(ChartTemplate::Seaborn.layout_name(), Some("seaborn"));
        assert_eq!(ChartTemplate::None.layout_name(), None);
    }

    #[test]
    fn test_settings_serialization() {
        let settings = DisplaySettings {
            template: ChartTemplate::SimpleWhite,
            show_bar_text: true,
            color_field: VehicleField::PaintColor,
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["template"], "simple_white");
        assert_eq!(json["color_field"], "paint_color");
    }
}
