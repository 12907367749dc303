//! Column schema of the vehicle sales dataset.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the thirteen fields of a vehicle listing, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VehicleField {
    #[default]
    Price,
    ModelYear,
    Model,
    Condition,
    Cylinders,
    Fuel,
    Odometer,
    Transmission,
    #[serde(rename = "type")]
    Type,
    PaintColor,
    #[serde(rename = "is_4wd")]
    Is4wd,
    DatePosted,
    DaysListed,
}

impl VehicleField {
    /// All fields in the order they appear in the dataset.
    pub const ALL: [VehicleField; 13] = [
        VehicleField::Price,
        VehicleField::ModelYear,
        VehicleField::Model,
        VehicleField::Condition,
        VehicleField::Cylinders,
        VehicleField::Fuel,
        VehicleField::Odometer,
        VehicleField::Transmission,
        VehicleField::Type,
        VehicleField::PaintColor,
        VehicleField::Is4wd,
        VehicleField::DatePosted,
        VehicleField::DaysListed,
    ];

    /// The five fields the imputation pipeline fills, in processing order.
    pub const IMPUTED: [VehicleField; 5] = [
        VehicleField::ModelYear,
        VehicleField::Odometer,
        VehicleField::Cylinders,
        VehicleField::PaintColor,
        VehicleField::Is4wd,
    ];

    /// Every column read by the imputation pipeline, as keys or targets.
    pub const CONSUMED: [VehicleField; 9] = [
        VehicleField::Model,
        VehicleField::ModelYear,
        VehicleField::Condition,
        VehicleField::DaysListed,
        VehicleField::Odometer,
        VehicleField::Fuel,
        VehicleField::Cylinders,
        VehicleField::PaintColor,
        VehicleField::Is4wd,
    ];

    /// Column header used in the CSV file.
    pub fn column_name(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::ModelYear => "model_year",
            Self::Model => "model",
            Self::Condition => "condition",
            Self::Cylinders => "cylinders",
            Self::Fuel => "fuel",
            Self::Odometer => "odometer",
            Self::Transmission => "transmission",
            Self::Type => "type",
            Self::PaintColor => "paint_color",
            Self::Is4wd => "is_4wd",
            Self::DatePosted => "date_posted",
            Self::DaysListed => "days_listed",
        }
    }

    /// Whether the field holds numbers rather than categories or dates.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Price
                | Self::ModelYear
                | Self::Cylinders
                | Self::Odometer
                | Self::Is4wd
                | Self::DaysListed
        )
    }
}

impl fmt::Display for VehicleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Error returned when a string names no known field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown vehicle field '{0}'")]
pub struct UnknownFieldError(pub String);

impl FromStr for VehicleField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        VehicleField::ALL
            .into_iter()
            .find(|field| field.column_name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownFieldError(s.to_string()))
    }
}
