//! Typed row view of the vehicle dataset.

use crate::error::{ImputationError, Result};
use crate::schema::VehicleField;
use crate::utils::{numeric_values, string_values};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Date format of the `date_posted` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One vehicle listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub price: Option<f64>,
    pub model_year: Option<f64>,
    pub model: Option<String>,
    pub condition: Option<String>,
    pub cylinders: Option<f64>,
    pub fuel: Option<String>,
    pub odometer: Option<f64>,
    pub transmission: Option<String>,
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
    pub paint_color: Option<String>,
    pub is_4wd: Option<bool>,
    pub date_posted: Option<NaiveDate>,
    pub days_listed: Option<i64>,
}

fn column<'a>(df: &'a DataFrame, field: VehicleField) -> Result<&'a Series> {
    df.column(field.column_name())
        .map(|c| c.as_materialized_series())
        .map_err(|_| ImputationError::MissingColumn(field.column_name().to_string()))
}

fn numbers(df: &DataFrame, field: VehicleField) -> Result<Vec<Option<f64>>> {
    Ok(numeric_values(column(df, field)?)?)
}

fn texts(df: &DataFrame, field: VehicleField) -> Result<Vec<Option<String>>> {
    Ok(string_values(column(df, field)?)?)
}

/// Convert every row of `df` into a [`Record`].
///
/// Unparseable dates become `None`; a non-zero `is_4wd` is `true`.
pub fn records_from_frame(df: &DataFrame) -> Result<Vec<Record>> {
    let mut price = numbers(df, VehicleField::Price)?.into_iter();
    let mut model_year = numbers(df, VehicleField::ModelYear)?.into_iter();
    let mut model = texts(df, VehicleField::Model)?.into_iter();
    let mut condition = texts(df, VehicleField::Condition)?.into_iter();
    let mut cylinders = numbers(df, VehicleField::Cylinders)?.into_iter();
    let mut fuel = texts(df, VehicleField::Fuel)?.into_iter();
    let mut odometer = numbers(df, VehicleField::Odometer)?.into_iter();
    let mut transmission = texts(df, VehicleField::Transmission)?.into_iter();
    let mut vehicle_type = texts(df, VehicleField::Type)?.into_iter();
    let mut paint_color = texts(df, VehicleField::PaintColor)?.into_iter();
    let mut is_4wd = numbers(df, VehicleField::Is4wd)?.into_iter();
    let mut date_posted = texts(df, VehicleField::DatePosted)?.into_iter();
    let mut days_listed = numbers(df, VehicleField::DaysListed)?.into_iter();

    let mut records = Vec::with_capacity(df.height());
    for _ in 0..df.height() {
        records.push(Record {
            price: price.next().flatten(),
            model_year: model_year.next().flatten(),
            model: model.next().flatten(),
            condition: condition.next().flatten(),
            cylinders: cylinders.next().flatten(),
            fuel: fuel.next().flatten(),
            odometer: odometer.next().flatten(),
            transmission: transmission.next().flatten(),
            vehicle_type: vehicle_type.next().flatten(),
            paint_color: paint_color.next().flatten(),
            is_4wd: is_4wd.next().flatten().map(|v| v != 0.0),
            date_posted: date_posted
                .next()
                .flatten()
                .and_then(|s| NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()),
            days_listed: days_listed.next().flatten().map(|v| v as i64),
        });
    }

    Ok(records)
}
