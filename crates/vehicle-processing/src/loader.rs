//! CSV loading for the vehicle dataset.

use crate::error::{ImputationError, Result, ResultExt};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Load the dataset from a comma-separated file with a header row.
///
/// `infer_schema_length` limits how many rows polars scans to decide column
/// types; `None` scans the whole file so late float values in a numeric
/// column are not rejected.
pub fn load_vehicles_csv(path: &Path, infer_schema_length: Option<usize>) -> Result<DataFrame> {
    if !path.exists() {
        return Err(ImputationError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file not found: {}", path.display()),
        )));
    }

    info!("Loading dataset from: {}", path.display());
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_schema_length)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context(format!("Failed to open {}", path.display()))?
        .finish()
        .context(format!("Failed to parse {}", path.display()))?;

    debug!("Loaded shape: {:?}", df.shape());
    Ok(df)
}

/// Parse CSV text held in memory, with the same options as a file load.
pub fn parse_vehicles_csv(content: &str) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(Cursor::new(content.to_string()))
        .finish()?;
    Ok(df)
}
