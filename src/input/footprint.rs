use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::InputError;

use super::{csv_reader, open, require_columns};

const COLUMNS: [&str; 4] = ["ID", "X(m)", "Y(m)", "h"];

/// One vertex row of a building outline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FootprintRecord {
    /// Building identifier shared by all vertices of one outline.
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "X(m)")]
    pub x: f64,
    #[serde(rename = "Y(m)")]
    pub y: f64,
    /// Building height in metres. An empty cell leaves the height unset.
    pub h: Option<f64>,
}

/// Reads footprint rows from any CSV source.
///
/// `source` names the input in error messages.
///
/// # Errors
///
/// Returns an error if a required column is missing or a row is malformed.
pub fn read_footprints<R: Read>(reader: R, source: &str) -> Result<Vec<FootprintRecord>, InputError> {
    let mut rdr = csv_reader(reader);
    require_columns(rdr.headers()?, source, &COLUMNS)?;
    Ok(rdr.deserialize().collect::<Result<Vec<_>, _>>()?)
}

/// Reads footprint rows from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is malformed.
pub fn read_footprints_from_path(path: &Path) -> Result<Vec<FootprintRecord>, InputError> {
    read_footprints(open(path)?, &path.display().to_string())
}
