use std::io::Read;
use std::path::Path;

use crate::error::InputError;
use crate::render::CameraPose;

use super::{csv_reader, open, require_columns};

const COLUMNS: [&str; 2] = ["x", "y"];

/// Reads camera positions from any CSV source, in row order.
///
/// # Errors
///
/// Returns an error if a required column is missing or a row is malformed.
pub fn read_cameras<R: Read>(reader: R, source: &str) -> Result<Vec<CameraPose>, InputError> {
    let mut rdr = csv_reader(reader);
    require_columns(rdr.headers()?, source, &COLUMNS)?;
    Ok(rdr.deserialize().collect::<Result<Vec<_>, _>>()?)
}

/// Reads camera positions from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is malformed.
pub fn read_cameras_from_path(path: &Path) -> Result<Vec<CameraPose>, InputError> {
    read_cameras(open(path)?, &path.display().to_string())
}
