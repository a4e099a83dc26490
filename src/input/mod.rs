//! Readers for the footprint and camera tables.
//!
//! Both tables are CSV files with a header row. Columns are matched by name,
//! so extra columns and any column order are accepted. A missing required
//! column or an unparseable value is fatal.

mod camera;
mod footprint;

pub use camera::{read_cameras, read_cameras_from_path};
pub use footprint::{read_footprints, read_footprints_from_path, FootprintRecord};

use std::fs::File;
use std::path::Path;

use crate::error::InputError;

/// Opens a CSV reader over `reader`, trimming whitespace around fields.
fn csv_reader<R: std::io::Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Fails with [`InputError::MissingColumn`] unless every column is present.
fn require_columns(
    headers: &csv::StringRecord,
    source: &str,
    columns: &[&'static str],
) -> Result<(), InputError> {
    for &column in columns {
        if !headers.iter().any(|h| h == column) {
            return Err(InputError::MissingColumn {
                file: source.to_owned(),
                column,
            });
        }
    }
    Ok(())
}

fn open(path: &Path) -> Result<File, InputError> {
    File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })
}
