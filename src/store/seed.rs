//! CSV seed file reader.
//!
//! Rows are decoded lazily, one at a time, so arbitrarily large seed files
//! stream straight into the bulk loader.

use crate::error::{AnalysisError, AnalysisResult};
use crate::models::{Column, SeedRow};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Decode seed rows from CSV. The first line is a header and is skipped.
///
/// Columns are positional: id, employee_id, department, performance_score,
/// years_with_company, salary. Empty cells in nullable columns become `None`.
pub fn read_seed_rows<R: Read>(reader: R) -> impl Iterator<Item = AnalysisResult<SeedRow>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader)
        .into_deserialize::<SeedRow>()
        .enumerate()
        .map(|(index, row)| row.map_err(|e| seed_error(index, e)))
}

/// Open a seed file on disk.
pub fn open_seed_file(
    path: &Path,
) -> AnalysisResult<impl Iterator<Item = AnalysisResult<SeedRow>>> {
    let file = File::open(path).map_err(|e| {
        AnalysisError::SourceUnavailable(format!("{}: {}", path.display(), e))
    })?;
    debug!("Reading seed rows from {}", path.display());
    Ok(read_seed_rows(file))
}

fn seed_error(index: usize, err: csv::Error) -> AnalysisError {
    let field = match err.kind() {
        csv::ErrorKind::Io(_) => return AnalysisError::SourceUnavailable(err.to_string()),
        csv::ErrorKind::Deserialize { err: de, .. } => de
            .field()
            .and_then(|i| Column::ALL.get(i as usize))
            .map_or("record", |c| c.name()),
        _ => "record",
    };
    AnalysisError::schema(index, field, err.to_string())
}
