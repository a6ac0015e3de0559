use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::error::IngestError;

/// Writes `df` to `path` as comma-delimited CSV with a header row.
///
/// An existing file is overwritten. The parent directory must already exist.
/// Row and column order match the in-memory dataset. Returns the number of
/// data rows written.
pub fn write_csv(df: &DataFrame, path: impl AsRef<Path>) -> Result<usize, IngestError> {
    let path = path.as_ref();
    let mut file = File::create(path).map_err(|source| IngestError::CreateOutput {
        path: path.to_path_buf(),
        source,
    })?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut df.clone())
        .map_err(|source| IngestError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    debug!("Wrote {} rows to {:?}", df.height(), path);
    Ok(df.height())
}
