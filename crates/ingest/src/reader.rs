use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::IngestError;

/// Parses one CSV file (header row required) into a `DataFrame`.
///
/// Column types are inferred from every row of the file; empty cells become
/// nulls. A file
/// that is missing, unreadable, or structurally malformed is a read error.
pub fn read_csv(path: impl AsRef<Path>) -> Result<DataFrame, IngestError> {
    let path = path.as_ref();
    let read_error = |source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    };

    let df = CsvReader::from_path(path)
        .map_err(read_error)?
        .has_header(true)
        .infer_schema(None)
        .finish()
        .map_err(read_error)?;

    debug!("Read {:?}: {} rows x {} columns", path, df.height(), df.width());
    Ok(df)
}

/// A lazy, single-pass sequence of parsed CSV files.
///
/// Each call to `next` reads exactly one file, so no file is touched until the
/// consumer asks for it. Cloning before iteration gives an independent pass
/// over the same paths.
#[derive(Debug, Clone)]
pub struct CsvBatches {
    paths: std::vec::IntoIter<PathBuf>,
}

impl CsvBatches {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths: paths.into_iter(),
        }
    }
}

impl Iterator for CsvBatches {
    type Item = Result<DataFrame, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.paths.next().map(read_csv)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.paths.size_hint()
    }
}

impl ExactSizeIterator for CsvBatches {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn infers_numeric_text_and_missing_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.csv");
        fs::write(&path, "id,price,name\n1,2.5,apple\n2,,pear\n").unwrap();

        let df = read_csv(&path).unwrap();

        assert_eq!(df.get_column_names(), vec!["id", "price", "name"]);
        assert_eq!(df.column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("price").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("name").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("price").unwrap().null_count(), 1);
    }

    fn integers_then(last: &str) -> String {
        let rows: String = (0..150).map(|n| format!("{n}\n")).collect();
        format!("x\n{rows}{last}\n")
    }

    #[test]
    fn late_float_widens_the_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late_float.csv");
        fs::write(&path, integers_then("1.5")).unwrap();

        let df = read_csv(&path).unwrap();

        assert_eq!(df.height(), 151);
        assert_eq!(df.column("x").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn late_text_makes_the_column_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late_text.csv");
        fs::write(&path, integers_then("n/a")).unwrap();

        let df = read_csv(&path).unwrap();

        assert_eq!(df.height(), 151);
        assert_eq!(df.column("x").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");

        let err = read_csv(&path).unwrap_err();

        assert!(matches!(err, IngestError::Read { .. }));
        assert_eq!(err.path(), &path);
    }

    #[test]
    fn ragged_rows_are_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ragged.csv");
        fs::write(&path, "a,b\n1,2\n3,4,5\n").unwrap();

        assert!(matches!(read_csv(&path), Err(IngestError::Read { .. })));
    }

    #[test]
    fn batches_read_files_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.csv");
        fs::write(&good, "a\n1\n2\n").unwrap();
        let missing = dir.path().join("missing.csv");

        let mut batches = CsvBatches::new(vec![good, missing]);
        assert_eq!(batches.len(), 2);

        // The first file parses even though the second would fail.
        assert_eq!(batches.next().unwrap().unwrap().height(), 2);
        assert!(batches.next().unwrap().is_err());
        assert!(batches.next().is_none());
    }

    #[test]
    fn cloned_batches_start_a_fresh_pass() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.csv");
        fs::write(&path, "a\n1\n").unwrap();

        let batches = CsvBatches::new(vec![path]);
        let replay = batches.clone();

        assert_eq!(batches.count(), 1);
        assert_eq!(replay.count(), 1);
    }
}
