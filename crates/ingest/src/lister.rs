use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CSV_EXTENSION: &str = "csv";

/// Returns the regular files directly inside `dir` whose extension is `csv`.
///
/// The scan is not recursive and the extension match is case-sensitive. A
/// directory that is missing or cannot be read yields an empty list rather
/// than an error. Ordering follows the filesystem; callers sort when they
/// need a deterministic order.
pub fn list_csv_files(dir: impl AsRef<Path>) -> Vec<PathBuf> {
    let dir = dir.as_ref();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot scan {:?} for CSV files: {}", dir, e);
            return Vec::new();
        }
    };

    let files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext == CSV_EXTENSION))
        .collect();

    debug!("Found {} CSV files in {:?}", files.len(), dir);
    files
}
