use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read CSV file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: polars::prelude::PolarsError,
    },

    #[error("Failed to create output file {path:?}: {source}")]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CSV file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: polars::prelude::PolarsError,
    },
}

impl IngestError {
    /// The file the failed operation was working on.
    pub fn path(&self) -> &PathBuf {
        match self {
            IngestError::Read { path, .. }
            | IngestError::CreateOutput { path, .. }
            | IngestError::Write { path, .. } => path,
        }
    }
}
