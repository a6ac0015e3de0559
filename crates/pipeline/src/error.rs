use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Database configuration error: {0}")]
    Configuration(#[source] database::DbError),

    #[error("Failed to prepare output directory {path:?}: {source}")]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Read error: {0}")]
    Read(#[source] ingest::IngestError),

    #[error("Transform error: {0}")]
    Transform(#[from] transform::TransformError),

    #[error("Write error: {0}")]
    Write(#[source] ingest::IngestError),

    #[error("Load error: {0}")]
    Load(#[source] database::DbError),
}

impl PipelineError {
    /// Name of the stage that failed, for the run's final log line.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Configuration(_) => "configure",
            PipelineError::Workspace { .. } => "prepare",
            PipelineError::Read(_) => "read",
            PipelineError::Transform(_) => "transform",
            PipelineError::Write(_) => "write",
            PipelineError::Load(_) => "load",
        }
    }
}
