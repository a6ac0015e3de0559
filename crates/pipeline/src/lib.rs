//! # ETL Pipeline Crate
//!
//! The orchestrator. A run is a fixed sequence with no branching or retries:
//!
//! 1. list the CSV files in the input directory (sorted for determinism),
//! 2. read them lazily, one at a time,
//! 3. concatenate and normalize them into one dataset,
//! 4. write the dataset to the output CSV,
//! 5. load it into the target table.
//!
//! The first failure aborts the run and is returned tagged with its stage.

use configuration::ConnectionConfig;
use configuration::settings::PipelineSettings;
use database::{DbHandle, load_to_db};
use ingest::{CsvBatches, list_csv_files, write_csv};
use polars::prelude::DataFrame;
use std::fs;
use std::path::PathBuf;
use tracing::{Instrument, error, info, info_span};
use transform::{normalizer_for, transform_data};
use uuid::Uuid;

pub mod error;

pub use error::PipelineError;

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub files: usize,
    pub rows: usize,
    pub columns: usize,
    pub output_path: PathBuf,
    pub table: String,
    pub rows_loaded: u64,
}

/// The extract and transform half of a run.
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    /// Input files in the order they were read.
    pub files: Vec<PathBuf>,
    pub dataset: DataFrame,
}

/// Lists, reads and transforms the inputs named by `settings`.
pub fn prepare_dataset(settings: &PipelineSettings) -> Result<PreparedDataset, PipelineError> {
    info!("Looking for CSV files in {:?}", settings.input_dir);
    let mut files = list_csv_files(&settings.input_dir);
    files.sort();
    info!("Found {} CSV files", files.len());

    let normalizer = normalizer_for(settings.normalization);
    let batches = CsvBatches::new(files.clone()).map(|batch| batch.map_err(PipelineError::Read));

    info!("Transforming data...");
    let dataset = transform_data(batches, normalizer.as_ref())?;
    info!("Data transformation complete");

    Ok(PreparedDataset { files, dataset })
}

/// Runs the whole pipeline against an existing database handle.
pub async fn run(
    settings: &PipelineSettings,
    handle: &DbHandle,
) -> Result<RunSummary, PipelineError> {
    let run_id = Uuid::new_v4();
    let result = execute(run_id, settings, handle)
        .instrument(info_span!("etl_run", %run_id))
        .await;

    if let Err(e) = &result {
        error!(%run_id, stage = e.stage(), "ETL pipeline failed: {}", e);
    }
    result
}

/// Scoped variant of [`run`]: builds the database handle from `config`,
/// runs the pipeline, and closes the handle whether or not the run succeeded.
///
/// Invalid connection details fail here, before any file is touched.
pub async fn run_with_connection(
    settings: &PipelineSettings,
    config: &ConnectionConfig,
) -> Result<RunSummary, PipelineError> {
    let handle = DbHandle::connect(config).map_err(|e| {
        error!(stage = "configure", "ETL pipeline failed: {}", e);
        PipelineError::Configuration(e)
    })?;

    let result = run(settings, &handle).await;
    handle.close().await;
    result
}

async fn execute(
    run_id: Uuid,
    settings: &PipelineSettings,
    handle: &DbHandle,
) -> Result<RunSummary, PipelineError> {
    info!("Starting ETL pipeline...");

    fs::create_dir_all(&settings.output_dir).map_err(|source| PipelineError::Workspace {
        path: settings.output_dir.clone(),
        source,
    })?;
    info!("Output directory set to {:?}", settings.output_dir);

    let PreparedDataset { files, dataset } = prepare_dataset(settings)?;

    let output_path = settings.output_path();
    info!("Writing processed data to {:?}", output_path);
    write_csv(&dataset, &output_path).map_err(PipelineError::Write)?;

    info!("Loading data into table '{}'", settings.table_name);
    let rows_loaded = load_to_db(&dataset, &settings.table_name, handle, settings.load_mode)
        .await
        .map_err(PipelineError::Load)?;

    info!("ETL pipeline finished");
    Ok(RunSummary {
        run_id,
        files: files.len(),
        rows: dataset.height(),
        columns: dataset.width(),
        output_path,
        table: settings.table_name.clone(),
        rows_loaded,
    })
}
