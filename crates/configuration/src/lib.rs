//! # ETL Configuration Crate
//!
//! Resolves everything a pipeline run needs from the outside world: the
//! pipeline settings (defaults, an optional TOML file, `ETL_*` environment
//! variables), the `DB_*` connection details, and the logging subscriber.
//! No other crate in the workspace reads the environment.

use std::path::Path;
use tracing::debug;

use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;
pub mod telemetry;

// Re-export the core types to provide a clean public API.
pub use settings::{ConnectionConfig, LoadMode, Normalization, PipelineSettings};
pub use telemetry::init_tracing;

/// Default settings file looked up in the working directory when no explicit
/// path is given. Its absence is not an error.
pub const DEFAULT_SETTINGS_FILE: &str = "etl";

/// Prefix for environment overrides, e.g. `ETL_TABLE_NAME`.
pub const ENV_PREFIX: &str = "ETL";

/// Loads the pipeline settings.
///
/// Sources are layered: built-in defaults, then the settings file (the given
/// `path`, or an optional `etl.toml`), then `ETL_*` environment variables.
pub fn load_settings(path: Option<&Path>) -> Result<PipelineSettings, ConfigError> {
    let mut builder = config::Config::builder()
        .set_default("input_dir", "data/raw")?
        .set_default("output_dir", "data/processed")?
        .set_default("output_file_name", "etl_pipeline_processed.csv")?
        .set_default("table_name", "etl_pipeline_processed")?
        .set_default("load_mode", "replace")?
        .set_default("normalization", "passthrough")?;

    builder = match path {
        Some(path) => builder.add_source(config::File::from(path)),
        None => builder.add_source(config::File::with_name(DEFAULT_SETTINGS_FILE).required(false)),
    };

    let settings = builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()?
        .try_deserialize::<PipelineSettings>()?;

    settings.validate()?;
    debug!("Resolved pipeline settings: {:?}", settings);
    Ok(settings)
}
