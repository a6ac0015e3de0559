use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Failed to reconcile type of column '{column}': {source}")]
    Reconcile {
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Failed to concatenate datasets: {0}")]
    Concat(#[source] PolarsError),

    #[error("Normalization policy '{policy}' failed: {source}")]
    Normalize {
        policy: &'static str,
        #[source]
        source: PolarsError,
    },
}
