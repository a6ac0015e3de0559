//! # ETL Ingest Crate
//!
//! The filesystem edge of the pipeline: finding CSV inputs, parsing them into
//! polars `DataFrame`s, and serialising the processed dataset back to disk.
//!
//! ## Public API
//!
//! - `list_csv_files`: Non-recursive scan of a directory for `.csv` files.
//! - `read_csv`: Parses a single CSV file, inferring column types.
//! - `CsvBatches`: A lazy, single-pass sequence reading one file per step.
//! - `write_csv`: Serialises a dataset, overwriting the destination.
//! - `IngestError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod lister;
pub mod reader;
pub mod writer;

// Re-export the key components to create a clean, public-facing API.
pub use error::IngestError;
pub use lister::list_csv_files;
pub use reader::{CsvBatches, read_csv};
pub use writer::write_csv;
