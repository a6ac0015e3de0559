//! # ETL Database Crate
//!
//! The PostgreSQL side of the pipeline: validating connection details into a
//! reusable pool handle, and loading datasets into tables.
//!
//! ## Public API
//!
//! - `DbHandle`: Validated, lazily-connecting connection pool. Released with `close`.
//! - `load_to_db`: Writes a dataset into a table with replace or append semantics.
//! - `fetch_table` / `drop_table`: Read a table back as a dataset, or remove it.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod loader;
pub mod schema;

// Re-export the key components to create a clean, public-facing API.
pub use configuration::LoadMode;
pub use connection::DbHandle;
pub use error::DbError;
pub use loader::{drop_table, fetch_table, load_to_db};
pub use schema::SqlType;
