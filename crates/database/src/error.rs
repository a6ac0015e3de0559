use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Missing database connection details: {}", .0.join(", "))]
    MissingConfiguration(Vec<&'static str>),

    #[error("Invalid database connection details: {0}")]
    InvalidConfiguration(String),

    #[error("Database operation failed: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("Table '{table}' does not match the dataset schema: {detail}")]
    SchemaMismatch { table: String, detail: String },

    #[error("Invalid table name: {0:?}")]
    InvalidTableName(String),

    #[error("Table '{0}' does not exist.")]
    TableNotFound(String),

    #[error("Failed to convert dataset column: {0}")]
    Conversion(#[from] polars::prelude::PolarsError),
}

impl DbError {
    /// True for errors raised while validating connection details, before any
    /// attempt to reach the server.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            DbError::MissingConfiguration(_) | DbError::InvalidConfiguration(_)
        )
    }
}
