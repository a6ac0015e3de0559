use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

use crate::error::ConfigError;

/// The root configuration structure for a pipeline run.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    /// Directory scanned (non-recursively) for `.csv` input files.
    pub input_dir: PathBuf,
    /// Directory the processed CSV is written to. Created if absent.
    pub output_dir: PathBuf,
    /// File name of the processed CSV inside `output_dir`.
    pub output_file_name: String,
    /// Target table for the database load.
    pub table_name: String,
    /// Whether a load replaces the table contents or appends to them.
    pub load_mode: LoadMode,
    /// Normalization policy applied after concatenation.
    pub normalization: Normalization,
}

impl PipelineSettings {
    /// Full path of the processed CSV file.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file_name)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "table_name must not be empty".to_string(),
            ));
        }
        if self.output_file_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "output_file_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// How the loader treats an existing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Drop and recreate the table on every load.
    #[default]
    Replace,
    /// Keep existing rows; the table schema must match the dataset.
    Append,
}

/// Column-level normalization applied to the concatenated dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    #[default]
    Passthrough,
    TrimStrings,
}

/// Environment keys holding the database connection details, in field order.
pub const DB_HOST: &str = "DB_HOST";
pub const DB_NAME: &str = "DB_NAME";
pub const DB_USER: &str = "DB_USER";
pub const DB_PASSWORD: &str = "DB_PASSWORD";
pub const DB_PORT: &str = "DB_PORT";

/// Connection details as resolved from the environment.
///
/// Every field is optional here: presence and non-emptiness are checked by the
/// database connector, which reports missing keys as a configuration error.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: Option<String>,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub port: Option<String>,
}

impl ConnectionConfig {
    /// Resolves the five `DB_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the connection details through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup(DB_HOST),
            database: lookup(DB_NAME),
            user: lookup(DB_USER),
            password: lookup(DB_PASSWORD),
            port: lookup(DB_PORT),
        }
    }

    /// Pairs each field with the environment key it was read from.
    pub fn fields(&self) -> [(&'static str, Option<&str>); 5] {
        [
            (DB_HOST, self.host.as_deref()),
            (DB_NAME, self.database.as_deref()),
            (DB_USER, self.user.as_deref()),
            (DB_PASSWORD, self.password.as_deref()),
            (DB_PORT, self.port.as_deref()),
        ]
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("port", &self.port)
            .finish()
    }
}
