use crate::error::DbError;
use configuration::ConnectionConfig;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::fmt;
use std::time::Duration;
use tracing::info;

/// A lazily-connecting PostgreSQL pool for one database instance.
///
/// Built once per pipeline run and passed by reference to whoever needs it.
/// The owner releases it with [`DbHandle::close`].
#[derive(Clone)]
pub struct DbHandle {
    pool: PgPool,
    target: ConnectionTarget,
}

/// Validated connection details.
#[derive(Clone, PartialEq, Eq)]
struct ConnectionTarget {
    host: String,
    database: String,
    user: String,
    password: String,
    port: u16,
}

impl ConnectionTarget {
    fn from_config(config: &ConnectionConfig) -> Result<Self, DbError> {
        let missing: Vec<&'static str> = config
            .fields()
            .iter()
            .filter(|(_, value)| value.is_none_or(|v| v.trim().is_empty()))
            .map(|(key, _)| *key)
            .collect();
        if !missing.is_empty() {
            return Err(DbError::MissingConfiguration(missing));
        }

        let field = |value: &Option<String>| value.clone().unwrap_or_default();
        let port = field(&config.port);
        let port = port.trim().parse::<u16>().map_err(|_| {
            DbError::InvalidConfiguration(format!("DB_PORT must be a port number, got {port:?}"))
        })?;

        Ok(Self {
            host: field(&config.host),
            database: field(&config.database),
            user: field(&config.user),
            password: field(&config.password),
            port,
        })
    }

    fn url(&self, password: &str) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.user, password, self.host, self.port, self.database
        )
    }

    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

impl DbHandle {
    /// Validates `config` and builds the connection pool.
    ///
    /// Missing or blank fields fail with [`DbError::MissingConfiguration`]
    /// before anything else happens. No connection is opened here; network
    /// errors surface on first use. Must be called within a Tokio runtime.
    pub fn connect(config: &ConnectionConfig) -> Result<Self, DbError> {
        let target = ConnectionTarget::from_config(config)?;

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy_with(target.connect_options());

        let handle = Self { pool, target };
        info!("Database handle ready for {}", handle.redacted_target());
        Ok(handle)
    }

    /// The full connection string, password included.
    pub fn connection_target(&self) -> String {
        self.target.url(&self.target.password)
    }

    /// The connection string with the password masked, for logs.
    pub fn redacted_target(&self) -> String {
        self.target.url("***")
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trips a trivial query to check the server is reachable.
    pub async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Closes every pooled connection and waits for them to shut down.
    pub async fn close(self) {
        self.pool.close().await;
        info!("Database handle for {} closed", self.redacted_target());
    }
}

impl fmt::Debug for DbHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbHandle")
            .field("target", &self.redacted_target())
            .finish()
    }
}
