use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::StorageConfig;
use crate::filter::FilterError;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Stored document is malformed: {0}")]
    Document(#[from] serde_json::Error),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

/// Unique-constraint violations become `DuplicateKey`; everything else stays a driver error.
impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            if db.code().as_deref() == Some("23505") {
                let constraint = db.constraint().unwrap_or("unique").to_string();
                return DatabaseError::DuplicateKey(constraint);
            }
        }
        DatabaseError::Sqlx(err)
    }
}

impl DatabaseError {
    /// True when the store could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)
                | DatabaseError::Sqlx(sqlx::Error::PoolClosed)
                | DatabaseError::Sqlx(sqlx::Error::Io(_))
        )
    }
}

/// Owns the PostgreSQL connection pool for the lifetime of the process.
///
/// Built once at startup and handed to the repository; there is no global
/// handle.
#[derive(Clone)]
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn connect(config: &StorageConfig) -> Result<Self, DatabaseError> {
        let database_url = config
            .database_url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let redacted = redact_url(database_url)?;

        info!("Connecting to database: {}", redacted);
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(database_url)
            .await?;

        info!("Database connected: {}", redacted);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

/// Connection string with the password replaced, safe for logs.
pub fn redact_url(database_url: &str) -> Result<String, DatabaseError> {
    let mut url = url::Url::parse(database_url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    if url.password().is_some() {
        url.set_password(Some("****")).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    }
    Ok(url.into())
}
