use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

// SQLSTATE codes treated as "the write was rejected by the schema"
const NOT_NULL_VIOLATION: &str = "23502";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";
const CHECK_VIOLATION: &str = "23514";

/// Errors from the repository layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Record not found")]
    NotFound,

    /// Foreign key, unique, check or not-null violation
    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl DatabaseError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DatabaseError::Constraint(detail) if detail.starts_with(UNIQUE_VIOLATION))
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = err {
            return DatabaseError::NotFound;
        }
        match constraint_detail(&err) {
            Some(detail) => DatabaseError::Constraint(detail),
            None => DatabaseError::Sqlx(err),
        }
    }
}

fn constraint_detail(err: &sqlx::Error) -> Option<String> {
    let db_err = err.as_database_error()?;
    let code = db_err.code()?;
    match code.as_ref() {
        NOT_NULL_VIOLATION | FOREIGN_KEY_VIOLATION | UNIQUE_VIOLATION | CHECK_VIOLATION => {
            let constraint = db_err.constraint().unwrap_or("unnamed");
            Some(format!("{code} {constraint}: {}", db_err.message()))
        }
        _ => None,
    }
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
}

/// Open the pool and make sure the server answers
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let pool = pool_options(config).connect(&config.url).await?;
    info!(max_connections = config.max_connections, "Created database pool");
    Ok(pool)
}

/// Pool that opens connections on first use
pub fn connect_lazy(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    Ok(pool_options(config).connect_lazy(&config.url)?)
}

/// Pings the pool to ensure connectivity
pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
