//! Connection management
//!
//! Every request checks a connection out of the shared pool and hands it back
//! when the guard drops. There is no long-lived shared connection.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::{
    Executor, Postgres,
    pool::PoolConnection,
    postgres::{PgConnectOptions, PgPoolOptions},
};

use crate::{
    config::Config,
    error::{Error, Result},
};

/// Database connection pool type
pub type DbPool = sqlx::PgPool;

/// Connection type taken by every query function. Pooled connections and
/// open transactions both deref to it, so pass `&mut conn` or `&mut tx`.
pub type DbConn = sqlx::PgConnection;

fn pool_options(config: &Config) -> PgPoolOptions {
    let statement_timeout_ms = config.database.statement_timeout_seconds * 1000;

    PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                conn.execute(format!("SET statement_timeout = {}", statement_timeout_ms).as_str())
                    .await?;
                Ok(())
            })
        })
}

fn connect_options(config: &Config) -> Result<PgConnectOptions> {
    config
        .connection_string()
        .expose_secret()
        .parse::<PgConnectOptions>()
        .map_err(|e| Error::Internal(format!("Invalid database connection string: {}", e)))
}

/// Opens the pool and verifies the database answers.
pub async fn connect(config: &Config) -> Result<DbPool> {
    let pool = pool_options(config)
        .connect_with(connect_options(config)?)
        .await?;

    tracing::info!(
        host = %config.database.host,
        database = %config.database_name(),
        max_connections = config.database.max_connections,
        "Database pool connected"
    );

    Ok(pool)
}

/// Builds the pool without opening a connection; the first checkout connects.
pub fn connect_lazy(config: &Config) -> Result<DbPool> {
    Ok(pool_options(config).connect_lazy_with(connect_options(config)?))
}

/// Checks a connection out of the pool.
///
/// The returned guard goes back to the pool when dropped. An unreachable
/// database or an exhausted pool is reported as `Unavailable`/`Timeout`.
pub async fn acquire(pool: &DbPool) -> Result<PoolConnection<Postgres>> {
    pool.acquire().await.map_err(|e| match Error::from(e) {
        Error::Sqlx(inner) => Error::Unavailable(format!("Failed to acquire database connection: {}", inner)),
        other => other,
    })
}

/// Cheap round-trip used by the health endpoint.
pub async fn ping(pool: &DbPool) -> bool {
    match acquire(pool).await {
        Ok(mut conn) => sqlx::query("SELECT 1").execute(conn.as_mut()).await.is_ok(),
        Err(_) => false,
    }
}

/// Closes every pooled connection. Called once at shutdown.
pub async fn close(pool: &DbPool) {
    pool.close().await;
    tracing::info!("Database pool closed");
}
