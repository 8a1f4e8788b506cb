use std::time::Duration;

use tokio::{sync::broadcast, time::MissedTickBehavior};

use crate::{DbPool, config::WorkerConfig, database, error::Result, queries::revoked_tokens};

/// Periodically forgets consumed refresh tokens whose JWT expiry has passed.
///
/// Such tokens are rejected on expiry alone, so their hashes no longer need
/// to be kept. Runs until `shutdown` fires; a failed pass is logged and
/// retried on the next tick.
pub async fn revoked_token_cleanup_worker(pool: DbPool, config: WorkerConfig, mut shutdown: broadcast::Receiver<()>) {
    let period = Duration::from_secs(config.cleanup_interval_seconds);
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(interval_seconds = period.as_secs(), "Revoked token cleanup started");

    loop {
        tokio::select! {
            _ = shutdown.recv() => break,
            _ = ticker.tick() => {
                match purge_once(&pool).await {
                    Ok(0) => {}
                    Ok(removed) => tracing::info!(removed, "Purged expired revoked refresh tokens"),
                    Err(e) => tracing::warn!(error = %e, "Revoked token purge failed"),
                }
            }
        }
    }

    tracing::info!("Revoked token cleanup stopped");
}

async fn purge_once(pool: &DbPool) -> Result<u64> {
    let mut conn = database::acquire(pool).await?;
    revoked_tokens::delete_expired_revoked_tokens(&mut conn).await
}
