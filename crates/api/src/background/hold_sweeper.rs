//! Periodic sweep of expired booking holds.
//!
//! Spawns a background task that transitions ACTIVE holds past their TTL to
//! EXPIRED. Liveness is already derived at every read (see
//! `booking::holds::get_hold`), so the sweep only persists that fact
//! for rows nobody is reading. Runs on a fixed interval using
//! `tokio::time::interval`; repeated runs are no-ops.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::booking::holds::cleanup_expired_holds;

/// Run the expired-hold sweep loop until `cancel` is triggered.
pub async fn run(pool: PgPool, interval: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = interval.as_secs(), "Hold sweeper started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Hold sweeper stopping");
                break;
            }
            _ = ticker.tick() => {
                match cleanup_expired_holds(&pool).await {
                    Ok(expired) => {
                        if expired > 0 {
                            tracing::info!(expired, "Hold sweeper: expired overdue holds");
                        } else {
                            tracing::debug!("Hold sweeper: nothing to expire");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Hold sweeper: sweep failed");
                    }
                }
            }
        }
    }
}
