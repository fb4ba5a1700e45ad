use crate::listing::ListingStatus;
use crate::repository::ListingRepository;
use chrono::{Duration, Utc};
use openex_core::StoreResult;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Background maintenance settings. Defaults match the original deployment:
/// listings pending for 24 h are auto-approved, rejected listings are kept
/// for 24 h before being purged, and the sweep runs hourly.
#[derive(Debug, Clone)]
pub struct JanitorConfig {
    pub rejected_retention: Duration,
    pub pending_wait: Duration,
    pub tick: std::time::Duration,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            rejected_retention: Duration::hours(24),
            pending_wait: Duration::hours(24),
            tick: std::time::Duration::from_secs(3600),
        }
    }
}

/// Purge rejected listings whose last update is older than the retention
/// window. Returns the number of listings removed.
pub async fn sweep_rejected(
    repo: &dyn ListingRepository,
    retention: Duration,
) -> StoreResult<usize> {
    let cutoff = Utc::now() - retention;
    let stale: Vec<Uuid> = repo
        .list_with_status(ListingStatus::Rejected)
        .await?
        .into_iter()
        .filter(|listing| listing.updated_at < cutoff)
        .map(|listing| listing.id)
        .collect();

    for id in &stale {
        repo.delete_listing(*id).await?;
    }
    if !stale.is_empty() {
        info!("purged {} rejected listings past retention", stale.len());
    }

    Ok(stale.len())
}

/// Approve listings that have sat in `pending` longer than the wait period.
/// Returns the number of listings approved.
pub async fn sweep_pending(repo: &dyn ListingRepository, wait: Duration) -> StoreResult<usize> {
    let cutoff = Utc::now() - wait;
    let mut approved = 0;

    for mut listing in repo.list_with_status(ListingStatus::Pending).await? {
        if listing.created_at < cutoff {
            listing.update_status(ListingStatus::Approved);
            repo.save_listing(&listing).await?;
            info!(listing_id = %listing.id, "auto-approved listing pending past wait period");
            approved += 1;
        }
    }

    Ok(approved)
}

/// Run both sweeps on a fixed interval. Sweep failures are logged and retried
/// on the next tick; the task never exits on its own.
pub fn spawn(
    repo: Arc<dyn ListingRepository>,
    config: JanitorConfig,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(config.tick);
        info!(
            "janitor started: auto-approve after {}h, purge rejected after {}h",
            config.pending_wait.num_hours(),
            config.rejected_retention.num_hours()
        );

        loop {
            interval.tick().await;
            if let Err(e) = sweep_pending(repo.as_ref(), config.pending_wait).await {
                error!("pending sweep failed: {}", e);
            }
            if let Err(e) = sweep_rejected(repo.as_ref(), config.rejected_retention).await {
                error!("retention sweep failed: {}", e);
            }
        }
    })
}
