//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! The discovery pipeline runs once a day. Errors are logged and the
//! scheduler keeps going; a failed run is simply retried at the next tick,
//! and URL dedup keeps re-runs from double-staging anything already
//! persisted.

use anyhow::Result;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::discovery::activities::run_discovery;
use crate::kernel::ServerDeps;

/// Start all scheduled tasks
pub async fn start_scheduler(deps: Arc<ServerDeps>) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    // Daily discovery run at 03:00 UTC
    let discovery_deps = deps.clone();
    let discovery_job = Job::new_async("0 0 3 * * *", move |_uuid, _lock| {
        let deps = discovery_deps.clone();
        Box::pin(async move {
            match run_discovery("scheduled", &deps).await {
                Ok(summary) => {
                    tracing::info!(
                        discovered = summary.discovered,
                        queries_processed = summary.queries_processed,
                        "Scheduled discovery run finished"
                    );
                }
                Err(e) => {
                    tracing::error!("Scheduled discovery run failed: {}", e);
                }
            }
        })
    })?;

    scheduler.add(discovery_job).await?;
    scheduler.start().await?;

    tracing::info!("Scheduled tasks started (discovery daily at 03:00 UTC)");
    Ok(scheduler)
}
