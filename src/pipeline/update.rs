// src/pipeline/update.rs

//! Progress update cycle: load users, aggregate, render, dispatch.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::services::{DeliveryStatus, EmailDispatcher, ProgressAggregator, format_digest};
use crate::storage::UserStore;

/// Log target for run-level outcomes, kept apart from per-request detail.
pub const RUNS_TARGET: &str = "leetmail::runs";

/// Aggregate result of one update cycle.
#[derive(Debug, Clone)]
pub struct UpdateSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub users: usize,
    pub emails_sent: usize,
    pub emails_failed: usize,
}

/// Run one update cycle.
///
/// Aggregation errors abort the cycle before any email is sent. Individual
/// send failures are logged and counted but never abort the cycle.
pub async fn run_update(
    store: &dyn UserStore,
    aggregator: &ProgressAggregator,
    dispatcher: &EmailDispatcher,
) -> Result<UpdateSummary> {
    let started_at = Utc::now();
    tracing::info!(target: RUNS_TARGET, "Update run started");

    let doc = store.load().await?;

    let progress = match aggregator.get_progress(&doc.users).await {
        Ok(progress) => progress,
        Err(e) => {
            tracing::error!(target: RUNS_TARGET, "Update run failed: {e}");
            return Err(e);
        }
    };

    let digest = format_digest(&progress);
    let report = dispatcher.dispatch(&digest, &doc.recipients()).await;
    for failure in report.failures() {
        if let DeliveryStatus::Failed { reason } = &failure.status {
            tracing::error!(
                target: RUNS_TARGET,
                "Digest not delivered to {}: {reason}",
                failure.recipient
            );
        }
    }

    let summary = UpdateSummary {
        started_at,
        finished_at: Utc::now(),
        users: doc.users.len(),
        emails_sent: report.sent(),
        emails_failed: report.failed(),
    };

    tracing::info!(
        target: RUNS_TARGET,
        "Update run finished: {} users, {} emails sent, {} failed in {}ms",
        summary.users,
        summary.emails_sent,
        summary.emails_failed,
        (summary.finished_at - summary.started_at).num_milliseconds()
    );
    Ok(summary)
}
