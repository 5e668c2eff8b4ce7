// src/services/progress.rs

//! Progress aggregation service.
//!
//! Fetches profile and calendar for every tracked user and maps them into
//! [`ProgressRecord`]s. One failing user aborts the whole run: a digest is
//! either complete or not produced at all.

use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};

use crate::error::Result;
use crate::models::{ProgressRecord, UserRecord};
use crate::services::LeetCodeApi;

/// Service building progress records from the LeetCode API.
#[derive(Clone)]
pub struct ProgressAggregator {
    api: Arc<dyn LeetCodeApi>,
    max_concurrent: usize,
}

impl ProgressAggregator {
    /// Create an aggregator over the given API with bounded fan-out.
    pub fn new(api: Arc<dyn LeetCodeApi>, max_concurrent: usize) -> Self {
        Self {
            api,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Build one record per user, in input order.
    ///
    /// Users are fetched concurrently but results keep the order of `users`.
    /// The first error is returned and in-flight requests are dropped.
    pub async fn get_progress(&self, users: &[UserRecord]) -> Result<Vec<ProgressRecord>> {
        tracing::info!("Fetching progress for {} users", users.len());

        let usernames: Vec<String> = users
            .iter()
            .map(|user| user.leetcode_username.clone())
            .collect();

        let api = Arc::clone(&self.api);
        let records: Vec<ProgressRecord> = stream::iter(usernames)
            .map(move |username| fetch_user(Arc::clone(&api), username))
            .buffered(self.max_concurrent)
            .try_collect()
            .await
            .inspect_err(|e| tracing::error!("Progress aggregation aborted: {e}"))?;

        tracing::info!("Fetched progress for {} users", records.len());
        Ok(records)
    }
}

async fn fetch_user(api: Arc<dyn LeetCodeApi>, username: String) -> Result<ProgressRecord> {
    let (profile, calendar) = tokio::try_join!(
        api.get_user_profile(&username),
        api.get_user_calendar(&username),
    )?;

    let record = ProgressRecord::from_upstream(username, &profile, &calendar);
    tracing::debug!(
        "{}: {} solved, {} day streak",
        record.username,
        record.solved_count,
        record.current_streak
    );
    Ok(record)
}
