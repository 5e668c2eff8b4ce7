// src/models/progress.rs

//! Upstream LeetCode payloads and the progress record derived from them.

use serde::{Deserialize, Serialize};

/// Number of recent submissions carried into a progress record.
pub const RECENT_PROBLEMS_LIMIT: usize = 5;

/// Public profile returned by `/userProfile/{username}`.
///
/// Only the fields the digest needs are modelled; everything else is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    #[serde(default)]
    pub total_solved: Option<u64>,

    /// Most recent first, as the API returns them
    #[serde(default, alias = "recentSubmissions")]
    pub recent_submission_list: Option<Vec<RecentSubmission>>,

    /// Present when the API reports an unknown user with a success status
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}

impl ProfileData {
    /// Whether the payload describes a missing user.
    pub fn is_error(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_null())
    }
}

/// A single recent submission.
///
/// Accepts either a bare title or the detailed object the API emits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecentSubmission {
    Title(String),
    Detailed(SubmissionDetail),
}

/// Submission object as the API emits it. Only the title is kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmissionDetail {
    pub title: String,
}

impl RecentSubmission {
    /// Text shown for this submission in the digest.
    pub fn label(&self) -> &str {
        match self {
            RecentSubmission::Title(title) => title,
            RecentSubmission::Detailed(detail) => &detail.title,
        }
    }
}

/// Yearly activity calendar returned by `/userProfileCalendar`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarData {
    #[serde(default)]
    pub streak: Option<u64>,
}

/// One user's progress, rebuilt from live data on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub username: String,
    pub solved_count: u64,
    pub recent_problems: Vec<String>,
    pub current_streak: u64,
}

impl ProgressRecord {
    /// Map upstream payloads into a record, defaulting absent fields to zero/empty.
    pub fn from_upstream(
        username: impl Into<String>,
        profile: &ProfileData,
        calendar: &CalendarData,
    ) -> Self {
        let recent_problems = profile
            .recent_submission_list
            .as_deref()
            .unwrap_or_default()
            .iter()
            .take(RECENT_PROBLEMS_LIMIT)
            .map(|submission| submission.label().to_string())
            .collect();

        Self {
            username: username.into(),
            solved_count: profile.total_solved.unwrap_or(0),
            recent_problems,
            current_streak: calendar.streak.unwrap_or(0),
        }
    }
}
