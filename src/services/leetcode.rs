// src/services/leetcode.rs

//! LeetCode statistics API client.
//!
//! Talks to an alfa-leetcode-api compatible service:
//! - `GET {base}/userProfile/{username}`
//! - `GET {base}/userProfileCalendar?username={username}&year={year}`
//!
//! Both endpoints go through the same status check: 404 means the user does
//! not exist, any other non-success status is an upstream error. Nothing is
//! retried or cached.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{CalendarData, LeetCodeConfig, ProfileData};
use crate::utils::http::{create_async_client, error_body};
use crate::utils::url::endpoint;

/// Source of per-user LeetCode statistics.
#[async_trait]
pub trait LeetCodeApi: Send + Sync {
    /// Fetch the public profile for `username`.
    async fn get_user_profile(&self, username: &str) -> Result<ProfileData>;

    /// Fetch the activity calendar for `username` for the current year.
    async fn get_user_calendar(&self, username: &str) -> Result<CalendarData>;
}

/// HTTP client for the LeetCode statistics API.
#[derive(Debug, Clone)]
pub struct LeetCodeClient {
    client: Client,
    base_url: String,
}

impl LeetCodeClient {
    /// Create a client from settings.
    pub fn new(config: &LeetCodeConfig) -> Result<Self> {
        let client = create_async_client(&config.user_agent, config.timeout_secs)?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn profile_url(&self, username: &str) -> Result<Url> {
        endpoint(&self.base_url, &["userProfile", username])
    }

    fn calendar_url(&self, username: &str, year: i32) -> Result<Url> {
        let mut url = endpoint(&self.base_url, &["userProfileCalendar"])?;
        url.query_pairs_mut()
            .append_pair("username", username)
            .append_pair("year", &year.to_string());
        Ok(url)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: Url, username: &str) -> Result<T> {
        tracing::debug!("GET {url}");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            tracing::warn!("LeetCode user {username} not found at {}", url.path());
            return Err(AppError::not_found(username));
        }
        if !status.is_success() {
            let body = error_body(response).await;
            tracing::warn!("{} answered {status} for {username}", url.path());
            return Err(AppError::upstream(url.path(), status.as_u16(), body));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl LeetCodeApi for LeetCodeClient {
    async fn get_user_profile(&self, username: &str) -> Result<ProfileData> {
        let url = self.profile_url(username)?;
        let profile: ProfileData = self.fetch_json(url, username).await?;

        if profile.is_error() {
            tracing::warn!("LeetCode reported an error profile for {username}");
            return Err(AppError::not_found(username));
        }
        Ok(profile)
    }

    async fn get_user_calendar(&self, username: &str) -> Result<CalendarData> {
        let url = self.calendar_url(username, Utc::now().year())?;
        self.fetch_json(url, username).await
    }
}
