//! Shared fakes and helpers for unit tests. Only compiled under `cfg(test)`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::error::{AppError, Result};
use crate::models::{CalendarData, ProfileData};
use crate::services::{EmailMessage, EmailSender, LeetCodeApi};

/// Serve `app` on an ephemeral loopback port and return its base URL.
pub async fn spawn_stub(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

/// In-memory LeetCode API keyed by username. Unknown users are `NotFound`.
#[derive(Default)]
pub struct FakeLeetCode {
    profiles: HashMap<String, Value>,
    calendars: HashMap<String, Value>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeLeetCode {
    pub fn with_user(mut self, username: &str, profile: Value, calendar: Value) -> Self {
        self.profiles.insert(username.to_string(), profile);
        self.calendars.insert(username.to_string(), calendar);
        self
    }

    pub fn profile_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LeetCodeApi for FakeLeetCode {
    async fn get_user_profile(&self, username: &str) -> Result<ProfileData> {
        self.calls.lock().unwrap().push(username.to_string());
        let value = self
            .profiles
            .get(username)
            .ok_or_else(|| AppError::not_found(username))?;
        Ok(serde_json::from_value(value.clone())?)
    }

    async fn get_user_calendar(&self, username: &str) -> Result<CalendarData> {
        let value = self.calendars.get(username).cloned().unwrap_or(json!({}));
        Ok(serde_json::from_value(value)?)
    }
}

/// Records every send attempt and fails for the listed recipients.
#[derive(Default)]
pub struct RecordingSender {
    fail_for: Vec<String>,
    pub attempts: Mutex<Vec<EmailMessage>>,
}

impl RecordingSender {
    pub fn failing_for(recipients: &[&str]) -> Self {
        Self {
            fail_for: recipients.iter().map(|r| r.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Recipients attempted so far, in attempt order.
    pub fn attempted(&self) -> Vec<String> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.to.clone())
            .collect()
    }
}

#[async_trait]
impl EmailSender for RecordingSender {
    async fn send(&self, message: &EmailMessage) -> Result<String> {
        self.attempts.lock().unwrap().push(message.clone());
        if self.fail_for.contains(&message.to) {
            return Err(AppError::email(&message.to, "mailbox on fire"));
        }
        Ok(format!("id-{}", message.to))
    }
}
