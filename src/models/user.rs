// src/models/user.rs

//! Tracked users and the document they are persisted in.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("email pattern is valid")
});

/// Check that a string looks like a deliverable email address.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, _)) = email.split_once('@') else {
        return false;
    };
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    email.len() <= 254 && EMAIL_PATTERN.is_match(email)
}

/// A LeetCode account paired with the address that receives the digest.
///
/// The same username may appear more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserRecord {
    pub leetcode_username: String,
    pub email: String,
}

impl UserRecord {
    pub fn new(leetcode_username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            leetcode_username: leetcode_username.into(),
            email: email.into(),
        }
    }

    /// Reject blank usernames and malformed email addresses.
    pub fn validate(&self) -> Result<()> {
        if self.leetcode_username.trim().is_empty() {
            return Err(AppError::validation("leetcode_username must not be empty"));
        }
        if !is_valid_email(&self.email) {
            return Err(AppError::validation(format!(
                "'{}' is not a valid email address",
                self.email
            )));
        }
        Ok(())
    }
}

/// The persisted users document: `{users: [...]}` and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsersDocument {
    pub users: Vec<UserRecord>,
}

impl UsersDocument {
    /// Validate every record, naming the first offending entry.
    pub fn validate(&self) -> Result<()> {
        for (index, user) in self.users.iter().enumerate() {
            user.validate()
                .map_err(|e| AppError::validation(format!("users[{index}]: {e}")))?;
        }
        Ok(())
    }

    /// Addresses of every tracked user, in file order.
    pub fn recipients(&self) -> Vec<String> {
        self.users.iter().map(|u| u.email.clone()).collect()
    }
}
