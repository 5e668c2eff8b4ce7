// src/models/mod.rs

//! Domain models for the notification service.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod progress;
mod settings;
mod user;

// Re-export all public types
pub use progress::{
    CalendarData, ProfileData, ProgressRecord, RECENT_PROBLEMS_LIMIT, RecentSubmission,
    SubmissionDetail,
};
pub use settings::{
    AuthConfig, EmailConfig, LeetCodeConfig, LoggingConfig, ServerConfig, Settings,
    StorageConfig,
};
pub use user::{UserRecord, UsersDocument, is_valid_email};
