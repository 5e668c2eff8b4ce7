//! Service layer for the notification service.
//!
//! This module contains the business logic for:
//! - LeetCode statistics fetching (`LeetCodeClient`)
//! - Progress aggregation (`ProgressAggregator`)
//! - Digest rendering (`format_digest`)
//! - Email delivery (`EmailDispatcher`, `ResendClient`)

mod digest;
mod email;
mod leetcode;
mod progress;

pub use digest::{DIGEST_TITLE, format_digest};
pub use email::{
    DeliveryOutcome, DeliveryStatus, DispatchReport, EmailDispatcher, EmailMessage, EmailSender,
    ResendClient,
};
pub use leetcode::{LeetCodeApi, LeetCodeClient};
pub use progress::ProgressAggregator;
