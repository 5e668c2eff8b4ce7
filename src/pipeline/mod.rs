//! Pipeline entry points.
//!
//! - `run_update`: fetch progress for every user and email the digest

pub mod update;

pub use update::{RUNS_TARGET, UpdateSummary, run_update};
