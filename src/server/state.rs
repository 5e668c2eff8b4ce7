//! Shared application state for request handlers.

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{AuthConfig, Settings};
use crate::services::{EmailDispatcher, LeetCodeClient, ProgressAggregator, ResendClient};
use crate::storage::{UserStore, YamlUserStore};

/// Shared handler state. Every collaborator is injected, never global.
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub aggregator: ProgressAggregator,
    pub dispatcher: EmailDispatcher,
    pub auth: AuthConfig,
}

impl AppState {
    /// Assemble production clients from settings.
    pub fn from_settings(settings: &Settings) -> Result<Arc<Self>> {
        let store = YamlUserStore::new(Path::new(&settings.storage.users_file));
        let leetcode = LeetCodeClient::new(&settings.leetcode)?;
        let resend = ResendClient::new(&settings.email)?;

        Ok(Arc::new(Self {
            store: Arc::new(store),
            aggregator: ProgressAggregator::new(
                Arc::new(leetcode),
                settings.leetcode.max_concurrent,
            ),
            dispatcher: EmailDispatcher::new(Arc::new(resend), &settings.email),
            auth: settings.auth.clone(),
        }))
    }
}
