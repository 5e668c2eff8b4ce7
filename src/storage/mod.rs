//! Storage abstractions for the tracked-users list.
//!
//! The whole list lives in one YAML document:
//!
//! ```text
//! users:
//!   - leetcode_username: alice
//!     email: alice@example.com
//!   - leetcode_username: bob
//!     email: bob@example.com
//! ```
//!
//! Every mutation reads the full document and rewrites it. There is no
//! locking between concurrent `load`/`save` pairs, so two requests adding
//! users at the same moment can lose one of the additions (last writer wins).

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{UserRecord, UsersDocument};

// Re-export for convenience
pub use local::YamlUserStore;

/// Trait for users-list storage backends.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Read and validate the full document. A missing backing file is an empty list.
    async fn load(&self) -> Result<UsersDocument>;

    /// Overwrite the backing file with `doc`.
    async fn save(&self, doc: &UsersDocument) -> Result<()>;

    /// Append one record and persist the result.
    ///
    /// Duplicate usernames are kept.
    async fn add_user(&self, user: UserRecord) -> Result<UsersDocument> {
        user.validate()?;
        let mut doc = self.load().await?;
        doc.users.push(user);
        self.save(&doc).await?;
        Ok(doc)
    }
}
