//! Local filesystem storage implementation.
//!
//! `save` truncates and rewrites the file in place. A crash in the middle of a
//! write can leave a partial document behind, which the next `load` rejects.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::UsersDocument;
use crate::storage::UserStore;

/// YAML file backend for the users list.
#[derive(Debug, Clone)]
pub struct YamlUserStore {
    path: PathBuf,
}

impl YamlUserStore {
    /// Create a store backed by the given file. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Parse and validate a document.
    fn parse(&self, bytes: &[u8]) -> Result<UsersDocument> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(UsersDocument::default());
        }

        let doc: UsersDocument = serde_yaml::from_slice(bytes).map_err(|e| {
            AppError::validation(format!(
                "{} does not match the users schema: {e}",
                self.path.display()
            ))
        })?;
        doc.validate()?;
        Ok(doc)
    }
}

#[async_trait]
impl UserStore for YamlUserStore {
    async fn load(&self) -> Result<UsersDocument> {
        match self.read_bytes().await? {
            Some(bytes) => self.parse(&bytes),
            None => {
                tracing::debug!("No users file at {}, starting empty", self.path.display());
                Ok(UsersDocument::default())
            }
        }
    }

    async fn save(&self, doc: &UsersDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let yaml = serde_yaml::to_string(doc)?;
        tokio::fs::write(&self.path, yaml).await?;
        tracing::info!(
            "Saved {} users to {}",
            doc.users.len(),
            self.path.display()
        );
        Ok(())
    }
}
