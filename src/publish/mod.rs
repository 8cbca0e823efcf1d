//! Publishing generated documents to the remote document store.

pub mod dropbox;

use anyhow::Context as _;

use crate::config::{ExecutionMode, ExportConfig};

pub use dropbox::DropboxStore;

pub trait DocumentStore {
    /// Creates or overwrites the document at the absolute `/`-separated `path`.
    fn upload(&self, path: &str, bytes: &[u8]) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Local-write mode; the document only lives on disk.
    Local,
    /// Remote mode without a document store token.
    Disabled,
    Published,
}

pub struct Publisher {
    mode: ExecutionMode,
    store: Option<Box<dyn DocumentStore>>,
}

impl Publisher {
    pub fn new(mode: ExecutionMode, store: Option<Box<dyn DocumentStore>>) -> Self {
        Self { mode, store }
    }

    pub fn from_config(config: &ExportConfig) -> anyhow::Result<Self> {
        let store: Option<Box<dyn DocumentStore>> = match &config.dropbox {
            Some(dropbox) if config.mode == ExecutionMode::RemotePublish => Some(Box::new(
                DropboxStore::new(dropbox).context("build dropbox client")?,
            )),
            _ => None,
        };
        Ok(Self::new(config.mode, store))
    }

    /// Sends `content` to `/{path}`. `path` is relative and `/`-separated.
    pub fn publish(&self, path: &str, content: &str) -> anyhow::Result<PublishOutcome> {
        if self.mode == ExecutionMode::LocalWrite {
            return Ok(PublishOutcome::Local);
        }
        let Some(store) = &self.store else {
            tracing::debug!(path, "document store not configured; publish skipped");
            return Ok(PublishOutcome::Disabled);
        };

        let remote_path = format!("/{}", path.trim_start_matches('/'));
        store
            .upload(&remote_path, content.as_bytes())
            .with_context(|| format!("publish {remote_path}"))?;
        tracing::info!(path = %remote_path, bytes = content.len(), "published document");
        Ok(PublishOutcome::Published)
    }
}
