use std::collections::HashMap;

use async_trait::async_trait;
use log::trace;
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Content store unavailable: {}", _0)]
    Unavailable(String),
}

// The full note body; only its opaque ref ever reaches the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteContent {
    pub title: String,
    pub body: String,
}

/// Where note bodies live.
///
/// The ledger stores a content-addressed pointer only; resolving it goes
/// through this capability.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn put(&self, content: NoteContent) -> Result<String, ContentError>;

    async fn get(&self, content_ref: &str) -> Result<Option<NoteContent>, ContentError>;
}

// In-memory store minting content-addressed-looking refs.
// Good enough for development and tests until a real pinning service is
// wired in.
#[derive(Default)]
pub struct MemoryContentStore {
    entries: Mutex<HashMap<String, NoteContent>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn put(&self, content: NoteContent) -> Result<String, ContentError> {
        let content_ref = mint_content_ref();
        trace!("put content as {}", content_ref);
        self.entries
            .lock()
            .await
            .insert(content_ref.clone(), content);
        Ok(content_ref)
    }

    async fn get(&self, content_ref: &str) -> Result<Option<NoteContent>, ContentError> {
        trace!("get content {}", content_ref);
        Ok(self.entries.lock().await.get(content_ref).cloned())
    }
}

fn mint_content_ref() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(44)
        .map(char::from)
        .collect();
    format!("Qm{}", suffix)
}
