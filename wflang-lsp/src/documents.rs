//! Open documents keyed by URI.
//!
//! Each entry is an immutable [`Document`] snapshot behind an `Arc`. Handlers
//! clone the `Arc` and drop the lock before running a query, so a concurrent
//! edit never changes a snapshot that is being read. Replacing or closing an
//! entry cancels the outgoing snapshot so walks still running on it stop early.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tower_lsp::lsp_types::Url;
use tracing::debug;
use wflang_analysis::Document;

#[derive(Default)]
pub struct DocumentStore {
    entries: RwLock<HashMap<Url, Arc<Document>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyze `text` and store it for `uri`, replacing any previous snapshot.
    pub async fn open(&self, uri: Url, text: String) -> Arc<Document> {
        self.upsert(uri, text).await
    }

    /// Same as [`open`](Self::open); full sync means every change carries the
    /// whole text.
    pub async fn change(&self, uri: Url, text: String) -> Arc<Document> {
        self.upsert(uri, text).await
    }

    pub async fn close(&self, uri: &Url) {
        if let Some(previous) = self.entries.write().await.remove(uri) {
            previous.cancel();
        }
    }

    pub async fn get(&self, uri: &Url) -> Option<Arc<Document>> {
        self.entries.read().await.get(uri).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn upsert(&self, uri: Url, text: String) -> Arc<Document> {
        // Analysis runs before the write lock is taken.
        let document = Arc::new(Document::new(text));
        debug!(
            uri = %uri,
            errors = document.errors().len(),
            variables = document.variables().len(),
            "stored document"
        );
        let previous = self
            .entries
            .write()
            .await
            .insert(uri, Arc::clone(&document));
        if let Some(previous) = previous {
            previous.cancel();
        }
        document
    }
}
