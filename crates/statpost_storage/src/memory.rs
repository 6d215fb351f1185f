//! In-process document store.

use async_trait::async_trait;
use serde_json::Value;
use statpost_error::StatpostResult;
use statpost_interface::DocumentStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::empty_document;

/// Document store backed by a shared in-memory map.
///
/// Clones share the same map, so a test can hand one clone to the pipeline
/// and inspect the other afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one document.
    pub fn with_document(self, key: impl Into<String>, document: Value) -> Self {
        // Freshly created map, nobody else can hold the lock yet.
        if let Ok(mut documents) = self.documents.try_write() {
            documents.insert(key.into(), document);
        }
        self
    }

    /// Raw document at `key`, without the empty-document substitution.
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.documents.read().await.get(key).cloned()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    #[tracing::instrument(skip(self))]
    async fn load(&self, key: &str) -> StatpostResult<Value> {
        let documents = self.documents.read().await;
        match documents.get(key) {
            Some(document) => Ok(document.clone()),
            None => {
                tracing::debug!("Key not found, returning empty document");
                Ok(empty_document())
            }
        }
    }

    #[tracing::instrument(skip(self, document))]
    async fn save(&self, key: &str, document: &Value) -> StatpostResult<()> {
        self.documents
            .write()
            .await
            .insert(key.to_string(), document.clone());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
