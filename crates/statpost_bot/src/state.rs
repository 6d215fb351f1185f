//! Persisted bot state.

use statpost_core::{PostHistory, StatisticsDocument};
use statpost_error::StatpostResult;
use statpost_interface::DocumentStore;
use statpost_storage::{load_document, save_document};
use std::sync::Arc;
use tracing::instrument;

/// Reads and writes the statistics document and the post history.
#[derive(Clone)]
pub struct StateRepository {
    store: Arc<dyn DocumentStore>,
    statistics_key: String,
    history_key: String,
}

impl StateRepository {
    /// Repository over `store` using the given keys.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        statistics_key: impl Into<String>,
        history_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            statistics_key: statistics_key.into(),
            history_key: history_key.into(),
        }
    }

    /// Backing store name.
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Load the statistics document; a missing one is empty.
    #[instrument(skip(self), fields(key = %self.statistics_key))]
    pub async fn load_statistics(&self) -> StatpostResult<StatisticsDocument> {
        load_document(self.store.as_ref(), &self.statistics_key).await
    }

    /// Replace the statistics document.
    #[instrument(skip(self, document), fields(key = %self.statistics_key))]
    pub async fn save_statistics(&self, document: &StatisticsDocument) -> StatpostResult<()> {
        save_document(self.store.as_ref(), &self.statistics_key, document).await
    }

    /// Load the post history; anything but an array reads as empty.
    #[instrument(skip(self), fields(key = %self.history_key))]
    pub async fn load_history(&self) -> StatpostResult<PostHistory> {
        let value = self.store.load(&self.history_key).await?;
        Ok(PostHistory::from_value(value))
    }

    /// Replace the post history.
    #[instrument(skip(self, history), fields(key = %self.history_key, records = history.len()))]
    pub async fn save_history(&self, history: &PostHistory) -> StatpostResult<()> {
        save_document(self.store.as_ref(), &self.history_key, history).await
    }
}
