//! Assembling a pipeline from configuration.

use crate::{
    Credentials, Pipeline, PostGenerator, StateRepository, StatisticsProvider, StatpostConfig,
    StorageBackend,
};
use statpost_error::StatpostResult;
use statpost_interface::{DocumentStore, SocialPlatform};
use statpost_models::{OpenAiDriver, PerplexityDriver};
use statpost_social::TwitterPlatform;
use statpost_storage::{FileSystemStore, MemoryStore};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Open the configured document store.
///
/// # Errors
///
/// Returns error if the backend cannot be opened, or is `s3` in a build
/// without the `s3` feature.
#[instrument(skip(config), fields(backend = %config.storage.backend))]
pub async fn open_store(config: &StatpostConfig) -> StatpostResult<Arc<dyn DocumentStore>> {
    let storage = &config.storage;
    let store: Arc<dyn DocumentStore> = match storage.backend {
        StorageBackend::Filesystem => Arc::new(FileSystemStore::new(storage.root.clone())?),
        StorageBackend::Memory => {
            warn!("Using in-memory storage, state is discarded when the process exits");
            Arc::new(MemoryStore::new())
        }
        #[cfg(feature = "s3")]
        StorageBackend::S3 => Arc::new(
            statpost_storage::S3Store::new(statpost_storage::S3Settings {
                bucket: storage.bucket.clone(),
                region: storage.region.clone(),
                endpoint_url: storage.endpoint_url.clone(),
            })
            .await?,
        ),
        #[cfg(not(feature = "s3"))]
        StorageBackend::S3 => {
            return Err(statpost_error::ConfigError::new(
                "storage.backend is s3 but this build has no s3 support",
            )
            .into());
        }
    };
    Ok(store)
}

/// Publisher for this run, if publishing is enabled and credentials are complete.
///
/// # Errors
///
/// Returns error if the HTTP client cannot be built.
pub fn open_publisher(
    config: &StatpostConfig,
    credentials: &Credentials,
) -> StatpostResult<Option<Arc<dyn SocialPlatform>>> {
    if !config.publish.enabled {
        info!("Publishing disabled by configuration");
        return Ok(None);
    }
    let Some(publish_credentials) = credentials.publish_credentials() else {
        warn!(
            missing = ?credentials.missing_publish(),
            "Publishing credentials are not fully set, posts will not be sent"
        );
        return Ok(None);
    };
    let platform = TwitterPlatform::new(
        publish_credentials,
        config.publish.base_url.clone(),
        config.http.timeout(),
    )?;
    Ok(Some(Arc::new(platform)))
}

impl Pipeline {
    /// Build every component from configuration and credentials.
    ///
    /// # Errors
    ///
    /// Returns [`statpost_error::ConfigError`] when an API key is missing, and any error
    /// from opening the store or building clients.
    #[instrument(skip_all)]
    pub async fn from_config(
        config: &StatpostConfig,
        credentials: &Credentials,
    ) -> StatpostResult<Self> {
        let timeout = config.http.timeout();

        let knowledge = PerplexityDriver::new(
            credentials.require_perplexity_key()?,
            config.statistics.model.clone(),
            config.statistics.base_url.clone(),
            timeout,
        )?;
        let writer = OpenAiDriver::new(
            credentials.require_openai_key()?,
            config.generation.model.clone(),
            config.generation.base_url.clone(),
            timeout,
        )?;

        let store = open_store(config).await?;
        let state = StateRepository::new(
            store,
            config.storage.statistics_key.clone(),
            config.storage.history_key.clone(),
        );

        let provider = StatisticsProvider::new(Arc::new(knowledge), config.statistics.clone());
        let generator =
            PostGenerator::new(Arc::new(writer), config.generation.clone(), config.topic.clone());
        let publisher = open_publisher(config, credentials)?;

        Ok(Self::new(config.topic.clone(), provider, generator, state, publisher)
            .with_policy(config.selection.strategy.policy())
            .with_resume_failed(config.publish.resume_failed)
            .with_max_attempts(config.publish.max_attempts)
            .with_max_history(config.history.max_entries))
    }
}
