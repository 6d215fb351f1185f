//! One run of the bot: pick a statistic, write a post, publish it.

use crate::{PostGenerator, StateRepository, StatisticsProvider};
use derive_getters::Getters;
use serde::Serialize;
use statpost_core::{
    FirstUnused, PostHistory, PostRecord, PostStatus, SelectionPolicy, StatisticsDocument,
};
use statpost_error::{ProviderError, ProviderErrorKind, StatpostResult};
use statpost_interface::{PostId, SocialPlatform};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct RunReport {
    /// Statistic the post was written from, when known
    statistic: Option<String>,
    /// Post text
    post: String,
    /// Platform id, when published
    post_id: Option<PostId>,
    /// Final status of the post record
    status: PostStatus,
    /// Whether a new batch of statistics was fetched
    refilled: bool,
    /// Whether the run republished an earlier post instead of writing one
    resumed: bool,
}

/// Orchestrates provider, generator, state and publisher.
///
/// Every step runs in sequence and any failure ends the run. State written
/// before a failure stays written.
pub struct Pipeline {
    topic: String,
    provider: StatisticsProvider,
    generator: PostGenerator,
    state: StateRepository,
    publisher: Option<Arc<dyn SocialPlatform>>,
    policy: Box<dyn SelectionPolicy>,
    resume_failed: bool,
    max_attempts: u32,
    max_history: usize,
}

impl Pipeline {
    /// Pipeline with first-unused selection, resume enabled with three
    /// publish attempts per post, and a 500 record history cap.
    ///
    /// `publisher` is `None` when publishing is disabled or credentials are
    /// incomplete.
    pub fn new(
        topic: impl Into<String>,
        provider: StatisticsProvider,
        generator: PostGenerator,
        state: StateRepository,
        publisher: Option<Arc<dyn SocialPlatform>>,
    ) -> Self {
        Self {
            topic: topic.into(),
            provider,
            generator,
            state,
            publisher,
            policy: Box::new(FirstUnused),
            resume_failed: true,
            max_attempts: 3,
            max_history: 500,
        }
    }

    /// Use `policy` to pick statistics.
    pub fn with_policy(mut self, policy: Box<dyn SelectionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Enable or disable republishing of failed posts.
    pub fn with_resume_failed(mut self, resume_failed: bool) -> Self {
        self.resume_failed = resume_failed;
        self
    }

    /// Give up on a post after `max_attempts` failed publish attempts.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Keep at most `max_history` records; 0 keeps all.
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    /// Whether this pipeline will try to publish.
    pub fn publishes(&self) -> bool {
        self.publisher.is_some()
    }

    /// Execute one run.
    ///
    /// # Errors
    ///
    /// Returns the first failure of any step. When publishing fails the new
    /// record and the used statistic are already persisted and the record is
    /// marked failed, or rejected when retrying cannot help.
    #[instrument(skip(self), fields(topic = %self.topic, policy = self.policy.name(), backend = self.state.backend_name()))]
    pub async fn run(&self) -> StatpostResult<RunReport> {
        let mut history = self.state.load_history().await?;
        let mut statistics = self.state.load_statistics().await?;
        self.settle_last_statistic(&history, &mut statistics).await?;

        if self.resume_failed && self.publisher.is_some() {
            let (resume, attempts) = match history.last() {
                Some(record) if record.status().is_resumable() => {
                    (record.should_resume(self.max_attempts), Some(*record.attempts()))
                }
                _ => (false, None),
            };
            if resume {
                return self.resume(history).await;
            }
            if let Some(attempts) = attempts {
                warn!(attempts, "Abandoning earlier post after repeated publish failures");
            }
        }

        let mut refilled = false;

        if statistics.is_empty() {
            self.refill(&mut statistics).await?;
            refilled = true;
        }

        let statistic = match self.policy.select(&statistics) {
            Some(statistic) => statistic.to_string(),
            None => {
                info!("All statistics have been used, fetching new ones");
                self.refill(&mut statistics).await?;
                refilled = true;
                self.policy
                    .select(&statistics)
                    .map(str::to_string)
                    .ok_or_else(|| ProviderError::new(ProviderErrorKind::Empty))?
            }
        };
        info!(statistic = %statistic, "Selected statistic");

        let recent = history.recent_posts(self.generator.recent_posts());
        let post = self.generator.generate(&statistic, &recent).await?;

        let initial = if self.publisher.is_some() {
            PostStatus::Pending
        } else {
            PostStatus::Skipped
        };
        history.push(PostRecord::now(post.clone(), initial).with_statistic(statistic.clone()));
        history.truncate_oldest(self.max_history);
        self.state.save_history(&history).await?;

        statistics.mark_used(statistic.clone());
        self.state.save_statistics(&statistics).await?;

        let (post_id, status) = self.publish_latest(&mut history, &post).await?;

        Ok(RunReport {
            statistic: Some(statistic),
            post,
            post_id,
            status,
            refilled,
            resumed: false,
        })
    }

    async fn refill(&self, statistics: &mut StatisticsDocument) -> StatpostResult<()> {
        let fresh = self.provider.fetch(&self.topic).await?;
        statistics.refill(fresh);
        self.state.save_statistics(statistics).await
    }

    /// Mark the newest record's statistic used if an earlier run recorded the
    /// post but failed before saving the statistics document.
    async fn settle_last_statistic(
        &self,
        history: &PostHistory,
        statistics: &mut StatisticsDocument,
    ) -> StatpostResult<()> {
        let Some(statistic) = history.last().and_then(|record| record.statistic().as_deref())
        else {
            return Ok(());
        };
        let in_pool = statistics.statistics().iter().any(|s| s == statistic);
        if in_pool && !statistics.is_used(statistic) {
            warn!(statistic = %statistic, "Recorded post's statistic was not marked used, fixing");
            statistics.mark_used(statistic);
            self.state.save_statistics(statistics).await?;
        }
        Ok(())
    }

    async fn resume(&self, mut history: PostHistory) -> StatpostResult<RunReport> {
        let Some(record) = history.last() else {
            return Err(ProviderError::new(ProviderErrorKind::Empty).into());
        };
        let post = record.post().clone();
        let statistic = record.statistic().clone();
        info!(post = %post, attempts = *record.attempts(), "Republishing post left unpublished by an earlier run");

        let (post_id, status) = self.publish_latest(&mut history, &post).await?;
        Ok(RunReport {
            statistic,
            post,
            post_id,
            status,
            refilled: false,
            resumed: true,
        })
    }

    /// Publish `text`, then record the outcome on the newest history entry.
    async fn publish_latest(
        &self,
        history: &mut PostHistory,
        text: &str,
    ) -> StatpostResult<(Option<PostId>, PostStatus)> {
        let Some(publisher) = &self.publisher else {
            info!("Publishing disabled or credentials incomplete, post not sent");
            return Ok((None, PostStatus::Skipped));
        };

        if let Some(record) = history.last_mut() {
            record.record_attempt();
        }

        match publisher.publish(text).await {
            Ok(post_id) => {
                if let Some(record) = history.last_mut() {
                    record.mark_published(post_id.0.clone());
                }
                self.state.save_history(history).await?;
                info!(post_id = %post_id, platform = publisher.platform_name(), "Post sent");
                Ok((Some(post_id), PostStatus::Published))
            }
            Err(publish_error) => {
                let retryable = publish_error.kind.is_retryable();
                warn!(error = %publish_error, retryable, "Publishing failed");
                if let Some(record) = history.last_mut() {
                    if retryable {
                        record.mark_failed();
                    } else {
                        record.mark_rejected();
                    }
                }
                if let Err(save_error) = self.state.save_history(history).await {
                    error!(error = %save_error, "Failed to record publish failure");
                }
                Err(publish_error.into())
            }
        }
    }
}
