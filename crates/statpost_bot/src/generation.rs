//! Post generator.

use crate::config::{GenerationConfig, fill_topic};
use statpost_core::{GenerateRequest, Message};
use statpost_error::{GenerationError, GenerationErrorKind};
use statpost_interface::StatpostDriver;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Turns one statistic into a post that differs from recent ones.
pub struct PostGenerator {
    driver: Arc<dyn StatpostDriver>,
    settings: GenerationConfig,
    topic: String,
}

impl PostGenerator {
    /// Generator writing about `topic`.
    pub fn new(
        driver: Arc<dyn StatpostDriver>,
        settings: GenerationConfig,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            driver,
            settings,
            topic: topic.into(),
        }
    }

    /// Number of previous posts the prompt should include.
    pub fn recent_posts(&self) -> usize {
        self.settings.recent_posts
    }

    /// User prompt for `statistic`.
    ///
    /// `recent_posts` are listed oldest first, one per line.
    pub fn build_prompt(&self, statistic: &str, recent_posts: &[&str]) -> String {
        format!(
            "Create a suitable, concise, and effective Twitter post based on this statistic about {topic}: {statistic}\n\
             {angle}\n\
             DO NOT use hashtags.\n\
             Keep the post under {limit} characters.\n\
             DO NOT use quotation marks around the tweet.\n\
             Ensure the content is different from these recent posts:\n\
             {recent}",
            topic = self.topic,
            statistic = statistic,
            angle = self.settings.angle,
            limit = self.settings.max_characters,
            recent = recent_posts.join("\n"),
        )
    }

    fn build_request(
        &self,
        statistic: &str,
        recent_posts: &[&str],
    ) -> Result<GenerateRequest, GenerationError> {
        GenerateRequest::builder()
            .messages(vec![
                Message::system(fill_topic(&self.settings.system_prompt, &self.topic)),
                Message::user(self.build_prompt(statistic, recent_posts)),
            ])
            .max_tokens(Some(self.settings.max_tokens))
            .temperature(Some(self.settings.temperature))
            .build()
            .map_err(|e| GenerationError::new(GenerationErrorKind::Model(e.to_string())))
    }

    /// Write a post about `statistic`.
    ///
    /// Length and format rules are only requested in the prompt; the reply
    /// is returned trimmed but otherwise untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationErrorKind::Model`] when the call fails and
    /// `EmptyResponse` when the reply is blank.
    #[instrument(skip(self, recent_posts), fields(model = self.driver.model_name(), recent = recent_posts.len()))]
    pub async fn generate(
        &self,
        statistic: &str,
        recent_posts: &[&str],
    ) -> Result<String, GenerationError> {
        let request = self.build_request(statistic, recent_posts)?;
        debug!("Requesting post");
        let response = self.driver.generate(&request).await?;

        let post = response.text().trim();
        if post.is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::EmptyResponse));
        }

        info!(post = %post, chars = post.chars().count(), "Generated post");
        Ok(post.to_string())
    }
}
