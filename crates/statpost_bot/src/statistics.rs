//! Statistics provider.

use crate::config::StatisticsConfig;
use statpost_core::{GenerateRequest, Message};
use statpost_error::{ProviderError, ProviderErrorKind};
use statpost_interface::StatpostDriver;
use std::sync::Arc;
use tracing::{info, instrument};

/// Split a reply into statistics: one per line, trimmed, blanks dropped.
pub fn split_statistics(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Asks the knowledge endpoint for a fresh batch of statistics.
pub struct StatisticsProvider {
    driver: Arc<dyn StatpostDriver>,
    settings: StatisticsConfig,
}

impl StatisticsProvider {
    /// Provider over `driver`.
    pub fn new(driver: Arc<dyn StatpostDriver>, settings: StatisticsConfig) -> Self {
        Self { driver, settings }
    }

    /// Request sent for `topic`.
    pub fn build_request(&self, topic: &str) -> Result<GenerateRequest, ProviderError> {
        GenerateRequest::builder()
            .messages(vec![
                Message::system(self.settings.system_prompt_for(topic)),
                Message::user(self.settings.user_prompt_for(topic)),
            ])
            .max_tokens(Some(self.settings.max_tokens))
            .temperature(Some(self.settings.temperature))
            .top_p(Some(self.settings.top_p))
            .build()
            .map_err(|e| ProviderError::new(ProviderErrorKind::Request(e.to_string())))
    }

    /// Fetch statistics about `topic`, in the order the endpoint gave them.
    ///
    /// The count is not checked; the endpoint is asked for five.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderErrorKind::Status`] for non-success responses,
    /// `Request` for transport or decoding failures and `Empty` when the
    /// reply has no non-blank line.
    #[instrument(skip(self), fields(provider = self.driver.provider_name(), model = self.driver.model_name()))]
    pub async fn fetch(&self, topic: &str) -> Result<Vec<String>, ProviderError> {
        info!("Fetching new statistics");
        let request = self.build_request(topic)?;
        let response = self.driver.generate(&request).await?;

        let statistics = split_statistics(response.text());
        if statistics.is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::Empty));
        }

        info!(count = statistics.len(), "Fetched statistics");
        Ok(statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatpostConfig;
    use statpost_core::GenerateResponse;
    use statpost_error::{ModelsError, ModelsErrorKind, ModelsResult};

    struct Unreachable;

    #[async_trait::async_trait]
    impl StatpostDriver for Unreachable {
        async fn generate(&self, _req: &GenerateRequest) -> ModelsResult<GenerateResponse> {
            Err(ModelsError::new(ModelsErrorKind::NoChoices))
        }

        fn provider_name(&self) -> &'static str {
            "unreachable"
        }

        fn model_name(&self) -> &str {
            "none"
        }
    }

    #[test]
    fn request_fills_topic_into_both_prompts() {
        let mut settings = StatpostConfig::bundled().unwrap().statistics;
        settings.system_prompt = "Expert on {topic}.".to_string();
        let provider = StatisticsProvider::new(Arc::new(Unreachable), settings);

        let request = provider.build_request("rail tenders").unwrap();

        assert_eq!(request.messages()[0].content(), "Expert on rail tenders.");
        assert!(request.messages()[1].content().contains("statistics about rail tenders."));
    }

    #[test]
    fn split_drops_blank_lines_and_trims() {
        let text = "  1. Fact one. \n\n2. Fact two.\r\n   \n3. Fact three.";
        assert_eq!(
            split_statistics(text),
            vec!["1. Fact one.", "2. Fact two.", "3. Fact three."]
        );
    }

    #[test]
    fn split_of_blank_text_is_empty() {
        assert!(split_statistics(" \n\t\n").is_empty());
    }
}
