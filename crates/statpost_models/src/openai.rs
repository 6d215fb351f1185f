//! OpenAI chat-completion driver.

use crate::openai_compat::OpenAICompatibleClient;
use async_trait::async_trait;
use statpost_core::{GenerateRequest, GenerateResponse};
use statpost_error::ModelsResult;
use statpost_interface::StatpostDriver;
use std::time::Duration;

/// Driver for the OpenAI chat-completion API.
#[derive(Debug, Clone)]
pub struct OpenAiDriver {
    inner: OpenAICompatibleClient,
}

impl OpenAiDriver {
    /// Public chat-completion URL.
    pub const DEFAULT_URL: &'static str = "https://api.openai.com/v1/chat/completions";

    /// Create a driver.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> ModelsResult<Self> {
        Ok(Self {
            inner: OpenAICompatibleClient::new(api_key, model, base_url, "openai", timeout)?,
        })
    }
}

#[async_trait]
impl StatpostDriver for OpenAiDriver {
    async fn generate(&self, req: &GenerateRequest) -> ModelsResult<GenerateResponse> {
        self.inner.generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
