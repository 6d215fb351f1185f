//! Perplexity knowledge endpoint driver.

use crate::openai_compat::OpenAICompatibleClient;
use async_trait::async_trait;
use serde_json::Value;
use statpost_core::{GenerateRequest, GenerateResponse};
use statpost_error::ModelsResult;
use statpost_interface::StatpostDriver;
use std::time::Duration;

/// Driver for Perplexity's online models.
///
/// Always asks for a single non-streamed answer without citations, so the
/// reply body is plain text ready to split into lines.
#[derive(Debug, Clone)]
pub struct PerplexityDriver {
    inner: OpenAICompatibleClient,
}

impl PerplexityDriver {
    /// Public chat-completion URL.
    pub const DEFAULT_URL: &'static str = "https://api.perplexity.ai/chat/completions";

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
        let inner = OpenAICompatibleClient::new(api_key, model, base_url, "perplexity", timeout)?
            .with_extra("return_citations", Value::Bool(false))
            .with_extra("stream", Value::Bool(false));
        Ok(Self { inner })
    }
}

#[async_trait]
impl StatpostDriver for PerplexityDriver {
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
