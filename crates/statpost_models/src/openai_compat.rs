//! HTTP client for OpenAI-style chat-completion endpoints.

use crate::dto::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::metrics::{CallLabels, ChatCallMetrics};
use statpost_core::{GenerateRequest, GenerateResponse, TokenUsage};
use statpost_error::{ModelsError, ModelsErrorKind, ModelsResult};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Chat-completion client shared by every driver.
///
/// Sends bearer-authenticated POSTs to a single URL and returns the first
/// choice's text. Sampling fields left unset on the request are omitted from
/// the body.
#[derive(Clone)]
pub struct OpenAICompatibleClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    provider: &'static str,
    extra: serde_json::Map<String, serde_json::Value>,
}

impl std::fmt::Debug for OpenAICompatibleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAICompatibleClient")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("provider", &self.provider)
            .field("extra", &self.extra)
            .finish()
    }
}

impl OpenAICompatibleClient {
    /// Create a client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    #[instrument(skip_all, fields(provider = provider))]
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        provider: &'static str,
        timeout: Duration,
    ) -> ModelsResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ModelsError::new(ModelsErrorKind::Builder(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
            provider,
            extra: serde_json::Map::new(),
        })
    }

    /// Add a top-level field sent with every request.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Configured model.
    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Provider label.
    pub fn provider_name(&self) -> &'static str {
        self.provider
    }

    /// Endpoint URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request(&self, req: &GenerateRequest) -> ModelsResult<ChatCompletionRequest> {
        ChatCompletionRequest::builder()
            .model(req.model().clone().unwrap_or_else(|| self.model.clone()))
            .messages(req.messages().iter().map(ChatMessage::from).collect::<Vec<_>>())
            .max_tokens(*req.max_tokens())
            .temperature(*req.temperature())
            .top_p(*req.top_p())
            .extra(self.extra.clone())
            .build()
            .map_err(|e| ModelsError::new(ModelsErrorKind::Builder(e.to_string())))
    }

    async fn send(&self, body: &ChatCompletionRequest) -> ModelsResult<ChatCompletionResponse> {
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ModelsError::new(ModelsErrorKind::Http(format!("Request failed: {}", e))))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelsError::new(ModelsErrorKind::Api {
                status: status.as_u16(),
                body,
            }));
        }

        let text = response.text().await.map_err(|e| {
            ModelsError::new(ModelsErrorKind::Http(format!(
                "Failed to read response body: {}",
                e
            )))
        })?;
        serde_json::from_str(&text).map_err(|e| ModelsError::new(ModelsErrorKind::Parse(e.to_string())))
    }

    /// Send `req` and return the first choice.
    ///
    /// # Errors
    ///
    /// Returns [`ModelsErrorKind::Api`] for non-success statuses, `Http` for
    /// transport failures, `Parse` for malformed bodies and `NoChoices` when
    /// the endpoint returned none.
    #[instrument(skip(self, req), fields(provider = self.provider, model = %self.model))]
    pub async fn generate(&self, req: &GenerateRequest) -> ModelsResult<GenerateResponse> {
        let body = self.build_request(req)?;
        debug!(url = %self.base_url, messages = body.messages().len(), "Sending chat completion request");

        let metrics = ChatCallMetrics::global();
        let labels = CallLabels::new(self.provider, body.model());
        let started = Instant::now();

        let parsed = match self.send(&body).await {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, status = ?e.status(), "Chat completion request failed");
                metrics.failed(&labels, started.elapsed(), &e);
                return Err(e);
            }
        };

        let Some(choice) = parsed.choices().first() else {
            let err = ModelsError::new(ModelsErrorKind::NoChoices);
            metrics.failed(&labels, started.elapsed(), &err);
            return Err(err);
        };
        metrics.succeeded(&labels, started.elapsed(), parsed.usage().as_ref());

        debug!(chars = choice.text().len(), "Received chat completion");
        GenerateResponse::builder()
            .text(choice.text())
            .usage(parsed.usage().map(TokenUsage::from))
            .build()
            .map_err(|e| ModelsError::new(ModelsErrorKind::Builder(e.to_string())))
    }
}
