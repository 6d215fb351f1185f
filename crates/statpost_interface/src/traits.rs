//! Seam traits between the orchestrator and external services.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use statpost_core::{GenerateRequest, GenerateResponse};
use statpost_error::{ModelsResult, PublishError, StatpostResult};

/// Core trait every chat model backend implements.
#[async_trait]
pub trait StatpostDriver: Send + Sync {
    /// Generate a completion for the request.
    async fn generate(&self, req: &GenerateRequest) -> ModelsResult<GenerateResponse>;

    /// Provider name (e.g., "perplexity", "openai").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gpt-4o-mini").
    fn model_name(&self) -> &str;
}

/// Key-value store of JSON documents.
///
/// A key that does not exist loads as an empty JSON object; every other
/// backend failure is an error. Saving overwrites the whole object.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Load the document stored at `key`.
    async fn load(&self, key: &str) -> StatpostResult<serde_json::Value>;

    /// Store `document` at `key`, replacing any previous value.
    async fn save(&self, key: &str, document: &serde_json::Value) -> StatpostResult<()>;

    /// Backend name for logs (e.g., "s3", "filesystem").
    fn backend_name(&self) -> &'static str;
}

/// Platform-assigned identifier of a published post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{}", _0)]
pub struct PostId(pub String);

/// Social platform that accepts plain-text posts.
#[async_trait]
pub trait SocialPlatform: Send + Sync {
    /// Publish `text` and return the id the platform assigned.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Authentication fails
    /// - Rate limit exceeded
    /// - Platform API error or network failure
    async fn publish(&self, text: &str) -> Result<PostId, PublishError>;

    /// Platform name (e.g., "twitter").
    fn platform_name(&self) -> &'static str;
}
