//! X (Twitter) API v2 publishing.

use crate::{OAuth1Signer, PublishCredentials};
use async_trait::async_trait;
use serde::Deserialize;
use statpost_error::{PublishError, PublishErrorKind};
use statpost_interface::{PostId, SocialPlatform};
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct CreatePostResponse {
    data: CreatedPost,
}

#[derive(Debug, Deserialize)]
struct CreatedPost {
    id: String,
}

/// Publishes plain-text posts as the credentialed user.
#[derive(Debug, Clone)]
pub struct TwitterPlatform {
    client: reqwest::Client,
    signer: OAuth1Signer,
    endpoint: String,
}

impl TwitterPlatform {
    /// Create-post endpoint.
    pub const DEFAULT_URL: &'static str = "https://api.twitter.com/2/tweets";

    /// Create a platform that posts to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`PublishErrorKind::Transport`] if the HTTP client cannot be built.
    #[tracing::instrument(skip(credentials, endpoint))]
    pub fn new(
        credentials: PublishCredentials,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PublishError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PublishError::new(PublishErrorKind::Transport(e.to_string())))?;

        Ok(Self {
            client,
            signer: OAuth1Signer::new(credentials),
            endpoint: endpoint.into(),
        })
    }

    /// Endpoint posts are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn status_error(status: reqwest::StatusCode, body: String) -> PublishError {
        let kind = match status.as_u16() {
            401 | 403 => PublishErrorKind::Unauthorized(format!("{}: {}", status, body)),
            429 => PublishErrorKind::RateLimited(body),
            code => PublishErrorKind::Api { status: code, body },
        };
        PublishError::new(kind)
    }
}

#[async_trait]
impl SocialPlatform for TwitterPlatform {
    #[tracing::instrument(skip(self, text), fields(endpoint = %self.endpoint, chars = text.chars().count()))]
    async fn publish(&self, text: &str) -> Result<PostId, PublishError> {
        let authorization = self.signer.authorization_header("POST", &self.endpoint, &[])?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(|e| PublishError::new(PublishErrorKind::Transport(e.to_string())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PublishError::new(PublishErrorKind::Transport(e.to_string())))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Post rejected");
            return Err(Self::status_error(status, body));
        }

        let created: CreatePostResponse = serde_json::from_str(&body).map_err(|e| {
            PublishError::new(PublishErrorKind::Parse(format!("{}: {}", e, body)))
        })?;

        tracing::info!(post_id = %created.data.id, "Post published");
        Ok(PostId(created.data.id))
    }

    fn platform_name(&self) -> &'static str {
        "twitter"
    }
}
