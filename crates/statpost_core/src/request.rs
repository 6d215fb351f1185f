//! Request and response types for chat generation.

use crate::Message;
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Provider-neutral chat generation request.
///
/// Sampling fields left as `None` are omitted from the wire request so the
/// endpoint's defaults apply.
///
/// # Examples
///
/// ```
/// use statpost_core::{GenerateRequest, Message};
///
/// let request = GenerateRequest::builder()
///     .messages(vec![Message::user("Hello")])
///     .max_tokens(Some(100))
///     .temperature(Some(0.7))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.messages().len(), 1);
/// assert_eq!(*request.max_tokens(), Some(100));
/// assert_eq!(*request.top_p(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, Builder, Getters)]
#[builder(setter(into))]
pub struct GenerateRequest {
    /// The conversation messages to send
    messages: Vec<Message>,
    /// Maximum number of tokens to generate
    #[builder(default)]
    max_tokens: Option<u32>,
    /// Sampling temperature
    #[builder(default)]
    temperature: Option<f32>,
    /// Nucleus sampling cutoff
    #[builder(default)]
    top_p: Option<f32>,
    /// Model override; the driver's configured model is used when `None`
    #[builder(default)]
    model: Option<String>,
}

impl GenerateRequest {
    /// Creates a new builder for `GenerateRequest`.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }
}

/// Token accounting reported by the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Getters)]
pub struct TokenUsage {
    /// Prompt tokens consumed
    #[serde(default)]
    prompt_tokens: u64,
    /// Completion tokens generated
    #[serde(default)]
    completion_tokens: u64,
    /// Total tokens billed
    #[serde(default)]
    total_tokens: u64,
}

impl TokenUsage {
    /// Usage with explicit counts.
    pub fn new(prompt_tokens: u64, completion_tokens: u64, total_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }
}

/// Text produced by a chat model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct GenerateResponse {
    /// Content of the first choice
    text: String,
    /// Token usage, when reported
    #[builder(default)]
    usage: Option<TokenUsage>,
}

impl GenerateResponse {
    /// Creates a new builder for `GenerateResponse`.
    pub fn builder() -> GenerateResponseBuilder {
        GenerateResponseBuilder::default()
    }
}
