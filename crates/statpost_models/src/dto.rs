//! Wire types of the chat-completion dialect.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use statpost_core::{Message, Role, TokenUsage};

/// One message in a chat-completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChatMessage {
    /// Message role
    role: Role,
    /// Message text
    content: String,
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: *message.role(),
            content: message.content().clone(),
        }
    }
}

/// Chat-completion request body.
///
/// `extra` is flattened into the top-level object, which is how
/// endpoint-specific switches such as `return_citations` reach the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatCompletionRequest {
    /// Model identifier
    model: String,
    /// Conversation
    messages: Vec<ChatMessage>,
    /// Maximum tokens to generate
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    /// Sampling temperature
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Nucleus sampling cutoff
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    /// Additional top-level fields
    #[builder(default)]
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl ChatCompletionRequest {
    /// Creates a new builder for `ChatCompletionRequest`.
    pub fn builder() -> ChatCompletionRequestBuilder {
        ChatCompletionRequestBuilder::default()
    }
}

/// Message inside a returned choice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct ChatChoiceMessage {
    /// Generated text; some endpoints send `null`
    #[serde(default)]
    content: Option<String>,
}

/// One completion choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChatChoice {
    /// Returned message
    #[serde(default)]
    message: ChatChoiceMessage,
}

impl ChatChoice {
    /// Text of the choice, empty when the endpoint sent none.
    pub fn text(&self) -> &str {
        self.message.content.as_deref().unwrap_or_default()
    }
}

/// Token usage block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct ChatUsage {
    /// Prompt tokens
    #[serde(default)]
    prompt_tokens: u64,
    /// Completion tokens
    #[serde(default)]
    completion_tokens: u64,
    /// Total tokens
    #[serde(default)]
    total_tokens: u64,
}

impl From<ChatUsage> for TokenUsage {
    fn from(usage: ChatUsage) -> Self {
        TokenUsage::new(
            usage.prompt_tokens,
            usage.completion_tokens,
            usage.total_tokens,
        )
    }
}

/// Chat-completion response body.
///
/// Only the fields the bot reads are modelled; everything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChatCompletionResponse {
    /// Completion choices
    #[serde(default)]
    choices: Vec<ChatChoice>,
    /// Token usage, when reported
    #[serde(default)]
    usage: Option<ChatUsage>,
}
