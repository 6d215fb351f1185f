//! Chat-completion clients for statpost.
//!
//! Both external language services speak the OpenAI chat-completion dialect,
//! so one [`OpenAICompatibleClient`] does the HTTP work and thin drivers pin
//! the endpoint-specific details:
//!
//! - [`PerplexityDriver`] - the knowledge endpoint the statistics come from
//! - [`OpenAiDriver`] - the chat endpoint that writes posts
//!
//! Every call is recorded through [`ChatCallMetrics`].
//!
//! # Example
//!
//! ```no_run
//! use statpost_models::OpenAiDriver;
//! use statpost_interface::StatpostDriver;
//! use statpost_core::{GenerateRequest, Message};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let driver = OpenAiDriver::new(
//!     "sk-test",
//!     "gpt-4o-mini",
//!     OpenAiDriver::DEFAULT_URL,
//!     Duration::from_secs(60),
//! )?;
//! let request = GenerateRequest::builder()
//!     .messages(vec![Message::user("Hello")])
//!     .build()?;
//! let response = driver.generate(&request).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod dto;
mod metrics;
mod openai;
mod openai_compat;
mod perplexity;

pub use dto::{
    ChatChoice, ChatChoiceMessage, ChatCompletionRequest, ChatCompletionRequestBuilder, ChatCompletionResponse,
    ChatMessage, ChatUsage,
};
pub use metrics::{CallLabels, ChatCallMetrics, classify_error};
pub use openai::OpenAiDriver;
pub use openai_compat::OpenAICompatibleClient;
pub use perplexity::PerplexityDriver;
