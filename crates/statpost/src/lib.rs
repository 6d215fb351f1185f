//! statpost - scheduled bot that turns fresh statistics into social media posts.
//!
//! Each run asks a knowledge endpoint for a handful of one-sentence
//! statistics (only when the stored batch is used up), has a chat model
//! write a short post about the next unused one, and publishes it to X.
//! State lives in two JSON documents in S3 or on local disk.
//!
//! # Architecture
//!
//! - `statpost_error` - error types
//! - `statpost_core` - chat vocabulary, state documents, selection policies
//! - `statpost_interface` - driver, store and platform traits
//! - `statpost_storage` - S3, filesystem and memory stores
//! - `statpost_models` - chat-completion drivers and LLM metrics
//! - `statpost_social` - X publishing with OAuth 1.0a
//! - `statpost_bot` - configuration, credentials and the run pipeline
//!
//! This crate re-exports everything for convenience and hosts the CLI.
//!
//! # Cargo Features
//!
//! - `s3` (default) - S3 state storage
//! - `observability` - OpenTelemetry stdout exporters for spans and metrics

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod logging;
#[cfg(feature = "observability")]
mod observability;

pub use logging::{LoggingConfig, init_logging};
#[cfg(feature = "observability")]
pub use observability::{ObservabilityGuard, init_observability};

pub use statpost_bot::*;
pub use statpost_core::*;
pub use statpost_error::*;
pub use statpost_interface::*;
pub use statpost_models::{ChatCallMetrics, OpenAICompatibleClient, OpenAiDriver, PerplexityDriver};
pub use statpost_social::{OAuth1Signer, PublishCredentials, TwitterPlatform};
pub use statpost_storage::{
    FileSystemStore, MemoryStore, load_document, save_document,
};
#[cfg(feature = "s3")]
pub use statpost_storage::{S3Settings, S3Store};
