//! Statistics-to-post pipeline for statpost.
//!
//! A run loads the persisted statistics, refills them from the knowledge
//! endpoint when none are left, picks one, asks the writer model for a post
//! that differs from recent ones, records it and publishes it.
//!
//! ```text
//! StateRepository ──► StatisticsProvider (when empty or exhausted)
//!        │
//!        ▼
//! SelectionPolicy ──► PostGenerator ──► StateRepository ──► SocialPlatform
//! ```
//!
//! Components receive their settings from [`StatpostConfig`] and their
//! secrets from [`Credentials`]; nothing here reads the environment except
//! [`Credentials::from_env`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod credentials;
mod generation;
mod invocation;
mod pipeline;
mod setup;
mod state;
mod statistics;

pub use config::{
    GenerationConfig, HistoryConfig, HttpConfig, PublishConfig, SelectionConfig,
    StatisticsConfig, StatpostConfig, StorageBackend, StorageConfig, fill_topic,
};
pub use credentials::{
    ACCESS_TOKEN, ACCESS_TOKEN_SECRET, CONSUMER_KEY, CONSUMER_SECRET, Credentials,
    OPENAI_API_KEY, PERPLEXITY_API_KEY,
};
pub use generation::PostGenerator;
pub use invocation::{InvocationResponse, invoke, log_configuration_hints};
pub use pipeline::{Pipeline, RunReport};
pub use setup::{open_publisher, open_store};
pub use state::StateRepository;
pub use statistics::{StatisticsProvider, split_statistics};
