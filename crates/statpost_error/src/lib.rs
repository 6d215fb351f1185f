//! Error types for statpost.
//!
//! Every error follows the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum names the specific failure
//! - `*Error` struct wraps the kind with the source location that raised it
//! - constructors use `#[track_caller]` so the location is captured automatically
//!
//! Component errors convert into [`StatpostError`] with `?`, which is what the
//! orchestrator and the entry points deal in.
//!
//! # Examples
//!
//! ```
//! use statpost_error::{ConfigError, StatpostResult};
//!
//! fn api_key() -> StatpostResult<String> {
//!     Err(ConfigError::new("OPENAI_API_KEY is not set"))?
//! }
//!
//! assert!(api_key().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod generation;
mod json;
mod models;
mod provider;
mod publish;
mod storage;

pub use config::ConfigError;
pub use error::{StatpostError, StatpostErrorKind, StatpostResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use json::{JsonError, JsonOperation};
pub use models::{ModelsError, ModelsErrorKind, ModelsResult};
pub use provider::{ProviderError, ProviderErrorKind};
pub use publish::{PublishError, PublishErrorKind};
pub use storage::{StorageError, StorageErrorKind};
