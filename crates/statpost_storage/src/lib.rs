//! JSON document storage for statpost.
//!
//! The bot keeps its whole state in two JSON objects addressed by fixed keys.
//! This crate provides the [`DocumentStore`] backends that hold them:
//!
//! - [`S3Store`] - an S3 bucket (feature `s3`)
//! - [`FileSystemStore`] - a directory on local disk
//! - [`MemoryStore`] - an in-process map for tests and dry runs
//!
//! All backends share the same contract: a missing key loads as `{}`, an
//! empty object body loads as `{}`, and documents are written as
//! 4-space-indented JSON.
//!
//! # Example
//!
//! ```rust
//! use statpost_storage::{MemoryStore, load_document, save_document};
//! use std::collections::BTreeMap;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//! let mut doc = BTreeMap::new();
//! doc.insert("greeting".to_string(), "hello".to_string());
//!
//! save_document(&store, "doc.json", &doc).await?;
//! let loaded: BTreeMap<String, String> = load_document(&store, "doc.json").await?;
//! assert_eq!(doc, loaded);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod filesystem;
mod memory;
#[cfg(feature = "s3")]
mod s3;

pub use document::{empty_document, load_document, parse_document, save_document, to_pretty_json};
pub use filesystem::FileSystemStore;
pub use memory::MemoryStore;
#[cfg(feature = "s3")]
pub use s3::{S3Settings, S3Store};
pub use statpost_error::{StorageError, StorageErrorKind};
pub use statpost_interface::DocumentStore;
