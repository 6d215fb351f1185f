//! Core data types for statpost.
//!
//! Two families of types live here:
//! - the chat model vocabulary ([`Message`], [`Role`], [`GenerateRequest`],
//!   [`GenerateResponse`]) shared by every model driver, and
//! - the persisted bot state ([`StatisticsDocument`], [`PostHistory`],
//!   [`PostRecord`]) plus the [`SelectionPolicy`] that picks what to post next.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod history;
mod message;
mod request;
mod role;
mod selection;
mod statistics;

pub use history::{PostHistory, PostRecord, PostStatus};
pub use message::{Message, MessageBuilder};
pub use request::{
    GenerateRequest, GenerateRequestBuilder, GenerateResponse, GenerateResponseBuilder,
    TokenUsage,
};
pub use role::Role;
pub use selection::{FirstUnused, RandomUnused, SelectionPolicy, SelectionStrategy};
pub use statistics::StatisticsDocument;
