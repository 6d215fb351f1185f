//! Trait definitions for statpost.
//!
//! The orchestrator only talks to the outside world through these three seams:
//! - [`StatpostDriver`] - a chat-completion model
//! - [`DocumentStore`] - the object store holding bot state
//! - [`SocialPlatform`] - where finished posts go

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{DocumentStore, PostId, SocialPlatform, StatpostDriver};
