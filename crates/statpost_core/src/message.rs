//! Message types for chat requests.

use crate::Role;
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A single text message in a chat request.
///
/// # Examples
///
/// ```
/// use statpost_core::{Message, Role};
///
/// let message = Message::user("Give me five statistics.");
/// assert_eq!(*message.role(), Role::User);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct Message {
    /// The role of the message sender
    role: Role,
    /// Text content of the message
    content: String,
}

impl Message {
    /// Creates a new builder for `Message`.
    pub fn builder() -> MessageBuilder {
        MessageBuilder::default()
    }

    /// System message with the given instructions.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// User message with the given prompt.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}
