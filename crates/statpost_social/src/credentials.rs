//! Publishing credentials.

use derive_getters::Getters;

/// The four secrets an OAuth 1.0a user-context request needs.
///
/// `Debug` never prints the values.
#[derive(Clone, PartialEq, Eq, Getters)]
pub struct PublishCredentials {
    /// Application consumer key
    consumer_key: String,
    /// Application consumer secret
    consumer_secret: String,
    /// User access token
    access_token: String,
    /// User access token secret
    access_token_secret: String,
}

impl PublishCredentials {
    /// Bundle the four credentials.
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_token_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            access_token: access_token.into(),
            access_token_secret: access_token_secret.into(),
        }
    }
}

impl std::fmt::Debug for PublishCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishCredentials")
            .field("consumer_key", &"<redacted>")
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}
