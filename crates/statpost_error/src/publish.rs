//! Social publishing errors.

/// Ways publishing a post can fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PublishErrorKind {
    /// Credentials were rejected (401/403)
    #[display("Authentication failed: {}", _0)]
    Unauthorized(String),
    /// Platform rate limit hit (429)
    #[display("Rate limited: {}", _0)]
    RateLimited(String),
    /// Other non-success status
    #[display("Platform API error {}: {}", status, body)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },
    /// Network failure before a response arrived
    #[display("Transport error: {}", _0)]
    Transport(String),
    /// Response did not contain a post id
    #[display("Failed to parse response: {}", _0)]
    Parse(String),
    /// Request signature could not be computed
    #[display("Failed to sign request: {}", _0)]
    Signing(String),
}

impl PublishErrorKind {
    /// Whether the same post might go through on a later attempt.
    ///
    /// Rate limits, network failures and server errors are transient.
    /// Rejected credentials or content, and unreadable responses (the post may
    /// already exist), are final.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited(_) | Self::Transport(_) => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Unauthorized(_) | Self::Parse(_) | Self::Signing(_) => false,
        }
    }
}

/// Publish error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Publish Error: {} at line {} in {}", kind, line, file)]
pub struct PublishError {
    /// The kind of error that occurred
    pub kind: PublishErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PublishError {
    /// Create a new publish error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PublishErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
