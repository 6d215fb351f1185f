//! Chat model client errors.

/// Failure conditions of a chat-completion HTTP call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ModelsErrorKind {
    /// Request could not be sent or the body could not be read
    #[display("HTTP error: {}", _0)]
    Http(String),

    /// Endpoint answered with a non-success status
    #[display("API error {}: {}", status, body)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body as returned by the endpoint
        body: String,
    },

    /// Response body did not have the expected shape
    #[display("Failed to parse response: {}", _0)]
    Parse(String),

    /// Response carried no choices
    #[display("Response contained no choices")]
    NoChoices,

    /// Request could not be assembled
    #[display("Builder error: {}", _0)]
    Builder(String),
}

/// Chat model error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Models Error: {} at {}:{}", kind, file, line)]
pub struct ModelsError {
    /// The specific error kind
    pub kind: ModelsErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// Source file where error occurred
    pub file: &'static str,
}

impl ModelsError {
    /// Create a new models error.
    #[track_caller]
    pub fn new(kind: ModelsErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// HTTP status, when the endpoint answered with one.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ModelsErrorKind::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for model operations.
pub type ModelsResult<T> = Result<T, ModelsError>;
