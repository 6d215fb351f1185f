//! Statistics provider errors.

use crate::{ModelsError, ModelsErrorKind};

/// Ways fetching a batch of statistics can fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ProviderErrorKind {
    /// Knowledge endpoint returned a non-success status
    #[display("Knowledge API error: {} {}", status, body)]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },
    /// Request failed before a status was received, or the reply was malformed
    #[display("Knowledge API request failed: {}", _0)]
    Request(String),
    /// Reply held no non-blank lines
    #[display("Knowledge API returned no statistics")]
    Empty,
}

/// Statistics provider error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The kind of error that occurred
    pub kind: ProviderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new provider error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<ModelsError> for ProviderError {
    #[track_caller]
    fn from(err: ModelsError) -> Self {
        let kind = match err.kind {
            ModelsErrorKind::Api { status, body } => ProviderErrorKind::Status { status, body },
            other => ProviderErrorKind::Request(other.to_string()),
        };
        Self::new(kind)
    }
}
