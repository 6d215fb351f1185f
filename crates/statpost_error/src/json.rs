//! Errors converting state documents to and from JSON.

/// Which way the conversion went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum JsonOperation {
    /// Value to JSON text or `serde_json::Value`
    #[display("encode")]
    Encode,
    /// JSON into a typed value
    #[display("decode")]
    Decode,
}

/// A state document that could not be encoded or decoded.
///
/// Carries the document key (or another short label for documents that are
/// not stored, such as the `state` command's view) so the log line names the
/// file to inspect.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error: failed to {} {}: {} at line {} in {}", operation, document, message, line, file)]
pub struct JsonError {
    /// Encode or decode
    pub operation: JsonOperation,
    /// Document key or label
    pub document: String,
    /// serde_json's message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Error for `operation` on `document`.
    #[track_caller]
    pub fn new(
        operation: JsonOperation,
        document: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        let location = std::panic::Location::caller();
        Self {
            operation,
            document: document.into(),
            message: message.to_string(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// `document` could not be serialized.
    ///
    /// # Examples
    ///
    /// ```
    /// use statpost_error::{JsonError, JsonOperation};
    ///
    /// let err = JsonError::encode("statistics.json", "key must be a string");
    /// assert_eq!(err.operation, JsonOperation::Encode);
    /// assert!(err.to_string().contains("failed to encode statistics.json"));
    /// ```
    #[track_caller]
    pub fn encode(document: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::new(JsonOperation::Encode, document, message)
    }

    /// `document` did not match the expected shape.
    #[track_caller]
    pub fn decode(document: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::new(JsonOperation::Decode, document, message)
    }
}
