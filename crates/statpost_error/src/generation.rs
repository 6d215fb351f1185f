//! Post generation errors.

use crate::ModelsError;

/// Ways generating a post can fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GenerationErrorKind {
    /// Underlying chat model call failed
    #[display("Chat model call failed: {}", _0)]
    Model(String),
    /// Model answered without any text
    #[display("Chat model returned an empty post")]
    EmptyResponse,
}

/// Post generation error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new generation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<ModelsError> for GenerationError {
    #[track_caller]
    fn from(err: ModelsError) -> Self {
        Self::new(GenerationErrorKind::Model(err.kind.to_string()))
    }
}
