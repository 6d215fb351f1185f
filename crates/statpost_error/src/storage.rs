//! Storage error types.

/// Kinds of storage errors.
///
/// A missing key is not represented here: the store adapters turn it into an
/// empty document before it can become an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create storage directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to read an object
    #[display("Failed to read object: {}", _0)]
    Read(String),
    /// Failed to write an object
    #[display("Failed to write object: {}", _0)]
    Write(String),
    /// Object body was not valid JSON
    #[display("Invalid document at {}: {}", key, reason)]
    InvalidDocument {
        /// Key of the offending object
        key: String,
        /// Parser message
        reason: String,
    },
    /// Key cannot be mapped onto the backend
    #[display("Invalid key: {}", _0)]
    InvalidKey(String),
    /// Permission denied when accessing storage
    #[display("Permission denied: {}", _0)]
    PermissionDenied(String),
    /// Invalid storage configuration
    #[display("Invalid configuration: {}", _0)]
    InvalidConfig(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use statpost_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::InvalidKey("../etc/passwd".to_string()));
/// assert!(format!("{}", err).contains("Invalid key"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
