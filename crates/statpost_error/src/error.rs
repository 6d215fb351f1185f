//! Top-level error wrapper types.

use crate::{
    ConfigError, GenerationError, JsonError, ModelsError, ProviderError, PublishError,
    StorageError,
};

/// Every failure a statpost run can end with.
///
/// # Examples
///
/// ```
/// use statpost_error::{StatpostError, StatpostErrorKind, ConfigError};
///
/// let err: StatpostError = ConfigError::new("missing key").into();
/// assert!(matches!(err.kind(), StatpostErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StatpostErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Object store error
    #[from(StorageError)]
    Storage(StorageError),
    /// Chat model client error
    #[from(ModelsError)]
    Models(ModelsError),
    /// Statistics fetch error
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Post generation error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Publishing error
    #[from(PublishError)]
    Publish(PublishError),
}

/// statpost error with kind discrimination.
///
/// # Examples
///
/// ```
/// use statpost_error::{StatpostResult, ConfigError};
///
/// fn might_fail() -> StatpostResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("statpost Error: {}", _0)]
pub struct StatpostError(Box<StatpostErrorKind>);

impl StatpostError {
    /// Create a new error from a kind.
    pub fn new(kind: StatpostErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StatpostErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to StatpostErrorKind
impl<T> From<T> for StatpostError
where
    T: Into<StatpostErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for statpost operations.
pub type StatpostResult<T> = std::result::Result<T, StatpostError>;
