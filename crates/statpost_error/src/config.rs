//! Configuration error types.

/// Invalid settings or a missing secret.
///
/// `setting` names the environment variable or `section.key` at fault when
/// there is a single one, so entry points can point the operator at it.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// What is wrong
    pub message: String,
    /// Offending variable or key, if known
    pub setting: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Error not tied to one setting, such as an unparsable file.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            setting: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// `setting` holds a value the bot cannot use.
    #[track_caller]
    pub fn invalid(setting: impl Into<String>, problem: &str) -> Self {
        let setting = setting.into();
        Self {
            message: format!("{} {}", setting, problem),
            setting: Some(setting),
            ..Self::new(String::new())
        }
    }

    /// Required `setting` is absent or empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use statpost_error::ConfigError;
    ///
    /// let err = ConfigError::missing("PERPLEXITY_API_KEY");
    /// assert_eq!(err.setting.as_deref(), Some("PERPLEXITY_API_KEY"));
    /// assert!(err.to_string().contains("PERPLEXITY_API_KEY is not set"));
    /// ```
    #[track_caller]
    pub fn missing(setting: impl Into<String>) -> Self {
        let setting = setting.into();
        Self {
            message: format!("{} is not set", setting),
            setting: Some(setting),
            ..Self::new(String::new())
        }
    }
}
