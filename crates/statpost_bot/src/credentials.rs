//! Secrets read from the process environment.

use statpost_error::ConfigError;
use statpost_social::PublishCredentials;

/// Environment variable holding the knowledge endpoint key.
pub const PERPLEXITY_API_KEY: &str = "PERPLEXITY_API_KEY";
/// Environment variable holding the post writer key.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable holding the publishing consumer key.
pub const CONSUMER_KEY: &str = "CONSUMER_KEY";
/// Environment variable holding the publishing consumer secret.
pub const CONSUMER_SECRET: &str = "CONSUMER_SECRET";
/// Environment variable holding the publishing access token.
pub const ACCESS_TOKEN: &str = "ACCESS_TOKEN";
/// Environment variable holding the publishing access token secret.
pub const ACCESS_TOKEN_SECRET: &str = "ACCESS_TOKEN_SECRET";

const PUBLISH_VARIABLES: [&str; 4] = [CONSUMER_KEY, CONSUMER_SECRET, ACCESS_TOKEN, ACCESS_TOKEN_SECRET];

/// API keys and publishing credentials, read once at startup.
///
/// Unset and empty variables are both treated as absent. Missing API keys
/// only fail when a component asks for them; missing publishing credentials
/// turn publishing off.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    perplexity_api_key: Option<String>,
    openai_api_key: Option<String>,
    consumer_key: Option<String>,
    consumer_secret: Option<String>,
    access_token: Option<String>,
    access_token_secret: Option<String>,
}

impl Credentials {
    /// Read every credential from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read every credential through `lookup`.
    ///
    /// # Examples
    ///
    /// ```
    /// use statpost_bot::Credentials;
    ///
    /// let creds = Credentials::from_lookup(|name| match name {
    ///     "OPENAI_API_KEY" => Some("sk-test".to_string()),
    ///     "CONSUMER_KEY" => Some(String::new()),
    ///     _ => None,
    /// });
    /// assert!(creds.require_openai_key().is_ok());
    /// assert!(creds.require_perplexity_key().is_err());
    /// assert!(creds.publish_credentials().is_none());
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Self {
            perplexity_api_key: read(PERPLEXITY_API_KEY),
            openai_api_key: read(OPENAI_API_KEY),
            consumer_key: read(CONSUMER_KEY),
            consumer_secret: read(CONSUMER_SECRET),
            access_token: read(ACCESS_TOKEN),
            access_token_secret: read(ACCESS_TOKEN_SECRET),
        }
    }

    fn value(&self, name: &str) -> Option<&str> {
        let slot = match name {
            PERPLEXITY_API_KEY => &self.perplexity_api_key,
            OPENAI_API_KEY => &self.openai_api_key,
            CONSUMER_KEY => &self.consumer_key,
            CONSUMER_SECRET => &self.consumer_secret,
            ACCESS_TOKEN => &self.access_token,
            ACCESS_TOKEN_SECRET => &self.access_token_secret,
            _ => return None,
        };
        slot.as_deref()
    }

    #[track_caller]
    fn require(&self, name: &str) -> Result<&str, ConfigError> {
        self.value(name)
            .ok_or_else(|| ConfigError::missing(name))
    }

    /// Knowledge endpoint key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming `PERPLEXITY_API_KEY` when absent.
    #[track_caller]
    pub fn require_perplexity_key(&self) -> Result<&str, ConfigError> {
        self.require(PERPLEXITY_API_KEY)
    }

    /// Post writer key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming `OPENAI_API_KEY` when absent.
    #[track_caller]
    pub fn require_openai_key(&self) -> Result<&str, ConfigError> {
        self.require(OPENAI_API_KEY)
    }

    /// The four publishing credentials, if all are present.
    pub fn publish_credentials(&self) -> Option<PublishCredentials> {
        Some(PublishCredentials::new(
            self.consumer_key.as_deref()?,
            self.consumer_secret.as_deref()?,
            self.access_token.as_deref()?,
            self.access_token_secret.as_deref()?,
        ))
    }

    /// Names of absent publishing variables.
    pub fn missing_publish(&self) -> Vec<&'static str> {
        PUBLISH_VARIABLES
            .into_iter()
            .filter(|name| self.value(name).is_none())
            .collect()
    }

    /// Names of every absent variable.
    pub fn missing(&self) -> Vec<&'static str> {
        [PERPLEXITY_API_KEY, OPENAI_API_KEY]
            .into_iter()
            .filter(|name| self.value(name).is_none())
            .chain(self.missing_publish())
            .collect()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shown = |value: &Option<String>| if value.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Credentials")
            .field("perplexity_api_key", &shown(&self.perplexity_api_key))
            .field("openai_api_key", &shown(&self.openai_api_key))
            .field("consumer_key", &shown(&self.consumer_key))
            .field("consumer_secret", &shown(&self.consumer_secret))
            .field("access_token", &shown(&self.access_token))
            .field("access_token_secret", &shown(&self.access_token_secret))
            .finish()
    }
}
