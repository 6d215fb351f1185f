//! Layered configuration.
//!
//! Sources, lowest precedence first:
//! 1. Bundled defaults (`statpost.toml` next to this crate's manifest, compiled in)
//! 2. `~/.config/statpost/statpost.toml`
//! 3. `./statpost.toml`
//! 4. An explicit `--config` file
//! 5. `STATPOST__<SECTION>__<KEY>` environment variables
//!
//! Secrets are never part of this structure; see [`crate::Credentials`].

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use statpost_core::SelectionStrategy;
use statpost_error::{ConfigError, StatpostResult};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../statpost.toml");

/// Replace every `{topic}` placeholder in `template`.
pub fn fill_topic(template: &str, topic: &str) -> String {
    template.replace("{topic}", topic)
}

/// Knowledge endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsConfig {
    /// Chat-completion URL
    pub base_url: String,
    /// Online model to query
    pub model: String,
    /// Maximum tokens in the reply
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling cutoff
    pub top_p: f32,
    /// System role; `{topic}` is substituted
    pub system_prompt: String,
    /// Request for the batch; `{topic}` is substituted
    pub user_prompt: String,
}

impl StatisticsConfig {
    /// System prompt for `topic`.
    pub fn system_prompt_for(&self, topic: &str) -> String {
        fill_topic(&self.system_prompt, topic)
    }

    /// Batch request for `topic`.
    pub fn user_prompt_for(&self, topic: &str) -> String {
        fill_topic(&self.user_prompt, topic)
    }
}

/// Post writer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Chat-completion URL
    pub base_url: String,
    /// Model that writes posts
    pub model: String,
    /// Maximum tokens in the reply
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// System role; `{topic}` is substituted
    pub system_prompt: String,
    /// Editorial instruction added to every prompt
    pub angle: String,
    /// Advisory post length limit
    pub max_characters: u32,
    /// How many previous posts the writer sees
    pub recent_posts: usize,
}

/// Publishing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Create-post URL
    pub base_url: String,
    /// Publish at all; credentials are still required when true
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Republish the newest failed or pending record before anything else
    #[serde(default = "default_true")]
    pub resume_failed: bool,
    /// Publish attempts per post, the first one included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_true() -> bool {
    true
}

fn default_max_attempts() -> u32 {
    3
}

/// Where the two state documents live.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StorageBackend {
    /// S3 bucket
    S3,
    /// Local directory
    Filesystem,
    /// Process memory, lost on exit
    Memory,
}

/// State document storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend kind
    pub backend: StorageBackend,
    /// Bucket for the S3 backend
    pub bucket: String,
    /// Directory for the filesystem backend
    pub root: PathBuf,
    /// Key of the statistics document
    pub statistics_key: String,
    /// Key of the post history document
    pub history_key: String,
    /// S3 region override
    #[serde(default)]
    pub region: Option<String>,
    /// Custom S3 endpoint
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

/// History retention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Records kept after each append; 0 keeps everything
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_entries: 500 }
    }
}

/// Statistic selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Policy name
    #[serde(default)]
    pub strategy: SelectionStrategy,
}

/// Outbound HTTP settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl HttpConfig {
    /// Timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 60 }
    }
}

/// Complete non-secret configuration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatpostConfig {
    /// Subject of the statistics and posts
    pub topic: String,
    /// Knowledge endpoint
    pub statistics: StatisticsConfig,
    /// Post writer
    pub generation: GenerationConfig,
    /// Publishing
    pub publish: PublishConfig,
    /// State storage
    pub storage: StorageConfig,
    /// History retention
    #[serde(default)]
    pub history: HistoryConfig,
    /// Selection policy
    #[serde(default)]
    pub selection: SelectionConfig,
    /// HTTP clients
    #[serde(default)]
    pub http: HttpConfig,
}

impl StatpostConfig {
    /// Bundled defaults only.
    ///
    /// # Errors
    ///
    /// Returns error if the bundled file does not parse, which would be a
    /// packaging mistake.
    pub fn bundled() -> StatpostResult<Self> {
        Self::finish(Self::base())
    }

    /// Bundled defaults overlaid with a TOML snippet.
    ///
    /// # Errors
    ///
    /// Returns error if the snippet does not parse or the result is invalid.
    pub fn with_overrides(toml: &str) -> StatpostResult<Self> {
        Self::finish(Self::base().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    /// Load configuration from every source.
    ///
    /// `explicit` is a user-supplied file; it must exist.
    ///
    /// # Errors
    ///
    /// Returns error if a present file does not parse, `explicit` is
    /// missing, or the merged configuration fails validation.
    #[instrument(skip(explicit), fields(explicit = ?explicit))]
    pub fn load(explicit: Option<&Path>) -> StatpostResult<Self> {
        debug!("Loading configuration with precedence: env > --config > current dir > home dir > bundled defaults");

        let mut builder = Self::base();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/statpost/statpost.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("statpost").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("STATPOST")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        Self::finish(builder)
    }

    fn base() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> StatpostResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the offending setting.
    pub fn validate(&self) -> StatpostResult<()> {
        let required = [
            ("topic", &self.topic),
            ("statistics.base_url", &self.statistics.base_url),
            ("statistics.model", &self.statistics.model),
            ("generation.base_url", &self.generation.base_url),
            ("generation.model", &self.generation.model),
            ("publish.base_url", &self.publish.base_url),
            ("storage.statistics_key", &self.storage.statistics_key),
            ("storage.history_key", &self.storage.history_key),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid(name, "must not be empty").into());
            }
        }

        if self.storage.statistics_key == self.storage.history_key {
            return Err(ConfigError::new(
                "storage.statistics_key and storage.history_key must differ",
            )
            .into());
        }

        if self.storage.backend == StorageBackend::S3 && self.storage.bucket.trim().is_empty() {
            return Err(ConfigError::invalid("storage.bucket", "is required for the s3 backend").into());
        }

        if self.publish.max_attempts == 0 {
            return Err(ConfigError::invalid("publish.max_attempts", "must be at least 1").into());
        }

        if self.http.timeout_secs == 0 {
            return Err(ConfigError::invalid("http.timeout_secs", "must be positive").into());
        }

        Ok(())
    }
}
