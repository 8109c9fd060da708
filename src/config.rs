//! Runtime configuration: feed categories, HTTP identity and remote services.
//!
//! Configuration is read from an optional YAML file. Every key is optional
//! and falls back to the built-in defaults, which point at the Times of
//! India category feeds. The summarization API key is deliberately not part
//! of the file; it comes from the command line or `GENAI_API_KEY`.
//!
//! ```yaml
//! feeds:
//!   - name: Top Stories
//!     url: https://timesofindia.indiatimes.com/rssfeedstopstories.cms
//! user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)"
//! insecure_tls: false
//! genai:
//!   base_url: https://generativelanguage.googleapis.com
//!   model: gemini-1.5-flash
//!   temperature: 0.5
//! tts:
//!   base_url: https://translate.google.com
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, instrument};

/// Browser-like identity sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

const DEFAULT_FEEDS: &[(&str, &str)] = &[
    (
        "Top Stories",
        "https://timesofindia.indiatimes.com/rssfeedstopstories.cms",
    ),
    (
        "India",
        "https://timesofindia.indiatimes.com/rssfeeds/296589292.cms",
    ),
    (
        "Sports",
        "https://timesofindia.indiatimes.com/rssfeeds/4719148.cms",
    ),
    (
        "Technology",
        "https://timesofindia.indiatimes.com/rssfeeds/66949506.cms",
    ),
    (
        "Business",
        "https://timesofindia.indiatimes.com/rssfeeds/1898055.cms",
    ),
    (
        "Entertainment",
        "https://timesofindia.indiatimes.com/rssfeeds/1081479906.cms",
    ),
    (
        "Science",
        "https://timesofindia.indiatimes.com/rssfeeds/-2128672765.cms",
    ),
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("unknown category '{name}' (known: {known})")]
    UnknownCategory { name: String, known: String },

    #[error("config defines no feeds")]
    NoFeeds,
}

/// One selectable news category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GenAiConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TtsConfig {
    pub base_url: String,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.google.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Categories in display order.
    pub feeds: Vec<FeedSource>,
    pub user_agent: String,
    /// Skip TLS certificate verification for every request.
    pub insecure_tls: bool,
    pub genai: GenAiConfig,
    pub tts: TtsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feeds: DEFAULT_FEEDS
                .iter()
                .map(|&(name, url)| FeedSource {
                    name: name.to_string(),
                    url: url.to_string(),
                })
                .collect(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            insecure_tls: false,
            genai: GenAiConfig::default(),
            tts: TtsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse a YAML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on invalid YAML and [`ConfigError::NoFeeds`]
    /// when the document sets an empty feed list.
    pub fn from_yaml(yaml: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })?;
        if config.feeds.is_empty() {
            return Err(ConfigError::NoFeeds);
        }
        Ok(config)
    }

    /// Load the config file at `path`, or the defaults when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file can't be read, otherwise
    /// whatever [`AppConfig::from_yaml`] reports.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            info!("No config file given; using built-in defaults");
            return Ok(Self::default());
        };
        let shown = path.display().to_string();
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: shown.clone(),
                source,
            })?;
        let config = Self::from_yaml(&yaml, &shown)?;
        info!(path = %shown, feeds = config.feeds.len(), "Loaded configuration");
        Ok(config)
    }

    /// Feed source for a category, matched case-insensitively.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownCategory`] listing the configured names.
    pub fn feed(&self, category: &str) -> Result<&FeedSource, ConfigError> {
        self.feeds
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(category.trim()))
            .ok_or_else(|| ConfigError::UnknownCategory {
                name: category.to_string(),
                known: self.category_names().join(", "),
            })
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.feeds.iter().map(|f| f.name.as_str()).collect()
    }
}
