//! Data models for normalized articles and the rendered edition.
//!
//! - [`Article`]: one feed entry after normalization
//! - [`Story`]: an article enriched with summary, sentiment, audio and image
//! - [`Edition`]: every story produced by one run for one category

use serde::{Deserialize, Serialize};

use crate::sentiment::Sentiment;

/// A feed entry reduced to what the reader displays.
///
/// `description` is always plain text. `published` is whatever the feed
/// supplied, or `"N/A"`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub published: String,
    pub image_url: Option<String>,
}

/// What to show in place of an article image.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageSlot {
    /// The feed offered no image.
    None,
    /// Image downloaded and embedded as a `data:` URI.
    Inline { data_uri: String },
    /// An image URL existed but could not be loaded.
    Unavailable { notice: String },
}

/// An article with its generated extras.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Story {
    pub article: Article,
    pub summary: String,
    pub sentiment: Sentiment,
    pub polarity: f32,
    /// Inline `<audio>` markup, or the narration error message.
    pub audio_html: String,
    pub image: ImageSlot,
}

/// The output of one run for one category.
///
/// # Edition Naming
///
/// `time_of_day` is `"morning"` (00:00-08:00), `"afternoon"` (08:00-16:00)
/// or `"evening"` (16:00-24:00).
#[derive(Debug, Deserialize, Serialize)]
pub struct Edition {
    pub category: String,
    pub feed_url: String,
    /// `YYYY-MM-DD`.
    pub local_date: String,
    pub time_of_day: String,
    pub local_time: String,
    pub stories: Vec<Story>,
    /// Set when the feed could not be fetched or parsed.
    pub error: Option<String>,
}

impl Article {
    /// Host of the article link without a leading `www.`, for display.
    pub fn source_host(&self) -> Option<String> {
        let parsed = url::Url::parse(self.url.as_deref()?).ok()?;
        let host = parsed.host_str()?;
        Some(host.trim_start_matches("www.").to_string())
    }
}
