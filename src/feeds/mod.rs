//! Feed retrieval and normalization into [`Article`] records.
//!
//! The pipeline is fetch → parse → truncate → normalize:
//!
//! 1. [`fetch_articles`] downloads the feed with the shared HTTP client
//! 2. [`parse::parse_feed`] turns the bytes into [`parse::FeedEntry`] values
//! 3. at most `max_count` entries are kept, in feed order
//! 4. [`normalize_entry`] builds an [`Article`] from each entry, resolving
//!    its image through [`image::extract_image`]
//!
//! Failures never escape this module as errors. They come back as
//! [`FetchOutcome::Failed`] carrying the cause, so the caller can tell an
//! empty feed apart from an unreachable one.

pub mod image;
pub mod parse;
pub mod text;

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::models::Article;
use image::extract_image;
use parse::{parse_feed, FeedEntry};
use text::strip_html;

/// Sentinel used when an entry has no publication date.
pub const PUBLISHED_FALLBACK: &str = "N/A";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed server answered {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("document is not an RSS or Atom feed (root: {0})")]
    NotAFeed(String),
}

/// Result of one feed fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The feed had entries. Holds at most `max_count` of them.
    Articles(Vec<Article>),
    /// The feed was retrieved and parsed but had no entries.
    Empty,
    /// Transport, status or parse failure. No articles.
    Failed(FeedError),
}

impl FetchOutcome {
    pub fn articles(&self) -> &[Article] {
        match self {
            FetchOutcome::Articles(articles) => articles,
            FetchOutcome::Empty | FetchOutcome::Failed(_) => &[],
        }
    }

    pub fn into_articles(self) -> Vec<Article> {
        match self {
            FetchOutcome::Articles(articles) => articles,
            FetchOutcome::Empty | FetchOutcome::Failed(_) => Vec::new(),
        }
    }

    /// Human-readable error for the failed case.
    pub fn error_message(&self) -> Option<String> {
        match self {
            FetchOutcome::Failed(e) => Some(format!("Error fetching feed: {e}")),
            _ => None,
        }
    }
}

/// Build an [`Article`] from a parsed entry.
pub fn normalize_entry(entry: &FeedEntry) -> Article {
    let raw_description = entry
        .summary
        .as_deref()
        .or(entry.content.as_deref())
        .unwrap_or("");

    Article {
        title: entry.title.clone().unwrap_or_default(),
        description: strip_html(raw_description),
        url: entry.link.clone(),
        published: entry
            .published
            .clone()
            .unwrap_or_else(|| PUBLISHED_FALLBACK.to_string()),
        image_url: extract_image(entry),
    }
}

/// Normalize already-parsed entries, keeping at most `max_count` in order.
pub fn normalize_entries(entries: &[FeedEntry], max_count: usize) -> Vec<Article> {
    entries.iter().take(max_count).map(normalize_entry).collect()
}

async fn download(client: &Client, feed_url: &str) -> Result<Vec<u8>, FeedError> {
    let response = client.get(feed_url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::Status {
            status,
            url: feed_url.to_string(),
        });
    }
    Ok(response.bytes().await?.to_vec())
}

/// Fetch `feed_url` and return up to `max_count` normalized articles.
///
/// Never fails outright: network, DNS, status and parse errors are logged
/// and reported through [`FetchOutcome::Failed`].
#[instrument(level = "info", skip(client))]
pub async fn fetch_articles(client: &Client, feed_url: &str, max_count: usize) -> FetchOutcome {
    let bytes = match download(client, feed_url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "Feed download failed");
            return FetchOutcome::Failed(e);
        }
    };
    debug!(bytes = bytes.len(), "Downloaded feed");

    let entries = match parse_feed(&bytes) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "Feed could not be parsed");
            return FetchOutcome::Failed(e);
        }
    };

    let articles = normalize_entries(&entries, max_count);
    info!(
        entries = entries.len(),
        kept = articles.len(),
        "Normalized feed entries"
    );
    if entries.is_empty() {
        FetchOutcome::Empty
    } else {
        FetchOutcome::Articles(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn rss_with_items(count: usize) -> String {
        let items: String = (1..=count)
            .map(|i| {
                format!(
                    "<item><title>Story {i}</title><link>https://news.test/{i}</link>\
                     <description>&lt;p&gt;Body &lt;b&gt;{i}&lt;/b&gt;&lt;/p&gt;</description>\
                     <pubDate>Fri, 17 Oct 2025 0{}:00:00 GMT</pubDate></item>",
                    i % 10
                )
            })
            .collect();
        format!(r#"<?xml version="1.0"?><rss version="2.0"><channel><title>T</title>{items}</channel></rss>"#)
    }

    async fn serve(body: String) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/rss+xml")
                    .set_body_string(body),
            )
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn normalize_entry_fills_fallbacks() {
        let article = normalize_entry(&FeedEntry::default());
        assert_eq!(article.title, "");
        assert_eq!(article.description, "");
        assert_eq!(article.url, None);
        assert_eq!(article.published, "N/A");
        assert_eq!(article.image_url, None);
    }

    #[test]
    fn normalize_entry_prefers_summary_over_content() {
        let entry = FeedEntry {
            summary: Some("<p>From summary</p>".into()),
            content: Some("<p>From content</p>".into()),
            ..FeedEntry::default()
        };
        assert_eq!(normalize_entry(&entry).description, "From summary");

        let entry = FeedEntry {
            content: Some("<div>Only <i>content</i></div>".into()),
            ..FeedEntry::default()
        };
        assert_eq!(normalize_entry(&entry).description, "Only content");
    }

    #[test]
    fn normalize_entry_copies_fields_verbatim() {
        let entry = FeedEntry {
            title: Some("  Spaced  Title ".into()),
            link: Some("https://news.test/a".into()),
            published: Some("yesterday-ish".into()),
            summary: Some(r#"<img src="https://img.test/a.jpg">Caption"#.into()),
            ..FeedEntry::default()
        };
        let article = normalize_entry(&entry);
        assert_eq!(article.title, "  Spaced  Title ");
        assert_eq!(article.url.as_deref(), Some("https://news.test/a"));
        assert_eq!(article.published, "yesterday-ish");
        assert_eq!(article.image_url.as_deref(), Some("https://img.test/a.jpg"));
        assert_eq!(article.description, "Caption");
    }

    #[tokio::test]
    async fn fewer_entries_than_limit_returns_all_in_order() {
        let server = serve(rss_with_items(3)).await;
        let client = Client::new();
        let outcome = fetch_articles(&client, &format!("{}/feed.xml", server.uri()), 5).await;

        let titles: Vec<_> = outcome.articles().iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["Story 1", "Story 2", "Story 3"]);
    }

    #[tokio::test]
    async fn limit_truncates_to_first_entries() {
        let server = serve(rss_with_items(10)).await;
        let client = Client::new();
        let outcome = fetch_articles(&client, &format!("{}/feed.xml", server.uri()), 2).await;

        let articles = outcome.into_articles();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Story 1");
        assert_eq!(articles[1].title, "Story 2");
        assert_eq!(articles[1].url.as_deref(), Some("https://news.test/2"));
    }

    #[tokio::test]
    async fn descriptions_are_plain_text() {
        let server = serve(rss_with_items(4)).await;
        let client = Client::new();
        let outcome = fetch_articles(&client, &format!("{}/feed.xml", server.uri()), 10).await;

        assert_eq!(outcome.articles().len(), 4);
        for article in outcome.articles() {
            assert!(!article.description.contains('<'));
            assert!(!article.description.contains('>'));
            assert!(article.description.starts_with("Body "));
        }
    }

    #[tokio::test]
    async fn sends_configured_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64)"))
            .respond_with(ResponseTemplate::new(200).set_body_string(rss_with_items(1)))
            .mount(&server)
            .await;

        let client = crate::http::build_client(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64)",
            false,
        )
        .unwrap();
        let outcome = fetch_articles(&client, &server.uri(), 5).await;
        assert_eq!(outcome.articles().len(), 1);
    }

    #[tokio::test]
    async fn empty_feed_is_distinguished_from_failure() {
        let server = serve(rss_with_items(0)).await;
        let client = Client::new();
        let outcome = fetch_articles(&client, &format!("{}/feed.xml", server.uri()), 5).await;
        assert!(matches!(outcome, FetchOutcome::Empty));
        assert!(outcome.error_message().is_none());
    }

    #[tokio::test]
    async fn zero_limit_still_reports_a_populated_feed() {
        let server = serve(rss_with_items(3)).await;
        let client = Client::new();
        let outcome = fetch_articles(&client, &format!("{}/feed.xml", server.uri()), 0).await;
        assert!(matches!(outcome, FetchOutcome::Articles(ref a) if a.is_empty()));
        assert!(outcome.error_message().is_none());
    }

    #[tokio::test]
    async fn non_success_status_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = Client::new();
        let outcome = fetch_articles(&client, &format!("{}/missing.xml", server.uri()), 5).await;
        assert!(matches!(
            outcome,
            FetchOutcome::Failed(FeedError::Status { status, .. }) if status.as_u16() == 404
        ));
        assert!(outcome.articles().is_empty());
    }

    #[tokio::test]
    async fn malformed_document_yields_no_articles() {
        let server = serve("<html><body>Service unavailable</body></html>".into()).await;
        let client = Client::new();
        let outcome = fetch_articles(&client, &format!("{}/feed.xml", server.uri()), 5).await;
        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert!(outcome.into_articles().is_empty());
    }

    #[tokio::test]
    async fn unreachable_host_returns_empty_failure() {
        let client = Client::new();
        let outcome = fetch_articles(&client, "http://127.0.0.1:1/feed.xml", 5).await;
        assert!(matches!(outcome, FetchOutcome::Failed(FeedError::Http(_))));
        let message = outcome.error_message().expect("failure has a message");
        assert!(message.starts_with("Error fetching feed"));
        assert!(outcome.articles().is_empty());
    }
}
