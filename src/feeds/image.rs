//! Representative-image lookup for a single feed entry.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::parse::FeedEntry;

static IMG_WITH_SRC: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img[src]").expect("static selector"));

/// Return a best-effort image URL for `entry`.
///
/// Resolution order, first match wins:
/// 1. the first `media:content` element's `url`
/// 2. the first enclosure's `url`
/// 3. the `src` of the first `<img>` inside the summary HTML
///
/// A non-empty media list decides the answer on its own, even when its first
/// element carries no `url`.
pub fn extract_image(entry: &FeedEntry) -> Option<String> {
    if let Some(media) = entry.media_content.first() {
        return media.url.clone();
    }
    if let Some(enclosure) = entry.enclosures.first() {
        return enclosure.url.clone();
    }
    let summary = entry.summary.as_deref()?;
    first_img_src(summary)
}

/// `src` of the first `<img>` in an HTML fragment. html5ever never rejects
/// input, so malformed markup simply finds nothing.
pub fn first_img_src(html: &str) -> Option<String> {
    let fragment = Html::parse_fragment(html);
    fragment
        .select(&IMG_WITH_SRC)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(str::to_string)
}
