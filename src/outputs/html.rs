//! Standalone HTML page for an [`Edition`].
//!
//! The page needs no external assets: audio and images are embedded as
//! `data:` URIs. The first story is shown as the trending highlight and the
//! rest follow under "Other News". Everything that came from a feed or a
//! model is escaped before it is written.

use crate::models::{Edition, ImageSlot, Story};
use crate::utils::slugify;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::error::Error;
use std::fmt::Write;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

/// Shown when a fetch produced nothing to display.
pub const NO_ARTICLES: &str = "No articles found for this category.";

const STYLE: &str = "body{font-family:sans-serif;max-width:52rem;margin:2rem auto;padding:0 1rem;line-height:1.5}\
.story{border-bottom:1px solid #ddd;padding:1rem 0}\
.trending{background:#fff3e6;border-radius:12px;padding:1rem 1.25rem}\
.summary{font-style:italic;border-left:4px solid #3498db;padding-left:.75rem}\
.notice{color:#8a6d3b}\
img{max-width:100%;border-radius:8px}";

fn write_audio(out: &mut String, audio_html: &str) {
    if audio_html.starts_with("<audio") {
        writeln!(out, "{audio_html}").unwrap();
    } else {
        writeln!(out, r#"<p class="notice">{}</p>"#, encode_text(audio_html)).unwrap();
    }
}

fn write_image(out: &mut String, image: &ImageSlot, caption: Option<&str>) {
    match image {
        ImageSlot::None => {}
        ImageSlot::Inline { data_uri } => {
            let alt = caption.unwrap_or("Article image");
            writeln!(
                out,
                r#"<figure><img src="{}" alt="{}">"#,
                encode_double_quoted_attribute(data_uri),
                encode_double_quoted_attribute(alt)
            )
            .unwrap();
            if let Some(caption) = caption {
                writeln!(out, "<figcaption>{}</figcaption>", encode_text(caption)).unwrap();
            }
            writeln!(out, "</figure>").unwrap();
        }
        ImageSlot::Unavailable { notice } => {
            writeln!(out, r#"<p class="notice">🖼️ {}</p>"#, encode_text(notice)).unwrap();
        }
    }
}

fn write_story(out: &mut String, number: usize, story: &Story, trending: bool) {
    let article = &story.article;
    let class = if trending { "story trending" } else { "story" };
    writeln!(out, r#"<article class="{class}">"#).unwrap();

    if trending {
        writeln!(out, "<h2>🔥 Trending News</h2>").unwrap();
        writeln!(out, "<h3>{}</h3>", encode_text(&article.title)).unwrap();
    } else {
        writeln!(out, "<h3>{number}. {}</h3>", encode_text(&article.title)).unwrap();
    }
    writeln!(
        out,
        "<p>🗓️ <strong>Published:</strong> {}</p>",
        encode_text(&article.published)
    )
    .unwrap();
    writeln!(
        out,
        r#"<div class="summary">✨ <b>AI Summary:</b><br>{}</div>"#,
        encode_text(&story.summary)
    )
    .unwrap();
    writeln!(
        out,
        "<p><strong>Sentiment:</strong> {}</p>",
        encode_text(&story.sentiment.label())
    )
    .unwrap();
    write_audio(out, &story.audio_html);

    if let Some(url) = article.url.as_deref().filter(|u| u.starts_with("http")) {
        let source = article
            .source_host()
            .map(|host| format!(" ({})", encode_text(&host)))
            .unwrap_or_default();
        writeln!(
            out,
            r#"<p><a href="{}" rel="noopener">👉 Read full article</a>{source}</p>"#,
            encode_double_quoted_attribute(url)
        )
        .unwrap();
    }

    let caption = trending.then_some("Trending Highlight");
    write_image(out, &story.image, caption);
    writeln!(out, "</article>").unwrap();
}

/// Render `edition` as a complete HTML document.
pub fn render_edition(edition: &Edition) -> String {
    let mut out = String::new();
    let title = format!("📰 {} News Reader", edition.category);

    writeln!(out, "<!DOCTYPE html>").unwrap();
    writeln!(out, r#"<html lang="en"><head><meta charset="utf-8">"#).unwrap();
    writeln!(out, "<title>{}</title>", encode_text(&title)).unwrap();
    writeln!(out, "<style>{STYLE}</style></head><body>").unwrap();
    writeln!(out, "<h1>{}</h1>", encode_text(&title)).unwrap();
    writeln!(
        out,
        "<p>🤖 AI-powered summaries · {} {} edition, {}</p>",
        encode_text(&edition.local_date),
        encode_text(&edition.time_of_day),
        encode_text(&edition.local_time)
    )
    .unwrap();

    if let Some(error) = &edition.error {
        writeln!(out, r#"<p class="notice">❌ {}</p>"#, encode_text(error)).unwrap();
    }

    match edition.stories.split_first() {
        None => {
            writeln!(out, r#"<p class="notice">⚠️ {NO_ARTICLES}</p>"#).unwrap();
        }
        Some((top, rest)) => {
            write_story(&mut out, 1, top, true);
            if !rest.is_empty() {
                writeln!(out, "<h2>📰📌 Other News</h2>").unwrap();
            }
            for (idx, story) in rest.iter().enumerate() {
                write_story(&mut out, idx + 2, story, false);
            }
        }
    }

    writeln!(out, "</body></html>").unwrap();
    out
}

/// Path of the HTML page for `edition` under `html_output_dir`.
pub fn edition_path(edition: &Edition, html_output_dir: &str) -> PathBuf {
    PathBuf::from(html_output_dir).join(format!(
        "{}_{}-{}.html",
        edition.local_date,
        edition.time_of_day,
        slugify(&edition.category)
    ))
}

/// Render and write the HTML page, returning its path.
///
/// # Errors
///
/// Directory creation or file write failures.
#[instrument(level = "info", skip_all, fields(%html_output_dir))]
pub async fn write_edition(
    edition: &Edition,
    html_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    fs::create_dir_all(html_output_dir).await?;
    let path = edition_path(edition, html_output_dir);
    fs::write(&path, render_edition(edition)).await?;
    info!(path = %path.display(), "Wrote HTML edition");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Article;
    use crate::sentiment::Sentiment;

    fn story(title: &str, audio_html: &str, image: ImageSlot) -> Story {
        Story {
            article: Article {
                title: title.into(),
                description: "Body".into(),
                url: Some("https://www.news.test/story".into()),
                published: "N/A".into(),
                image_url: None,
            },
            summary: "Short <summary> & more".into(),
            sentiment: Sentiment::Positive,
            polarity: 0.6,
            audio_html: audio_html.into(),
            image,
        }
    }

    fn edition(stories: Vec<Story>, error: Option<&str>) -> Edition {
        Edition {
            category: "Sports".into(),
            feed_url: "https://feeds.test/sports.xml".into(),
            local_date: "2025-10-17".into(),
            time_of_day: "morning".into(),
            local_time: "07:00:00".into(),
            stories,
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn first_story_is_trending_and_rest_are_numbered() {
        let html = render_edition(&edition(
            vec![
                story("Top", "<audio controls></audio>", ImageSlot::None),
                story("Second", "<audio controls></audio>", ImageSlot::None),
                story("Third", "<audio controls></audio>", ImageSlot::None),
            ],
            None,
        ));
        assert!(html.contains("🔥 Trending News"));
        assert!(html.contains("<h3>Top</h3>"));
        assert!(html.contains("Other News"));
        assert!(html.contains("<h3>2. Second</h3>"));
        assert!(html.contains("<h3>3. Third</h3>"));
    }

    #[test]
    fn feed_text_is_escaped() {
        let html = render_edition(&edition(
            vec![story("<script>alert(1)</script>", "<audio controls></audio>", ImageSlot::None)],
            None,
        ));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Short &lt;summary&gt; &amp; more"));
    }

    #[test]
    fn narration_errors_are_shown_as_text() {
        let html = render_edition(&edition(
            vec![story("Top", "⚠️ Voice failed: <boom>", ImageSlot::None)],
            None,
        ));
        assert!(html.contains(r#"<p class="notice">⚠️ Voice failed: &lt;boom&gt;</p>"#));
    }

    #[test]
    fn image_slots_render_inline_or_placeholder() {
        let html = render_edition(&edition(
            vec![
                story(
                    "Top",
                    "<audio controls></audio>",
                    ImageSlot::Inline {
                        data_uri: "data:image/png;base64,AAAA".into(),
                    },
                ),
                story(
                    "Second",
                    "<audio controls></audio>",
                    ImageSlot::Unavailable {
                        notice: "Image could not be loaded.".into(),
                    },
                ),
            ],
            None,
        ));
        assert!(html.contains(r#"<img src="data:image/png;base64,AAAA" alt="Trending Highlight">"#));
        assert!(html.contains("🖼️ Image could not be loaded."));
    }

    #[test]
    fn article_link_shows_source_host() {
        let html = render_edition(&edition(
            vec![story("Top", "<audio controls></audio>", ImageSlot::None)],
            None,
        ));
        assert!(html.contains(r#"<a href="https://www.news.test/story" rel="noopener">"#));
        assert!(html.contains("(news.test)"));
    }

    #[test]
    fn empty_edition_shows_warning_and_error() {
        let html = render_edition(&edition(vec![], Some("Error fetching feed: refused")));
        assert!(html.contains(NO_ARTICLES));
        assert!(html.contains("❌ Error fetching feed: refused"));
        assert!(!html.contains("Trending"));
    }

    #[test]
    fn path_combines_date_edition_and_category() {
        let path = edition_path(&edition(vec![], None), "/out/html");
        assert_eq!(path, PathBuf::from("/out/html/2025-10-17_morning-sports.html"));
    }
}
