//! HTML to plain-text conversion for article descriptions.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

fn fragment_text(html: &str) -> String {
    Html::parse_fragment(html).root_element().text().collect()
}

/// Strip every tag from `html` and return readable plain text.
///
/// Entities are decoded by the HTML parser. Feeds that escape their markup
/// twice decode to literal tags on the first pass, so one more pass is made
/// when angle brackets survive. Whatever angle brackets are still left are
/// dropped, so the output never contains `<` or `>`.
pub fn strip_html(html: &str) -> String {
    let mut text = fragment_text(html);
    if text.contains('<') {
        text = fragment_text(&text);
    }
    let text: String = text.chars().filter(|c| !matches!(c, '<' | '>')).collect();
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}
