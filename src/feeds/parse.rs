//! Lenient RSS 2.0 / RSS 1.0 / Atom parsing into [`FeedEntry`] values.
//!
//! The parser walks namespace-resolved `quick-xml` events and only
//! understands the handful of elements the reader needs. Extension elements
//! are recognized by namespace URI, so `<m:content>` bound to the Media RSS
//! namespace counts the same as `<media:content>`. Markup nested inside a
//! text field (unescaped HTML in `<description>`, `type="xhtml"` Atom
//! summaries) is re-serialized into the field so that later HTML processing
//! still sees the tags.
//!
//! End-tag checking is disabled on purpose: real feeds routinely embed
//! unbalanced HTML such as `<br>` directly in item descriptions.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};
use html_escape::decode_html_entities;
use once_cell::sync::Lazy;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use regex::bytes::Regex;

use super::FeedError;

static XML_DECL_ENCODING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\A\s*<\?xml[^>]*?encoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#)
        .expect("static regex")
});

/// One media reference attached to an entry (`media:content`, `<enclosure>`,
/// or Atom `<link rel="enclosure">`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaRef {
    pub url: Option<String>,
}

/// A single syndicated item, with only the fields the reader cares about.
///
/// Every text field holds the raw value from the feed. `summary` and
/// `content` may contain HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    /// RSS `<description>` or Atom `<summary>`.
    pub summary: Option<String>,
    /// `content:encoded` or Atom `<content>`.
    pub content: Option<String>,
    pub published: Option<String>,
    pub media_content: Vec<MediaRef>,
    pub enclosures: Vec<MediaRef>,
}

/// Which vocabulary an element belongs to, after namespace resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Vocab {
    /// No namespace, RSS 1.0/0.9 or Atom.
    Core,
    Media,
    Content,
    DublinCore,
    Other,
}

impl Vocab {
    fn of(resolved: &ResolveResult<'_>) -> Self {
        match resolved {
            ResolveResult::Unbound => Vocab::Core,
            ResolveResult::Bound(Namespace(uri)) => Self::from_uri(uri),
            // Undeclared prefix: trust the conventional names.
            ResolveResult::Unknown(prefix) => match prefix.as_slice() {
                b"media" => Vocab::Media,
                b"content" => Vocab::Content,
                b"dc" => Vocab::DublinCore,
                b"atom" => Vocab::Core,
                _ => Vocab::Other,
            },
        }
    }

    fn from_uri(uri: &[u8]) -> Self {
        let uri = uri.strip_suffix(b"/").unwrap_or(uri);
        match uri {
            b"http://www.w3.org/2005/Atom"
            | b"http://purl.org/rss/1.0"
            | b"http://my.netscape.com/rdf/simple/0.9"
            | b"http://backend.userland.com/rss2" => Vocab::Core,
            b"http://search.yahoo.com/mrss" => Vocab::Media,
            b"http://purl.org/rss/1.0/modules/content" => Vocab::Content,
            b"http://purl.org/dc/elements/1.1" => Vocab::DublinCore,
            _ => Vocab::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Guid,
    Summary,
    Content,
    Published,
    Updated,
}

#[derive(Debug)]
struct Capture {
    field: Field,
    tag: String,
    buf: String,
}

/// Entry under construction plus the values that only resolve at `</item>`.
#[derive(Debug, Default)]
struct Pending {
    entry: FeedEntry,
    guid: Option<String>,
    updated: Option<String>,
}

impl Pending {
    fn store(&mut self, field: Field, value: String) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        let slot = match field {
            Field::Title => &mut self.entry.title,
            Field::Link => &mut self.entry.link,
            Field::Guid => &mut self.guid,
            Field::Summary => &mut self.entry.summary,
            Field::Content => &mut self.entry.content,
            Field::Published => &mut self.entry.published,
            Field::Updated => &mut self.updated,
        };
        if slot.is_none() {
            *slot = Some(value.to_string());
        }
    }

    fn finish(self) -> FeedEntry {
        let mut entry = self.entry;
        if entry.link.is_none() {
            entry.link = self.guid.filter(|g| g.starts_with("http"));
        }
        if entry.published.is_none() {
            entry.published = self.updated;
        }
        entry
    }
}

fn field_for(vocab: Vocab, local: &str) -> Option<Field> {
    match (vocab, local) {
        (Vocab::Core, "title") => Some(Field::Title),
        (Vocab::Core, "link") => Some(Field::Link),
        (Vocab::Core, "guid") => Some(Field::Guid),
        (Vocab::Core, "description" | "summary") => Some(Field::Summary),
        (Vocab::Core, "content") | (Vocab::Content, "encoded") => Some(Field::Content),
        (Vocab::Core, "pubDate" | "published") | (Vocab::DublinCore, "date") => {
            Some(Field::Published)
        }
        (Vocab::Core, "updated") => Some(Field::Updated),
        _ => None,
    }
}

fn is_entry(vocab: Vocab, local: &str) -> bool {
    vocab == Vocab::Core && (local == "item" || local == "entry")
}

fn qname_of(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn local_name_of(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attr(e: &BytesStart<'_>, key: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key.as_bytes())
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

fn media_ref(e: &BytesStart<'_>, url_key: &str) -> MediaRef {
    MediaRef {
        url: attr(e, url_key),
    }
}

/// Handle the attribute-only elements that can appear inside an entry.
/// Returns `true` when the element was consumed.
fn apply_attribute_element(
    pending: &mut Pending,
    vocab: Vocab,
    local: &str,
    e: &BytesStart<'_>,
) -> bool {
    match (vocab, local) {
        (Vocab::Media, "content") => {
            pending.entry.media_content.push(media_ref(e, "url"));
            true
        }
        (Vocab::Core, "enclosure") => {
            pending.entry.enclosures.push(media_ref(e, "url"));
            true
        }
        (Vocab::Core, "link") if attr(e, "href").is_some() => {
            match attr(e, "rel").as_deref() {
                None | Some("alternate") => {
                    if pending.entry.link.is_none() {
                        pending.entry.link = attr(e, "href");
                    }
                }
                Some("enclosure") => pending.entry.enclosures.push(media_ref(e, "href")),
                Some(_) => {}
            }
            true
        }
        _ => false,
    }
}

/// Encoding named by the `<?xml ... encoding="..."?>` declaration, if any.
///
/// A declaration readable as ASCII cannot really be UTF-16, so that label
/// maps to UTF-8 like every other ASCII-incompatible one.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(1024)];
    let label = XML_DECL_ENCODING.captures(head)?.get(1)?;
    Encoding::for_label(label.as_bytes()).map(Encoding::output_encoding)
}

/// Decode the raw document to UTF-8. A byte-order mark wins over the XML
/// declaration; undeclared documents are read as UTF-8.
fn decode_document(bytes: &[u8]) -> Cow<'_, str> {
    let encoding = declared_encoding(bytes).unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(bytes);
    text
}

/// Parse a feed document into its entries, in document order.
///
/// # Errors
///
/// Returns [`FeedError::Xml`] when the tokenizer gives up on the document,
/// and [`FeedError::NotAFeed`] when the root element is not `rss`, `feed`
/// or `rdf:RDF`.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<FeedEntry>, FeedError> {
    let xml = decode_document(bytes);
    let mut reader = NsReader::from_str(&xml);
    reader.config_mut().check_end_names = false;

    let mut entries = Vec::new();
    // Qualified and local name of the document element.
    let mut root: Option<(String, String)> = None;
    let mut pending: Option<Pending> = None;
    let mut capture: Option<Capture> = None;
    // Depth inside an Atom <source>, whose title/link describe another feed.
    let mut skip_depth = 0usize;

    loop {
        let (resolved, event) = reader.read_resolved_event()?;
        let vocab = Vocab::of(&resolved);
        match event {
            Event::Start(e) => {
                let qname = qname_of(&e);
                if root.is_none() {
                    root = Some((qname.clone(), local_name_of(&e)));
                }
                if let Some(cap) = capture.as_mut() {
                    cap.buf.push('<');
                    cap.buf.push_str(&String::from_utf8_lossy(&e));
                    cap.buf.push('>');
                    continue;
                }
                if skip_depth > 0 {
                    skip_depth += 1;
                    continue;
                }
                let local = local_name_of(&e);
                match pending.as_mut() {
                    None => {
                        if is_entry(vocab, &local) {
                            pending = Some(Pending::default());
                        }
                    }
                    Some(p) => {
                        if vocab == Vocab::Core && local == "source" {
                            skip_depth = 1;
                        } else if apply_attribute_element(p, vocab, &local, &e) {
                            // Attributes carry everything; children are ignored.
                        } else if let Some(field) = field_for(vocab, &local) {
                            capture = Some(Capture {
                                field,
                                tag: qname,
                                buf: String::new(),
                            });
                        }
                    }
                }
            }
            Event::Empty(e) => {
                if root.is_none() {
                    root = Some((qname_of(&e), local_name_of(&e)));
                }
                if let Some(cap) = capture.as_mut() {
                    cap.buf.push('<');
                    cap.buf.push_str(&String::from_utf8_lossy(&e));
                    cap.buf.push_str("/>");
                    continue;
                }
                if skip_depth > 0 {
                    continue;
                }
                if let Some(p) = pending.as_mut() {
                    apply_attribute_element(p, vocab, &local_name_of(&e), &e);
                }
            }
            Event::End(e) => {
                let qname = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let local = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                let closes_entry = is_entry(vocab, &local);

                if let Some(mut cap) = capture.take() {
                    if cap.tag != qname && !closes_entry {
                        cap.buf.push_str("</");
                        cap.buf.push_str(&qname);
                        cap.buf.push('>');
                        capture = Some(cap);
                        continue;
                    }
                    if let Some(p) = pending.as_mut() {
                        p.store(cap.field, std::mem::take(&mut cap.buf));
                    }
                    if !closes_entry {
                        continue;
                    }
                }
                if skip_depth > 0 {
                    skip_depth -= 1;
                    continue;
                }
                if closes_entry {
                    if let Some(p) = pending.take() {
                        entries.push(p.finish());
                    }
                }
            }
            Event::Text(e) => {
                if let Some(cap) = capture.as_mut() {
                    // HTML entities such as `&nbsp;` are not XML entities.
                    match e.unescape() {
                        Ok(text) => cap.buf.push_str(&text),
                        Err(_) => {
                            let raw = String::from_utf8_lossy(&e);
                            cap.buf.push_str(&decode_html_entities(&raw));
                        }
                    }
                }
            }
            Event::CData(e) => {
                if let Some(cap) = capture.as_mut() {
                    cap.buf.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match root {
        Some((_, local)) if matches!(local.as_str(), "rss" | "feed" | "RDF") => Ok(entries),
        Some((qname, _)) => Err(FeedError::NotAFeed(qname)),
        None => Err(FeedError::NotAFeed("empty document".to_string())),
    }
}
