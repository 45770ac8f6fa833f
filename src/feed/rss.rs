//! Minimal RSS 2.0 reader that stops at the first `<item>`.

use super::types::FeedItem;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("{0}")]
    Malformed(String),

    #[error("feed has no items")]
    Empty,

    #[error("item has no image enclosure")]
    MissingImage,
}

/// Parse an RSS document and return its first item.
///
/// The image URL comes from the last `<enclosure>` whose `type` equals
/// `image_mime`, then any `image/*` enclosure, then the first `<media:content>`.
pub fn parse_latest(xml: &[u8], image_mime: &str) -> Result<FeedItem, ParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut root: Option<String> = None;
    let mut current_item: Option<ItemBuilder> = None;
    // Depth below <item>; only direct children map to fields.
    let mut depth = 0usize;
    let mut field: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = element_name(&e);
                if root.is_none() {
                    check_root(&name)?;
                    root = Some(name);
                } else if let Some(ref mut item) = current_item {
                    depth += 1;
                    if depth == 1 {
                        item.visit(&name, &e);
                        field = Some(name);
                    }
                } else if name == "item" {
                    current_item = Some(ItemBuilder::default());
                    depth = 0;
                }
            }
            Ok(Event::Empty(e)) => {
                let name = element_name(&e);
                if root.is_none() {
                    check_root(&name)?;
                    root = Some(name);
                } else if let Some(ref mut item) = current_item {
                    if depth == 0 {
                        item.visit(&name, &e);
                    }
                } else if name == "item" {
                    return ItemBuilder::default().build(image_mime);
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if current_item.is_some() {
                    if depth == 0 && name == "item" {
                        if let Some(item) = current_item.take() {
                            return item.build(image_mime);
                        }
                    }
                    if depth == 1 {
                        field = None;
                    }
                    depth = depth.saturating_sub(1);
                }
            }
            Ok(Event::Text(e)) => {
                if let (Some(item), Some(name)) = (current_item.as_mut(), field.as_deref()) {
                    let text = e
                        .unescape()
                        .map_err(|err| ParseError::Malformed(format!("bad text in <{}>: {}", name, err)))?;
                    item.push_text(name, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if let (Some(item), Some(name)) = (current_item.as_mut(), field.as_deref()) {
                    let text = String::from_utf8_lossy(&e.into_inner()).to_string();
                    item.push_text(name, &text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ParseError::Malformed(format!(
                    "XML parse error at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if root.is_none() {
        return Err(ParseError::Malformed("document contains no elements".to_string()));
    }
    if current_item.is_some() {
        return Err(ParseError::Malformed("unterminated <item>".to_string()));
    }
    Err(ParseError::Empty)
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

fn check_root(name: &str) -> Result<(), ParseError> {
    match name {
        "rss" | "rdf:RDF" => Ok(()),
        other => Err(ParseError::Malformed(format!(
            "unexpected root element <{}>",
            other
        ))),
    }
}

fn attribute(e: &BytesStart, key: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key.as_bytes())
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Default)]
struct ItemBuilder {
    title: String,
    link: String,
    description: String,
    pub_date: String,
    /// (url, mime type) in document order.
    enclosures: Vec<(String, String)>,
    media: Vec<String>,
}

impl ItemBuilder {
    fn visit(&mut self, name: &str, e: &BytesStart) {
        match name {
            "enclosure" => {
                if let Some(url) = attribute(e, "url") {
                    let mime = attribute(e, "type").unwrap_or_default();
                    self.enclosures.push((url, mime));
                }
            }
            "media:content" => {
                let is_image = attribute(e, "medium").is_some_and(|m| m == "image")
                    || attribute(e, "type").is_some_and(|t| t.starts_with("image/"));
                if let Some(url) = attribute(e, "url").filter(|_| is_image) {
                    self.media.push(url);
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, name: &str, text: &str) {
        let target = match name {
            "title" => &mut self.title,
            "link" => &mut self.link,
            "description" => &mut self.description,
            "pubDate" => &mut self.pub_date,
            _ => return,
        };
        if !target.is_empty() {
            target.push(' ');
        }
        target.push_str(text);
    }

    fn build(self, image_mime: &str) -> Result<FeedItem, ParseError> {
        let exact = self
            .enclosures
            .iter()
            .rev()
            .find(|(_, mime)| mime.eq_ignore_ascii_case(image_mime));
        let any_image = || {
            self.enclosures
                .iter()
                .rev()
                .find(|(_, mime)| mime.to_ascii_lowercase().starts_with("image/"))
        };
        let image_url = exact
            .or_else(any_image)
            .map(|(url, _)| url.clone())
            .or_else(|| self.media.first().cloned())
            .ok_or(ParseError::MissingImage)?;

        let published = chrono::DateTime::parse_from_rfc2822(self.pub_date.trim()).ok();
        if published.is_none() && !self.pub_date.is_empty() {
            tracing::debug!(pub_date = %self.pub_date, "unparseable pubDate");
        }

        Ok(FeedItem {
            image_url,
            description: plain_text(&self.description),
            title: non_empty(plain_text(&self.title)),
            link: non_empty(self.link.trim().to_string()),
            published,
        })
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Strip HTML tags, decode the handful of entities feeds put inside CDATA,
/// and collapse whitespace.
pub fn plain_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_tag = false;
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if in_tag {
            if c == '>' {
                in_tag = false;
            }
            continue;
        }
        // Only `<tag`, `</tag` and `<!...` open markup; a bare `<` is text.
        let opens_tag = c == '<'
            && chars
                .peek()
                .is_some_and(|n| n.is_ascii_alphabetic() || *n == '/' || *n == '!');
        if opens_tag {
            in_tag = true;
            out.push(' ');
        } else {
            out.push(c);
        }
    }
    let decoded = out
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
