//! Articles as an ordered list of content blocks.
//!
//! Blocks are what the reader lays out and what headings-based navigation points at. Inline
//! markup is flattened to plain text when a block is built; an image standing alone in a
//! paragraph becomes an image block, and an image opening the article is its lead image.

use crate::registry::FeedItem;
use crate::section::SectionKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockKind {
    /// ATX heading with its level.
    Heading(usize),
    Paragraph,
    Quote,
    /// A spec sheet (table), kept line for line.
    Specs,
    /// A standalone image with its source.
    Image { src: String },
}

impl BlockKind {
    #[must_use]
    pub fn section_kind(&self) -> SectionKind {
        match self {
            Self::Heading(_) => SectionKind::Heading,
            Self::Quote => SectionKind::Quote,
            Self::Specs => SectionKind::Specs,
            Self::Paragraph | Self::Image { .. } => SectionKind::Paragraph,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One block of article content.
pub struct Block {
    pub kind: BlockKind,
    /// Plain text; alt text for images, raw rows for spec sheets.
    pub text: String,
    /// Element id, from a `{#id}` suffix on headings or assigned later by navigation.
    pub id: Option<String>,
}

impl Block {
    #[must_use]
    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            id: None,
        }
    }

    #[must_use]
    pub fn heading_level(&self) -> Option<usize> {
        match self.kind {
            BlockKind::Heading(level) => Some(level),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// A loaded article.
pub struct Article {
    /// Element id of the article container.
    pub id: String,
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Article {
    #[must_use]
    /// Builds an article titled by its first level-1 heading, or by `fallback_title`.
    pub fn new(id: impl Into<String>, fallback_title: &str, blocks: Vec<Block>) -> Self {
        let title = blocks
            .iter()
            .find(|block| block.heading_level() == Some(1))
            .map_or_else(|| fallback_title.to_string(), |block| block.text.clone());
        Self {
            id: id.into(),
            title,
            blocks,
        }
    }

    #[must_use]
    /// Index of the image opening the article: the first block, or the one after the title.
    pub fn lead_image_index(&self) -> Option<usize> {
        self.blocks
            .iter()
            .take(2)
            .position(|block| matches!(block.kind, BlockKind::Image { .. }))
    }

    #[must_use]
    pub fn lead_image_src(&self) -> Option<&str> {
        let block = &self.blocks[self.lead_image_index()?];
        match &block.kind {
            BlockKind::Image { src } => Some(src),
            _ => None,
        }
    }

    #[must_use]
    /// Element id of the lead image.
    pub fn lead_image_id(&self) -> String {
        format!("{}-lead", self.id)
    }

    #[must_use]
    pub fn feed_item(&self) -> FeedItem {
        FeedItem {
            id: self.id.clone(),
            title: self.title.clone(),
            thumbnail: self.lead_image_src().map(str::to_string),
        }
    }
}

#[must_use]
/// Lowercase, dash-separated form of `text` usable in element ids.
pub fn slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[must_use]
/// Splits a trailing `{#id}` off a heading.
pub fn split_heading_id(text: &str) -> (String, Option<String>) {
    let trimmed = text.trim();
    if let Some(open) = trimmed.rfind("{#") {
        if let Some(id) = trimmed[open + 2..].strip_suffix('}') {
            if !id.is_empty() && !id.contains(char::is_whitespace) {
                return (trimmed[..open].trim_end().to_string(), Some(id.to_string()));
            }
        }
    }
    (trimmed.to_string(), None)
}

#[must_use]
/// Parses a paragraph consisting of a single `![alt](src)` image.
pub fn parse_image(text: &str) -> Option<(String, String)> {
    let rest = text.trim().strip_prefix("![")?;
    let (alt, rest) = rest.split_once("](")?;
    let src = rest.strip_suffix(')')?;
    if src.contains(char::is_whitespace) || alt.contains(']') {
        return None;
    }
    Some((alt.to_string(), src.to_string()))
}

#[must_use]
/// Flattens inline markup: asterisks and code ticks are dropped, links keep their text.
pub fn plain_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some((label, after)) = rest[1..].split_once("](") {
                if let Some(close) = after.find(')') {
                    if !label.contains('[') {
                        out.push_str(label);
                        rest = &after[close + 1..];
                        continue;
                    }
                }
            }
        }
        if !matches!(c, '*' | '`') {
            out.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "tests/document.rs"]
mod tests;
