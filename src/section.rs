//! Section representation for tracked article content.
//!
//! A section is a unit of content that navigation can point at: a heading inside an article, or
//! a whole article inside a feed. Sections keep a stable id for the lifetime of the page view and
//! a non-owning reference to the element that renders them, which the host may not have mounted
//! yet.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Descriptive content type. Tracking treats every kind the same way.
pub enum SectionKind {
    Heading,
    Paragraph,
    Quote,
    Specs,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Reference to a host element, tagged with the host generation it was resolved at.
pub struct ElementRef {
    pub id: String,
    pub generation: u64,
}

#[derive(Clone, Debug, PartialEq)]
/// Trackable division of a page with a stable id and a lazily resolved element reference.
pub struct Section {
    /// Stable identifier for the lifetime of the page view.
    pub id: String,
    /// Element id the section points at; equal to `id` except for synthetic sections.
    pub anchor: String,
    /// Label shown in navigation.
    pub title: String,
    pub kind: SectionKind,
    /// Heading depth (1 for `h1`); 0 for synthetic sections and feed items.
    pub level: usize,
    /// Image shown next to the label, when the content has one.
    pub thumbnail: Option<String>,
    /// Element rendering this section, `None` until it is mounted.
    pub dom_ref: Option<ElementRef>,
}

impl Section {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: SectionKind) -> Self {
        let id = id.into();
        Self {
            anchor: id.clone(),
            id,
            title: title.into(),
            kind,
            level: 0,
            thumbnail: None,
            dom_ref: None,
        }
    }

    #[must_use]
    /// Points the section at a different element than its own id.
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = anchor.into();
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_thumbnail(mut self, thumbnail: Option<String>) -> Self {
        self.thumbnail = thumbnail;
        self
    }

    #[must_use]
    /// Whether the element reference must be looked up again at `generation`.
    pub fn needs_resolution(&self, generation: u64) -> bool {
        self.dom_ref
            .as_ref()
            .is_none_or(|element| element.generation < generation)
    }
}
