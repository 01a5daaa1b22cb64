//! The seam between the tracker and whatever renders the document.
//!
//! In a browser this is the DOM; in the bundled reader it is the terminal layout in
//! [`crate::app_state`]. Geometry is in pixels, viewport-relative, exactly as a bounding client
//! rect would report it. Element lookup is by id and may fail at any time: content can be
//! lazily mounted after the tracker asks for it.

use crate::geometry::{Rect, StripGeometry};
use crate::section::ElementRef;
use crate::subscription::Listeners;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Opaque handle to a heading node, valid until the next mutation of the host.
pub struct NodeKey(pub usize, pub usize);

#[derive(Clone, Debug, PartialEq)]
/// A heading element found inside a container.
pub struct HeadingNode {
    pub key: NodeKey,
    /// 1 for `h1`, 2 for `h2`, and so on.
    pub level: usize,
    pub text: String,
    /// The element's id attribute, if it has one.
    pub id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// The image opening an article.
pub struct LeadImage {
    /// Element id of the image.
    pub id: String,
    /// Image source reference.
    pub src: String,
}

/// Read and write access to the rendered document.
pub trait Host {
    fn viewport_height(&self) -> f64;

    /// Current vertical scroll offset of the document.
    fn scroll_top(&self) -> f64;

    fn document_height(&self) -> f64;

    /// Bounding rect of the element with this id, if it is mounted.
    fn element_rect(&self, id: &str) -> Option<Rect>;

    /// Counter bumped on every structural change; element refs resolved earlier become stale.
    fn generation(&self) -> u64;

    /// Headings of level 1 to `max_level` inside the container `container_id`, in document order.
    fn headings(&self, container_id: &str, max_level: usize) -> Vec<HeadingNode>;

    /// The lead image of the container, if it has one.
    fn lead_image(&self, container_id: &str) -> Option<LeadImage>;

    /// Writes an id attribute onto a heading so it becomes addressable.
    fn assign_id(&mut self, node: NodeKey, id: &str);

    /// Starts a smooth scroll of the document to `top` (clamped by the host).
    fn smooth_scroll_to(&mut self, top: f64);

    /// Whether a programmatic smooth scroll is still under way.
    fn is_scroll_animating(&self) -> bool;

    /// Geometry of the navigation strip item for `id`, if the strip shows it.
    fn strip_geometry(&self, id: &str) -> Option<StripGeometry>;

    /// Starts a smooth horizontal scroll of the navigation strip to `left`.
    fn smooth_scroll_strip_to(&mut self, left: f64);

    fn listeners(&self) -> &Listeners;

    /// Resolves an element id into a reference tagged with the current generation.
    fn find_element(&self, id: &str) -> Option<ElementRef> {
        self.element_rect(id).map(|_| ElementRef {
            id: id.to_string(),
            generation: self.generation(),
        })
    }
}
