//! An in-memory host with hand-placed elements, for driving the tracker in tests.

use crate::geometry::{Extent, Rect, StripGeometry};
use crate::host::{HeadingNode, Host, LeadImage, NodeKey};
use crate::subscription::Listeners;
use std::collections::HashMap;

pub struct FakeHost {
    pub viewport_height: f64,
    pub scroll_top: f64,
    pub document_height: f64,
    /// Element id to (document top, height).
    pub elements: HashMap<String, (f64, f64)>,
    pub generation: u64,
    pub container: String,
    pub headings: Vec<HeadingNode>,
    /// Placement of each heading node, so assigned ids become addressable.
    pub heading_boxes: HashMap<NodeKey, (f64, f64)>,
    pub lead_image: Option<LeadImage>,
    pub assigned: Vec<(NodeKey, String)>,
    pub scrolls: Vec<f64>,
    pub animating: bool,
    pub strip_width: f64,
    pub strip_scroll: f64,
    /// Strip item id to (offset from strip start, width).
    pub strip_items: HashMap<String, (f64, f64)>,
    pub strip_scrolls: Vec<f64>,
    pub listeners: Listeners,
}

impl FakeHost {
    pub fn new(viewport_height: f64, document_height: f64) -> Self {
        Self {
            viewport_height,
            scroll_top: 0.0,
            document_height,
            elements: HashMap::new(),
            generation: 0,
            container: "article".to_string(),
            headings: Vec::new(),
            heading_boxes: HashMap::new(),
            lead_image: None,
            assigned: Vec::new(),
            scrolls: Vec::new(),
            animating: false,
            strip_width: 300.0,
            strip_scroll: 0.0,
            strip_items: HashMap::new(),
            strip_scrolls: Vec::new(),
            listeners: Listeners::new(),
        }
    }

    pub fn with_element(mut self, id: &str, top: f64, height: f64) -> Self {
        self.elements.insert(id.to_string(), (top, height));
        self
    }

    /// Adds a heading; headings with an id are addressable straight away.
    pub fn with_heading(
        mut self,
        level: usize,
        text: &str,
        id: Option<&str>,
        top: f64,
        height: f64,
    ) -> Self {
        let key = NodeKey(0, self.headings.len());
        if let Some(id) = id {
            self.elements.insert(id.to_string(), (top, height));
        }
        self.heading_boxes.insert(key, (top, height));
        self.headings.push(HeadingNode {
            key,
            level,
            text: text.to_string(),
            id: id.map(str::to_string),
        });
        self
    }

    pub fn with_lead_image(mut self, id: &str, src: &str, top: f64, height: f64) -> Self {
        self.elements.insert(id.to_string(), (top, height));
        self.lead_image = Some(LeadImage {
            id: id.to_string(),
            src: src.to_string(),
        });
        self
    }

    pub fn with_strip_item(mut self, id: &str, offset: f64, width: f64) -> Self {
        self.strip_items.insert(id.to_string(), (offset, width));
        self
    }

    /// Mounts an element and bumps the generation, as a DOM insertion would.
    pub fn insert(&mut self, id: &str, top: f64, height: f64) {
        self.elements.insert(id.to_string(), (top, height));
        self.generation += 1;
    }
}

impl Host for FakeHost {
    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn document_height(&self) -> f64 {
        self.document_height
    }

    fn element_rect(&self, id: &str) -> Option<Rect> {
        let (top, height) = self.elements.get(id)?;
        Some(Rect::new(top - self.scroll_top, *height))
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn headings(&self, container_id: &str, max_level: usize) -> Vec<HeadingNode> {
        if container_id != self.container {
            return Vec::new();
        }
        self.headings
            .iter()
            .filter(|heading| heading.level <= max_level)
            .cloned()
            .collect()
    }

    fn lead_image(&self, container_id: &str) -> Option<LeadImage> {
        (container_id == self.container)
            .then(|| self.lead_image.clone())
            .flatten()
    }

    fn assign_id(&mut self, node: NodeKey, id: &str) {
        if let Some(heading) = self.headings.iter_mut().find(|h| h.key == node) {
            heading.id = Some(id.to_string());
        }
        if let Some(placement) = self.heading_boxes.get(&node) {
            self.elements.insert(id.to_string(), *placement);
        }
        self.assigned.push((node, id.to_string()));
    }

    fn smooth_scroll_to(&mut self, top: f64) {
        let max = (self.document_height - self.viewport_height).max(0.0);
        self.scrolls.push(top);
        self.scroll_top = top.clamp(0.0, max);
    }

    fn is_scroll_animating(&self) -> bool {
        self.animating
    }

    fn strip_geometry(&self, id: &str) -> Option<StripGeometry> {
        let (offset, width) = self.strip_items.get(id)?;
        Some(StripGeometry {
            container: Extent {
                left: 0.0,
                width: self.strip_width,
            },
            item: Extent {
                left: offset - self.strip_scroll,
                width: *width,
            },
            item_offset_left: *offset,
        })
    }

    fn smooth_scroll_strip_to(&mut self, left: f64) {
        self.strip_scrolls.push(left);
        self.strip_scroll = left;
    }

    fn listeners(&self) -> &Listeners {
        &self.listeners
    }
}
