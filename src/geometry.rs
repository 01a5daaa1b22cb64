//! Element geometry as reported by the host, in pixels relative to the viewport.
//!
//! Vertical rects describe content blocks in the scrolling document; horizontal spans describe
//! items in the navigation strip. Both are plain values copied out of the host on each check.

#[derive(Clone, Copy, Debug, PartialEq)]
/// Viewport-relative bounding box of a content element.
pub struct Rect {
    /// Distance from the top of the viewport to the top of the element (negative once scrolled past).
    pub top: f64,
    /// Distance from the top of the viewport to the bottom of the element.
    pub bottom: f64,
    /// Element height, `bottom - top`.
    pub height: f64,
}

impl Rect {
    #[must_use]
    /// Builds a rect from its top edge and height.
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            bottom: top + height,
            height,
        }
    }

    #[must_use]
    /// Height used for ratios, never below one unit.
    pub fn guarded_height(&self) -> f64 {
        self.height.max(1.0)
    }

    #[must_use]
    /// Pixels of the element inside `[0, viewport_height)`, clamped to the element height.
    pub fn visible_height(&self, viewport_height: f64) -> f64 {
        let visible = self.bottom.min(viewport_height) - self.top.max(0.0);
        visible.clamp(0.0, self.height.max(0.0))
    }

    #[must_use]
    /// Whether any part of the element overlaps the viewport.
    pub fn intersects(&self, viewport_height: f64) -> bool {
        self.bottom > 0.0 && self.top < viewport_height && self.visible_height(viewport_height) > 0.0
    }

    #[must_use]
    /// Fraction of the element inside the viewport, in `[0, 1]`.
    pub fn intersection_ratio(&self, viewport_height: f64) -> f64 {
        (self.visible_height(viewport_height) / self.guarded_height()).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Horizontal extent of a box, viewport-relative.
pub struct Extent {
    pub left: f64,
    pub width: f64,
}

impl Extent {
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    /// Whether `inner` lies completely within this span.
    pub fn contains(&self, inner: &Extent) -> bool {
        inner.left >= self.left && inner.right() <= self.right()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Geometry of one navigation strip item together with its scroll container.
pub struct StripGeometry {
    /// The visible part of the horizontally scrolling container.
    pub container: Extent,
    /// The item, in the same coordinate space as `container`.
    pub item: Extent,
    /// Offset of the item from the start of the strip content (independent of scroll).
    pub item_offset_left: f64,
}

#[derive(Clone, Debug, PartialEq)]
/// One entry of an intersection batch: the state of a tracked element at check time.
pub struct VisibilityObservation {
    pub section_id: String,
    pub rect: Rect,
    pub is_intersecting: bool,
    pub intersection_ratio: f64,
}

impl VisibilityObservation {
    #[must_use]
    /// Samples an element's rect against the current viewport.
    pub fn sample(section_id: &str, rect: Rect, viewport_height: f64) -> Self {
        Self {
            section_id: section_id.to_string(),
            rect,
            is_intersecting: rect.intersects(viewport_height),
            intersection_ratio: rect.intersection_ratio(viewport_height),
        }
    }
}
