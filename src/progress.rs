//! Whole-page reading progress and the scroll-to-top affordance.

use crate::host::Host;

/// Scroll offset beyond which the scroll-to-top control is offered.
pub const DEFAULT_SCROLL_TOP_THRESHOLD: f64 = 300.0;

#[must_use]
/// Percentage of the scrollable distance covered, 0 when the document fits the viewport.
pub fn reading_progress(scroll_top: f64, document_height: f64, viewport_height: f64) -> f64 {
    let scrollable = document_height - viewport_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    (scroll_top / scrollable * 100.0).clamp(0.0, 100.0)
}

#[derive(Clone, Debug)]
pub struct ProgressTracker {
    threshold: f64,
    progress: f64,
    show_scroll_top: bool,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_TOP_THRESHOLD)
    }
}

impl ProgressTracker {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            progress: 0.0,
            show_scroll_top: false,
        }
    }

    /// Recomputes from the host's current scroll position.
    pub fn update(&mut self, host: &dyn Host) {
        let scroll_top = host.scroll_top();
        self.progress = reading_progress(scroll_top, host.document_height(), host.viewport_height());
        self.show_scroll_top = scroll_top > self.threshold;
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn show_scroll_top(&self) -> bool {
        self.show_scroll_top
    }

    pub fn scroll_to_top(&self, host: &mut dyn Host) {
        host.smooth_scroll_to(0.0);
    }
}

#[cfg(test)]
#[path = "tests/progress.rs"]
mod tests;
