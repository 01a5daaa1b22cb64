//! Keeps the active item of the horizontal navigation strip in view.

use crate::host::Host;

#[derive(Debug, Default)]
/// Centers the active strip item when it is clipped; reacts once per change of the active id.
pub struct NavStripAutoScroller {
    last_seen: Option<String>,
}

impl NavStripAutoScroller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reacts to the current active id. Returns the strip offset scrolled to, if any.
    pub fn sync(&mut self, active_id: Option<&str>, host: &mut dyn Host) -> Option<f64> {
        if self.last_seen.as_deref() == active_id {
            return None;
        }
        let Some(id) = active_id else {
            self.last_seen = None;
            return None;
        };
        // An item the strip does not show yet is looked up again on the next sync.
        let geometry = host.strip_geometry(id)?;
        self.last_seen = Some(id.to_string());
        if geometry.container.contains(&geometry.item) {
            return None;
        }
        let target = (geometry.item_offset_left - geometry.container.width / 2.0
            + geometry.item.width / 2.0)
            .max(0.0);
        log::trace!("centering strip item {id} at {target:.0}");
        host.smooth_scroll_strip_to(target);
        Some(target)
    }

    /// Forces the next `sync` to re-check even if the id did not change (e.g. after a resize).
    pub fn invalidate(&mut self) {
        self.last_seen = None;
    }
}

#[cfg(test)]
#[path = "tests/nav_strip.rs"]
mod tests;
