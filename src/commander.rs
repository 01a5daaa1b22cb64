//! Turns "go to section X" into a smooth scroll and an immediate highlight.
//!
//! The highlight is optimistic: the requested section becomes active before the scroll starts,
//! and even when its element is not mounted yet. Asking for an unloaded section is what makes the
//! page load it, so the request is remembered and finished once the element shows up.

use crate::host::Host;
use crate::resolver::ActiveSectionResolver;
use std::time::Instant;

/// Height of the sticky header the scroll target is compensated for.
pub const DEFAULT_HEADER_OFFSET: f64 = 120.0;

/// Called with the section id of every navigation request.
pub type NavigateCallback = Box<dyn FnMut(&str)>;

#[derive(Clone, Debug, PartialEq)]
/// What a navigation request did.
pub enum NavigateOutcome {
    /// The element was found and a smooth scroll to `target` started.
    Scrolling { target: f64 },
    /// The element is not mounted; the scroll happens once it is.
    Pending,
}

#[derive(Clone, Debug, PartialEq)]
struct PendingNavigation {
    section_id: String,
    anchor: String,
    expires: Instant,
}

/// Issues navigation scrolls and remembers the ones that could not be issued yet.
pub struct ScrollCommander {
    header_offset: f64,
    callback: Option<NavigateCallback>,
    pending: Option<PendingNavigation>,
    in_flight: bool,
}

impl Default for ScrollCommander {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_OFFSET)
    }
}

impl ScrollCommander {
    #[must_use]
    pub fn new(header_offset: f64) -> Self {
        Self {
            header_offset,
            callback: None,
            pending: None,
            in_flight: false,
        }
    }

    /// Registers the callback invoked on every navigation request, replacing any previous one.
    pub fn on_navigate(&mut self, callback: impl FnMut(&str) + 'static) {
        self.callback = Some(Box::new(callback));
    }

    #[must_use]
    pub fn header_offset(&self) -> f64 {
        self.header_offset
    }

    #[must_use]
    /// Section of a navigation still waiting for its element.
    pub fn pending(&self) -> Option<&str> {
        self.pending
            .as_ref()
            .map(|pending| pending.section_id.as_str())
    }

    #[must_use]
    /// Document offset that puts the element `header_offset` below the top of the viewport.
    pub fn scroll_target(&self, host: &dyn Host, anchor: &str) -> Option<f64> {
        let rect = host.element_rect(anchor)?;
        Some((rect.top + host.scroll_top() - self.header_offset).max(0.0))
    }

    /// Navigates to `section_id`, whose element is `anchor`.
    ///
    /// The section becomes active immediately. `pending_for` bounds how long a navigation to an
    /// unmounted element is remembered.
    pub fn navigate_to(
        &mut self,
        section_id: &str,
        anchor: &str,
        host: &mut dyn Host,
        resolver: &mut ActiveSectionResolver,
        now: Instant,
        pending_for: std::time::Duration,
    ) -> NavigateOutcome {
        resolver.override_active(section_id, now);
        if let Some(callback) = self.callback.as_mut() {
            callback(section_id);
        }

        if let Some(target) = self.scroll_target(host, anchor) {
            log::debug!("navigate to {section_id}: scrolling to {target:.0}");
            self.pending = None;
            self.in_flight = true;
            host.smooth_scroll_to(target);
            NavigateOutcome::Scrolling { target }
        } else {
            log::debug!("navigate to {section_id}: element not mounted yet");
            self.pending = Some(PendingNavigation {
                section_id: section_id.to_string(),
                anchor: anchor.to_string(),
                expires: now + pending_for,
            });
            NavigateOutcome::Pending
        }
    }

    #[must_use]
    /// When the pending navigation is given up, if there is one.
    pub fn pending_expiry(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.expires)
    }

    /// Drops a pending navigation whose time is up. Returns whether one was dropped.
    pub fn expire_pending(&mut self, now: Instant) -> bool {
        match &self.pending {
            Some(pending) if now >= pending.expires => {
                log::debug!("giving up on navigation to {}", pending.section_id);
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Finishes a pending navigation if its element has appeared.
    pub fn complete_pending(&mut self, host: &mut dyn Host, now: Instant) -> Option<f64> {
        if self.expire_pending(now) {
            return None;
        }
        let pending = self.pending.as_ref()?;
        let target = self.scroll_target(host, &pending.anchor)?;
        log::debug!(
            "element for {} mounted, scrolling to {target:.0}",
            pending.section_id
        );
        self.pending = None;
        self.in_flight = true;
        host.smooth_scroll_to(target);
        Some(target)
    }

    /// Whether a navigation scroll is still moving; clears the flag once the host has settled.
    pub fn settling(&mut self, host: &dyn Host) -> bool {
        if self.in_flight && !host.is_scroll_animating() {
            self.in_flight = false;
        }
        self.in_flight
    }

    /// Forgets any pending navigation.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.in_flight = false;
    }
}

#[cfg(test)]
#[path = "tests/commander.rs"]
mod tests;
