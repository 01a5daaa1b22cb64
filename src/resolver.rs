//! Reduces visibility scores to a single active section, without flicker.
//!
//! The best candidate of each batch is staged rather than committed. It only becomes the active
//! section once it has stayed the best candidate for the whole quiet window; a different
//! candidate restages and restarts the window. An explicit navigation commits at once and holds
//! automatic candidates off for its own settling window.
//!
//! ```text
//! batch ──> best > floor? ──no──> drop staged candidate, keep active
//!                │ yes
//!                ├── == active  ──> drop staged candidate
//!                ├── == staged  ──> keep deadline
//!                └── otherwise  ──> stage with deadline now + quiet window
//! poll(now) ──> staged && deadline passed ──> commit
//! ```

use std::time::{Duration, Instant};

/// Quiet window a candidate must survive before it is committed.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Scores at or below this never become active.
pub const DEFAULT_MIN_VISIBILITY: f64 = 0.1;

#[derive(Clone, Debug, PartialEq)]
struct Staged {
    id: String,
    deadline: Instant,
}

#[derive(Clone, Debug, PartialEq)]
/// What a batch did to the resolver.
pub enum Proposal {
    /// A navigation is settling; automatic candidates are ignored.
    Held,
    /// Nothing scored.
    Empty,
    /// The best score did not clear the visibility floor.
    BelowFloor,
    /// The best candidate is already active.
    Unchanged,
    /// The best candidate is waiting out the quiet window.
    Staged(String),
}

#[derive(Clone, Debug)]
/// Debounced reducer from score maps to the active section id.
pub struct ActiveSectionResolver {
    debounce: Duration,
    min_visibility: f64,
    active: Option<String>,
    staged: Option<Staged>,
    hold_until: Option<Instant>,
}

impl Default for ActiveSectionResolver {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE, DEFAULT_MIN_VISIBILITY)
    }
}

impl ActiveSectionResolver {
    #[must_use]
    pub fn new(debounce: Duration, min_visibility: f64) -> Self {
        Self {
            debounce,
            min_visibility,
            active: None,
            staged: None,
            hold_until: None,
        }
    }

    #[must_use]
    /// The committed, externally visible active section.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    #[must_use]
    pub fn staged(&self) -> Option<&str> {
        self.staged.as_ref().map(|staged| staged.id.as_str())
    }

    #[must_use]
    /// When the staged candidate is due, if there is one.
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.staged.as_ref().map(|staged| staged.deadline)
    }

    #[must_use]
    pub fn is_held(&self, now: Instant) -> bool {
        self.hold_until.is_some_and(|until| now < until)
    }

    /// Feeds the current score map, given in registration order.
    pub fn propose<'a, I>(&mut self, scores: I, now: Instant) -> Proposal
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        if self.is_held(now) {
            return Proposal::Held;
        }
        // A staged candidate only commits if it is still the best when its window ends.
        let Some((id, score)) = best_candidate(scores) else {
            self.staged = None;
            return Proposal::Empty;
        };
        if score <= self.min_visibility {
            self.staged = None;
            return Proposal::BelowFloor;
        }
        if self.active.as_deref() == Some(id) {
            self.staged = None;
            return Proposal::Unchanged;
        }
        match &self.staged {
            Some(staged) if staged.id == id => {}
            _ => {
                log::trace!("staging {id} (score {score:.3})");
                self.staged = Some(Staged {
                    id: id.to_string(),
                    deadline: now + self.debounce,
                });
            }
        }
        Proposal::Staged(id.to_string())
    }

    /// Commits the staged candidate if its quiet window has elapsed; returns the new active id.
    pub fn poll(&mut self, now: Instant) -> Option<&str> {
        if self.is_held(now) {
            return None;
        }
        let due = self
            .staged
            .as_ref()
            .is_some_and(|staged| staged.deadline <= now);
        if !due {
            return None;
        }
        let staged = self.staged.take()?;
        log::debug!("active section -> {}", staged.id);
        self.active = Some(staged.id);
        self.active.as_deref()
    }

    /// Commits `id` immediately and ignores automatic candidates for one quiet window.
    pub fn override_active(&mut self, id: &str, now: Instant) {
        log::debug!("active section -> {id} (navigation)");
        self.active = Some(id.to_string());
        self.staged = None;
        self.hold_until = Some(now + self.debounce);
    }

    /// Pushes the end of a running hold out to one quiet window after `now`.
    pub fn extend_hold(&mut self, now: Instant) {
        if let Some(until) = self.hold_until {
            self.hold_until = Some(until.max(now + self.debounce));
        }
    }

    /// Drops the staged candidate and any hold, keeping the committed id.
    pub fn cancel_pending(&mut self) {
        self.staged = None;
        self.hold_until = None;
    }
}

/// Highest score wins; on equal scores the earliest entry is kept.
pub fn best_candidate<'a, I>(scores: I) -> Option<(&'a str, f64)>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut best: Option<(&'a str, f64)> = None;
    for (id, score) in scores {
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((id, score));
        }
    }
    best
}

#[cfg(test)]
#[path = "tests/resolver.rs"]
mod tests;
