//! The ordered list of sections available for navigation.
//!
//! An article registry walks the headings of one article container and prepends a synthetic
//! introduction pointing at the lead image. A feed registry tracks every item of a feed and
//! exposes a fixed-size navigation window starting at the current item.
//!
//! Neither kind assumes its elements exist. Element references are resolved opportunistically:
//! after mutations (debounced) and on a fixed retry schedule after mount, because content whose
//! size depends on images or fonts tends to settle later than the mutation that inserted it.

use crate::host::Host;
use crate::section::{Section, SectionKind};
use crate::timers::{RetrySchedule, Timers};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Id of the synthetic first section of an article.
pub const INTRODUCTION_ID: &str = "introduction";

/// Deepest heading level that becomes a section.
pub const MAX_HEADING_LEVEL: usize = 3;

/// Number of feed items shown in the navigation window.
pub const DEFAULT_FEED_WINDOW: usize = 4;

/// Quiet period after a mutation before references are looked up again.
pub const DEFAULT_MUTATION_DEBOUNCE: Duration = Duration::from_millis(100);

#[derive(Clone, Debug, PartialEq)]
/// One entry of a content feed, as supplied by the page's data layer.
pub struct FeedItem {
    /// Element id of the item's container.
    pub id: String,
    pub title: String,
    pub thumbnail: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
/// Where the sections come from.
pub enum Source {
    /// Headings of one article container.
    Article { container_id: String },
    /// A window of items over an ordered feed.
    Feed { window: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Recheck {
    Mutation,
    Retry,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Outcome of a resolution pass.
pub struct Resolution {
    /// References newly found or refreshed.
    pub resolved: usize,
    /// Sections whose element is still absent.
    pub missing: usize,
    /// Whether the section list itself changed.
    pub changed: bool,
}

#[derive(Debug)]
/// Ordered sections plus the bookkeeping to keep their element references current.
pub struct SectionRegistry {
    source: Source,
    sections: Vec<Section>,
    current: usize,
    timers: Timers<Recheck>,
    retries: RetrySchedule,
    mutation_debounce: Duration,
}

impl SectionRegistry {
    #[must_use]
    /// Registry for the headings of the article rendered in `container_id`.
    pub fn for_article(container_id: impl Into<String>) -> Self {
        Self::with_source(
            Source::Article {
                container_id: container_id.into(),
            },
            Vec::new(),
        )
    }

    #[must_use]
    /// Registry over a feed; the navigation window shows up to `window` items.
    pub fn for_feed(items: &[FeedItem], window: usize) -> Self {
        let sections = items
            .iter()
            .map(|item| {
                Section::new(item.id.clone(), item.title.clone(), SectionKind::Heading)
                    .with_thumbnail(item.thumbnail.clone())
            })
            .collect();
        Self::with_source(
            Source::Feed {
                window: window.max(1),
            },
            sections,
        )
    }

    fn with_source(source: Source, sections: Vec<Section>) -> Self {
        Self {
            source,
            sections,
            current: 0,
            timers: Timers::new(),
            retries: RetrySchedule::default(),
            mutation_debounce: DEFAULT_MUTATION_DEBOUNCE,
        }
    }

    #[must_use]
    pub fn with_retries(mut self, retries: RetrySchedule) -> Self {
        self.retries = retries;
        self
    }

    #[must_use]
    pub fn with_mutation_debounce(mut self, debounce: Duration) -> Self {
        self.mutation_debounce = debounce;
        self
    }

    #[must_use]
    pub fn source(&self) -> &Source {
        &self.source
    }

    #[must_use]
    /// Every tracked section, in registration order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|section| section.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    #[must_use]
    /// Sections offered by the navigation strip.
    pub fn nav_sections(&self) -> &[Section] {
        match self.source {
            Source::Article { .. } => &self.sections,
            Source::Feed { window } => {
                let start = self.current.min(self.sections.len());
                let end = (start + window).min(self.sections.len());
                &self.sections[start..end]
            }
        }
    }

    /// Moves a feed window so it starts at `active_id`. Returns whether the window moved.
    pub fn follow(&mut self, active_id: &str) -> bool {
        if !matches!(self.source, Source::Feed { .. }) {
            return false;
        }
        match self.position(active_id) {
            Some(index) if index != self.current => {
                log::debug!("feed window now starts at {active_id}");
                self.current = index;
                true
            }
            _ => false,
        }
    }

    /// Rebuilds an article's section list from its headings. Returns whether the list changed.
    ///
    /// Headings without an id are given `section-<index>`, written back to the host.
    pub fn discover(&mut self, host: &mut dyn Host) -> bool {
        let Source::Article { container_id } = &self.source else {
            return false;
        };
        let container_id = container_id.clone();
        let lead = host.lead_image(&container_id);
        let introduction = Section::new(INTRODUCTION_ID, "Introduction", SectionKind::Paragraph)
            .with_anchor(lead.as_ref().map_or(container_id.as_str(), |img| img.id.as_str()))
            .with_thumbnail(lead.as_ref().map(|img| img.src.clone()));

        let headings = host.headings(&container_id, MAX_HEADING_LEVEL);
        // Ids already on the page win over generated ones.
        let mut taken: HashSet<String> = headings
            .iter()
            .filter_map(|heading| heading.id.clone())
            .collect();
        taken.insert(INTRODUCTION_ID.to_string());

        let mut discovered = vec![introduction];
        let mut seen = HashSet::from([INTRODUCTION_ID.to_string()]);
        for (index, heading) in headings.into_iter().enumerate() {
            let id = if let Some(id) = heading.id {
                id
            } else {
                let id = unused_id(&format!("section-{index}"), &taken);
                taken.insert(id.clone());
                host.assign_id(heading.key, &id);
                id
            };
            if !seen.insert(id.clone()) {
                log::warn!("duplicate section id {id} in {container_id}, heading skipped");
                continue;
            }
            discovered.push(
                Section::new(id, heading.text, SectionKind::Heading).with_level(heading.level),
            );
        }

        let unchanged = discovered.len() == self.sections.len()
            && discovered
                .iter()
                .zip(&self.sections)
                .all(|(new, old)| new.id == old.id && new.anchor == old.anchor);
        if unchanged {
            return false;
        }
        log::debug!(
            "discovered {} sections in {container_id}",
            discovered.len()
        );
        self.sections = discovered;
        true
    }

    /// Looks up absent or stale element references, rediscovering article headings first.
    pub fn resolve(&mut self, host: &mut dyn Host) -> Resolution {
        let changed = self.discover(host);
        let generation = host.generation();
        let mut resolution = Resolution {
            changed,
            ..Resolution::default()
        };
        for section in &mut self.sections {
            if !section.needs_resolution(generation) {
                continue;
            }
            section.dom_ref = host.find_element(&section.anchor);
            if section.dom_ref.is_some() {
                resolution.resolved += 1;
            } else {
                resolution.missing += 1;
            }
        }
        log::trace!("resolution: {resolution:?}");
        resolution
    }

    /// Schedules the fixed re-checks that follow mounting.
    pub fn arm_retries(&mut self, now: Instant) {
        self.retries.arm(&mut self.timers, now, &Recheck::Retry);
    }

    /// Records a document mutation; coalesces with any recheck still waiting on a mutation.
    pub fn note_mutation(&mut self, now: Instant) {
        self.timers.cancel_where(|task| *task == Recheck::Mutation);
        self.timers
            .schedule(now, self.mutation_debounce, Recheck::Mutation);
    }

    /// Whether a recheck is due at `now`; consumes the due rechecks.
    pub fn take_due(&mut self, now: Instant) -> bool {
        !self.timers.drain_due(now).is_empty()
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    #[must_use]
    pub fn retry_horizon(&self) -> Duration {
        self.retries.horizon()
    }

    /// Discards every scheduled recheck.
    pub fn cancel_rechecks(&mut self) {
        self.timers.clear();
    }
}

/// `base`, or `base-2`, `base-3`, ... if it is already in use.
fn unused_id(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let id = format!("{base}-{n}");
        if !taken.contains(&id) {
            return id;
        }
        n += 1;
    }
}

#[cfg(test)]
#[path = "tests/registry.rs"]
mod tests;
