//! The page-lifetime owner of all section-tracking state.
//!
//! A [`SectionTracker`] is created when a view mounts and dropped (or explicitly unmounted) when
//! it goes away. Everything it registered with the host is released at that point, including
//! timers and a candidate still waiting out its quiet window, so nothing can touch a detached
//! view. Only two paths write the active section: the resolver's commit in [`SectionTracker::tick`]
//! and the optimistic override in [`SectionTracker::navigate_to`].

use crate::commander::{NavigateOutcome, ScrollCommander, DEFAULT_HEADER_OFFSET};
use crate::geometry::VisibilityObservation;
use crate::host::Host;
use crate::intersection::{even_thresholds, IntersectionWatch, Target};
use crate::nav_strip::NavStripAutoScroller;
use crate::progress::{ProgressTracker, DEFAULT_SCROLL_TOP_THRESHOLD};
use crate::registry::{
    FeedItem, SectionRegistry, DEFAULT_FEED_WINDOW, DEFAULT_MUTATION_DEBOUNCE,
};
use crate::resolver::{ActiveSectionResolver, Proposal, DEFAULT_DEBOUNCE, DEFAULT_MIN_VISIBILITY};
use crate::scorer::{ScoreWeights, VisibilityScorer};
use crate::section::Section;
use crate::subscription::{Channel, Subscription};
use crate::timers::RetrySchedule;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
/// Tunables of the tracker; the defaults are the behaviour of the article pages.
pub struct TrackerOptions {
    pub debounce: Duration,
    pub min_visibility: f64,
    pub weights: ScoreWeights,
    pub header_offset: f64,
    pub scroll_top_threshold: f64,
    pub feed_window: usize,
    pub retries: RetrySchedule,
    pub mutation_debounce: Duration,
    /// Intersection ratios at which a changed element is reported.
    pub thresholds: Vec<f64>,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            min_visibility: DEFAULT_MIN_VISIBILITY,
            weights: ScoreWeights::default(),
            header_offset: DEFAULT_HEADER_OFFSET,
            scroll_top_threshold: DEFAULT_SCROLL_TOP_THRESHOLD,
            feed_window: DEFAULT_FEED_WINDOW,
            retries: RetrySchedule::default(),
            mutation_debounce: DEFAULT_MUTATION_DEBOUNCE,
            thresholds: even_thresholds(10),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// What kind of page is being tracked.
pub enum Mode {
    /// One article; sections are its headings.
    Article { container_id: String },
    /// A feed of articles; sections are the articles.
    Feed { items: Vec<FeedItem> },
}

#[derive(Clone, Debug, Default, PartialEq)]
/// State exposed to presentation: the highlighted section and how far each section was read.
pub struct ActiveSectionState {
    pub active_section_id: Option<String>,
    /// Percentages in `[0, 100]`; entries are never removed while the tracker lives.
    pub section_progress: HashMap<String, f64>,
}

#[derive(Clone, Debug, Serialize)]
/// Reading state of one section, for reports.
pub struct SectionReport {
    pub id: String,
    pub title: String,
    pub progress: Option<f64>,
}

#[derive(Clone, Debug, Serialize)]
/// Serialisable summary of the tracker's state.
pub struct Snapshot {
    pub active_section_id: Option<String>,
    pub reading_progress: f64,
    pub sections: Vec<SectionReport>,
}

/// Wires the scorer, resolver, registry, commander, strip scroller and progress tracker to a host.
pub struct SectionTracker {
    options: TrackerOptions,
    registry: SectionRegistry,
    watch: IntersectionWatch,
    scorer: VisibilityScorer,
    resolver: ActiveSectionResolver,
    commander: ScrollCommander,
    strip: NavStripAutoScroller,
    progress: ProgressTracker,
    scores: HashMap<String, f64>,
    state: ActiveSectionState,
    subscriptions: Vec<Subscription>,
}

impl SectionTracker {
    /// Mounts a tracker on `host`: subscribes, builds and resolves the registry, arms the retry
    /// schedule and takes the first measurements.
    pub fn mount(host: &mut dyn Host, mode: Mode, options: TrackerOptions, now: Instant) -> Self {
        let subscriptions = Channel::ALL
            .iter()
            .map(|channel| host.listeners().subscribe(*channel))
            .collect();

        let registry = match &mode {
            Mode::Article { container_id } => SectionRegistry::for_article(container_id.clone()),
            Mode::Feed { items } => SectionRegistry::for_feed(items, options.feed_window),
        }
        .with_retries(options.retries.clone())
        .with_mutation_debounce(options.mutation_debounce);

        let mut tracker = Self {
            watch: IntersectionWatch::new(options.thresholds.clone()),
            scorer: VisibilityScorer::new(options.weights),
            resolver: ActiveSectionResolver::new(options.debounce, options.min_visibility),
            commander: ScrollCommander::new(options.header_offset),
            strip: NavStripAutoScroller::new(),
            progress: ProgressTracker::new(options.scroll_top_threshold),
            scores: HashMap::new(),
            state: ActiveSectionState::default(),
            subscriptions,
            registry,
            options,
        };

        let resolution = tracker.registry.resolve(host);
        log::debug!(
            "mounted with {} sections ({} missing)",
            tracker.registry.sections().len(),
            resolution.missing
        );
        tracker.registry.arm_retries(now);
        tracker.refresh_targets();
        tracker.on_scroll(host, now);
        tracker
    }

    fn refresh_targets(&mut self) {
        let targets = self
            .registry
            .sections()
            .iter()
            .map(|section| Target {
                section_id: section.id.clone(),
                anchor: section.anchor.clone(),
            })
            .collect();
        self.watch.observe_all(targets);
    }

    /// Handles a scroll of the document.
    pub fn on_scroll(&mut self, host: &mut dyn Host, now: Instant) {
        self.progress.update(host);
        if self.commander.settling(host) {
            self.resolver.extend_hold(now);
        }
        self.check_intersections(host, now);
    }

    fn check_intersections(&mut self, host: &dyn Host, now: Instant) {
        if !host.listeners().is_listening(Channel::Intersection) {
            return;
        }
        let batch = self.watch.check(host);
        if !batch.is_empty() {
            self.on_intersections(&batch, host.viewport_height(), now);
        }
    }

    /// Handles a viewport resize: every element is measured and reported again.
    pub fn on_resize(&mut self, host: &mut dyn Host, now: Instant) {
        self.watch.reset();
        self.strip.invalidate();
        self.on_scroll(host, now);
    }

    /// Feeds one intersection batch through the scorer into the resolver.
    pub fn on_intersections(
        &mut self,
        batch: &[VisibilityObservation],
        viewport_height: f64,
        now: Instant,
    ) -> Proposal {
        log::trace!("intersection batch of {}", batch.len());
        for scored in self.scorer.score_batch(batch, viewport_height) {
            match scored.score {
                Some(score) => {
                    self.scores.insert(scored.section_id.clone(), score);
                }
                None => {
                    self.scores.remove(&scored.section_id);
                }
            }
            if let Some(progress) = scored.progress {
                self.state
                    .section_progress
                    .insert(scored.section_id, progress);
            }
        }
        let ordered = self.registry.sections().iter().filter_map(|section| {
            self.scores
                .get(&section.id)
                .map(|score| (section.id.as_str(), *score))
        });
        self.resolver.propose(ordered, now)
    }

    /// Handles nodes inserted into or removed from the document.
    pub fn on_mutation(&mut self, now: Instant) {
        self.registry.note_mutation(now);
    }

    /// Runs everything due at `now`. Returns whether the active section changed.
    pub fn tick(&mut self, host: &mut dyn Host, now: Instant) -> bool {
        if self.registry.take_due(now) {
            let resolution = self.registry.resolve(host);
            if resolution.changed {
                self.refresh_targets();
            }
            self.commander.complete_pending(host, now);
            self.check_intersections(host, now);
        }
        self.commander.expire_pending(now);

        let committed = self.resolver.poll(now).map(str::to_string);
        let changed = committed.is_some();
        if let Some(id) = committed {
            self.registry.follow(&id);
            self.state.active_section_id = Some(id);
        }
        self.strip
            .sync(self.state.active_section_id.as_deref(), host);
        changed
    }

    /// Navigates to a section: it is highlighted now, and scrolled to as soon as it is mounted.
    pub fn navigate_to(&mut self, host: &mut dyn Host, id: &str, now: Instant) -> NavigateOutcome {
        let anchor = self
            .registry
            .get(id)
            .map_or_else(|| id.to_string(), |section| section.anchor.clone());
        let outcome = self.commander.navigate_to(
            id,
            &anchor,
            host,
            &mut self.resolver,
            now,
            self.registry.retry_horizon(),
        );
        self.registry.follow(id);
        self.state.active_section_id = Some(id.to_string());
        self.strip.sync(Some(id), host);
        outcome
    }

    /// Navigates to the section `offset` positions away from the active one.
    pub fn navigate_relative(
        &mut self,
        host: &mut dyn Host,
        offset: isize,
        now: Instant,
    ) -> Option<NavigateOutcome> {
        let sections = self.registry.sections();
        let current = self
            .state
            .active_section_id
            .as_deref()
            .and_then(|id| self.registry.position(id))
            .unwrap_or(0);
        let target = current.checked_add_signed(offset)?;
        let id = sections.get(target)?.id.clone();
        Some(self.navigate_to(host, &id, now))
    }

    /// Centers the active strip item again, after the strip's items were rebuilt.
    pub fn recenter_strip(&mut self, host: &mut dyn Host) {
        self.strip.invalidate();
        self.strip
            .sync(self.state.active_section_id.as_deref(), host);
    }

    pub fn scroll_to_top(&mut self, host: &mut dyn Host) {
        self.progress.scroll_to_top(host);
    }

    /// Registers the callback invoked on every navigation request.
    pub fn on_navigate(&mut self, callback: impl FnMut(&str) + 'static) {
        self.commander.on_navigate(callback);
    }

    #[must_use]
    /// Earliest instant at which [`SectionTracker::tick`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.resolver.pending_deadline(),
            self.registry.next_deadline(),
            self.commander.pending_expiry(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    #[must_use]
    pub fn active_section_id(&self) -> Option<&str> {
        self.state.active_section_id.as_deref()
    }

    #[must_use]
    pub fn section_progress(&self) -> &HashMap<String, f64> {
        &self.state.section_progress
    }

    #[must_use]
    pub fn state(&self) -> &ActiveSectionState {
        &self.state
    }

    #[must_use]
    pub fn reading_progress(&self) -> f64 {
        self.progress.progress()
    }

    #[must_use]
    pub fn show_scroll_top(&self) -> bool {
        self.progress.show_scroll_top()
    }

    #[must_use]
    /// Sections offered by the navigation strip.
    pub fn nav_sections(&self) -> &[Section] {
        self.registry.nav_sections()
    }

    #[must_use]
    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    #[must_use]
    pub fn options(&self) -> &TrackerOptions {
        &self.options
    }

    #[must_use]
    pub fn pending_navigation(&self) -> Option<&str> {
        self.commander.pending()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            active_section_id: self.state.active_section_id.clone(),
            reading_progress: self.reading_progress(),
            sections: self
                .registry
                .sections()
                .iter()
                .map(|section| SectionReport {
                    id: section.id.clone(),
                    title: section.title.clone(),
                    progress: self.state.section_progress.get(&section.id).copied(),
                })
                .collect(),
        }
    }

    /// Tears the tracker down: releases every subscription and discards pending work.
    pub fn unmount(mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.dispose();
        }
        self.registry.cancel_rechecks();
        self.resolver.cancel_pending();
        self.commander.cancel();
        self.watch.disconnect();
        log::debug!("unmounted");
    }
}

#[cfg(test)]
#[path = "tests/tracker.rs"]
mod tests;
