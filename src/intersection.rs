//! Threshold-based intersection reporting, as a browser's intersection observer does it.
//!
//! The watch remembers the last reported ratio of every observed element. On each check it only
//! reports elements whose ratio crossed one of the thresholds, or whose intersecting state
//! flipped, so a batch covers the recently changed elements rather than every element.

use crate::geometry::VisibilityObservation;
use crate::host::Host;
use std::collections::HashMap;

#[must_use]
/// Thresholds `0.0, 1/steps, ..., 1.0`.
pub fn even_thresholds(steps: u32) -> Vec<f64> {
    let steps = steps.max(1);
    (0..=steps).map(|i| f64::from(i) / f64::from(steps)).collect()
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct LastReport {
    ratio: f64,
    intersecting: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A section observed through the element it is anchored to.
pub struct Target {
    pub section_id: String,
    pub anchor: String,
}

#[derive(Clone, Debug)]
/// Observed targets and their last reported intersection state, keyed by section id.
pub struct IntersectionWatch {
    thresholds: Vec<f64>,
    observed: Vec<Target>,
    last: HashMap<String, LastReport>,
}

impl Default for IntersectionWatch {
    fn default() -> Self {
        Self::new(even_thresholds(10))
    }
}

impl IntersectionWatch {
    #[must_use]
    pub fn new(mut thresholds: Vec<f64>) -> Self {
        for threshold in &mut thresholds {
            *threshold = threshold.clamp(0.0, 1.0);
        }
        thresholds.sort_by(f64::total_cmp);
        thresholds.dedup();
        Self {
            thresholds,
            observed: Vec::new(),
            last: HashMap::new(),
        }
    }

    pub fn observe(&mut self, section_id: &str, anchor: &str) {
        if !self.observed.iter().any(|t| t.section_id == section_id) {
            self.observed.push(Target {
                section_id: section_id.to_string(),
                anchor: anchor.to_string(),
            });
        }
    }

    pub fn unobserve(&mut self, section_id: &str) {
        self.observed.retain(|t| t.section_id != section_id);
        self.last.remove(section_id);
    }

    /// Replaces the observed set, keeping history for targets that stay observed.
    pub fn observe_all(&mut self, targets: Vec<Target>) {
        self.last
            .retain(|id, _| targets.iter().any(|t| &t.section_id == id));
        self.observed = targets;
    }

    pub fn disconnect(&mut self) {
        self.observed.clear();
        self.last.clear();
    }

    #[must_use]
    pub fn observed(&self) -> &[Target] {
        &self.observed
    }

    /// Forgets every reported state so the next check reports all mounted elements.
    pub fn reset(&mut self) {
        self.last.clear();
    }

    /// Collects the batch of changed elements, in observation order.
    pub fn check(&mut self, host: &dyn Host) -> Vec<VisibilityObservation> {
        let viewport_height = host.viewport_height();
        let mut batch = Vec::new();
        for target in &self.observed {
            let id = &target.section_id;
            let Some(rect) = host.element_rect(&target.anchor) else {
                // Not mounted: report again from scratch once it appears.
                self.last.remove(id);
                continue;
            };
            let observation = VisibilityObservation::sample(id, rect, viewport_height);
            let report = LastReport {
                ratio: observation.intersection_ratio,
                intersecting: observation.is_intersecting,
            };
            let changed = self
                .last
                .get(id)
                .is_none_or(|previous| self.crossed(previous, &report));
            if changed {
                self.last.insert(id.clone(), report);
                batch.push(observation);
            }
        }
        batch
    }

    fn crossed(&self, previous: &LastReport, current: &LastReport) -> bool {
        if previous.intersecting != current.intersecting {
            return true;
        }
        self.thresholds.iter().any(|&t| {
            (previous.ratio < t && current.ratio >= t) || (previous.ratio >= t && current.ratio < t)
        })
    }
}

#[cfg(test)]
#[path = "tests/intersection.rs"]
mod tests;
