//! Visibility scoring for intersection batches.
//!
//! Each batch covers the elements whose intersection state recently changed. An intersecting
//! element scores the fraction of it that is visible, plus a flat bonus when its top sits in the
//! upper band of the viewport and a bonus proportional to how much of the viewport it covers.
//! Scores are not normalised: a section at the top that fills the screen can exceed 2.
//!
//! Reading progress per section is computed alongside, independently of the score.

use crate::geometry::VisibilityObservation;

#[derive(Clone, Copy, Debug, PartialEq)]
/// Weights of the scoring rules.
pub struct ScoreWeights {
    /// Lowest `rect.top` that still earns the top bonus.
    pub top_band_start: f64,
    /// Fraction of the viewport height where the top band ends (exclusive).
    pub top_band_fraction: f64,
    /// Flat bonus for an element whose top is in the top band.
    pub top_bonus: f64,
    /// Multiplier of `visible_height / viewport_height`.
    pub coverage_weight: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            top_band_start: -50.0,
            top_band_fraction: 0.3,
            top_bonus: 0.6,
            coverage_weight: 0.4,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Result of scoring one observation.
pub struct SectionScore {
    pub section_id: String,
    /// `None` when the element does not intersect the viewport.
    pub score: Option<f64>,
    /// `None` when the section has not been reached yet; keep the last known value.
    pub progress: Option<f64>,
}

#[derive(Clone, Debug, Default)]
/// Turns intersection batches into scores and per-section progress.
pub struct VisibilityScorer {
    weights: ScoreWeights,
}

impl VisibilityScorer {
    #[must_use]
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    #[must_use]
    /// Scores every observation of a batch, preserving batch order.
    pub fn score_batch(
        &self,
        batch: &[VisibilityObservation],
        viewport_height: f64,
    ) -> Vec<SectionScore> {
        batch
            .iter()
            .map(|observation| self.score(observation, viewport_height))
            .collect()
    }

    #[must_use]
    pub fn score(&self, observation: &VisibilityObservation, viewport_height: f64) -> SectionScore {
        let viewport_height = viewport_height.max(1.0);
        let score = observation
            .is_intersecting
            .then(|| self.visibility_score(observation, viewport_height));
        SectionScore {
            section_id: observation.section_id.clone(),
            score,
            progress: section_progress(observation, viewport_height),
        }
    }

    fn visibility_score(&self, observation: &VisibilityObservation, viewport_height: f64) -> f64 {
        let rect = &observation.rect;
        let visible = rect.visible_height(viewport_height);
        let mut score = visible / rect.guarded_height();

        let band_end = viewport_height * self.weights.top_band_fraction;
        if rect.top >= self.weights.top_band_start && rect.top < band_end {
            score += self.weights.top_bonus;
        }

        score += self.weights.coverage_weight * (visible / viewport_height);
        score
    }
}

/// Percentage of a section read, given where its top edge currently sits.
fn section_progress(observation: &VisibilityObservation, viewport_height: f64) -> Option<f64> {
    let rect = &observation.rect;
    let height = rect.guarded_height();
    let read = if rect.top < 0.0 {
        viewport_height + rect.top
    } else if rect.top < viewport_height {
        viewport_height - rect.top
    } else {
        return None;
    };
    Some((read / height * 100.0).clamp(0.0, 100.0))
}

#[cfg(test)]
#[path = "tests/scorer.rs"]
mod tests;
