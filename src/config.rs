//! Configuration to acknowledge reader preferences as well as set defaults.
//!
//! Specifically, we try to find a scrollspy.toml, and if present we load settings from there.
//! This provides the tracker's tunables, the reader's row geometry and file extension preferences.
//! Keys left out of the file keep their defaults.

use crate::timers::RetrySchedule;
use crate::tracker::TrackerOptions;
use facet::Facet;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// File looked up in the working directory by [`Config::load`].
pub const CONFIG_FILE: &str = "scrollspy.toml";

#[derive(Facet, Clone, Debug, PartialEq)]
/// User preferences loaded from scrollspy.toml or falling back to defaults.
pub struct Config {
    #[facet(default = 120.0)]
    /// Pixels left above a section when navigating to it, for a sticky header.
    pub header_offset: f64,
    #[facet(default = 100)]
    /// Quiet window before a new candidate becomes the active section.
    pub debounce_ms: u64,
    #[facet(default = 0.1)]
    /// Scores at or below this never become active.
    pub min_visibility: f64,
    #[facet(default = 300.0)]
    /// Scroll offset past which the scroll-to-top hint appears.
    pub scroll_top_threshold: f64,
    #[facet(default = 4)]
    /// Number of feed articles offered by the navigation strip.
    pub feed_window: usize,
    #[facet(default = vec![100, 500, 1000, 2000])]
    /// Delays after mount at which unresolved sections are looked up again.
    pub retry_delays_ms: Vec<u64>,
    #[facet(default = 20.0)]
    /// Pixel height of one terminal row.
    pub row_height: f64,
    #[facet(default = 16)]
    /// Frame interval while something is animating.
    pub frame_ms: u64,
    #[facet(default = 0.25)]
    /// Fraction of the remaining distance a smooth scroll covers per frame.
    pub scroll_speed: f64,
    #[facet(default = vec!["md".to_string()])]
    /// File suffixes to match when scanning directories.
    pub file_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            header_offset: 120.0,
            debounce_ms: 100,
            min_visibility: 0.1,
            scroll_top_threshold: 300.0,
            feed_window: 4,
            retry_delays_ms: vec![100, 500, 1000, 2000],
            row_height: 20.0,
            frame_ms: 16,
            scroll_speed: 0.25,
            file_extensions: vec!["md".to_string()],
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from scrollspy.toml if present.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    #[must_use]
    /// Load configuration from `path`, falling back to defaults if it is missing or malformed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Self::default();
        };
        if let Ok(config) = facet_toml::from_str::<Self>(&contents) {
            log::debug!("loaded configuration from {}", path.display());
            config
        } else {
            log::warn!("ignoring malformed {}, using defaults", path.display());
            Self::default()
        }
    }

    #[must_use]
    /// The tracker tunables this configuration describes.
    pub fn tracker_options(&self) -> TrackerOptions {
        TrackerOptions {
            debounce: Duration::from_millis(self.debounce_ms),
            min_visibility: self.min_visibility,
            header_offset: self.header_offset,
            scroll_top_threshold: self.scroll_top_threshold,
            feed_window: self.feed_window.max(1),
            retries: RetrySchedule::new(
                self.retry_delays_ms
                    .iter()
                    .copied()
                    .map(Duration::from_millis)
                    .collect(),
            ),
            ..TrackerOptions::default()
        }
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
