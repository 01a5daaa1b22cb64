//! scrollspy: scroll-driven section tracking and reading progress for long-form articles.
//!
//! The tracking core ([`tracker`] and the modules it wires together) talks to the rendered page
//! only through the [`host::Host`] trait. The terminal reader in `main.rs` provides a host backed
//! by markdown laid out in terminal rows ([`app_state`]), rendered by [`ui`].
#![allow(clippy::multiple_crate_versions)]

pub mod app_state;
pub mod commander;
pub mod config;
pub mod document;
pub mod formats;
pub mod geometry;
pub mod host;
pub mod input;
pub mod intersection;
pub mod nav_strip;
pub mod progress;
pub mod registry;
pub mod resolver;
pub mod scorer;
pub mod section;
pub mod smooth;
pub mod subscription;
pub mod timers;
pub mod tracker;
pub mod ui;

#[cfg(test)]
#[path = "tests/fake_host.rs"]
pub(crate) mod fake_host;
