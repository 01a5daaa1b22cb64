//! The reader's document: articles laid out in terminal rows, and the host the tracker watches.
//!
//! A TUI has no DOM, so this module plays its part. Articles are laid out into lines at the
//! current terminal width; every block gets a placement (first row and row count) and blocks with
//! an id become addressable elements. Geometry is reported in pixels by multiplying rows by a
//! fixed row height, so the tracker's pixel constants keep their meaning.
//!
//! In multi-file mode the articles form a feed that is mounted lazily: only the first article is
//! laid out at start, and the next one mounts when the loading sentinel nears the viewport or
//! when navigation asks for an article that is not mounted yet. Every mount bumps the generation
//! and is reported as a mutation.

use crate::document::{Article, BlockKind};
use crate::geometry::{Extent, Rect, StripGeometry};
use crate::host::{HeadingNode, Host, LeadImage, NodeKey};
use crate::section::Section;
use crate::smooth::SmoothScroll;
use crate::subscription::{Channel, Listeners};
use crate::tracker::{Mode, SectionTracker};
use std::collections::HashMap;
use std::time::Instant;

/// Element id of the line announcing the next feed article.
pub const SENTINEL_ID: &str = "feed-sentinel";

/// How far below the viewport (in viewports) the sentinel triggers the next mount.
const PRELOAD_VIEWPORTS: f64 = 1.0;
const IMAGE_ROWS: usize = 5;
const IMAGE_MAX_WIDTH: usize = 60;
const LABEL_WIDTH: usize = 24;
const STRIP_GAP: usize = 1;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
/// Determines the navigation scope based on how many files were opened.
pub enum FileMode {
    /// One article, navigated by its headings.
    Single,
    /// A feed of articles, navigated article by article.
    Multi,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// How a laid-out line is rendered.
pub enum LineStyle {
    Heading(usize),
    Body,
    Quote,
    Specs,
    Image,
    Rule,
    Loading,
    Blank,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub style: LineStyle,
}

impl Line {
    fn new(text: impl Into<String>, style: LineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    fn blank() -> Self {
        Self::new(String::new(), LineStyle::Blank)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Rows occupied by an element.
struct Placement {
    row: usize,
    rows: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One entry of the navigation strip, positioned in strip columns.
pub struct StripItem {
    pub id: String,
    pub label: String,
    /// Column where the item starts, independent of strip scroll.
    pub offset: usize,
    pub width: usize,
}

/// Laid-out articles, scroll positions and the bookkeeping the tracker observes.
pub struct AppState {
    /// Every article opened, mounted or not.
    pub articles: Vec<Article>,
    /// Controls navigation scope and lazy mounting.
    pub file_mode: FileMode,
    mounted: usize,
    lines: Vec<Line>,
    elements: HashMap<String, Placement>,
    blocks: HashMap<NodeKey, Placement>,
    width: usize,
    body_rows: usize,
    row_height: f64,
    scroll: SmoothScroll,
    strip_items: Vec<StripItem>,
    strip_width: usize,
    strip_scroll: SmoothScroll,
    generation: u64,
    listeners: Listeners,
    scrolled: bool,
    resized: bool,
    mutated: bool,
    /// Status feedback displayed in the footer.
    pub message: Option<String>,
}

impl AppState {
    #[must_use]
    /// Lays out the opened articles; a single file is an article, several files are a feed.
    pub fn new(articles: Vec<Article>, row_height: f64, scroll_speed: f64) -> Self {
        let file_mode = if articles.len() == 1 {
            FileMode::Single
        } else {
            FileMode::Multi
        };
        let mounted = articles.len().min(1);
        let mut state = Self {
            articles,
            file_mode,
            mounted,
            lines: Vec::new(),
            elements: HashMap::new(),
            blocks: HashMap::new(),
            width: 80,
            body_rows: 24,
            row_height: row_height.max(1.0),
            scroll: SmoothScroll::new(scroll_speed),
            strip_items: Vec::new(),
            strip_width: 80,
            strip_scroll: SmoothScroll::new(scroll_speed),
            generation: 0,
            listeners: Listeners::new(),
            scrolled: false,
            resized: false,
            mutated: false,
            message: None,
        };
        state.layout();
        state
    }

    #[must_use]
    /// What the tracker should follow for this set of articles.
    pub fn tracking_mode(&self) -> Mode {
        match self.file_mode {
            FileMode::Single => Mode::Article {
                container_id: self.articles[0].id.clone(),
            },
            FileMode::Multi => Mode::Feed {
                items: self.articles.iter().map(Article::feed_item).collect(),
            },
        }
    }

    #[must_use]
    pub fn mounted(&self) -> usize {
        self.mounted
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    #[must_use]
    /// First document row shown at the top of the body.
    pub fn first_visible_row(&self) -> usize {
        (self.scroll.value() / self.row_height).floor() as usize
    }

    #[must_use]
    pub fn strip_items(&self) -> &[StripItem] {
        &self.strip_items
    }

    #[must_use]
    /// Horizontal strip scroll in whole columns.
    pub fn strip_scroll_cols(&self) -> usize {
        self.strip_scroll.value().round().max(0.0) as usize
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.scroll.is_animating() || self.strip_scroll.is_animating()
    }

    fn max_scroll(&self) -> f64 {
        (self.document_height() - self.viewport_height()).max(0.0)
    }

    fn layout(&mut self) {
        self.lines.clear();
        self.elements.clear();
        self.blocks.clear();
        let width = self.width.max(8);

        for (article_index, article) in self.articles[..self.mounted].iter().enumerate() {
            let start = self.lines.len();
            let lead = article.lead_image_index();
            for (block_index, block) in article.blocks.iter().enumerate() {
                if block_index > 0 {
                    self.lines.push(Line::blank());
                }
                let row = self.lines.len();
                match &block.kind {
                    BlockKind::Heading(level) => {
                        for text in wrap(&block.text, width) {
                            self.lines.push(Line::new(text, LineStyle::Heading(*level)));
                        }
                    }
                    BlockKind::Paragraph => {
                        for text in wrap(&block.text, width) {
                            self.lines.push(Line::new(text, LineStyle::Body));
                        }
                    }
                    BlockKind::Quote => {
                        for text in wrap(&block.text, width.saturating_sub(2).max(1)) {
                            self.lines.push(Line::new(format!("│ {text}"), LineStyle::Quote));
                        }
                    }
                    BlockKind::Specs => {
                        for text in block.text.lines() {
                            let text: String = text.chars().take(width).collect();
                            self.lines.push(Line::new(text, LineStyle::Specs));
                        }
                    }
                    BlockKind::Image { src } => {
                        for text in image_box(&block.text, src, width.min(IMAGE_MAX_WIDTH)) {
                            self.lines.push(Line::new(text, LineStyle::Image));
                        }
                    }
                }
                let placement = Placement {
                    row,
                    rows: self.lines.len() - row,
                };
                self.blocks
                    .insert(NodeKey(article_index, block_index), placement);
                if lead == Some(block_index) {
                    self.elements.insert(article.lead_image_id(), placement);
                }
                if let Some(id) = &block.id {
                    self.elements.insert(id.clone(), placement);
                }
            }
            self.lines.push(Line::blank());
            self.lines.push(Line::new("─".repeat(width), LineStyle::Rule));
            self.lines.push(Line::blank());
            self.elements.insert(
                article.id.clone(),
                Placement {
                    row: start,
                    rows: self.lines.len() - start,
                },
            );
        }

        if self.mounted < self.articles.len() {
            let row = self.lines.len();
            let next = &self.articles[self.mounted].title;
            self.lines
                .push(Line::new(format!("Loading “{next}”…"), LineStyle::Loading));
            self.elements
                .insert(SENTINEL_ID.to_string(), Placement { row, rows: 1 });
        }
    }

    fn mount_through(&mut self, count: usize) -> bool {
        let count = count.min(self.articles.len());
        if count <= self.mounted {
            return false;
        }
        log::debug!("mounting articles {}..{count}", self.mounted);
        self.mounted = count;
        self.layout();
        self.generation += 1;
        self.mutated = true;
        true
    }

    /// Mounts the next feed article. Returns whether anything was mounted.
    pub fn load_next(&mut self) -> bool {
        self.mount_through(self.mounted + 1)
    }

    /// Mounts every feed article up to and including the one with element id `id`.
    pub fn load_through(&mut self, id: &str) -> bool {
        match self.articles.iter().position(|article| article.id == id) {
            Some(index) => self.mount_through(index + 1),
            None => false,
        }
    }

    /// Mounts the next article once the loading sentinel is within reach of the viewport.
    pub fn maybe_load_more(&mut self) -> bool {
        let Some(sentinel) = self.element_rect(SENTINEL_ID) else {
            return false;
        };
        if sentinel.top < self.viewport_height() * (1.0 + PRELOAD_VIEWPORTS) {
            self.load_next()
        } else {
            false
        }
    }

    /// Applies a new terminal size: body `width` x `body_rows`, and the strip's inner width.
    pub fn resize(&mut self, width: usize, body_rows: usize, strip_width: usize) {
        let relayout = width != self.width;
        self.width = width;
        self.body_rows = body_rows.max(1);
        self.strip_width = strip_width;
        if relayout {
            self.layout();
            self.generation += 1;
            self.mutated = true;
        }
        let max = self.max_scroll();
        if self.scroll.value() > max {
            self.scroll.jump_to(max);
        }
        self.resized = true;
    }

    /// Scrolls by whole rows at once, interrupting any smooth scroll.
    pub fn scroll_by_rows(&mut self, rows: isize) {
        let target = self.scroll.value() + rows as f64 * self.row_height;
        let target = target.clamp(0.0, self.max_scroll());
        if (target - self.scroll.value()).abs() > f64::EPSILON {
            self.scroll.jump_to(target);
            self.scrolled = true;
        }
    }

    /// Scrolls one body height, keeping two rows of context.
    pub fn scroll_page(&mut self, down: bool) {
        let rows = self.body_rows.saturating_sub(2).max(1) as isize;
        self.scroll_by_rows(if down { rows } else { -rows });
    }

    pub fn scroll_to_end(&mut self) {
        let end = self.max_scroll();
        self.smooth_scroll_to(end);
    }

    /// Advances smooth scrolls by one frame.
    pub fn advance(&mut self) {
        if self.scroll.tick() {
            self.scrolled = true;
        }
        self.strip_scroll.tick();
    }

    /// Replaces the strip items with the tracker's navigation sections. Returns whether they
    /// changed.
    pub fn sync_strip(&mut self, sections: &[Section]) -> bool {
        let unchanged = sections.len() == self.strip_items.len()
            && sections
                .iter()
                .zip(&self.strip_items)
                .all(|(section, item)| section.id == item.id);
        if unchanged {
            return false;
        }
        let mut offset = 0;
        self.strip_items = sections
            .iter()
            .map(|section| {
                let label = truncate(&section.title, LABEL_WIDTH);
                let width = label.chars().count() + 2;
                let item = StripItem {
                    id: section.id.clone(),
                    label,
                    offset,
                    width,
                };
                offset += width + STRIP_GAP;
                item
            })
            .collect();
        let max = self.strip_max_scroll();
        if self.strip_scroll.value() > max {
            self.strip_scroll.jump_to(max);
        }
        true
    }

    fn strip_max_scroll(&self) -> f64 {
        let total = self
            .strip_items
            .last()
            .map_or(0, |item| item.offset + item.width);
        total.saturating_sub(self.strip_width) as f64
    }

    /// Delivers pending resize, mutation and scroll events to the tracker on subscribed channels.
    pub fn dispatch(&mut self, tracker: &mut SectionTracker, now: Instant) {
        if std::mem::take(&mut self.resized) && self.listeners.is_listening(Channel::Resize) {
            tracker.on_resize(self, now);
            self.scrolled = false;
        }
        if std::mem::take(&mut self.mutated) && self.listeners.is_listening(Channel::Mutation) {
            tracker.on_mutation(now);
        }
        if std::mem::take(&mut self.scrolled) && self.listeners.is_listening(Channel::Scroll) {
            tracker.on_scroll(self, now);
        }
    }
}

impl Host for AppState {
    fn viewport_height(&self) -> f64 {
        self.body_rows as f64 * self.row_height
    }

    fn scroll_top(&self) -> f64 {
        self.scroll.value()
    }

    fn document_height(&self) -> f64 {
        self.lines.len() as f64 * self.row_height
    }

    fn element_rect(&self, id: &str) -> Option<Rect> {
        let placement = self.elements.get(id)?;
        Some(Rect::new(
            placement.row as f64 * self.row_height - self.scroll.value(),
            placement.rows as f64 * self.row_height,
        ))
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn headings(&self, container_id: &str, max_level: usize) -> Vec<HeadingNode> {
        let Some(article_index) = self.articles[..self.mounted]
            .iter()
            .position(|article| article.id == container_id)
        else {
            return Vec::new();
        };
        self.articles[article_index]
            .blocks
            .iter()
            .enumerate()
            .filter_map(|(block_index, block)| {
                let level = block.heading_level().filter(|level| *level <= max_level)?;
                Some(HeadingNode {
                    key: NodeKey(article_index, block_index),
                    level,
                    text: block.text.clone(),
                    id: block.id.clone(),
                })
            })
            .collect()
    }

    fn lead_image(&self, container_id: &str) -> Option<LeadImage> {
        let article = self.articles[..self.mounted]
            .iter()
            .find(|article| article.id == container_id)?;
        Some(LeadImage {
            id: article.lead_image_id(),
            src: article.lead_image_src()?.to_string(),
        })
    }

    fn assign_id(&mut self, node: NodeKey, id: &str) {
        let NodeKey(article_index, block_index) = node;
        let Some(block) = self
            .articles
            .get_mut(article_index)
            .and_then(|article| article.blocks.get_mut(block_index))
        else {
            return;
        };
        block.id = Some(id.to_string());
        if let Some(placement) = self.blocks.get(&node) {
            self.elements.insert(id.to_string(), *placement);
        }
    }

    fn smooth_scroll_to(&mut self, top: f64) {
        self.scroll.set_target(top.clamp(0.0, self.max_scroll()));
    }

    fn is_scroll_animating(&self) -> bool {
        self.scroll.is_animating()
    }

    fn strip_geometry(&self, id: &str) -> Option<StripGeometry> {
        let item = self.strip_items.iter().find(|item| item.id == id)?;
        Some(StripGeometry {
            container: Extent {
                left: 0.0,
                width: self.strip_width as f64,
            },
            item: Extent {
                left: item.offset as f64 - self.strip_scroll.value(),
                width: item.width as f64,
            },
            item_offset_left: item.offset as f64,
        })
    }

    fn smooth_scroll_strip_to(&mut self, left: f64) {
        let max = self.strip_max_scroll();
        self.strip_scroll.set_target(left.clamp(0.0, max));
    }

    fn listeners(&self) -> &Listeners {
        &self.listeners
    }
}

/// Greedy word wrap by character count; words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let needed = if current_len == 0 {
            word.len()
        } else {
            current_len + 1 + word.len()
        };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }
    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// A framed placeholder standing in for an image.
fn image_box(alt: &str, src: &str, width: usize) -> Vec<String> {
    let inner = width.saturating_sub(4).max(1);
    let row = |text: &str| format!("│ {:<inner$} │", truncate(text, inner));
    let mut rows = vec![format!("┌{}┐", "─".repeat(inner + 2))];
    rows.push(row(&format!("▣ {alt}")));
    rows.push(row(src));
    while rows.len() < IMAGE_ROWS - 1 {
        rows.push(row(""));
    }
    rows.push(format!("└{}┘", "─".repeat(inner + 2)));
    rows
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
