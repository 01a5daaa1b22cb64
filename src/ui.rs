//! The UI renders the reader's state into something visible.
//!
//! The screen is split into the navigation strip (section labels with a per-section progress
//! bar underneath), the article body and a footer with the reading progress gauge and help.

use crate::app_state::{AppState, LineStyle, StripItem};
use crate::tracker::SectionTracker;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};
use std::collections::HashMap;

/// Screen regions of the reader.
pub struct Areas {
    pub strip: Rect,
    pub body: Rect,
    pub gauge: Rect,
    pub help: Rect,
}

impl Areas {
    #[must_use]
    /// Columns available to strip items inside the strip's border.
    pub fn strip_inner_width(&self) -> usize {
        usize::from(self.strip.width.saturating_sub(2))
    }
}

#[must_use]
pub fn layout(area: Rect) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Strip: labels and progress bars
            Constraint::Min(0),    // Article
            Constraint::Length(1), // Reading progress
            Constraint::Length(1), // Help
        ])
        .split(area);
    Areas {
        strip: chunks[0],
        body: chunks[1],
        gauge: chunks[2],
        help: chunks[3],
    }
}

/// Renders the strip, the visible part of the document and the footer.
pub fn draw(f: &mut Frame, app: &AppState, tracker: &SectionTracker) {
    let areas = layout(f.area());
    draw_strip(f, areas.strip, app, tracker);
    draw_body(f, areas.body, app);
    draw_footer(f, &areas, app, tracker);
}

fn draw_strip(f: &mut Frame, area: Rect, app: &AppState, tracker: &SectionTracker) {
    let active = tracker.active_section_id();
    let progress = tracker.section_progress();

    let mut labels = Vec::new();
    let mut bars = Vec::new();
    for item in app.strip_items() {
        let is_active = active == Some(item.id.as_str());
        let style = if is_active {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            Style::default()
        };
        labels.push(Span::styled(format!(" {} ", item.label), style));
        labels.push(Span::raw(" "));
        bars.extend(progress_bar(item, progress));
        bars.push(Span::raw(" "));
    }

    let title = match tracker.pending_navigation() {
        Some(id) => format!("Sections (loading {id})"),
        None => "Sections".to_string(),
    };
    let cols = u16::try_from(app.strip_scroll_cols()).unwrap_or(u16::MAX);
    let strip = Paragraph::new(vec![Line::from(labels), Line::from(bars)])
        .scroll((0, cols))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(strip, area);
}

fn progress_bar(item: &StripItem, progress: &HashMap<String, f64>) -> Vec<Span<'static>> {
    let ratio = progress.get(&item.id).copied().unwrap_or(0.0) / 100.0;
    let filled = ((item.width as f64) * ratio).round() as usize;
    let filled = filled.min(item.width);
    vec![
        Span::styled("━".repeat(filled), Style::default().fg(Color::Green)),
        Span::styled(
            "─".repeat(item.width - filled),
            Style::default().fg(Color::DarkGray),
        ),
    ]
}

fn draw_body(f: &mut Frame, area: Rect, app: &AppState) {
    let first = app.first_visible_row();
    let rows = usize::from(area.height);
    let lines: Vec<Line> = app
        .lines()
        .iter()
        .skip(first)
        .take(rows)
        .map(|line| Line::styled(line.text.clone(), line_style(line.style)))
        .collect();
    f.render_widget(Paragraph::new(lines), area);
}

fn line_style(style: LineStyle) -> Style {
    match style {
        LineStyle::Heading(1) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineStyle::Heading(2) => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD),
        LineStyle::Heading(_) => Style::default().add_modifier(Modifier::BOLD),
        LineStyle::Quote => Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC),
        LineStyle::Specs => Style::default().fg(Color::LightMagenta),
        LineStyle::Image => Style::default().fg(Color::DarkGray),
        LineStyle::Rule => Style::default().fg(Color::DarkGray),
        LineStyle::Loading => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::ITALIC),
        LineStyle::Body | LineStyle::Blank => Style::default(),
    }
}

fn draw_footer(f: &mut Frame, areas: &Areas, app: &AppState, tracker: &SectionTracker) {
    let progress = tracker.reading_progress();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .ratio((progress / 100.0).clamp(0.0, 1.0))
        .label(format!("{progress:.0}% read"));
    f.render_widget(gauge, areas.gauge);

    let help = if let Some(ref msg) = app.message {
        msg.clone()
    } else {
        let nav = "←/→: Prev/Next section | 1-9: Jump | ↑/↓ PgUp/PgDn: Scroll | End | q: Quit";
        if tracker.show_scroll_top() {
            format!("t: Back to top | {nav}")
        } else {
            nav.to_string()
        }
    };
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        areas.help,
    );
}
