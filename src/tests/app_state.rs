use super::{wrap, AppState, FileMode, LineStyle, SENTINEL_ID};
use crate::document::{Article, Block, BlockKind};
use crate::geometry::Rect;
use crate::host::{Host, NodeKey};
use crate::tracker::{Mode, SectionTracker, TrackerOptions};
use std::time::{Duration, Instant};

fn long_paragraph() -> Block {
    Block::new(BlockKind::Paragraph, "lorem ipsum ".repeat(200))
}

fn review() -> Article {
    let mut battery = Block::new(BlockKind::Heading(2), "Battery");
    battery.id = Some("battery".to_string());
    Article::new(
        "article-phone",
        "phone",
        vec![
            Block::new(BlockKind::Heading(1), "Phone review"),
            Block::new(
                BlockKind::Image {
                    src: "hero.jpg".to_string(),
                },
                "Hero",
            ),
            long_paragraph(),
            Block::new(BlockKind::Heading(2), "Design"),
            long_paragraph(),
            battery,
            long_paragraph(),
        ],
    )
}

fn short(id: &str) -> Article {
    Article::new(
        id,
        id,
        vec![
            Block::new(BlockKind::Heading(1), id),
            Block::new(BlockKind::Paragraph, "Short."),
        ],
    )
}

#[test]
fn test_single_file_is_an_article() {
    let app = AppState::new(vec![review()], 20.0, 0.25);
    assert_eq!(app.file_mode, FileMode::Single);
    assert_eq!(
        app.tracking_mode(),
        Mode::Article {
            container_id: "article-phone".to_string()
        }
    );
    assert_eq!(app.element_rect(SENTINEL_ID), None);
}

#[test]
fn test_layout_places_addressable_elements() {
    let app = AppState::new(vec![review()], 20.0, 0.25);

    // Title on row 0, a blank row, then the five-row image box.
    assert_eq!(app.element_rect("article-phone-lead"), Some(Rect::new(40.0, 100.0)));
    assert_eq!(app.lines()[0].style, LineStyle::Heading(1));
    assert_eq!(app.lines()[2].style, LineStyle::Image);

    let battery = app.element_rect("battery").unwrap();
    assert_eq!(battery.height, 20.0);
    let container = app.element_rect("article-phone").unwrap();
    assert_eq!(container.top, 0.0);
    assert!((container.height - app.document_height()).abs() < f64::EPSILON);
}

#[test]
fn test_headings_and_assigned_ids() {
    let mut app = AppState::new(vec![review()], 20.0, 0.25);
    let headings = app.headings("article-phone", 3);
    let keys: Vec<_> = headings.iter().map(|h| h.key).collect();
    assert_eq!(keys, vec![NodeKey(0, 0), NodeKey(0, 3), NodeKey(0, 5)]);
    assert_eq!(headings[2].id.as_deref(), Some("battery"));
    assert!(app.headings("article-phone", 1).len() == 1);
    assert!(app.headings("elsewhere", 3).is_empty());

    assert_eq!(app.element_rect("section-1"), None);
    app.assign_id(NodeKey(0, 3), "section-1");
    assert!(app.element_rect("section-1").is_some());
    assert_eq!(app.headings("article-phone", 3)[1].id.as_deref(), Some("section-1"));

    // Ids survive a relayout.
    app.resize(60, 24, 60);
    assert!(app.element_rect("section-1").is_some());
}

#[test]
fn test_lead_image() {
    let app = AppState::new(vec![review()], 20.0, 0.25);
    let lead = app.lead_image("article-phone").unwrap();
    assert_eq!(lead.id, "article-phone-lead");
    assert_eq!(lead.src, "hero.jpg");
    assert_eq!(app.lead_image("elsewhere"), None);
}

#[test]
fn test_feed_mounts_lazily() {
    let mut app = AppState::new(vec![short("a"), short("b"), short("c")], 20.0, 0.25);
    assert_eq!(app.file_mode, FileMode::Multi);
    assert_eq!(app.mounted(), 1);
    assert!(app.element_rect("a").is_some());
    assert_eq!(app.element_rect("b"), None);
    assert!(app.element_rect(SENTINEL_ID).is_some());

    // Short articles leave the sentinel in reach.
    assert!(app.maybe_load_more());
    assert_eq!(app.mounted(), 2);
    assert_eq!(app.generation(), 1);
    assert!(app.element_rect("b").is_some());

    assert!(app.load_through("c"));
    assert_eq!(app.mounted(), 3);
    assert_eq!(app.element_rect(SENTINEL_ID), None);
    assert!(!app.maybe_load_more());
    assert!(!app.load_through("a"));
    assert!(!app.load_through("unknown"));
}

#[test]
fn test_scrolling_is_clamped() {
    let mut app = AppState::new(vec![review()], 20.0, 0.25);
    let max = app.document_height() - app.viewport_height();

    app.scroll_by_rows(-5);
    assert_eq!(app.scroll_top(), 0.0);
    app.scroll_by_rows(3);
    assert_eq!(app.scroll_top(), 60.0);
    assert_eq!(app.first_visible_row(), 3);
    app.scroll_by_rows(100_000);
    assert_eq!(app.scroll_top(), max);
}

#[test]
fn test_smooth_scroll_settles_on_target() {
    let mut app = AppState::new(vec![review()], 20.0, 0.25);
    app.smooth_scroll_to(400.0);
    assert!(app.is_scroll_animating());

    let mut frames = 0;
    while app.is_animating() {
        app.advance();
        frames += 1;
        assert!(frames < 200, "scroll never settled");
    }
    assert_eq!(app.scroll_top(), 400.0);
}

#[test]
fn test_strip_geometry_follows_items() {
    let mut app = AppState::new(vec![short("a"), short("b")], 20.0, 0.25);
    let mode = app.tracking_mode();
    let tracker = SectionTracker::mount(&mut app, mode, TrackerOptions::default(), Instant::now());

    assert!(app.sync_strip(tracker.nav_sections()));
    assert!(!app.sync_strip(tracker.nav_sections()));

    let first = app.strip_geometry("a").unwrap();
    let second = app.strip_geometry("b").unwrap();
    assert_eq!(first.item_offset_left, 0.0);
    // " a " plus one column of gap.
    assert_eq!(second.item_offset_left, 4.0);
    assert_eq!(app.strip_geometry("c"), None);
}

#[test]
fn test_dispatch_feeds_the_tracker() {
    let mut app = AppState::new(vec![review()], 20.0, 0.25);
    let t0 = Instant::now();
    let mode = app.tracking_mode();
    let mut tracker = SectionTracker::mount(&mut app, mode, TrackerOptions::default(), t0);
    assert_eq!(tracker.reading_progress(), 0.0);

    app.scroll_by_rows(30);
    app.dispatch(&mut tracker, t0 + Duration::from_millis(10));
    assert!(tracker.reading_progress() > 0.0);
    assert!(tracker.show_scroll_top());

    // A width change relayouts and is delivered as a mutation.
    let generation = app.generation();
    app.resize(50, 20, 50);
    assert_eq!(app.generation(), generation + 1);
    app.dispatch(&mut tracker, t0 + Duration::from_millis(20));
    assert!(tracker
        .next_deadline()
        .is_some_and(|deadline| deadline <= t0 + Duration::from_millis(120)));
}

#[test]
fn test_tracker_follows_reader_through_article() {
    let mut app = AppState::new(vec![review()], 20.0, 0.25);
    let t0 = Instant::now();
    let mode = app.tracking_mode();
    let mut tracker = SectionTracker::mount(&mut app, mode, TrackerOptions::default(), t0);
    tracker.tick(&mut app, t0 + Duration::from_millis(100));
    assert_eq!(tracker.active_section_id(), Some("introduction"));

    let battery = app.element_rect("battery").unwrap();
    app.scroll_by_rows((battery.top / 20.0) as isize);
    app.dispatch(&mut tracker, t0 + Duration::from_millis(200));
    tracker.tick(&mut app, t0 + Duration::from_millis(300));
    assert_eq!(tracker.active_section_id(), Some("battery"));
}

#[test]
fn test_wrap() {
    assert_eq!(wrap("aaa bbb ccc", 7), vec!["aaa bbb", "ccc"]);
    assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    assert_eq!(wrap("", 10), vec![""]);
    assert_eq!(wrap("  spaced   out  ", 20), vec!["spaced out"]);
}
