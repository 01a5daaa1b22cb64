//! scrollspy: a terminal reader that tracks which section you are reading.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use scrollspy::app_state::AppState;
use scrollspy::commander::NavigateOutcome;
use scrollspy::tracker::{SectionTracker, Snapshot};
use scrollspy::{config, formats, input, ui};
use serde::Serialize;
use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Longest the loop sleeps when nothing is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(name = "scrollspy")]
#[command(about = "Read markdown articles with a live section tracker", long_about = None)]
struct Args {
    /// Article files or directories; several articles are read as a feed
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// File extensions to match
    #[arg(long, short = 'e', value_name = "EXT")]
    ext: Vec<String>,

    /// Height of the sticky header left above a section when jumping to it, in pixels
    #[arg(long, value_name = "PX")]
    header_offset: Option<f64>,

    /// Write debug logs to this file (filtered by RUST_LOG)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[derive(Serialize)]
/// Printed on exit: where the reader stopped and which sections were jumped to.
struct Summary {
    #[serde(flatten)]
    snapshot: Snapshot,
    navigations: Vec<String>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;
    let mut cfg = config::Config::load();

    // Override config with command line args
    if !args.ext.is_empty() {
        cfg.file_extensions = args.ext;
    }
    if let Some(offset) = args.header_offset {
        cfg.header_offset = offset;
    }

    let documents = input::find_documents(args.paths, &cfg.file_extensions)?;

    if documents.is_empty() {
        eprintln!("No matching files found");
        return Ok(());
    }

    let format = formats::markdown::MarkdownFormat;
    let articles = input::load_articles(&documents, &format);

    if articles.is_empty() {
        eprintln!("No articles could be read");
        return Ok(());
    }

    let app = AppState::new(articles, cfg.row_height, cfg.scroll_speed);
    run_tui(app, &cfg)
}

/// Logs go to a file only; the terminal belongs to the reader.
fn init_logging(log_file: Option<&Path>) -> io::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run_tui(mut app: AppState, cfg: &config::Config) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    resize_to_terminal(&terminal, &mut app)?;
    let mode = app.tracking_mode();
    let mut tracker = SectionTracker::mount(&mut app, mode, cfg.tracker_options(), Instant::now());
    let history = Rc::new(RefCell::new(Vec::new()));
    let recorded = Rc::clone(&history);
    tracker.on_navigate(move |id| recorded.borrow_mut().push(id.to_string()));

    let result = run_app(&mut terminal, &mut app, &mut tracker, cfg);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    } else {
        let summary = Summary {
            snapshot: tracker.snapshot(),
            navigations: history.borrow().clone(),
        };
        let json = serde_json::to_string_pretty(&summary).map_err(io::Error::other)?;
        println!("{json}");
    }
    tracker.unmount();

    Ok(())
}

fn resize_to_terminal<B: ratatui::backend::Backend>(
    terminal: &Terminal<B>,
    app: &mut AppState,
) -> io::Result<()> {
    let size = terminal.size()?;
    let areas = ui::layout(Rect::new(0, 0, size.width, size.height));
    app.resize(
        usize::from(areas.body.width),
        usize::from(areas.body.height),
        areas.strip_inner_width(),
    );
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    tracker: &mut SectionTracker,
    cfg: &config::Config,
) -> io::Result<()> {
    loop {
        let now = Instant::now();
        app.advance();
        app.maybe_load_more();
        app.dispatch(tracker, now);
        tracker.tick(app, now);
        if app.sync_strip(tracker.nav_sections()) {
            tracker.recenter_strip(app);
        }

        terminal.draw(|f| ui::draw(f, app, tracker))?;

        let timeout = if app.is_animating() {
            cfg.frame_interval()
        } else {
            tracker
                .next_deadline()
                .map_or(IDLE_POLL, |deadline| {
                    deadline.saturating_duration_since(Instant::now())
                })
                .min(IDLE_POLL)
        };
        if !event::poll(timeout)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                app.message = None;
                if !handle_key(key, app, tracker, Instant::now()) {
                    return Ok(());
                }
            }
            Event::Resize(..) => resize_to_terminal(terminal, app)?,
            _ => {}
        }
    }
}

/// Applies one key press. Returns false when the reader should quit.
fn handle_key(
    key: KeyEvent,
    app: &mut AppState,
    tracker: &mut SectionTracker,
    now: Instant,
) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return false,
        KeyCode::Up | KeyCode::Char('k') => app.scroll_by_rows(-1),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_by_rows(1),
        KeyCode::PageUp => app.scroll_page(false),
        KeyCode::PageDown | KeyCode::Char(' ') => app.scroll_page(true),
        KeyCode::Left | KeyCode::Char('h') => {
            let outcome = tracker.navigate_relative(app, -1, now);
            after_navigation(outcome, app, tracker);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            let outcome = tracker.navigate_relative(app, 1, now);
            after_navigation(outcome, app, tracker);
        }
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            let target = tracker.nav_sections().get(index).map(|s| s.id.clone());
            if let Some(id) = target {
                let outcome = tracker.navigate_to(app, &id, now);
                after_navigation(Some(outcome), app, tracker);
            }
        }
        KeyCode::Char('t') | KeyCode::Home => tracker.scroll_to_top(app),
        KeyCode::End => app.scroll_to_end(),
        _ => {}
    }
    true
}

/// Mounts the feed up to a section that could not be scrolled to yet.
fn after_navigation(
    outcome: Option<NavigateOutcome>,
    app: &mut AppState,
    tracker: &SectionTracker,
) {
    if outcome != Some(NavigateOutcome::Pending) {
        return;
    }
    if let Some(id) = tracker.active_section_id() {
        if app.load_through(id) {
            app.message = Some(format!("Loading {id}…"));
        }
    }
}
