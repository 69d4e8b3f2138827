//! Application state and TUI event loop for the UrbanMart dashboard.
//!
//! [`App`] owns the theme, the store cache, the sidebar controls and the last
//! computed snapshot. Each tick checks the data file, redraws and applies at
//! most one key press.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};

use sales_runtime::snapshot::DashboardSnapshot;
use sales_runtime::store_cache::StoreCache;

use crate::dashboard_view::{self, DashboardView};
use crate::filter_panel::FilterPanel;
use crate::table_view;
use crate::themes::Theme;

/// Poll interval of the event loop; also how often the data file is checked.
const TICK_RATE: Duration = Duration::from_millis(250);

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard.
pub struct App {
    pub theme: Theme,
    cache: StoreCache,
    panel: Option<FilterPanel>,
    snapshot: Option<DashboardSnapshot>,
    top_n: usize,
    /// File name shown in the header.
    source: String,
    /// Cache generation the panel and snapshot were built from.
    seen_generation: u64,
    pub should_quit: bool,
}

impl App {
    /// Build the app and perform the first load.
    pub fn new(theme_name: &str, cache: StoreCache, top_n: usize) -> Self {
        let source = cache
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| cache.path().display().to_string());

        let mut app = Self {
            theme: Theme::from_name(theme_name),
            cache,
            panel: None,
            snapshot: None,
            top_n,
            source,
            seen_generation: 0,
            should_quit: false,
        };
        app.sync();
        app
    }

    pub fn panel(&self) -> Option<&FilterPanel> {
        self.panel.as_ref()
    }

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.snapshot.as_ref()
    }

    /// Pick up a changed data file. Returns `true` when a new store was
    /// loaded and the view rebuilt.
    pub fn sync(&mut self) -> bool {
        self.cache.refresh();
        if self.cache.generation() == self.seen_generation {
            return false;
        }
        self.seen_generation = self.cache.generation();

        let Some(store) = self.cache.store() else {
            return false;
        };
        let overview = store.overview();
        match self.panel.as_mut() {
            Some(panel) => panel.sync_options(&overview),
            None => self.panel = Some(FilterPanel::from_overview(&overview)),
        }
        self.recompute();

        if let Some(snapshot) = &self.snapshot {
            tracing::info!(
                generation = self.seen_generation,
                "data loaded: {}",
                dashboard_view::headline(snapshot)
            );
        }
        true
    }

    /// Re-run filtering and aggregation for the current controls.
    pub fn recompute(&mut self) {
        let (Some(store), Some(panel)) = (self.cache.store(), self.panel.as_ref()) else {
            return;
        };
        self.snapshot = Some(DashboardSnapshot::compute(store, &panel.criteria(), self.top_n));
    }

    /// Apply one key press. Returns `true` when the filters changed and the
    /// snapshot was recomputed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return false;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                return false;
            }
            KeyCode::F(5) | KeyCode::Char('R') => {
                self.cache.invalidate();
                return self.sync();
            }
            _ => {}
        }

        let Some(panel) = self.panel.as_mut() else {
            return false;
        };

        let changed = match key.code {
            KeyCode::Tab => {
                panel.focus_next();
                false
            }
            KeyCode::BackTab => {
                panel.focus_prev();
                false
            }
            KeyCode::Down | KeyCode::Char('j') => {
                panel.cursor_down();
                false
            }
            KeyCode::Up | KeyCode::Char('k') => {
                panel.cursor_up();
                false
            }
            KeyCode::Char(' ') | KeyCode::Enter => panel.toggle(),
            KeyCode::Char('[') => panel.shift_start(-1),
            KeyCode::Char(']') => panel.shift_start(1),
            KeyCode::Char('{') => panel.shift_end(-1),
            KeyCode::Char('}') => panel.shift_end(1),
            KeyCode::Char('r') => {
                panel.reset();
                true
            }
            _ => false,
        };

        if changed {
            self.recompute();
            tracing::debug!(criteria = ?self.snapshot.as_ref().map(|s| &s.criteria), "filters changed");
        }
        changed
    }

    // ── Event loop ────────────────────────────────────────────────────────

    /// Run the dashboard until `q`, `Esc` or `Ctrl+C`.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(TICK_RATE) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key);
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }

            self.sync();
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Render the current state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        match (&self.snapshot, &self.panel) {
            (Some(snapshot), Some(panel)) => {
                let skipped = self
                    .cache
                    .store()
                    .map_or(0, |s| s.report().rows_skipped());
                let view = DashboardView {
                    source: &self.source,
                    snapshot,
                    panel,
                    skipped,
                    warning: self.cache.last_error(),
                };
                dashboard_view::render_dashboard(frame, area, &view, &self.theme);
            }
            _ => {
                let message = self.cache.last_error().unwrap_or("no data loaded");
                table_view::render_error(frame, area, message, &self.theme);
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
