//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the movie
//! screen, and translates keyboard events into controller calls.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Loading**: draws every ~80ms so the spinner animates.
//! - **Idle**: sleeps up to 500ms and only redraws on events, terminal
//!   resize, or when the listing's row count or network state changed.

mod component;
mod components;
mod event;
mod ui;

use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use log::{debug, info};

use crate::catalog::{CatalogError, SortBy, TmdbClient};
use crate::core::MovieController;
use crate::core::config::ResolvedConfig;
use crate::core::data_source::MovieDataSource;
use crate::paging::NetworkState;
use crate::tui::component::EventHandler;
use crate::tui::components::MovieListState;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::ui::ScreenView;

/// TUI-specific presentation state (not part of the controller)
pub struct TuiState {
    pub movie_list: MovieListState,
    pub status_message: String,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            movie_list: MovieListState::new(),
            status_message: String::new(),
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture)?;
        info!("Terminal modes enabled (mouse)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture);
    }
}

/// Build the catalog stack from a resolved config.
pub fn build_controller(config: &ResolvedConfig) -> Result<MovieController, CatalogError> {
    let client =
        TmdbClient::from_credentials(config.api_key.clone(), Some(config.base_url.clone()))?
            .with_language(config.language.clone())
            .with_region(config.region.clone());
    let data_source = Arc::new(MovieDataSource::new(Arc::new(client)));
    Ok(MovieController::new(data_source, config.paging))
}

/// Read everything the next frame needs from the controller.
fn snapshot(controller: &mut MovieController) -> ScreenView {
    let sort_by = controller.sort_by();
    match controller.discovered_movies() {
        Some(list) => ScreenView {
            sort_by,
            movies: list.snapshot(),
            network_state: controller.network_state(),
            has_more: list.source().is_some_and(|source| source.has_more()),
        },
        None => ScreenView {
            sort_by,
            movies: Arc::default(),
            network_state: NetworkState::Idle,
            has_more: false,
        },
    }
}

/// What the loop should do after an event.
enum Flow {
    Continue,
    Quit,
}

fn handle_event(controller: &mut MovieController, tui: &mut TuiState, event: TuiEvent) -> Flow {
    match event {
        TuiEvent::Quit | TuiEvent::ForceQuit => return Flow::Quit,
        TuiEvent::Resize => {}
        TuiEvent::SelectSort(index) => {
            if let Some(&sort_by) = SortBy::ALL.get(index)
                && controller.discover(sort_by)
            {
                tui.movie_list.reset();
                tui.status_message.clear();
            }
        }
        TuiEvent::Refresh => {
            if let Some(listing) = controller.listing() {
                listing.refresh();
                tui.movie_list.reset();
                tui.status_message = "Refreshing".to_string();
            }
        }
        TuiEvent::Retry => {
            if let Some(listing) = controller.listing() {
                listing.retry();
                tui.status_message.clear();
            }
        }
        TuiEvent::Abandon => {
            let pending = controller.active_operations();
            controller.refresh();
            tui.status_message = format!("Cancelled {pending} request(s)");
        }
        TuiEvent::CursorUp
        | TuiEvent::CursorDown
        | TuiEvent::PageUp
        | TuiEvent::PageDown
        | TuiEvent::Home
        | TuiEvent::End => {
            if let Some(selected) = tui.movie_list.handle_event(&event)
                && let Some(list) = controller.discovered_movies()
                && list.load_around(selected)
            {
                debug!("Prefetching after row {}", selected);
            }
        }
    }
    Flow::Continue
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut controller = build_controller(&config).map_err(std::io::Error::other)?;
    controller.discover(config.sort_by);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame
    let mut last_seen: Option<(usize, NetworkState)> = None;

    let result = loop {
        let view = snapshot(&mut controller);
        let animating = view.network_state.is_loading();

        let seen = (view.movies.len(), view.network_state.clone());
        if animating || last_seen.as_ref() != Some(&seen) {
            needs_redraw = true;
        }
        last_seen = Some(seen);

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            if let Err(e) = terminal.draw(|f| ui::draw_ui(f, &view, &mut tui, spinner_frame)) {
                break Err(e);
            }
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Flow::Quit = handle_event(&mut controller, &mut tui, event) {
                should_quit = true;
                break;
            }
        }
        if should_quit {
            break Ok(());
        }
    };

    info!(
        "Shutting down after {} listing(s), {} operation(s) still active",
        controller.listings_built(),
        controller.active_operations()
    );
    controller.on_cleared();
    ratatui::restore();
    result
}
