//! # MovieList Component
//!
//! Scrollable list of loaded movies with a selection cursor.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `MovieListState` lives in `TuiState` and survives across frames
//! - `MovieList` is created each frame with borrowed state and fresh props
//!
//! The bottom border doubles as the list footer: it reports whether the next
//! page is loading, failed, or whether the end of the catalog was reached.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::catalog::Movie;
use crate::paging::NetworkState;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const PAGE_JUMP: usize = 10;

/// Persistent selection state for the movie list.
#[derive(Default)]
pub struct MovieListState {
    pub selected: usize,
    pub len: usize,
    pub list_state: ListState,
}

impl MovieListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the top, e.g. after the listing was replaced.
    pub fn reset(&mut self) {
        self.selected = 0;
        self.list_state = ListState::default();
    }

    /// Sync with the number of loaded rows, keeping the cursor in range.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            self.selected = self.selected.min(len - 1);
            self.list_state.select(Some(self.selected));
        }
    }
}

impl EventHandler for MovieListState {
    /// The newly selected row.
    type Event = usize;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let last = self.len - 1;
        let next = match event {
            TuiEvent::CursorUp => self.selected.saturating_sub(1),
            TuiEvent::CursorDown => (self.selected + 1).min(last),
            TuiEvent::PageUp => self.selected.saturating_sub(PAGE_JUMP),
            TuiEvent::PageDown => (self.selected + PAGE_JUMP).min(last),
            TuiEvent::Home => 0,
            TuiEvent::End => last,
            _ => return None,
        };
        self.selected = next;
        self.list_state.select(Some(next));
        Some(next)
    }
}

/// Transient render wrapper for the movie list.
pub struct MovieList<'a> {
    pub state: &'a mut MovieListState,
    pub movies: &'a [Movie],
    pub network_state: &'a NetworkState,
    pub has_more: bool,
}

impl MovieList<'_> {
    fn footer(&self) -> Line<'static> {
        let line = match self.network_state {
            NetworkState::Loading if self.movies.is_empty() => Line::from(" Loading… "),
            NetworkState::Loading => Line::from(" Loading more… "),
            NetworkState::Error(message) => Line::from(Span::styled(
                format!(" {message} (t retry, r refresh) "),
                Style::default().fg(Color::Red),
            )),
            _ if !self.has_more && !self.movies.is_empty() => Line::from(" End of list "),
            _ => Line::from(" ↑↓ Move  r Refresh  x Cancel  q Quit "),
        };
        line.centered()
    }
}

impl Component for MovieList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Movies ")
            .title_bottom(self.footer())
            .padding(Padding::horizontal(1));

        let inner_width = area.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = self
            .movies
            .iter()
            .map(|movie| ListItem::new(Line::from(movie_row(movie, inner_width))))
            .collect();

        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        );

        self.state.set_len(self.movies.len());
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}

/// `"<title>   1999  ★ 8.4"`, with the title truncated to fit `width` columns.
fn movie_row(movie: &Movie, width: usize) -> String {
    let year = movie
        .release_year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "----".to_string());
    let meta = format!("{year}  ★ {:.1}", movie.vote_average);
    let title_width = width.saturating_sub(meta.width() + 2);
    let title = truncate_to_width(&movie.title, title_width);
    let padding = title_width.saturating_sub(title.width());
    format!("{title}{}  {meta}", " ".repeat(padding))
}

/// Truncate to at most `max_width` display columns, adding "…" if cut.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
