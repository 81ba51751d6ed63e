//! # TitleBar Component
//!
//! Top status bar: active sort order, how many movies are loaded, and the
//! network state of the current listing.
//!
//! Purely presentational. It receives everything as props and holds no
//! state, so the title text depends only on what it is given:
//!
//! 1. **Loading**: `"Marquee | Popular | 20 movies | ⠋ loading"`
//! 2. **Error**: `"Marquee | Popular | 20 movies | error: HTTP 500"`
//! 3. **Otherwise**: `"Marquee | Popular | 20 movies"`
//!
//! A status message, when present, is appended last.

use crate::catalog::SortBy;
use crate::paging::NetworkState;
use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct TitleBar<'a> {
    pub sort_by: Option<SortBy>,
    pub network_state: &'a NetworkState,
    pub loaded: usize,
    pub status_message: &'a str,
    pub spinner_frame: usize,
}

impl TitleBar<'_> {
    fn text(&self) -> String {
        let mut parts = vec!["Marquee".to_string()];
        if let Some(sort_by) = self.sort_by {
            parts.push(sort_by.label().to_string());
            parts.push(format!("{} movies", self.loaded));
        }
        match self.network_state {
            NetworkState::Loading => {
                let frame = SPINNER[self.spinner_frame % SPINNER.len()];
                parts.push(format!("{frame} loading"));
            }
            NetworkState::Error(message) => parts.push(format!("error: {message}")),
            NetworkState::Idle | NetworkState::Loaded => {}
        }
        if !self.status_message.is_empty() {
            parts.push(self.status_message.to_string());
        }
        parts.join(" | ")
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let style = if self.network_state.is_error() {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };
        frame.render_widget(Line::from(Span::styled(self.text(), style)), area);
    }
}
