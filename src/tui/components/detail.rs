//! Side pane with the selected movie's overview and metadata.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::catalog::Movie;
use crate::tui::component::Component;

pub struct MovieDetail<'a> {
    pub movie: Option<&'a Movie>,
}

impl MovieDetail<'_> {
    fn lines(movie: &Movie, width: u16) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                movie.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(
                    "{} · ★ {:.1} ({} votes) · {}",
                    movie
                        .release_date
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "unreleased".to_string()),
                    movie.vote_average,
                    movie.vote_count,
                    movie.original_language
                ),
                Style::default().fg(Color::DarkGray),
            )),
            Line::default(),
        ];

        // Wrapped to the inner width; overlong words are split.
        let options = textwrap::Options::new(width.max(1) as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);
        let overview = if movie.overview.trim().is_empty() {
            "No overview available."
        } else {
            movie.overview.trim()
        };
        lines.extend(
            textwrap::wrap(overview, options)
                .into_iter()
                .map(|line| Line::from(line.into_owned())),
        );
        lines
    }
}

impl Component for MovieDetail<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Details ")
            .padding(Padding::horizontal(1));
        let inner_width = area.width.saturating_sub(4);

        let paragraph = match self.movie {
            Some(movie) => Paragraph::new(Self::lines(movie, inner_width)),
            None => Paragraph::new("Nothing selected.").style(Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(paragraph.block(block), area);
    }
}
