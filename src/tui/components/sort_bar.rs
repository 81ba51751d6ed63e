//! Tabs for choosing the sort order. Digits `1`-`5` select them.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Tabs;

use crate::catalog::SortBy;
use crate::tui::component::Component;

pub struct SortBar {
    pub active: Option<SortBy>,
}

impl Component for SortBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = SortBy::ALL
            .iter()
            .enumerate()
            .map(|(i, sort_by)| Line::from(format!("{} {}", i + 1, sort_by.label())))
            .collect();
        let selected = self
            .active
            .and_then(|active| SortBy::ALL.iter().position(|s| *s == active));

        let tabs = Tabs::new(titles)
            .select(selected)
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .divider("│");
        frame.render_widget(tabs, area);
    }
}
