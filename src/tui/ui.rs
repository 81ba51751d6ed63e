use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::catalog::{Movie, SortBy};
use crate::paging::NetworkState;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{MovieDetail, MovieList, SortBar, TitleBar};

/// Everything one frame shows, read from the controller before drawing.
pub struct ScreenView {
    pub sort_by: Option<SortBy>,
    pub movies: std::sync::Arc<Vec<Movie>>,
    pub network_state: NetworkState,
    pub has_more: bool,
}

/// Below this width the detail pane is dropped and the list takes the row.
const DETAIL_MIN_WIDTH: u16 = 80;

pub fn draw_ui(frame: &mut Frame, view: &ScreenView, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min, Percentage};
    let [title_area, sort_area, main_area] =
        Layout::vertical([Length(1), Length(1), Min(0)]).areas(frame.area());

    TitleBar {
        sort_by: view.sort_by,
        network_state: &view.network_state,
        loaded: view.movies.len(),
        status_message: &tui.status_message,
        spinner_frame,
    }
    .render(frame, title_area);

    SortBar {
        active: view.sort_by,
    }
    .render(frame, sort_area);

    let (list_area, detail_area) = if main_area.width >= DETAIL_MIN_WIDTH {
        let [list, detail] =
            Layout::horizontal([Percentage(55), Percentage(45)]).areas(main_area);
        (list, Some(detail))
    } else {
        (main_area, None)
    };

    MovieList {
        state: &mut tui.movie_list,
        movies: &view.movies,
        network_state: &view.network_state,
        has_more: view.has_more,
    }
    .render(frame, list_area);

    if let Some(area) = detail_area {
        MovieDetail {
            movie: view.movies.get(tui.movie_list.selected),
        }
        .render(frame, area);
    }
}
