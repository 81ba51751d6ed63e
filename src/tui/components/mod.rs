//! # TUI Components
//!
//! All UI components for the movie browser.
//!
//! ## Component Architecture
//!
//! Components follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as struct fields:
//! - `TitleBar`: sort order, loaded count and network state
//! - `SortBar`: tabs for the five sort orders
//! - `MovieDetail`: overview of the selected movie
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `MovieList`: scrollable list whose `MovieListState` persists across
//!   frames and turns navigation events into a selected row
//!
//! ## Props-Based Data Flow
//!
//! Components never reach into the controller. `ui::draw_ui` snapshots what
//! each one needs and passes it in as props, so every component can be
//! rendered against a `TestBackend` with hand-built data.
//!
//! ```text
//! components/
//! ├── mod.rs          (this file)
//! ├── title_bar.rs    (top status line)
//! ├── sort_bar.rs     (sort order tabs)
//! ├── movie_list.rs   (selectable list + paging footer)
//! └── detail.rs       (selected movie overview)
//! ```

mod detail;
mod movie_list;
mod sort_bar;
mod title_bar;

pub use detail::MovieDetail;
pub use movie_list::{MovieList, MovieListState};
pub use sort_bar::SortBar;
pub use title_bar::TitleBar;
