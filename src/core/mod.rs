//! # Core Application Logic
//!
//! This module contains Marquee's presentation logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • MovieController      │
//!                    │  • MovieDataSource      │
//!                    │  • config resolution    │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │  catalog   │
//!     │  Adapter   │                          │  (TMDB)    │
//!     │ (ratatui)  │                          │            │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`controller`]: query → listing wiring consumed by a screen
//! - [`data_source`]: page N for sort order S, over a `MovieService`
//! - [`config`]: defaults → file → env → CLI

pub mod config;
pub mod controller;
pub mod data_source;

pub use controller::{MovieController, MovieListing, MoviePagedList, Query};
pub use data_source::{MovieDataSource, MoviePage, SortedMovieLoader};
