pub mod client;
pub mod service;
pub mod types;

pub use client::TmdbClient;
pub use service::{CatalogError, MovieService};
pub use types::{Envelope, Movie, MovieResponse, SortBy};
