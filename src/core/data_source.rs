//! # Movie Data Source
//!
//! Turns "page N for sort order S" into the matching catalog request and
//! flattens the envelope into a page or an error. `Upcoming` goes to the
//! upcoming endpoint; every other sort order goes through discover.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::catalog::{CatalogError, Envelope, Movie, MovieResponse, MovieService, SortBy};
use crate::paging::{Page, PageLoader};

pub type MoviePage = Page<Movie>;

pub struct MovieDataSource {
    service: Arc<dyn MovieService>,
}

impl MovieDataSource {
    pub fn new(service: Arc<dyn MovieService>) -> Self {
        Self { service }
    }

    pub async fn load_page(&self, sort_by: SortBy, page: u32) -> Result<MoviePage, CatalogError> {
        debug!("Fetching {:?} page {}", sort_by, page);
        let envelope = match sort_by.wire_value() {
            Some(sort_key) => {
                let filters = HashMap::from([
                    ("sort_by".to_string(), sort_key.to_string()),
                    ("page".to_string(), page.to_string()),
                ]);
                self.service.discover(&filters).await?
            }
            None => self.service.fetch_upcoming_movies(page).await?,
        };
        into_page(envelope)
    }
}

fn into_page(envelope: Envelope<MovieResponse>) -> Result<MoviePage, CatalogError> {
    let status = envelope.status;
    if !envelope.is_success() {
        return Err(CatalogError::Api {
            status,
            message: envelope.error_body.unwrap_or_default(),
        });
    }
    let response = envelope.body.ok_or_else(|| CatalogError::Api {
        status,
        message: "empty response body".to_string(),
    })?;
    let next_page = response.next_page();
    Ok(Page {
        items: response.results,
        next_page,
    })
}

/// A [`MovieDataSource`] pinned to one sort order, for use as a page loader.
pub struct SortedMovieLoader {
    data_source: Arc<MovieDataSource>,
    sort_by: SortBy,
}

impl SortedMovieLoader {
    pub fn new(data_source: Arc<MovieDataSource>, sort_by: SortBy) -> Self {
        Self {
            data_source,
            sort_by,
        }
    }

    pub fn sort_by(&self) -> SortBy {
        self.sort_by
    }
}

#[async_trait]
impl PageLoader for SortedMovieLoader {
    type Item = Movie;
    type Error = CatalogError;

    // TMDB pages are fixed at 20 results, so `page_size` is not sent.
    async fn load_page(&self, page: u32, _page_size: usize) -> Result<MoviePage, CatalogError> {
        self.data_source.load_page(self.sort_by, page).await
    }
}
