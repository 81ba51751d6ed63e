use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use super::types::{Envelope, MovieResponse};

/// Errors that can occur while talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Client misconfigured (missing API key, bad base URL).
    #[error("config error: {0}")]
    Config(String),
    /// Transport-level failure: timeout, DNS, connection refused.
    #[error("network error: {0}")]
    Network(String),
    /// The catalog answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
    /// The response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Read operations offered by the remote movie catalog.
///
/// Implementations inject credentials themselves; callers never pass an
/// API key. Every call resolves to exactly one envelope and dropping the
/// future cancels the request. Nothing here retries.
#[async_trait]
pub trait MovieService: Send + Sync {
    /// `GET discover/movie` with `filters` merged into the query string.
    async fn discover(
        &self,
        filters: &HashMap<String, String>,
    ) -> Result<Envelope<MovieResponse>, CatalogError>;

    /// `GET movie/upcoming` for a 1-based `page`.
    async fn fetch_upcoming_movies(
        &self,
        page: u32,
    ) -> Result<Envelope<MovieResponse>, CatalogError>;
}
