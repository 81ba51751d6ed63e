//! TMDB v3 transport for [`MovieService`].
//!
//! The API key is supplied by configuration and appended to every request
//! here, at the transport boundary. Request declarations above this layer
//! never see it.

use std::collections::HashMap;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::RequestBuilder;

use super::service::{CatalogError, MovieService};
use super::types::{Envelope, MovieResponse};

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// HTTP client for the TMDB movie catalog.
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    language: Option<String>,
    region: Option<String>,
    client: reqwest::Client,
}

impl TmdbClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.to_string());
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            language: None,
            region: None,
            client: reqwest::Client::new(),
        }
    }

    /// Builds a client from a possibly-missing key, failing with a config error.
    pub fn from_credentials(
        api_key: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self, CatalogError> {
        match api_key {
            Some(key) if !key.trim().is_empty() => Ok(Self::new(key, base_url)),
            _ => Err(CatalogError::Config(
                "TMDB API key must be set (config file, TMDB_API_KEY env var, or --api-key)"
                    .to_string(),
            )),
        }
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let mut builder = self
            .client
            .get(format!("{}/{}", self.base_url, path))
            .query(&[("api_key", self.api_key.as_str())]);
        if let Some(language) = &self.language {
            builder = builder.query(&[("language", language.as_str())]);
        }
        if let Some(region) = &self.region {
            builder = builder.query(&[("region", region.as_str())]);
        }
        builder
    }

    /// Sends the request and wraps whatever comes back in an envelope.
    async fn execute(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<Envelope<MovieResponse>, CatalogError> {
        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        debug!("TMDB {} -> {}", path, status);

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!("TMDB {} failed: {} - {}", path, status.as_u16(), body);
            return Ok(Envelope::failure(status.as_u16(), body));
        }

        let parsed: MovieResponse =
            serde_json::from_str(&body).map_err(|e| CatalogError::Parse(e.to_string()))?;
        info!(
            "TMDB {}: page {}/{} ({} results)",
            path,
            parsed.page,
            parsed.total_pages,
            parsed.results.len()
        );
        Ok(Envelope::success(status.as_u16(), parsed))
    }
}

#[async_trait]
impl MovieService for TmdbClient {
    async fn discover(
        &self,
        filters: &HashMap<String, String>,
    ) -> Result<Envelope<MovieResponse>, CatalogError> {
        let path = "discover/movie";
        self.execute(path, self.get(path).query(filters)).await
    }

    async fn fetch_upcoming_movies(
        &self,
        page: u32,
    ) -> Result<Envelope<MovieResponse>, CatalogError> {
        let path = "movie/upcoming";
        self.execute(path, self.get(path).query(&[("page", page)]))
            .await
    }
}
