use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

/// Sort criteria accepted by the discover listing.
///
/// `Upcoming` is not a discover sort key: it selects the upcoming-releases
/// endpoint instead, which has its own fixed ordering.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Popularity,
    Rating,
    ReleaseDate,
    Revenue,
    Upcoming,
}

impl SortBy {
    /// Every sort order, in the order the screen lists them.
    pub const ALL: [SortBy; 5] = [
        SortBy::Popularity,
        SortBy::Rating,
        SortBy::ReleaseDate,
        SortBy::Revenue,
        SortBy::Upcoming,
    ];

    /// Value of the `sort_by` query parameter, or `None` for `Upcoming`.
    pub fn wire_value(self) -> Option<&'static str> {
        match self {
            SortBy::Popularity => Some("popularity.desc"),
            SortBy::Rating => Some("vote_average.desc"),
            SortBy::ReleaseDate => Some("primary_release_date.desc"),
            SortBy::Revenue => Some("revenue.desc"),
            SortBy::Upcoming => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortBy::Popularity => "Popular",
            SortBy::Rating => "Top rated",
            SortBy::ReleaseDate => "Newest",
            SortBy::Revenue => "Box office",
            SortBy::Upcoming => "Upcoming",
        }
    }
}

/// A single movie as returned in TMDB list results.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default, deserialize_with = "empty_date_as_none")]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub adult: bool,
}

impl Movie {
    pub fn release_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.release_date.map(|d| d.year())
    }
}

/// TMDB returns `""` rather than `null` for movies without a release date.
fn empty_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// TMDB refuses list requests for pages beyond this, whatever `total_pages` says.
pub const MAX_PAGE: u32 = 500;

/// One page of a paginated movie list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MovieResponse {
    pub page: u32,
    #[serde(default)]
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

impl MovieResponse {
    /// The page after this one, if the catalog has more and will serve it.
    pub fn next_page(&self) -> Option<u32> {
        (self.page < self.total_pages.min(MAX_PAGE)).then_some(self.page + 1)
    }
}

/// Result of a single HTTP exchange: the status code plus either the decoded
/// body (2xx) or the raw error body.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub status: u16,
    pub body: Option<T>,
    pub error_body: Option<String>,
}

impl<T> Envelope<T> {
    pub fn success(status: u16, body: T) -> Self {
        Self {
            status,
            body: Some(body),
            error_body: None,
        }
    }

    pub fn failure(status: u16, error_body: String) -> Self {
        Self {
            status,
            body: None,
            error_body: Some(error_body),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
