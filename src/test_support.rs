//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::catalog::{CatalogError, Envelope, Movie, MovieResponse, MovieService};
use crate::paging::{Page, PageLoader};

/// Polls `condition` until it holds, yielding to spawned tasks in between.
pub async fn wait_for(mut condition: impl FnMut() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met within 2s");
}

/// Shared behaviour of the scripted fakes: a fixed page count, an optional
/// gate that holds every request until opened, pages that fail once, and
/// pages that never answer.
struct Script {
    total_pages: u32,
    gate: watch::Sender<bool>,
    hang_from: Option<u32>,
    fail_once: Mutex<HashSet<u32>>,
    in_flight: AtomicUsize,
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Script {
    fn new(total_pages: u32) -> Self {
        Self {
            total_pages,
            gate: watch::Sender::new(true),
            hang_from: None,
            fail_once: Mutex::new(HashSet::new()),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Waits for the gate, then reports whether this request should fail.
    async fn run(&self, page: u32) -> bool {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let _in_flight = InFlight(&self.in_flight);
        let mut gate = self.gate.subscribe();
        let _ = gate.wait_for(|open| *open).await;
        if self.hang_from.is_some_and(|first| page >= first) {
            std::future::pending::<()>().await;
        }
        self.fail_once.lock().unwrap().remove(&page)
    }

    fn next_page(&self, page: u32) -> Option<u32> {
        (page < self.total_pages).then_some(page + 1)
    }
}

/// Page loader over plain numbers: page `p` holds `(p-1)*20 .. p*20`.
pub struct ScriptedLoader {
    script: Script,
    requested: Mutex<Vec<u32>>,
}

impl ScriptedLoader {
    pub fn new(total_pages: u32) -> Self {
        Self {
            script: Script::new(total_pages),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn with_gate(self) -> Self {
        self.script.gate.send_replace(false);
        self
    }

    pub fn failing_once(self, page: u32) -> Self {
        self.script.fail_once.lock().unwrap().insert(page);
        self
    }

    /// Requests for `page` and later never resolve.
    pub fn hanging_from(mut self, page: u32) -> Self {
        self.script.hang_from = Some(page);
        self
    }

    pub fn open_gate(&self) {
        self.script.gate.send_replace(true);
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageLoader for ScriptedLoader {
    type Item = u32;
    type Error = String;

    async fn load_page(&self, page: u32, page_size: usize) -> Result<Page<u32>, String> {
        self.requested.lock().unwrap().push(page);
        if self.script.run(page).await {
            return Err(format!("page {page} failed"));
        }
        let start = (page - 1) * page_size as u32;
        Ok(Page {
            items: (start..start + page_size as u32).collect(),
            next_page: self.script.next_page(page),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Discover { sort_by: String, page: u32 },
    Upcoming { page: u32 },
}

impl Request {
    pub fn page(&self) -> u32 {
        match self {
            Request::Discover { page, .. } | Request::Upcoming { page } => *page,
        }
    }
}

/// In-memory catalog that serves 20 generated movies per page.
pub struct ScriptedService {
    script: Script,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedService {
    pub fn new(total_pages: u32) -> Self {
        Self {
            script: Script::new(total_pages),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_gate(self) -> Self {
        self.script.gate.send_replace(false);
        self
    }

    pub fn failing_once(self, page: u32) -> Self {
        self.script.fail_once.lock().unwrap().insert(page);
        self
    }

    pub fn open_gate(&self) {
        self.script.gate.send_replace(true);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn in_flight(&self) -> usize {
        self.script.in_flight.load(Ordering::SeqCst)
    }

    async fn respond(&self, request: Request) -> Result<Envelope<MovieResponse>, CatalogError> {
        let page = request.page();
        self.requests.lock().unwrap().push(request);
        if self.script.run(page).await {
            return Ok(Envelope::failure(
                500,
                r#"{"status_message":"scripted failure"}"#.to_string(),
            ));
        }
        Ok(Envelope::success(200, movie_page(page, self.script.total_pages)))
    }
}

#[async_trait]
impl MovieService for ScriptedService {
    async fn discover(
        &self,
        filters: &HashMap<String, String>,
    ) -> Result<Envelope<MovieResponse>, CatalogError> {
        let sort_by = filters.get("sort_by").cloned().unwrap_or_default();
        let page = filters
            .get("page")
            .and_then(|p| p.parse().ok())
            .unwrap_or(1);
        self.respond(Request::Discover { sort_by, page }).await
    }

    async fn fetch_upcoming_movies(
        &self,
        page: u32,
    ) -> Result<Envelope<MovieResponse>, CatalogError> {
        self.respond(Request::Upcoming { page }).await
    }
}

pub fn test_movie(id: u64) -> Movie {
    Movie {
        id,
        title: format!("Movie {id}"),
        overview: format!("Overview of movie {id}."),
        release_date: chrono::NaiveDate::from_ymd_opt(2020, 1, 1),
        vote_average: 7.5,
        vote_count: 100,
        popularity: 10.0,
        poster_path: None,
        backdrop_path: None,
        original_language: "en".to_string(),
        genre_ids: vec![],
        adult: false,
    }
}

pub fn movie_page(page: u32, total_pages: u32) -> MovieResponse {
    let start = u64::from(page - 1) * 20;
    MovieResponse {
        page,
        results: (start..start + 20).map(test_movie).collect(),
        total_pages,
        total_results: total_pages * 20,
    }
}

/// Concatenated cell symbols of a rendered buffer, row after row.
pub fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    buffer.content().iter().map(|cell| cell.symbol()).collect()
}
