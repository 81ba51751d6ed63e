//! # Movie Controller
//!
//! Presentation state for the movie screen. Holds the current query and
//! derives a [`Listing`] from it.
//!
//! ```text
//! discover(sort) ──► query (watch) ──► next observation ──► load_movies(sort)
//!                                                              │
//!      listing() / discovered_movies() / network_state() ◄─────┘
//! ```
//!
//! The listing is rebuilt as a reaction to a published query, not inside
//! `discover()` itself: the first observation after a change builds exactly
//! one new listing and retires the previous one. A retired listing never
//! rebinds, and its in-flight loads finish but their results are dropped.
//! Only [`refresh`](MovieController::refresh) and teardown abort loads, and
//! they abort all of them.

use std::sync::Arc;

use log::{debug, info};
use tokio::sync::watch;

use crate::catalog::SortBy;
use crate::core::data_source::{MovieDataSource, SortedMovieLoader};
use crate::paging::{
    LivePagedList, Listing, NetworkState, OperationRegistry, PagedSourceFactory, PagingConfig,
};

pub type MovieListing = Listing<SortedMovieLoader>;
pub type MoviePagedList = LivePagedList<SortedMovieLoader>;

/// What the screen asked for. Replaced, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub search_term: String,
    pub sort_by: SortBy,
}

pub struct MovieController {
    data_source: Arc<MovieDataSource>,
    paging: PagingConfig,
    registry: OperationRegistry,
    query: watch::Sender<Option<Query>>,
    query_rx: watch::Receiver<Option<Query>>,
    listing: Option<Arc<MovieListing>>,
    listings_built: usize,
}

impl MovieController {
    pub fn new(data_source: Arc<MovieDataSource>, paging: PagingConfig) -> Self {
        let (query, query_rx) = watch::channel(None);
        Self {
            data_source,
            paging,
            registry: OperationRegistry::new(),
            query,
            query_rx,
            listing: None,
            listings_built: 0,
        }
    }

    /// Switches to `sort_by` with an empty search term. Returns `false`
    /// without touching anything if that sort order is already active.
    pub fn discover(&mut self, sort_by: SortBy) -> bool {
        if self.sort_by() == Some(sort_by) {
            return false;
        }
        info!("Discover: {:?}", sort_by);
        self.query.send_replace(Some(Query {
            search_term: String::new(),
            sort_by,
        }));
        true
    }

    /// Cancels every in-flight operation started on behalf of this controller.
    pub fn refresh(&self) {
        let cancelled = self.registry.clear();
        info!("Refresh: cancelled {} operations", cancelled);
    }

    /// Teardown. Cancels outstanding work and releases the listing.
    pub fn on_cleared(mut self) {
        self.refresh();
        if let Some(listing) = self.listing.take() {
            listing.retire();
        }
        debug!("Movie controller cleared");
    }

    pub fn query(&self) -> Option<Query> {
        self.query.borrow().clone()
    }

    pub fn sort_by(&self) -> Option<SortBy> {
        self.query.borrow().as_ref().map(|q| q.sort_by)
    }

    pub fn subscribe_query(&self) -> watch::Receiver<Option<Query>> {
        self.query.subscribe()
    }

    /// Current listing, rebuilt first if the query changed since the last look.
    pub fn listing(&mut self) -> Option<Arc<MovieListing>> {
        self.apply_pending_query();
        self.listing.clone()
    }

    pub fn discovered_movies(&mut self) -> Option<MoviePagedList> {
        self.listing().map(|listing| listing.paged_list.clone())
    }

    pub fn network_state(&mut self) -> NetworkState {
        self.listing()
            .map(|listing| listing.network_state())
            .unwrap_or_default()
    }

    pub fn refresh_state(&mut self) -> NetworkState {
        self.listing()
            .map(|listing| listing.refresh_state())
            .unwrap_or_default()
    }

    pub fn listings_built(&self) -> usize {
        self.listings_built
    }

    pub fn active_operations(&self) -> usize {
        self.registry.len()
    }

    fn apply_pending_query(&mut self) {
        if !self.query_rx.has_changed().unwrap_or(false) {
            return;
        }
        let query = self.query_rx.borrow_and_update().clone();
        if let Some(previous) = self.listing.take() {
            previous.retire();
        }
        self.listing = query.map(|q| Arc::new(self.load_movies(q.sort_by)));
    }

    fn load_movies(&mut self, sort_by: SortBy) -> MovieListing {
        let loader = SortedMovieLoader::new(Arc::clone(&self.data_source), sort_by);
        let factory = PagedSourceFactory::new(self.registry.clone(), loader, self.paging.page_size);
        let config = PagingConfig {
            enable_placeholders: false,
            ..self.paging
        };
        self.listings_built += 1;
        debug!("Building listing #{} for {:?}", self.listings_built, sort_by);
        Listing::new(factory, config)
    }
}

impl Drop for MovieController {
    fn drop(&mut self) {
        self.registry.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Request, ScriptedService, wait_for};

    fn controller(service: Arc<ScriptedService>) -> MovieController {
        MovieController::new(
            Arc::new(MovieDataSource::new(service)),
            PagingConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_discover_same_sort_twice_is_noop() {
        let mut controller = controller(Arc::new(ScriptedService::new(2)));
        assert!(controller.query().is_none());

        assert!(controller.discover(SortBy::Rating));
        let published = controller.query().unwrap();
        assert_eq!(published.search_term, "");
        assert_eq!(published.sort_by, SortBy::Rating);

        let mut rx = controller.subscribe_query();
        assert!(!controller.discover(SortBy::Rating));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(controller.query(), Some(published));
    }

    #[tokio::test]
    async fn test_each_query_change_builds_one_listing() {
        let mut controller = controller(Arc::new(ScriptedService::new(2)));
        assert!(controller.listing().is_none());
        assert_eq!(controller.listings_built(), 0);

        controller.discover(SortBy::Popularity);
        let first = controller.listing().unwrap();
        // Repeated observation reuses the same listing.
        let again = controller.listing().unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(controller.listings_built(), 1);

        controller.discover(SortBy::Revenue);
        let second = controller.listing().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(controller.listings_built(), 2);
        assert_eq!(second.loader().sort_by(), SortBy::Revenue);
        assert!(first.paged_list.is_retired());
    }

    #[tokio::test]
    async fn test_noop_discover_does_not_rebuild() {
        let mut controller = controller(Arc::new(ScriptedService::new(2)));
        controller.discover(SortBy::Popularity);
        controller.listing();
        controller.discover(SortBy::Popularity);
        controller.listing();
        assert_eq!(controller.listings_built(), 1);
    }

    #[tokio::test]
    async fn test_network_state_idle_loading_loaded() {
        let service = Arc::new(ScriptedService::new(3).with_gate());
        let mut controller = controller(service.clone());
        assert_eq!(controller.network_state(), NetworkState::Idle);

        assert!(controller.discover(SortBy::Popularity));
        assert_eq!(controller.network_state(), NetworkState::Loading);
        assert_eq!(controller.refresh_state(), NetworkState::Loading);

        service.open_gate();
        wait_for(|| controller.network_state() == NetworkState::Loaded).await;
        let movies = controller.discovered_movies().unwrap();
        assert_eq!(movies.len(), 20);
        assert_eq!(
            service.requests(),
            vec![Request::Discover {
                sort_by: "popularity.desc".into(),
                page: 1
            }]
        );
    }

    #[tokio::test]
    async fn test_refresh_cancels_all_operations() {
        let service = Arc::new(ScriptedService::new(3).with_gate());
        let mut controller = controller(service.clone());
        controller.discover(SortBy::Popularity);
        controller.listing();
        assert_eq!(controller.active_operations(), 1);

        controller.refresh();
        assert_eq!(controller.active_operations(), 0);
        wait_for(|| service.in_flight() == 0).await;
        assert_eq!(
            controller.network_state().message(),
            Some(crate::paging::CANCELLED_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_on_cleared_cancels_in_flight_requests() {
        let service = Arc::new(ScriptedService::new(3).with_gate());
        let mut controller = controller(service.clone());
        controller.discover(SortBy::Upcoming);
        controller.listing();
        wait_for(|| service.in_flight() == 1).await;

        controller.on_cleared();
        wait_for(|| service.in_flight() == 0).await;
        assert_eq!(service.requests(), vec![Request::Upcoming { page: 1 }]);
    }

    #[tokio::test]
    async fn test_superseded_listing_discards_late_results() {
        let service = Arc::new(ScriptedService::new(3).with_gate());
        let mut controller = controller(service.clone());

        controller.discover(SortBy::Popularity);
        let old = controller.listing().unwrap();
        controller.discover(SortBy::Rating);
        let new = controller.listing().unwrap();
        // Switching queries does not abort the old request.
        assert_eq!(controller.active_operations(), 2);

        service.open_gate();
        wait_for(|| new.paged_list.len() == 20).await;
        wait_for(|| controller.active_operations() == 0).await;
        assert!(old.paged_list.is_empty());
        assert_eq!(old.sources_created(), 1);
    }

    #[tokio::test]
    async fn test_retry_only_requests_failed_page() {
        let service = Arc::new(ScriptedService::new(3).failing_once(2));
        let mut controller = controller(service.clone());
        controller.discover(SortBy::ReleaseDate);
        let listing = controller.listing().unwrap();
        wait_for(|| listing.paged_list.len() == 20).await;

        listing.paged_list.load_around(15);
        wait_for(|| controller.network_state().is_error()).await;

        listing.retry();
        wait_for(|| listing.paged_list.len() == 40).await;
        let pages: Vec<u32> = service.requests().iter().map(Request::page).collect();
        assert_eq!(pages, vec![1, 2, 2]);
    }
}
