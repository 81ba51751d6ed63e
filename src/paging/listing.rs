use std::sync::Arc;

use super::factory::PagedSourceFactory;
use super::list::LivePagedList;
use super::source::PageLoader;
use super::state::{NetworkState, PagingConfig};

/// Everything a screen needs to show one query's results.
///
/// Signals and actions read through the factory's current source, so they
/// follow the list across refreshes instead of pinning the first source.
pub struct Listing<L: PageLoader> {
    pub paged_list: LivePagedList<L>,
    factory: Arc<PagedSourceFactory<L>>,
}

impl<L: PageLoader> Listing<L> {
    /// Must be called within a Tokio runtime: page 1 is requested immediately.
    pub fn new(factory: PagedSourceFactory<L>, config: PagingConfig) -> Self {
        let factory = Arc::new(factory);
        let paged_list = LivePagedList::new(Arc::clone(&factory), config);
        Self {
            paged_list,
            factory,
        }
    }

    /// State of the latest page load of the current source.
    pub fn network_state(&self) -> NetworkState {
        self.factory
            .current()
            .map(|source| source.network_state())
            .unwrap_or_default()
    }

    /// State of the current source's first page.
    pub fn refresh_state(&self) -> NetworkState {
        self.factory
            .current()
            .map(|source| source.initial_load())
            .unwrap_or_default()
    }

    /// Invalidates the current source; the list reloads from page 1.
    pub fn refresh(&self) {
        if let Some(source) = self.factory.current() {
            source.invalidate();
        }
    }

    /// Re-requests failed pages of the current source only.
    pub fn retry(&self) {
        if let Some(source) = self.factory.current() {
            source.retry_all_failed();
        }
    }

    pub fn loader(&self) -> &L {
        self.factory.loader()
    }

    pub fn sources_created(&self) -> usize {
        self.factory.sources_created()
    }

    pub(crate) fn retire(&self) {
        self.paged_list.retire();
    }
}
