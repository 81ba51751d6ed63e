//! # Live Paged List
//!
//! Consumer-facing view over whichever source the factory produced last.
//! When that source is invalidated the list asks the factory for a new one
//! and starts again from page 1, until the list is retired.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use super::factory::PagedSourceFactory;
use super::source::{PageLoader, PagedSource};
use super::state::PagingConfig;

struct LiveInner<L: PageLoader> {
    factory: Arc<PagedSourceFactory<L>>,
    config: PagingConfig,
    retired: AtomicBool,
}

impl<L: PageLoader> LiveInner<L> {
    fn bind_new_source(self: &Arc<Self>) {
        if self.retired.load(Ordering::Acquire) {
            return;
        }
        let source = self.factory.create();
        let weak = Arc::downgrade(self);
        source.add_invalidated_callback(move || {
            if let Some(inner) = weak.upgrade() {
                debug!("Paged list source invalidated, rebinding");
                inner.bind_new_source();
            }
        });
        source.load_initial();
    }
}

/// A lazily loaded, restartable list. Cloning shares the same list.
pub struct LivePagedList<L: PageLoader> {
    inner: Arc<LiveInner<L>>,
}

impl<L: PageLoader> Clone for LivePagedList<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L: PageLoader> LivePagedList<L> {
    /// Creates the first source and starts loading page 1.
    ///
    /// Must be called within a Tokio runtime.
    pub fn new(factory: Arc<PagedSourceFactory<L>>, config: PagingConfig) -> Self {
        let inner = Arc::new(LiveInner {
            factory,
            config,
            retired: AtomicBool::new(false),
        });
        inner.bind_new_source();
        Self { inner }
    }

    pub fn source(&self) -> Option<Arc<PagedSource<L>>> {
        self.inner.factory.current()
    }

    pub fn config(&self) -> PagingConfig {
        self.inner.config
    }

    pub fn snapshot(&self) -> Arc<Vec<L::Item>> {
        self.source()
            .map(|source| source.items())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.source().map_or(0, |source| source.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<L::Item> {
        self.snapshot().get(index).cloned()
    }

    /// Tells the list the consumer is looking at `index`. Requests the next
    /// page once `index` is within `prefetch_distance` of the loaded end.
    pub fn load_around(&self, index: usize) -> bool {
        let Some(source) = self.source() else {
            return false;
        };
        if index.saturating_add(self.inner.config.prefetch_distance) >= source.len() {
            source.load_after()
        } else {
            false
        }
    }

    /// Stops rebinding and invalidates the current source, so its pending
    /// results are dropped when they arrive.
    pub fn retire(&self) {
        self.inner.retired.store(true, Ordering::Release);
        if let Some(source) = self.source() {
            source.invalidate();
        }
    }

    pub fn is_retired(&self) -> bool {
        self.inner.retired.load(Ordering::Acquire)
    }
}
