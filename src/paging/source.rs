//! # Paged Source
//!
//! One load generation of a page-keyed list. A source loads page 1, then
//! appends pages on demand until the loader reports no next page.
//!
//! ```text
//! load_initial ──► page 1 ──► load_after ──► page 2 ──► ... ──► next_page = None
//!        │                         │
//!        └──── Error ──► failed ◄──┘      retry_all_failed re-issues `failed` only
//! ```
//!
//! A source is never reset. Refreshing means invalidating it and letting the
//! owner build a fresh one. Results that arrive after invalidation are dropped.

use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::sync::watch;

use super::registry::OperationRegistry;
use super::state::NetworkState;

/// Message recorded when an in-flight load is aborted before it settles.
pub const CANCELLED_MESSAGE: &str = "request cancelled";

/// A loaded page and the key of the page after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page: Option<u32>,
}

/// Fetches pages by 1-based page number.
#[async_trait]
pub trait PageLoader: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;
    type Error: Display + Send;

    async fn load_page(&self, page: u32, page_size: usize)
    -> Result<Page<Self::Item>, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadKind {
    Initial,
    After(u32),
}

impl LoadKind {
    fn page(self) -> u32 {
        match self {
            LoadKind::Initial => 1,
            LoadKind::After(page) => page,
        }
    }
}

type InvalidatedCallback = Box<dyn FnOnce() + Send>;

struct SourceState {
    next_page: Option<u32>,
    in_flight: Option<LoadKind>,
    failed: Option<LoadKind>,
    invalidated: bool,
    on_invalidated: Vec<InvalidatedCallback>,
}

pub struct PagedSource<L: PageLoader> {
    loader: Arc<L>,
    registry: OperationRegistry,
    page_size: usize,
    state: Mutex<SourceState>,
    items: watch::Sender<Arc<Vec<L::Item>>>,
    network_state: watch::Sender<NetworkState>,
    initial_load: watch::Sender<NetworkState>,
}

impl<L: PageLoader> PagedSource<L> {
    pub fn new(loader: Arc<L>, registry: OperationRegistry, page_size: usize) -> Self {
        Self {
            loader,
            registry,
            page_size,
            state: Mutex::new(SourceState {
                next_page: None,
                in_flight: None,
                failed: None,
                invalidated: false,
                on_invalidated: Vec::new(),
            }),
            items: watch::Sender::new(Arc::new(Vec::new())),
            network_state: watch::Sender::new(NetworkState::Idle),
            initial_load: watch::Sender::new(NetworkState::Idle),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SourceState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Requests page 1.
    pub fn load_initial(self: &Arc<Self>) -> bool {
        self.start(LoadKind::Initial)
    }

    /// Requests the next page. No-op while a load is in flight, after a
    /// failure (use [`retry_all_failed`](Self::retry_all_failed)), or once
    /// the last page has arrived.
    pub fn load_after(self: &Arc<Self>) -> bool {
        let next = {
            let state = self.lock();
            if state.failed.is_some() {
                return false;
            }
            state.next_page
        };
        match next {
            Some(page) => self.start(LoadKind::After(page)),
            None => false,
        }
    }

    /// Re-issues the load that last failed, and nothing else.
    pub fn retry_all_failed(self: &Arc<Self>) -> bool {
        let failed = self.lock().failed;
        match failed {
            Some(kind) => {
                info!("Retrying failed load of page {}", kind.page());
                self.start(kind)
            }
            None => false,
        }
    }

    fn start(self: &Arc<Self>, kind: LoadKind) -> bool {
        {
            let mut state = self.lock();
            if state.invalidated || state.in_flight.is_some() {
                return false;
            }
            state.in_flight = Some(kind);
            if state.failed == Some(kind) {
                state.failed = None;
            }
            self.network_state.send_replace(NetworkState::Loading);
            if kind == LoadKind::Initial {
                self.initial_load.send_replace(NetworkState::Loading);
            }
        }
        debug!("Loading page {}", kind.page());

        let guard = LoadGuard {
            source: Arc::clone(self),
            kind,
            settled: false,
        };
        self.registry.spawn(async move {
            let mut guard = guard;
            let result = guard
                .source
                .loader
                .load_page(kind.page(), guard.source.page_size)
                .await
                .map_err(|e| e.to_string());
            guard.settled = true;
            guard.source.finish(kind, result);
        });
        true
    }

    fn finish(&self, kind: LoadKind, result: Result<Page<L::Item>, String>) {
        let mut state = self.lock();
        if state.in_flight == Some(kind) {
            state.in_flight = None;
        }
        if state.invalidated {
            debug!("Discarding page {} from invalidated source", kind.page());
            return;
        }

        // Signals are published with the lock held, so a load started right
        // after this one can never have its `Loading` overwritten by this outcome.
        match result {
            Ok(page) => {
                state.next_page = page.next_page;
                let count = page.items.len();
                self.items.send_modify(|items| Arc::make_mut(items).extend(page.items));
                debug!("Page {} loaded ({} items)", kind.page(), count);
                self.network_state.send_replace(NetworkState::Loaded);
                if kind == LoadKind::Initial {
                    self.initial_load.send_replace(NetworkState::Loaded);
                }
            }
            Err(message) => {
                state.failed = Some(kind);
                warn!("Page {} failed: {}", kind.page(), message);
                self.network_state.send_replace(NetworkState::error(message.clone()));
                if kind == LoadKind::Initial {
                    self.initial_load.send_replace(NetworkState::error(message));
                }
            }
        }
    }

    /// Marks this source dead and runs its invalidation callbacks once.
    pub fn invalidate(&self) {
        let callbacks = {
            let mut state = self.lock();
            if state.invalidated {
                return;
            }
            state.invalidated = true;
            std::mem::take(&mut state.on_invalidated)
        };
        debug!("Source invalidated ({} callbacks)", callbacks.len());
        for callback in callbacks {
            callback();
        }
    }

    /// Runs `callback` on invalidation, or right away if already invalid.
    pub fn add_invalidated_callback(&self, callback: impl FnOnce() + Send + 'static) {
        let mut state = self.lock();
        if state.invalidated {
            drop(state);
            callback();
        } else {
            state.on_invalidated.push(Box::new(callback));
        }
    }

    pub fn is_loading(&self) -> bool {
        self.lock().in_flight.is_some()
    }

    /// True once a page has reported a successor that is not loaded yet.
    pub fn has_more(&self) -> bool {
        self.lock().next_page.is_some()
    }

    pub fn items(&self) -> Arc<Vec<L::Item>> {
        self.items.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn network_state(&self) -> NetworkState {
        self.network_state.borrow().clone()
    }

    pub fn initial_load(&self) -> NetworkState {
        self.initial_load.borrow().clone()
    }
}

/// Settles a load as cancelled if its task is dropped before it finishes.
struct LoadGuard<L: PageLoader> {
    source: Arc<PagedSource<L>>,
    kind: LoadKind,
    settled: bool,
}

impl<L: PageLoader> Drop for LoadGuard<L> {
    fn drop(&mut self) {
        if !self.settled {
            self.source
                .finish(self.kind, Err(CANCELLED_MESSAGE.to_string()));
        }
    }
}
