use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::watch;

use super::registry::OperationRegistry;
use super::source::{PageLoader, PagedSource};

/// Builds paged sources for one loader and remembers the newest one.
///
/// `current` is swapped atomically on every [`create`](Self::create), so
/// anything that reads through it always sees the latest generation.
pub struct PagedSourceFactory<L: PageLoader> {
    registry: OperationRegistry,
    loader: Arc<L>,
    page_size: usize,
    current: watch::Sender<Option<Arc<PagedSource<L>>>>,
    created: AtomicUsize,
}

impl<L: PageLoader> PagedSourceFactory<L> {
    pub fn new(registry: OperationRegistry, loader: L, page_size: usize) -> Self {
        Self {
            registry,
            loader: Arc::new(loader),
            page_size,
            current: watch::Sender::new(None),
            created: AtomicUsize::new(0),
        }
    }

    pub fn create(&self) -> Arc<PagedSource<L>> {
        let source = Arc::new(PagedSource::new(
            Arc::clone(&self.loader),
            self.registry.clone(),
            self.page_size,
        ));
        self.current.send_replace(Some(Arc::clone(&source)));
        self.created.fetch_add(1, Ordering::Relaxed);
        source
    }

    pub fn current(&self) -> Option<Arc<PagedSource<L>>> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<PagedSource<L>>>> {
        self.current.subscribe()
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn sources_created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }
}
