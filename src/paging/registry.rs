//! # Operation Registry
//!
//! A set of cancellation handles for in-flight async work, cleared as a unit.
//!
//! Every operation is spawned through [`OperationRegistry::spawn`]: its
//! `AbortHandle` is registered when the task is issued and removed again when
//! the task finishes on its own. [`OperationRegistry::clear`] aborts whatever
//! is still registered. There is no selective cancellation.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;
use tokio::task::AbortHandle;

type OperationId = u64;

#[derive(Debug, Default)]
struct Operations {
    next_id: OperationId,
    handles: HashMap<OperationId, AbortHandle>,
}

/// Cloning shares the same set of handles.
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    inner: Arc<Mutex<Operations>>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Operations> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Spawns `future` on the current Tokio runtime and tracks it until it
    /// completes or the registry is cleared.
    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // Held across the spawn so the task cannot deregister before it is registered.
        let mut ops = self.lock();
        let id = ops.next_id;
        ops.next_id += 1;

        let registry = self.clone();
        let handle = tokio::spawn(async move {
            future.await;
            registry.complete(id);
        });
        ops.handles.insert(id, handle.abort_handle());
        debug!("Registered operation {} ({} active)", id, ops.handles.len());
    }

    fn complete(&self, id: OperationId) {
        self.lock().handles.remove(&id);
    }

    /// Aborts every registered operation. Returns how many were cancelled.
    pub fn clear(&self) -> usize {
        let handles: Vec<AbortHandle> = {
            let mut ops = self.lock();
            ops.handles.drain().map(|(_, handle)| handle).collect()
        };
        for handle in &handles {
            handle.abort();
        }
        if !handles.is_empty() {
            debug!("Cancelled {} in-flight operations", handles.len());
        }
        handles.len()
    }

    pub fn len(&self) -> usize {
        self.lock().handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
