//! # Paging
//!
//! Incremental loading of page-keyed lists.
//!
//! ```text
//! Listing
//! ├── paged_list: LivePagedList ──► factory.current() ──► PagedSource
//! ├── network_state / refresh_state ─────┘                  │
//! └── refresh / retry ───────────────────┘                  ▼
//!                                          OperationRegistry (AbortHandles)
//! ```
//!
//! - [`registry`]: cancellation scope for in-flight loads
//! - [`source`]: one generation of pages plus its load/error state
//! - [`factory`]: builds sources and tracks the newest one
//! - [`list`]: restartable consumer view with prefetch
//! - [`listing`]: the bundle handed to a screen

pub mod factory;
pub mod list;
pub mod listing;
pub mod registry;
pub mod source;
pub mod state;

pub use factory::PagedSourceFactory;
pub use list::LivePagedList;
pub use listing::Listing;
pub use registry::OperationRegistry;
pub use source::{CANCELLED_MESSAGE, Page, PageLoader, PagedSource};
pub use state::{NetworkState, PagingConfig};
