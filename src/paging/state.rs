/// Outcome of the most recent load attempt on a paged source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NetworkState {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading,
    Loaded,
    Error(String),
}

impl NetworkState {
    pub fn error(message: impl Into<String>) -> Self {
        NetworkState::Error(message.into())
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, NetworkState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, NetworkState::Error(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            NetworkState::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            NetworkState::Idle => "idle",
            NetworkState::Loading => "loading",
            NetworkState::Loaded => "loaded",
            NetworkState::Error(_) => "error",
        }
    }
}

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_PREFETCH_DISTANCE: usize = 5;

/// How a paged list pulls pages from its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    /// Items requested per page.
    pub page_size: usize,
    /// Start loading the next page once the consumer is this close to the end.
    pub prefetch_distance: usize,
    /// Placeholders for not-yet-loaded items. Always off for movie listings.
    pub enable_placeholders: bool,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            prefetch_distance: DEFAULT_PREFETCH_DISTANCE,
            enable_placeholders: false,
        }
    }
}
