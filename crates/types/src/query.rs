/// Snapshot of a cached external read

use serde::{Deserialize, Serialize};

/// Current state of an asynchronous, cached read
///
/// `data` is whatever the cache holds; `is_loading` is true while a fetch
/// without usable data is in flight. A disabled read is `idle`: no data and
/// not loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryState<T> {
    pub data: Option<T>,
    pub is_loading: bool,
}

impl<T> QueryState<T> {
    pub fn ready(data: T) -> Self {
        Self {
            data: Some(data),
            is_loading: false,
        }
    }

    pub fn loading() -> Self {
        Self {
            data: None,
            is_loading: true,
        }
    }

    pub fn idle() -> Self {
        Self {
            data: None,
            is_loading: false,
        }
    }

    /// Resolved data, or `None` while loading or idle
    pub fn resolved(&self) -> Option<&T> {
        if self.is_loading {
            None
        } else {
            self.data.as_ref()
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryState<U> {
        QueryState {
            data: self.data.map(f),
            is_loading: self.is_loading,
        }
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self::idle()
    }
}
