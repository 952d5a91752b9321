//! Shared application state for all routes. The store is swapped in place on reload.

use crate::merge::Merger;
use crate::store::CollectionStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CollectionStore>,
    /// Source used by `POST /api/reload`.
    pub merger: Arc<Merger>,
    /// Served for paths no route claims. `None` disables static hosting.
    pub static_dir: Option<PathBuf>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: CollectionStore, merger: Merger) -> Self {
        Self {
            store: Arc::new(store),
            merger: Arc::new(merger),
            static_dir: None,
            started_at: Instant::now(),
        }
    }

    pub fn with_static_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.static_dir = dir;
        self
    }
}
