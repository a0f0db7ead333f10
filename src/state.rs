//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is cloned into the command handlers, the persistence task and
//! image ingestion. It holds the board store behind an async `RwLock`, the
//! key-value store the snapshot is persisted to, and the loaded config.
//! The store is the single writer; everyone else reads `Arc<Snapshot>`s.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::kv::KvStore;
use crate::services::board::{BoardError, BoardStore, Command, Snapshot};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<BoardStore>>,
    pub kv: Arc<dyn KvStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(store: BoardStore, kv: Arc<dyn KvStore>, config: AppConfig) -> Self {
        Self { store: Arc::new(RwLock::new(store)), kv, config: Arc::new(config) }
    }

    /// Apply one command under the write lock.
    ///
    /// # Errors
    ///
    /// Returns the store's [`BoardError`].
    pub async fn apply(&self, command: Command) -> Result<Arc<Snapshot>, BoardError> {
        self.store.write().await.apply(command)
    }

    /// The current snapshot.
    pub async fn snapshot(&self) -> Arc<Snapshot> {
        self.store.read().await.snapshot()
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use super::*;
    use crate::kv::MemoryKvStore;
    use crate::services::persistence::default_snapshot;

    /// State over an in-memory store seeded with the sample boards.
    pub(crate) fn test_app_state() -> AppState {
        AppState::new(BoardStore::new(default_snapshot()), Arc::new(MemoryKvStore::new()), AppConfig::default())
    }
}
