//! Persistence service: load, save and debounced flushing of the snapshot.
//!
//! DESIGN
//! ======
//! The board list is written as one JSON document and the active board id
//! as a second value (see [`crate::kv`]). A background task wakes every
//! `flush_interval_ms`, and when the store is dirty writes the current
//! snapshot outside the store lock.
//!
//! ERROR HANDLING
//! ==============
//! The dirty flag is cleared only after a successful write, and only if no
//! command landed while the write was in flight. A failed write is logged
//! and retried on the next tick.
//!
//! Missing, unparseable or empty board lists fall back to the built-in
//! sample boards rather than failing to start.

use std::sync::Arc;
use std::time::Duration;

use canvas::doc::{Board, ViewMode};
use time::macros::datetime;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::ErrorCode;
use crate::kv::{ACTIVE_BOARD_KEY, BOARDS_KEY, KvError, KvStore};
use crate::services::board::Snapshot;
use crate::state::AppState;

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Kv(#[from] KvError),
    #[error("serialize boards: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("persistence task failed: {0}")]
    Task(String),
}

impl ErrorCode for PersistError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Kv(e) => e.error_code(),
            Self::Serialize(_) => "E_PERSIST_SERIALIZE",
            Self::Task(_) => "E_PERSIST_TASK",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Kv(e) => e.retryable(),
            Self::Serialize(_) => false,
            Self::Task(_) => true,
        }
    }
}

// =============================================================================
// SAMPLE DATA
// =============================================================================

/// The three sample boards shown on first start.
#[must_use]
pub fn default_snapshot() -> Snapshot {
    let sample = |id: &str, name: &str, created_at, view_mode| {
        let mut board = Board::new(id.to_owned(), name.to_owned(), created_at);
        board.view_mode = view_mode;
        board
    };
    Snapshot {
        boards: vec![
            sample("1", "Brand Inspiration", datetime!(2024-01-15 0:00 UTC), ViewMode::Grid),
            sample("2", "Color Palette Ideas", datetime!(2024-01-20 0:00 UTC), ViewMode::Freeform),
            sample("3", "UI References", datetime!(2024-01-25 0:00 UTC), ViewMode::Grid),
        ],
        active_board_id: Some("1".to_owned()),
    }
}

// =============================================================================
// LOAD / SAVE
// =============================================================================

/// Read the persisted snapshot, falling back to [`default_snapshot`].
///
/// An active id that names no board is replaced by the first board's id.
///
/// # Errors
///
/// Returns [`PersistError::Kv`] when the store itself cannot be read.
pub fn load_snapshot(kv: &dyn KvStore) -> Result<Snapshot, PersistError> {
    let boards = match kv.get(BOARDS_KEY)? {
        None => {
            info!("no saved boards; starting from sample boards");
            return Ok(default_snapshot());
        }
        Some(raw) => match serde_json::from_str::<Vec<Board>>(&raw) {
            Ok(boards) if boards.is_empty() => {
                warn!("saved board list is empty; starting from sample boards");
                return Ok(default_snapshot());
            }
            Ok(boards) => boards,
            Err(e) => {
                warn!(error = %e, "saved boards unreadable; starting from sample boards");
                return Ok(default_snapshot());
            }
        },
    };

    let active = kv
        .get(ACTIVE_BOARD_KEY)?
        .map(|id| id.trim().to_owned())
        .filter(|id| boards.iter().any(|b| b.id == *id))
        .or_else(|| boards.first().map(|b| b.id.clone()));

    info!(count = boards.len(), "boards loaded");
    Ok(Snapshot { boards, active_board_id: active })
}

/// Write `snapshot` to `kv`.
///
/// # Errors
///
/// Returns [`PersistError`] when serialization or a write fails.
pub fn save_snapshot(kv: &dyn KvStore, snapshot: &Snapshot) -> Result<(), PersistError> {
    let boards = serde_json::to_string(&snapshot.boards)?;
    kv.set(BOARDS_KEY, &boards)?;
    match &snapshot.active_board_id {
        Some(id) => kv.set(ACTIVE_BOARD_KEY, id)?,
        None => kv.remove(ACTIVE_BOARD_KEY)?,
    }
    debug!(count = snapshot.boards.len(), "boards saved");
    Ok(())
}

// =============================================================================
// BACKGROUND FLUSH
// =============================================================================

/// Spawn the background persistence task. Returns a handle for shutdown.
pub fn spawn_persistence_task(state: AppState) -> JoinHandle<()> {
    let flush_interval_ms = state.config.flush_interval_ms;
    info!(flush_interval_ms, "board persistence flush configured");
    tokio::spawn(async move {
        loop {
            if let Err(e) = flush_dirty(&state).await {
                error!(error = %e, code = e.error_code(), "persistence flush failed");
            }
            tokio::time::sleep(Duration::from_millis(flush_interval_ms)).await;
        }
    })
}

/// Write the snapshot now if it has unsaved changes. Used at shutdown.
///
/// # Errors
///
/// Returns [`PersistError`] when the write fails; the store stays dirty.
pub async fn flush_now(state: &AppState) -> Result<bool, PersistError> {
    let flushed = flush_dirty(state).await?;
    if flushed {
        info!("boards flushed");
    }
    Ok(flushed)
}

/// Save the current snapshot when dirty. Returns whether anything was written.
async fn flush_dirty(state: &AppState) -> Result<bool, PersistError> {
    let snapshot = {
        let store = state.store.read().await;
        if !store.is_dirty() {
            return Ok(false);
        }
        store.snapshot()
    };

    let kv = Arc::clone(&state.kv);
    let to_save = Arc::clone(&snapshot);
    tokio::task::spawn_blocking(move || save_snapshot(kv.as_ref(), &to_save))
        .await
        .map_err(|e| PersistError::Task(e.to_string()))??;

    state.store.write().await.mark_saved(&snapshot);
    Ok(true)
}
