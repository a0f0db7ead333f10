use std::sync::atomic::{AtomicBool, Ordering};

use super::*;
use crate::config::AppConfig;
use crate::kv::MemoryKvStore;
use crate::services::board::{BoardStore, Command};
use crate::state::test_helpers::test_app_state;

/// Store whose writes fail until `healthy` is set.
#[derive(Default)]
struct FlakyKv {
    inner: MemoryKvStore,
    healthy: AtomicBool,
}

impl KvStore for FlakyKv {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        if !self.healthy.load(Ordering::SeqCst) {
            return Err(KvError::Io(std::io::Error::other("disk full")));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        self.inner.remove(key)
    }
}

// =============================================================================
// LOAD / SAVE
// =============================================================================

#[test]
fn missing_document_loads_sample_boards() {
    let kv = MemoryKvStore::new();
    let snapshot = load_snapshot(&kv).expect("load");
    let names: Vec<&str> = snapshot.boards.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["Brand Inspiration", "Color Palette Ideas", "UI References"]);
    assert_eq!(snapshot.active_board_id.as_deref(), Some("1"));
    assert_eq!(snapshot.boards[1].view_mode, ViewMode::Freeform);
}

#[test]
fn unparseable_document_loads_sample_boards() {
    let kv = MemoryKvStore::new();
    kv.set(BOARDS_KEY, "{not json").expect("set");
    assert_eq!(load_snapshot(&kv).expect("load"), default_snapshot());
}

#[test]
fn empty_board_list_loads_sample_boards() {
    let kv = MemoryKvStore::new();
    kv.set(BOARDS_KEY, "[]").expect("set");
    assert_eq!(load_snapshot(&kv).expect("load"), default_snapshot());
}

#[test]
fn legacy_document_without_groups_or_notes_loads() {
    let kv = MemoryKvStore::new();
    kv.set(
        BOARDS_KEY,
        r#"[{"id":"b1","name":"Old","images":[{"id":"i","src":"x","x":1,"y":2,"width":3,"height":4,"rotation":0}],"createdAt":"2024-01-15T00:00:00Z","viewMode":"freeform"}]"#,
    )
    .expect("set");
    kv.set(ACTIVE_BOARD_KEY, "b1").expect("set");
    let snapshot = load_snapshot(&kv).expect("load");
    let board = snapshot.active().expect("active board");
    assert_eq!(board.id, "b1");
    assert_eq!(board.images.len(), 1);
    assert!(board.groups.is_empty() && board.notes.is_empty());
}

#[test]
fn unknown_active_id_falls_back_to_first_board() {
    let kv = MemoryKvStore::new();
    save_snapshot(&kv, &default_snapshot()).expect("save");
    kv.set(ACTIVE_BOARD_KEY, "gone").expect("set");
    assert_eq!(load_snapshot(&kv).expect("load").active_board_id.as_deref(), Some("1"));
}

#[test]
fn save_then_load_preserves_snapshot() {
    let kv = MemoryKvStore::new();
    let mut snapshot = default_snapshot();
    snapshot.active_board_id = Some("3".to_owned());
    save_snapshot(&kv, &snapshot).expect("save");
    assert_eq!(load_snapshot(&kv).expect("load"), snapshot);
}

// =============================================================================
// FLUSH
// =============================================================================

#[tokio::test]
async fn flush_writes_only_when_dirty() {
    let state = test_app_state();
    assert!(!flush_now(&state).await.expect("flush"));
    assert_eq!(state.kv.get(BOARDS_KEY).expect("get"), None);

    state
        .apply(Command::RenameBoard { board_id: "1".into(), name: "Brand Book".into() })
        .await
        .expect("rename");
    assert!(flush_now(&state).await.expect("flush"));
    assert!(!state.store.read().await.is_dirty());

    let saved = load_snapshot(state.kv.as_ref()).expect("load");
    assert_eq!(saved.board("1").map(|b| b.name.as_str()), Some("Brand Book"));
}

#[tokio::test]
async fn failed_flush_keeps_store_dirty() {
    let kv = Arc::new(FlakyKv::default());
    let state = AppState::new(BoardStore::new(default_snapshot()), kv.clone(), AppConfig::default());
    state
        .apply(Command::SetActiveBoard { board_id: "2".into() })
        .await
        .expect("use");

    let err = flush_now(&state).await.unwrap_err();
    assert_eq!(err.error_code(), "E_KV_IO");
    assert!(state.store.read().await.is_dirty());

    kv.healthy.store(true, Ordering::SeqCst);
    assert!(flush_now(&state).await.expect("retry"));
    assert!(!state.store.read().await.is_dirty());
}

#[tokio::test]
async fn background_task_flushes_changes() {
    let config = AppConfig { flush_interval_ms: 10, ..AppConfig::default() };
    let state = AppState::new(BoardStore::new(default_snapshot()), Arc::new(MemoryKvStore::new()), config);
    let handle = spawn_persistence_task(state.clone());

    state
        .apply(Command::SetActiveBoard { board_id: "3".into() })
        .await
        .expect("use");

    let mut saved = None;
    for _ in 0..100 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        saved = state.kv.get(ACTIVE_BOARD_KEY).expect("get");
        if saved.is_some() {
            break;
        }
    }
    handle.abort();
    assert_eq!(saved.as_deref(), Some("3"));
}
