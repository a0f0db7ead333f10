//! Moodboard application layer.
//!
//! Owns the board collection as a store of immutable snapshots, persists it
//! to a local key-value store with debounced flushing, ingests image files,
//! and exports boards. The canvas interaction model lives in the sibling
//! `canvas` crate; its [`canvas::engine::Action`]s are converted into store
//! commands by [`services::board::Command::from_action`].

pub mod config;
pub mod error;
pub mod kv;
pub mod services;
pub mod state;
