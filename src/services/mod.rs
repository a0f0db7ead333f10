//! Domain services used by the command-line front end.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the board store, persistence, ingestion and export so
//! command handlers can stay focused on argument parsing and output.

pub mod board;
pub mod export;
pub mod ingest;
pub mod persistence;
