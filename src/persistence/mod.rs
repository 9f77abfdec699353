//! Best-effort key-value persistence
//!
//! Features:
//! - `Storage` trait over string keys and values
//! - LocalStorage backend on web, in-memory backend for native and tests
//! - JSON helpers for serde types
//! - Periodic scoreboard snapshots
//!
//! Every failure is a `StorageError`. Callers at the public boundary log it
//! and carry on with defaults.

pub mod snapshot;
pub mod storage;

pub use snapshot::{ScoreSnapshot, Snapshotter};
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
pub use storage::{MemoryStorage, Storage, StorageError, load_json, save_json};
