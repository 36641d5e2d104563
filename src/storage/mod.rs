//! Storage layer for persistent journal data.
//!
//! The journal persists two string values, the pin collection and the user
//! settings, through the minimal [`KeyValueStore`] abstraction. Everything above
//! this layer works on typed values; everything below it is text.
//!
//! # Modules
//!
//! - `backend`: Key-value trait and the persisted key names
//! - `file`: Directory-of-JSON-files backend with atomic writes
//! - `memory`: In-memory backend for tests
//! - `models`: Persisted collection, snapshot parsing, load outcomes

pub mod backend;
pub mod file;
pub mod memory;
pub mod models;

pub use backend::{KeyValueStore, DATA_KEY, SETTINGS_KEY};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use models::{salvage_snapshot, LoadOutcome, SnapshotError, StorageData};
