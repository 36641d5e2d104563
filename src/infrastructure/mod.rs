//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where PinDrop keeps its files on the host platform. Nothing here
//! touches the journal data itself; see [`crate::storage`] for that.

pub mod paths;

pub use paths::{default_config_file, default_data_dir, expand_tilde};
