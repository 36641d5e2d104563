//! PinDrop: a personal travel journal.
//!
//! PinDrop keeps a collection of geographic pins, each marked as visited,
//! wishlist or favorite, with notes, an optional visit date and a rating. This
//! crate is the journal's core:
//! - Persistence of pins and settings over a pluggable key-value store
//! - Validation and repair of whatever was persisted before
//! - Travel statistics derived from the pins
//! - Searching, filtering and sorting of the pin list
//! - Map boundaries: tile sources, place search, region guesses

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs)                                      │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Store Layer (store/)                               │  ← Single writer
//! │  - Pin add/update/remove                            │
//! │  - Export and import snapshots                      │
//! │  - Settings reconciliation                          │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Storage       │   │ Stats / Query │   │ Map           │
//! │ (storage/)    │   │ (stats/,      │   │ (map/)        │
//! │ - Backend API │   │  query/)      │   │ - Tiles       │
//! │ - File, memory│   │ - Dashboard   │   │ - Geocoding   │
//! │ - Snapshots   │   │ - Pin list    │   │ - Regions     │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Error types (domain/error)                       │
//! │  - Pins and settings (domain/pin, domain/settings)  │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - stderr diagnostics                               │
//! │  - File-based OTLP export                           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`domain`]: Pins, settings and errors
//! - [`storage`]: Key-value backends and the persisted snapshot format
//! - [`store`]: The persistence store and settings reconciliation
//! - [`stats`]: Dashboard statistics
//! - [`query`]: Pin list filtering and sorting
//! - [`map`]: Tile sources, place search and region guesses
//! - [`infrastructure`]: Platform paths
//! - [`observability`]: Tracing setup
//!
//! # Configuration
//!
//! An optional TOML file at the platform config location (see
//! [`infrastructure::default_config_file`]):
//!
//! ```toml
//! data_dir = "~/Dropbox/pindrop"
//! trace_level = "debug"
//! trace_file = "~/.local/share/pindrop/pindrop-otlp.json"
//! ```
//!
//! Values can be overridden per run with `--data-dir` / `PINDROP_DATA_DIR`
//! and `--log` / `PINDROP_LOG`.
//!
//! # Examples
//!
//! ```rust
//! use pindrop::{NewPin, PinStatus, PinStore};
//! use pindrop::storage::MemoryStore;
//!
//! let mut store = PinStore::load(MemoryStore::new())?;
//! store.add(NewPin::new("Reykjavík", 64.15, -21.94, "Iceland").with_status(PinStatus::Visited))?;
//! store.add(NewPin::new("Petra", 30.33, 35.44, "Jordan"))?;
//!
//! let stats = store.stats();
//! assert_eq!(stats.visited, 1);
//! assert_eq!(stats.wishlist, 1);
//! assert_eq!(stats.completion_percent(), 50);
//! # Ok::<(), pindrop::PindropError>(())
//! ```

pub mod domain;
pub mod infrastructure;
pub mod map;
pub mod observability;
pub mod query;
pub mod stats;
pub mod storage;
pub mod store;

pub use domain::{
    DefaultView, MapTheme, MeasurementUnit, NewPin, Pin, PinId, PinPatch, PinStatus, PindropError, Result, Settings,
    Theme,
};
pub use storage::FileStore;
pub use store::PinStore;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use infrastructure::{default_config_file, default_data_dir, expand_tilde};

/// File name of the OTLP trace file inside the data directory.
pub const TRACE_FILE_NAME: &str = "pindrop-otlp.json";

/// Runtime configuration.
///
/// Resolved in layers: defaults, then the TOML file, then explicit overrides
/// from the command line or environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the persisted journal. Default: platform data dir.
    pub data_dir: PathBuf,

    /// Tracing filter, e.g. `info` or `pindrop=debug`. Default: `"warn"`.
    pub trace_level: Option<String>,

    /// Where to export OTLP spans. Export is off when unset.
    pub trace_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self { data_dir: default_data_dir(), trace_level: None, trace_file: None }
    }
}

impl Config {
    /// Reads a TOML configuration file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PindropError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PindropError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml(&contents).map_err(|e| PindropError::Config(format!("{}: {e}", path.display())))
    }

    /// Parses TOML configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`PindropError::Config`] on invalid TOML or unknown keys.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| PindropError::Config(e.to_string()))?;
        Ok(config.expanded())
    }

    /// Loads `explicit` if given, else the default config file if it exists,
    /// else the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PindropError::Config`] if a file exists but is invalid, or if
    /// an explicit file is missing.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_file() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "loading config file");
                Self::from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Applies string overrides keyed by field name.
    ///
    /// Recognized keys are `data_dir`, `trace_level` and `trace_file`; empty
    /// values and unknown keys are ignored.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use std::path::PathBuf;
    /// use pindrop::Config;
    ///
    /// let mut overrides = BTreeMap::new();
    /// overrides.insert("data_dir".to_string(), "/tmp/journal".to_string());
    /// overrides.insert("trace_level".to_string(), "debug".to_string());
    ///
    /// let config = Config::default().with_overrides(&overrides);
    /// assert_eq!(config.data_dir, PathBuf::from("/tmp/journal"));
    /// assert_eq!(config.trace_level.as_deref(), Some("debug"));
    /// ```
    #[must_use]
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        let value = |key: &str| overrides.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        if let Some(dir) = value("data_dir") {
            self.data_dir = expand_tilde(dir);
        }
        if let Some(level) = value("trace_level") {
            self.trace_level = Some(level.to_string());
        }
        if let Some(file) = value("trace_file") {
            self.trace_file = Some(expand_tilde(file));
        }
        self
    }

    /// Turns on OTLP export to the default trace file if no file is set.
    #[must_use]
    pub fn with_default_trace_file(mut self) -> Self {
        if self.trace_file.is_none() {
            self.trace_file = Some(self.data_dir.join(TRACE_FILE_NAME));
        }
        self
    }

    fn expanded(mut self) -> Self {
        self.data_dir = expand_tilde(&self.data_dir);
        self.trace_file = self.trace_file.map(expand_tilde);
        self
    }
}

/// Opens the journal stored under `config.data_dir`.
///
/// Creates the directory if needed. Malformed persisted data is repaired and
/// logged, never fatal.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or read.
pub fn open_store(config: &Config) -> Result<PinStore<FileStore>> {
    tracing::debug!(data_dir = %config.data_dir.display(), "opening journal");
    let backend = FileStore::new(&config.data_dir)?;
    PinStore::load(backend)
}
