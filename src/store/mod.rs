//! The journal's persistence store.
//!
//! [`PinStore`] is the single source of truth for the pin collection and the
//! user settings. It is constructed explicitly with an injected
//! [`KeyValueStore`] and is the only writer of the two persisted keys.
//!
//! Every mutation is a read-modify-write on the in-memory state followed by one
//! overwrite of the full serialized snapshot; there are no deltas.
//!
//! ```text
//! caller ──add/update/remove──▶ PinStore ──set(DATA_KEY, snapshot)──▶ KeyValueStore
//!    ▲                              │
//!    └────── pins() / stats() ◀─────┘
//! ```
//!
//! # Modules
//!
//! - `pins`: pin CRUD, export and import
//! - [`reconcile`]: settings validation against defaults
//! - `settings`: settings operations on the store

mod pins;
pub mod reconcile;
mod settings;

pub use pins::backup_file_name;
pub use reconcile::{load_settings, reconcile, Reconciled};

use crate::domain::error::Result;
use crate::domain::{Pin, Settings};
use crate::storage::{salvage_snapshot, KeyValueStore, LoadOutcome, StorageData, DATA_KEY, SETTINGS_KEY};
use crate::stats::TravelStats;

/// Persistence store owning the pin collection and the settings record.
///
/// # Examples
///
/// ```
/// use pindrop::{NewPin, PinStore, PinStatus};
/// use pindrop::storage::MemoryStore;
///
/// let mut store = PinStore::load(MemoryStore::new())?;
/// let id = store.add(NewPin::new("Lisbon", 38.72, -9.14, "Portugal").with_status(PinStatus::Visited))?;
///
/// assert_eq!(store.get(&id).map(|p| p.name.as_str()), Some("Lisbon"));
/// assert_eq!(store.stats().visited, 1);
/// # Ok::<(), pindrop::PindropError>(())
/// ```
#[derive(Debug)]
pub struct PinStore<B: KeyValueStore> {
    backend: B,
    data: StorageData,
    settings: Settings,
    /// Last issued millisecond ID, so IDs never repeat within a session.
    last_issued_id: i64,
}

/// What [`PinStore::open`] found in the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenReport {
    pub data: LoadOutcome<usize>,
    pub settings: LoadOutcome<()>,
}

impl<B: KeyValueStore> PinStore<B> {
    /// Loads the collection and settings from `backend`.
    ///
    /// Malformed persisted data never fails the load: the collection falls back
    /// to empty (keeping any readable pins) and settings fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend itself cannot be read.
    pub fn load(backend: B) -> Result<Self> {
        Self::open(backend).map(|(store, _)| store)
    }

    /// Like [`load`](Self::load), also reporting how each key was read.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend itself cannot be read.
    pub fn open(mut backend: B) -> Result<(Self, OpenReport)> {
        let _span = tracing::debug_span!("store_open").entered();

        let data = load_data(backend.get(DATA_KEY)?.as_deref());
        if let LoadOutcome::Repaired { reason, .. } = &data {
            tracing::warn!(reason = %reason, "pin data was malformed, recovered");
        }

        let settings = load_settings(backend.get(SETTINGS_KEY)?.as_deref());
        if let LoadOutcome::Repaired { value, reason } = &settings {
            tracing::warn!(reason = %reason, "settings were malformed, rewriting");
            match serde_json::to_string(value) {
                Ok(json) => {
                    if let Err(e) = backend.set(SETTINGS_KEY, &json) {
                        tracing::error!(error = %e, "failed to rewrite repaired settings");
                    }
                }
                Err(e) => tracing::error!(error = %e, "failed to serialize repaired settings"),
            }
        }

        let report = OpenReport {
            data: data.clone().map(|d| d.pins.len()),
            settings: settings.clone().map(|_| ()),
        };

        tracing::debug!(
            pins = report.data.value(),
            data = report.data.kind(),
            settings = report.settings.kind(),
            "store opened"
        );

        let store = Self {
            backend,
            data: data.into_value(),
            settings: settings.into_value(),
            last_issued_id: 0,
        };
        Ok((store, report))
    }

    /// All pins in insertion order.
    #[must_use]
    pub fn pins(&self) -> &[Pin] {
        &self.data.pins
    }

    /// The full collection, as persisted.
    #[must_use]
    pub const fn data(&self) -> &StorageData {
        &self.data
    }

    /// Category labels carried with the collection.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.data.categories
    }

    /// Computes dashboard statistics for the current collection.
    #[must_use]
    pub fn stats(&self) -> TravelStats {
        crate::stats::compute(&self.data.pins)
    }

    /// Borrows the storage backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutably borrows the storage backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Consumes the store, returning the backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Deletes all pins and settings, in memory and in the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the removal. The in-memory state
    /// is reset regardless.
    pub fn clear_all(&mut self) -> Result<()> {
        let _span = tracing::debug_span!("store_clear_all", pins = self.data.pins.len()).entered();

        self.data = StorageData::default();
        self.settings = Settings::default();

        self.backend.remove(DATA_KEY)?;
        self.backend.remove(SETTINGS_KEY)?;
        tracing::info!("all journal data cleared");
        Ok(())
    }

    /// Writes the full collection snapshot.
    fn persist_data(&mut self) -> Result<()> {
        let result = serde_json::to_string(&self.data)
            .map_err(Into::into)
            .and_then(|json| self.backend.set(DATA_KEY, &json));

        if let Err(e) = &result {
            tracing::error!(error = %e, "failed to persist pin data");
        }
        result
    }
}

/// Reads persisted pin data, repairing what can be repaired.
fn load_data(text: Option<&str>) -> LoadOutcome<StorageData> {
    let Some(text) = text else {
        return LoadOutcome::Initialized(StorageData::default());
    };

    match salvage_snapshot(text) {
        Ok((data, 0)) => LoadOutcome::Loaded(data),
        Ok((data, dropped)) => LoadOutcome::Repaired {
            value: data,
            reason: format!("{dropped} unreadable pin(s) dropped"),
        },
        Err(e) => LoadOutcome::Repaired {
            value: StorageData::default(),
            reason: e.to_string(),
        },
    }
}
