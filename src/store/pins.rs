//! Pin CRUD, export and import.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;

use super::PinStore;
use crate::domain::error::Result;
use crate::domain::pin::now_millis;
use crate::domain::{NewPin, Pin, PinId, PinPatch};
use crate::storage::{salvage_snapshot, KeyValueStore};

/// Suggested file name for an export taken on `date`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use pindrop::store::backup_file_name;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// assert_eq!(backup_file_name(date), "pindrop-backup-2024-03-09.json");
/// ```
#[must_use]
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("pindrop-backup-{}.json", date.format("%Y-%m-%d"))
}

impl<B: KeyValueStore> PinStore<B> {
    /// Looks up a pin by ID.
    #[must_use]
    pub fn get(&self, id: impl AsRef<str>) -> Option<&Pin> {
        let id = id.as_ref();
        self.data.pins.iter().find(|p| p.id.as_str() == id)
    }

    /// Adds a pin and persists the collection.
    ///
    /// The store assigns a unique ID and stamps `createdAt` and `updatedAt` with
    /// the current time. The pin is appended, so it shows last in insertion
    /// order.
    ///
    /// # Errors
    ///
    /// Returns a validation error if coordinates or rating are out of range, in
    /// which case nothing changes. Returns a storage error if the write fails;
    /// the pin then stays in memory but is not persisted.
    pub fn add(&mut self, new_pin: NewPin) -> Result<PinId> {
        let _span = tracing::debug_span!("store_add", name = %new_pin.name, status = %new_pin.status).entered();

        new_pin.validate()?;

        let now = now_millis();
        let id = self.next_id(now);
        self.data.pins.push(new_pin.into_pin(id.clone(), now));
        self.persist_data()?;

        tracing::debug!(id = %id, total = self.data.pins.len(), "pin added");
        Ok(id)
    }

    /// Applies a partial update to the pin with the given ID.
    ///
    /// Fields absent from `patch` keep their values; `updatedAt` is refreshed
    /// and strictly increases. Returns `false` without touching anything when no
    /// pin has that ID.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a value in `patch` is out of range
    /// (nothing changes), or a storage error if the write fails. Stored fields
    /// the patch does not touch are never checked.
    pub fn update(&mut self, id: impl AsRef<str>, patch: PinPatch) -> Result<bool> {
        let id = id.as_ref();
        let _span = tracing::debug_span!("store_update", id = %id).entered();

        let Some(pin) = self.data.pins.iter_mut().find(|p| p.id.as_str() == id) else {
            tracing::debug!("pin not found, nothing to update");
            return Ok(false);
        };

        patch.validate()?;
        patch.apply(pin);
        pin.touch(now_millis());

        self.persist_data()?;
        tracing::debug!("pin updated");
        Ok(true)
    }

    /// Removes the pin with the given ID.
    ///
    /// Idempotent: returns `false` and writes nothing when no pin has that ID.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    pub fn remove(&mut self, id: impl AsRef<str>) -> Result<bool> {
        let id = id.as_ref();
        let _span = tracing::debug_span!("store_remove", id = %id).entered();

        let before = self.data.pins.len();
        self.data.pins.retain(|p| p.id.as_str() != id);
        if self.data.pins.len() == before {
            tracing::debug!("pin not found, nothing to remove");
            return Ok(false);
        }

        self.persist_data()?;
        tracing::debug!(remaining = self.data.pins.len(), "pin removed");
        Ok(true)
    }

    /// Serializes the whole collection as pretty-printed JSON.
    ///
    /// The output has the persisted shape (`{ "pins": [...], "categories": [...] }`)
    /// and can be fed back to [`import_snapshot`](Self::import_snapshot).
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_snapshot(&self) -> Result<String> {
        Ok(self.data.to_pretty_json()?)
    }

    /// Replaces the collection with the one in `text`.
    ///
    /// Succeeds whenever `text` is JSON with a `pins` sequence. Pin values are
    /// taken as stored, without range checks; elements that are not pin
    /// objects at all are skipped and logged. On failure returns `Ok(false)`
    /// and leaves the collection exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the imported collection cannot be written.
    pub fn import_snapshot(&mut self, text: &str) -> Result<bool> {
        let _span = tracing::debug_span!("store_import", bytes = text.len()).entered();

        let (data, skipped) = match salvage_snapshot(text) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "rejected import");
                return Ok(false);
            }
        };
        if skipped > 0 {
            tracing::warn!(skipped, "import skipped elements that are not pins");
        }

        let imported = data.pins.len();
        self.data = data;
        self.persist_data()?;

        tracing::info!(pins = imported, "snapshot imported");
        Ok(true)
    }

    /// Issues a millisecond-timestamp ID that no pin in the collection uses.
    fn next_id(&mut self, now: DateTime<Utc>) -> PinId {
        let taken: HashSet<&str> = self.data.pins.iter().map(|p| p.id.as_str()).collect();

        let mut candidate = now.timestamp_millis().max(self.last_issued_id + 1);
        while taken.contains(candidate.to_string().as_str()) {
            candidate += 1;
        }

        self.last_issued_id = candidate;
        PinId::new(candidate.to_string())
    }
}
