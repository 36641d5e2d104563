//! Persisted record models and snapshot parsing.
//!
//! [`StorageData`] is the unit of persistence: the whole pin collection is
//! serialized under one key on every change. This module also owns the one
//! routine that turns stored text back into a collection, and the
//! [`LoadOutcome`] type that tells callers whether what they got was read as-is,
//! freshly initialized, or repaired.

use crate::domain::Pin;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The persisted pin collection.
///
/// Pins keep insertion order, which is also the default display order.
/// `categories` is carried through unchanged and reserved for grouping pins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageData {
    pub pins: Vec<Pin>,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl StorageData {
    /// Serializes the collection as pretty-printed JSON, the snapshot format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, which for this type only happens
    /// with non-finite coordinates.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Why a snapshot could not be read.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The text is not JSON.
    #[error("snapshot is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// The document has no `pins` field, or it is not a sequence.
    #[error("snapshot has no pins list")]
    MissingPins,
}

/// Parses a snapshot, dropping elements that cannot be read as pins.
///
/// The only structural requirement is a top-level `pins` sequence. Pin fields
/// are read leniently (see [`Pin`]), so in practice only elements that are not
/// objects get dropped. `categories` defaults to empty when absent or not a
/// list of strings, and unknown top-level fields are ignored.
///
/// Returns the collection together with the number of dropped elements.
///
/// # Errors
///
/// Returns [`SnapshotError::Parse`] or [`SnapshotError::MissingPins`] when the
/// container itself is unusable.
///
/// # Examples
///
/// ```
/// use pindrop::storage::salvage_snapshot;
///
/// let (data, dropped) = salvage_snapshot(r#"{"pins": [{"id": "1"}, 42], "version": "1.0"}"#)?;
/// assert_eq!(data.pins.len(), 1);
/// assert_eq!(dropped, 1);
/// assert!(salvage_snapshot(r#"{"places": []}"#).is_err());
/// # Ok::<(), pindrop::storage::SnapshotError>(())
/// ```
pub fn salvage_snapshot(text: &str) -> Result<(StorageData, usize), SnapshotError> {
    let (raw_pins, categories) = split_snapshot(text)?;
    let total = raw_pins.len();

    let pins: Vec<Pin> = raw_pins
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| match serde_json::from_value(raw) {
            Ok(pin) => Some(pin),
            Err(e) => {
                tracing::warn!(index, error = %e, "dropping unreadable pin");
                None
            }
        })
        .collect();

    let dropped = total - pins.len();
    Ok((StorageData { pins, categories }, dropped))
}

fn split_snapshot(text: &str) -> Result<(Vec<Value>, Vec<String>), SnapshotError> {
    let mut document: Value = serde_json::from_str(text).map_err(SnapshotError::Parse)?;

    let pins = match document.get_mut("pins").map(Value::take) {
        Some(Value::Array(pins)) => pins,
        _ => return Err(SnapshotError::MissingPins),
    };

    let categories = document
        .get_mut("categories")
        .map(Value::take)
        .and_then(|raw| serde_json::from_value::<Vec<String>>(raw).ok())
        .unwrap_or_default();

    Ok((pins, categories))
}

/// Result of reading a persisted value that may need repair.
///
/// Hard failures (the backend could not be read at all) are reported through
/// the surrounding `Result`; every variant here carries a usable value.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    /// The stored value was read as-is.
    Loaded(T),

    /// Nothing was stored; the value is the default.
    Initialized(T),

    /// The stored value was malformed and has been replaced or patched.
    Repaired {
        value: T,
        /// Human-readable description of what was wrong.
        reason: String,
    },
}

impl<T> LoadOutcome<T> {
    /// Returns the carried value.
    pub fn value(&self) -> &T {
        match self {
            Self::Loaded(value) | Self::Initialized(value) | Self::Repaired { value, .. } => value,
        }
    }

    /// Consumes the outcome and returns the carried value.
    pub fn into_value(self) -> T {
        match self {
            Self::Loaded(value) | Self::Initialized(value) | Self::Repaired { value, .. } => value,
        }
    }

    /// Returns true if the stored value had to be repaired.
    pub const fn is_repaired(&self) -> bool {
        matches!(self, Self::Repaired { .. })
    }

    /// Short name of the variant, for logging.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Loaded(_) => "loaded",
            Self::Initialized(_) => "initialized",
            Self::Repaired { .. } => "repaired",
        }
    }

    /// Applies `f` to the carried value, keeping the variant.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadOutcome<U> {
        match self {
            Self::Loaded(value) => LoadOutcome::Loaded(f(value)),
            Self::Initialized(value) => LoadOutcome::Initialized(f(value)),
            Self::Repaired { value, reason } => LoadOutcome::Repaired { value: f(value), reason },
        }
    }
}
