//! Error types for PinDrop.
//!
//! This module defines the centralized error type [`PindropError`] and a type alias
//! [`Result`] used throughout the crate. All errors are implemented with the
//! `thiserror` crate.
//!
//! Most recoverable conditions in the journal never reach this type: malformed
//! persisted data is repaired in place, and mutations against unknown pin IDs are
//! no-ops. What remains are failures the caller has to surface, such as a backend
//! that refuses a write or a pin that fails validation.

use thiserror::Error;

/// The main error type for PinDrop operations.
///
/// # Examples
///
/// ```
/// use pindrop::PindropError;
///
/// fn check_rating(rating: u8) -> Result<(), PindropError> {
///     if rating > 5 {
///         return Err(PindropError::Validation(format!("rating {rating} is out of range")));
///     }
///     Ok(())
/// }
///
/// assert!(check_rating(7).is_err());
/// ```
#[derive(Debug, Error)]
pub enum PindropError {
    /// Storage backend operation failed.
    ///
    /// Covers reads and writes against a [`KeyValueStore`](crate::storage::KeyValueStore)
    /// that could not be completed. The string describes what went wrong.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or parsing failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A pin or setting value was rejected.
    ///
    /// Raised before any state changes, so the collection is left untouched.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration is invalid or could not be read.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A geocoding result could not be interpreted.
    #[error("Geocoding error: {0}")]
    Geocode(String),
}

/// A specialized `Result` type for PinDrop operations.
pub type Result<T> = std::result::Result<T, PindropError>;
