//! Domain layer for PinDrop.
//!
//! Core types of the travel journal, independent of how they are stored or
//! presented.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`pin`]: Pins, drafts for new pins, and partial updates
//! - [`settings`]: User preferences and their closed value sets
//!
//! # Examples
//!
//! ```
//! use pindrop::domain::{NewPin, PinStatus, Result};
//!
//! fn draft() -> Result<NewPin> {
//!     let pin = NewPin::new("Kyoto", 35.0116, 135.7681, "Japan").with_status(PinStatus::Visited);
//!     pin.validate()?;
//!     Ok(pin)
//! }
//! # draft().unwrap();
//! ```

pub mod error;
pub mod pin;
pub mod settings;

pub use error::{PindropError, Result};
pub use pin::{NewPin, Pin, PinId, PinPatch, PinStatus};
pub use settings::{DefaultView, MapTheme, MeasurementUnit, Settings, Theme};
