//! Map-facing boundaries.
//!
//! PinDrop does not render maps or talk to the network itself. This module holds
//! the pieces a map front end needs from the core:
//!
//! - [`tiles`]: tile URL templates and attributions per [`MapTheme`](crate::MapTheme)
//! - [`geocode`]: the place-search boundary and its result type
//! - [`region`]: a coarse coordinate-to-region guess used to prefill new pins

pub mod geocode;
pub mod region;
pub mod tiles;

pub use geocode::{search_url, GeocodeResult, Geocoder};
pub use region::guess_region;
pub use tiles::TileSource;
