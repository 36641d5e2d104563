//! Filtering, searching and sorting the pin list.
//!
//! The pin list shows a view of the collection narrowed by status, by a search
//! query, and ordered by one of a few keys. Queries never modify the
//! collection; they return borrowed pins in display order.
//!
//! # Example
//!
//! ```rust
//! use pindrop::query::{PinQuery, SortBy};
//! use pindrop::{Pin, PinStatus};
//!
//! let pins = vec![
//!     Pin { name: "Zermatt".into(), status: PinStatus::Visited, ..Pin::default() },
//!     Pin { name: "Annecy".into(), status: PinStatus::Wishlist, ..Pin::default() },
//! ];
//!
//! let query = PinQuery { sort: SortBy::Name, ..PinQuery::default() };
//! let names: Vec<&str> = query.apply(&pins).iter().map(|p| p.name.as_str()).collect();
//! assert_eq!(names, ["Annecy", "Zermatt"]);
//! ```

pub mod filter;

pub use filter::{PinQuery, SortBy};
