//! Pin domain model and operations.
//!
//! A [`Pin`] is one travel location in the journal: where it is, whether the user
//! has been there, and what they thought of it. Pins are created from a
//! [`NewPin`] by the store, which assigns the identity and timestamps, and are
//! later edited through a [`PinPatch`].
//!
//! The serialized form uses the camelCase field names of the persisted snapshot
//! (`createdAt`, `updatedAt`), so data exported by earlier versions of the
//! journal reads back unchanged.

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{PindropError, Result};

/// Highest rating a pin can carry.
pub const MAX_RATING: u8 = 5;

/// Length of the note excerpt shown in pin cards.
const EXCERPT_CHARS: usize = 100;

/// Opaque pin identifier.
///
/// IDs are assigned by the store when a pin is added and never change afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinId(String);

impl PinId {
    /// Wraps an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PinId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PinId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PinId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Travel status of a pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinStatus {
    /// The user has been there.
    Visited,
    /// The user wants to go there.
    #[default]
    Wishlist,
    /// A visited place the user marked as a favourite.
    Favorite,
}

impl PinStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 3] = [Self::Visited, Self::Wishlist, Self::Favorite];

    /// Returns the persisted name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visited => "visited",
            Self::Wishlist => "wishlist",
            Self::Favorite => "favorite",
        }
    }

    /// Parses a persisted status name, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Returns the badge shown on pin cards.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Visited => "✅ Visited",
            Self::Favorite => "❤️ Favorite",
            Self::Wishlist => "⭐ Wishlist",
        }
    }
}

impl fmt::Display for PinStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A travel location stored in the journal.
///
/// Every field has a serde default so that snapshots written by older versions,
/// or edited by hand, still load. A missing or unknown `status` reads as
/// [`PinStatus::Wishlist`], a numeric `id` is kept as its decimal text, and a
/// fractional `rating` is truncated to whole stars.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pin {
    #[serde(deserialize_with = "lenient::id")]
    pub id: PinId,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(deserialize_with = "lenient::status")]
    pub status: PinStatus,
    pub notes: String,
    /// Visit date as `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Photo URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::rating")]
    pub rating: Option<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pin {
    /// Returns the city if it is set and non-empty.
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// Parses the visit date.
    ///
    /// Accepts a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp, in which
    /// case the calendar date as written is used. Empty or unparseable values
    /// yield `None`.
    #[must_use]
    pub fn visit_date(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
    }

    /// Returns the rating, treating a missing rating as zero.
    #[must_use]
    pub fn rating_or_zero(&self) -> u8 {
        self.rating.unwrap_or(0)
    }

    /// Formats the location line shown under the pin name: `city, country`.
    #[must_use]
    pub fn location_line(&self) -> String {
        match self.city() {
            Some(city) if !self.country.is_empty() => format!("{city}, {}", self.country),
            Some(city) => city.to_string(),
            None => self.country.clone(),
        }
    }

    /// Returns the notes shortened to the card excerpt length.
    #[must_use]
    pub fn notes_excerpt(&self) -> String {
        if self.notes.chars().count() > EXCERPT_CHARS {
            let head: String = self.notes.chars().take(EXCERPT_CHARS).collect();
            format!("{head}...")
        } else {
            self.notes.clone()
        }
    }

    /// Refreshes `updated_at`.
    ///
    /// The new value is never earlier than `now` and always strictly later than
    /// the previous `updated_at`, even when two edits land in the same
    /// millisecond.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        let floor = self.updated_at + chrono::Duration::milliseconds(1);
        self.updated_at = now.max(floor);
    }
}

/// Attributes of a pin that has not been stored yet.
///
/// Everything except the identity and timestamps, which the store assigns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewPin {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub country: String,
    pub city: Option<String>,
    pub status: PinStatus,
    pub notes: String,
    pub date: Option<String>,
    pub photo: Option<String>,
    pub rating: Option<u8>,
}

impl NewPin {
    /// Creates a wishlist pin at the given coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use pindrop::{NewPin, PinStatus};
    ///
    /// let pin = NewPin::new("Louvre", 48.8606, 2.3376, "France");
    /// assert_eq!(pin.status, PinStatus::Wishlist);
    /// assert!(pin.notes.is_empty());
    /// ```
    #[must_use]
    pub fn new(name: impl Into<String>, lat: f64, lng: f64, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lat,
            lng,
            country: country.into(),
            ..Self::default()
        }
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: PinStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the rating.
    #[must_use]
    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Checks coordinates and rating.
    ///
    /// # Errors
    ///
    /// Returns [`PindropError::Validation`] when a value is out of range.
    pub fn validate(&self) -> Result<()> {
        validate_coordinates(self.lat, self.lng)?;
        validate_rating(self.rating)
    }

    /// Turns the draft into a stored pin with the given identity.
    #[must_use]
    pub fn into_pin(self, id: PinId, now: DateTime<Utc>) -> Pin {
        Pin {
            id,
            name: self.name,
            lat: self.lat,
            lng: self.lng,
            country: self.country,
            city: self.city,
            status: self.status,
            notes: self.notes,
            date: self.date,
            photo: self.photo,
            rating: self.rating,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A partial update to a stored pin.
///
/// `None` leaves a field unchanged. For the optional attributes the inner option
/// distinguishes "set to a value" from "clear".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinPatch {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub country: Option<String>,
    pub city: Option<Option<String>>,
    pub status: Option<PinStatus>,
    pub notes: Option<String>,
    pub date: Option<Option<String>>,
    pub photo: Option<Option<String>>,
    pub rating: Option<Option<u8>>,
}

impl PinPatch {
    /// Returns true if the patch would not change anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Checks the values this patch would write.
    ///
    /// Only fields present in the patch are checked. Stored values are trusted,
    /// so a pin imported with an out-of-range rating can still be renamed.
    ///
    /// # Errors
    ///
    /// Returns [`PindropError::Validation`] when a value is out of range.
    pub fn validate(&self) -> Result<()> {
        if let Some(lat) = self.lat {
            validate_latitude(lat)?;
        }
        if let Some(lng) = self.lng {
            validate_longitude(lng)?;
        }
        validate_rating(self.rating.flatten())
    }

    /// Shallow-merges the patch into `pin`. Identity and timestamps are untouched.
    pub fn apply(self, pin: &mut Pin) {
        if let Some(name) = self.name {
            pin.name = name;
        }
        if let Some(lat) = self.lat {
            pin.lat = lat;
        }
        if let Some(lng) = self.lng {
            pin.lng = lng;
        }
        if let Some(country) = self.country {
            pin.country = country;
        }
        if let Some(city) = self.city {
            pin.city = city;
        }
        if let Some(status) = self.status {
            pin.status = status;
        }
        if let Some(notes) = self.notes {
            pin.notes = notes;
        }
        if let Some(date) = self.date {
            pin.date = date;
        }
        if let Some(photo) = self.photo {
            pin.photo = photo;
        }
        if let Some(rating) = self.rating {
            pin.rating = rating;
        }
    }
}

/// Returns the current time truncated to milliseconds, the precision of the
/// persisted timestamps.
#[must_use]
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn validate_coordinates(lat: f64, lng: f64) -> Result<()> {
    validate_latitude(lat)?;
    validate_longitude(lng)
}

fn validate_latitude(lat: f64) -> Result<()> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(PindropError::Validation(format!(
            "latitude {lat} must be between -90 and 90"
        )));
    }
    Ok(())
}

fn validate_longitude(lng: f64) -> Result<()> {
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(PindropError::Validation(format!(
            "longitude {lng} must be between -180 and 180"
        )));
    }
    Ok(())
}

/// Field readers that accept the loose shapes found in hand-edited or older
/// snapshots instead of rejecting the whole pin.
mod lenient {
    use serde::de::{Deserializer, Error};
    use serde::Deserialize;
    use serde_json::Value;

    use super::{PinId, PinStatus};

    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PinId, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(id) => Ok(PinId::new(id)),
            Value::Number(id) => Ok(PinId::new(id.to_string())),
            other => Err(D::Error::custom(format!("pin id must be a string or number, got {other}"))),
        }
    }

    pub fn status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PinStatus, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().and_then(PinStatus::parse).unwrap_or_default())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
        let stars = match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        // `as` saturates at 255
        Ok(stars.filter(|s| s.is_finite() && *s >= 0.0).map(|s| s.trunc() as u8))
    }
}

fn validate_rating(rating: Option<u8>) -> Result<()> {
    match rating {
        Some(r) if r > MAX_RATING => Err(PindropError::Validation(format!(
            "rating {r} must be between 0 and {MAX_RATING}"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(name: &str) -> Pin {
        NewPin::new(name, 10.0, 20.0, "Peru").into_pin(PinId::new("1"), now_millis())
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(PinStatus::parse("Visited"), Some(PinStatus::Visited));
        assert_eq!(PinStatus::parse(" favorite "), Some(PinStatus::Favorite));
        assert_eq!(PinStatus::parse("been-there"), None);
    }

    #[test]
    fn missing_status_reads_as_wishlist() {
        let pin: Pin = serde_json::from_str(r#"{"id":"1","name":"Lima","lat":-12.0,"lng":-77.0,"country":"Peru"}"#)
            .unwrap();
        assert_eq!(pin.status, PinStatus::Wishlist);
        assert!(pin.notes.is_empty());
    }

    #[test]
    fn serializes_with_camel_case_timestamps() {
        let json = serde_json::to_value(stored("Cusco")).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["status"], "wishlist");
        assert!(json.get("rating").is_none());
    }

    #[test]
    fn visit_date_accepts_plain_and_rfc3339() {
        let mut pin = stored("Cusco");
        pin.date = Some("2023-07-14".to_string());
        assert_eq!(pin.visit_date(), NaiveDate::from_ymd_opt(2023, 7, 14));

        pin.date = Some("2023-07-14T23:30:00-05:00".to_string());
        assert_eq!(pin.visit_date(), NaiveDate::from_ymd_opt(2023, 7, 14));

        pin.date = Some(String::new());
        assert_eq!(pin.visit_date(), None);
    }

    #[test]
    fn touch_strictly_increases_updated_at() {
        let mut pin = stored("Cusco");
        let before = pin.updated_at;
        pin.touch(before);
        assert!(pin.updated_at > before);

        let earlier = before - chrono::Duration::seconds(10);
        let previous = pin.updated_at;
        pin.touch(earlier);
        assert!(pin.updated_at > previous);
    }

    #[test]
    fn patch_only_changes_given_fields() {
        let mut pin = stored("Cusco");
        pin.city = Some("Cusco".to_string());
        let original = pin.clone();

        PinPatch {
            notes: Some("Machu Picchu day trip".to_string()),
            city: Some(None),
            ..PinPatch::default()
        }
        .apply(&mut pin);

        assert_eq!(pin.notes, "Machu Picchu day trip");
        assert_eq!(pin.city, None);
        assert_eq!(pin.name, original.name);
        assert_eq!(pin.lat, original.lat);
        assert_eq!(pin.updated_at, original.updated_at);
    }

    #[test]
    fn validation_rejects_out_of_range_values() {
        assert!(NewPin::new("x", 91.0, 0.0, "").validate().is_err());
        assert!(NewPin::new("x", 0.0, f64::NAN, "").validate().is_err());
        assert!(NewPin::new("x", 0.0, 0.0, "").with_rating(6).validate().is_err());
        assert!(NewPin::new("x", -90.0, 180.0, "").with_rating(5).validate().is_ok());

        let patch = PinPatch { lng: Some(-200.0), ..PinPatch::default() };
        assert!(patch.validate().is_err());
        assert!(PinPatch { rating: Some(Some(6)), ..PinPatch::default() }.validate().is_err());
        assert!(PinPatch { rating: Some(None), ..PinPatch::default() }.validate().is_ok());
    }

    #[test]
    fn patch_validation_ignores_stored_values() {
        let patch = PinPatch { name: Some("Bergen".into()), lat: Some(60.39), ..PinPatch::default() };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn loose_field_shapes_still_read() {
        let pin: Pin = serde_json::from_str(
            r#"{"id": 1700000000000, "name": "Bergen", "status": "Been there", "rating": 4.5}"#,
        )
        .unwrap();
        assert_eq!(pin.id.as_str(), "1700000000000");
        assert_eq!(pin.status, PinStatus::Wishlist);
        assert_eq!(pin.rating, Some(4));

        let pin: Pin = serde_json::from_str(r#"{"id": "2", "status": "FAVORITE", "rating": "3"}"#).unwrap();
        assert_eq!(pin.status, PinStatus::Favorite);
        assert_eq!(pin.rating, Some(3));

        let pin: Pin = serde_json::from_str(r#"{"id": "3", "rating": -1}"#).unwrap();
        assert_eq!(pin.rating, None);

        assert!(serde_json::from_str::<Pin>(r#"{"id": ["x"]}"#).is_err());
    }

    #[test]
    fn display_helpers() {
        let mut pin = stored("Cusco");
        assert_eq!(pin.location_line(), "Peru");
        pin.city = Some("Cusco".to_string());
        assert_eq!(pin.location_line(), "Cusco, Peru");

        pin.notes = "a".repeat(120);
        let excerpt = pin.notes_excerpt();
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.chars().count(), 103);
        assert_eq!(PinStatus::Favorite.label(), "❤️ Favorite");
    }
}
