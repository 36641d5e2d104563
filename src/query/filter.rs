//! Pin list query.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::domain::{Pin, PinStatus};

/// Sort order for the pin list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    /// Newest first, by creation time.
    #[default]
    Date,
    /// Alphabetical by name, ignoring case.
    Name,
    /// Highest rating first; unrated pins count as 0.
    Rating,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "name" => Ok(Self::Name),
            "rating" => Ok(Self::Rating),
            other => Err(format!("unknown sort key: {other} (expected date, name or rating)")),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Date => "date",
            Self::Name => "name",
            Self::Rating => "rating",
        })
    }
}

/// Filter, search and sort settings for the pin list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinQuery {
    /// Only pins with this status; `None` shows all.
    pub status: Option<PinStatus>,
    /// Free-text search over name, country, city and notes.
    pub search: String,
    pub sort: SortBy,
}

impl PinQuery {
    /// Returns the matching pins in display order.
    ///
    /// The search query is split on whitespace and lowercased; a pin matches when
    /// every token fuzzy-matches at least one of its name, country, city or notes.
    /// Sorting is stable, so pins with equal keys keep insertion order.
    #[must_use]
    pub fn apply<'a>(&self, pins: &'a [Pin]) -> Vec<&'a Pin> {
        let _span = tracing::debug_span!("apply_pin_query",
            total_pins = pins.len(),
            query_len = self.search.len(),
            status = ?self.status,
            sort = %self.sort
        )
        .entered();

        let tokens: Vec<String> = self.search.split_whitespace().map(str::to_lowercase).collect();
        let matcher = (!tokens.is_empty()).then(SkimMatcherV2::default);

        let mut result: Vec<&Pin> = pins
            .iter()
            .filter(|pin| self.status.map_or(true, |status| pin.status == status))
            .filter(|pin| {
                matcher.as_ref().map_or(true, |m| {
                    let fields = searchable_fields(pin);
                    tokens
                        .iter()
                        .all(|token| fields.iter().any(|field| m.fuzzy_match(field, token).is_some()))
                })
            })
            .collect();

        match self.sort {
            SortBy::Date => result.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortBy::Name => result.sort_by(|a, b| compare_names(&a.name, &b.name)),
            SortBy::Rating => result.sort_by(|a, b| b.rating_or_zero().cmp(&a.rating_or_zero())),
        }

        tracing::debug!(matched = result.len(), "pin query applied");
        result
    }
}

fn searchable_fields(pin: &Pin) -> Vec<String> {
    [Some(pin.name.as_str()), Some(pin.country.as_str()), pin.city(), Some(pin.notes.as_str())]
        .into_iter()
        .flatten()
        .filter(|field| !field.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn pin(name: &str, status: PinStatus, created_secs: i64) -> Pin {
        Pin {
            name: name.to_string(),
            status,
            created_at: Utc.timestamp_opt(created_secs, 0).unwrap(),
            ..Pin::default()
        }
    }

    fn names<'a>(pins: &[&'a Pin]) -> Vec<&'a str> {
        pins.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn default_query_sorts_newest_first() {
        let pins = vec![
            pin("old", PinStatus::Visited, 100),
            pin("new", PinStatus::Wishlist, 300),
            pin("mid", PinStatus::Favorite, 200),
        ];
        assert_eq!(names(&PinQuery::default().apply(&pins)), ["new", "mid", "old"]);
    }

    #[test]
    fn filters_by_status() {
        let pins = vec![
            pin("a", PinStatus::Visited, 1),
            pin("b", PinStatus::Wishlist, 2),
            pin("c", PinStatus::Visited, 3),
        ];
        let query = PinQuery { status: Some(PinStatus::Visited), ..PinQuery::default() };
        assert_eq!(names(&query.apply(&pins)), ["c", "a"]);
    }

    #[test]
    fn search_matches_any_field_case_insensitively() {
        let mut lake = pin("Lake Bled", PinStatus::Visited, 1);
        lake.country = "Slovenia".into();
        let mut market = pin("Night market", PinStatus::Wishlist, 2);
        market.city = Some("Taipei".into());
        let mut cafe = pin("Cafe", PinStatus::Wishlist, 3);
        cafe.notes = "Best croissants in Vienna".into();
        let pins = vec![lake, market, cafe];

        let search = |q: &str| {
            let query = PinQuery { search: q.to_string(), sort: SortBy::Name, ..PinQuery::default() };
            names(&query.apply(&pins)).into_iter().map(String::from).collect::<Vec<_>>()
        };

        assert_eq!(search("SLOVENIA"), ["Lake Bled"]);
        assert_eq!(search("taipei"), ["Night market"]);
        assert_eq!(search("vienna croissants"), ["Cafe"]);
        assert_eq!(search("   "), ["Cafe", "Lake Bled", "Night market"]);
        assert!(search("zanzibar").is_empty());
    }

    #[test]
    fn sorts_by_name_and_rating() {
        let mut a = pin("banff", PinStatus::Visited, 1);
        a.rating = Some(3);
        let mut b = pin("Aspen", PinStatus::Visited, 2);
        b.rating = Some(5);
        let c = pin("Cairns", PinStatus::Wishlist, 3);
        let pins = vec![a, b, c];

        let by_name = PinQuery { sort: SortBy::Name, ..PinQuery::default() };
        assert_eq!(names(&by_name.apply(&pins)), ["Aspen", "banff", "Cairns"]);

        let by_rating = PinQuery { sort: SortBy::Rating, ..PinQuery::default() };
        assert_eq!(names(&by_rating.apply(&pins)), ["Aspen", "banff", "Cairns"]);
    }

    #[test]
    fn sort_key_parses() {
        assert_eq!("Rating".parse::<SortBy>(), Ok(SortBy::Rating));
        assert!("stars".parse::<SortBy>().is_err());
    }
}
