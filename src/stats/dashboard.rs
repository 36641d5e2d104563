//! Travel dashboard statistics.
//!
//! Implements the aggregation behind the dashboard panel. The input is small
//! (tens to low thousands of pins), so everything is recomputed from scratch on
//! every call; there is no caching and no incremental update.

use serde::Serialize;
use std::collections::HashSet;

use crate::domain::{Pin, PinStatus, pin::MAX_RATING};

/// Placeholder reported when there is nothing to rank.
pub const NONE_LABEL: &str = "None";

/// Summary metrics for a pin collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelStats {
    pub total: usize,
    pub visited: usize,
    pub wishlist: usize,
    pub favorite: usize,
    /// Distinct non-empty countries.
    pub countries: usize,
    /// Distinct non-empty cities.
    pub cities: usize,
    /// Mean rating of visited pins, unrated counting as 0, one decimal.
    pub average_rating: f64,
    /// Mean note length in characters, rounded.
    pub average_notes_length: usize,
    pub most_visited_country: String,
    /// Short month name (`Jan`..`Dec`) with the most dated pins.
    pub top_month: String,
    /// Visited share of all pins, in percent.
    pub completion_rate: f64,
}

impl TravelStats {
    /// Completion rate rounded to a whole percent, as shown on the progress bar.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn completion_percent(&self) -> u32 {
        self.completion_rate.round() as u32
    }

    /// Pins still to go: the wishlist count.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.wishlist
    }

    /// Average rating as filled and empty stars, e.g. `★★★☆☆`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn stars(&self) -> String {
        let max = usize::from(MAX_RATING);
        let filled = (self.average_rating.round().max(0.0) as usize).min(max);
        format!("{}{}", "★".repeat(filled), "☆".repeat(max - filled))
    }
}

/// Computes dashboard statistics.
///
/// Pure and deterministic: the same input always yields the same output, and
/// an empty slice yields zeros and [`NONE_LABEL`] without dividing by zero.
///
/// # Examples
///
/// ```
/// use pindrop::{Pin, PinStatus};
/// use pindrop::stats::compute;
///
/// let pins = vec![
///     Pin { status: PinStatus::Visited, rating: Some(4), ..Pin::default() },
///     Pin { status: PinStatus::Visited, rating: Some(2), ..Pin::default() },
///     Pin { status: PinStatus::Wishlist, ..Pin::default() },
/// ];
///
/// let stats = compute(&pins);
/// assert_eq!(stats.total, 3);
/// assert_eq!(stats.average_rating, 3.0);
/// assert_eq!(stats.completion_percent(), 67);
/// ```
#[must_use]
pub fn compute(pins: &[Pin]) -> TravelStats {
    let _span = tracing::trace_span!("compute_stats", pins = pins.len()).entered();

    let count_status = |status: PinStatus| pins.iter().filter(|p| p.status == status).count();
    let visited = count_status(PinStatus::Visited);

    let countries: HashSet<&str> = pins
        .iter()
        .map(|p| p.country.as_str())
        .filter(|c| !c.is_empty())
        .collect();
    let cities: HashSet<&str> = pins.iter().filter_map(Pin::city).collect();

    let rating_sum: u32 = pins
        .iter()
        .filter(|p| p.status == PinStatus::Visited)
        .map(|p| u32::from(p.rating_or_zero()))
        .sum();
    let average_rating = ratio(f64::from(rating_sum), visited).map_or(0.0, round_one_decimal);

    let notes_chars: usize = pins.iter().map(|p| p.notes.chars().count()).sum();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let average_notes_length = ratio(notes_chars as f64, pins.len()).map_or(0, |avg| avg.round() as usize);

    // ranked over every pin; a blank country can win and then shows as "None"
    let most_visited_country =
        most_frequent(pins.iter().map(|p| p.country.clone())).filter(|country| !country.is_empty());
    let top_month = most_frequent(
        pins.iter()
            .filter_map(Pin::visit_date)
            .map(|date| date.format("%b").to_string()),
    );

    let completion_rate = ratio(visited as f64, pins.len()).map_or(0.0, |share| share * 100.0);

    TravelStats {
        total: pins.len(),
        visited,
        wishlist: count_status(PinStatus::Wishlist),
        favorite: count_status(PinStatus::Favorite),
        countries: countries.len(),
        cities: cities.len(),
        average_rating,
        average_notes_length,
        most_visited_country: most_visited_country.unwrap_or_else(|| NONE_LABEL.to_string()),
        top_month: top_month.unwrap_or_else(|| NONE_LABEL.to_string()),
        completion_rate,
    }
}

/// `numerator / count`, or `None` when `count` is zero.
#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| numerator / count as f64)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Most frequent value; ties go to the value seen first.
fn most_frequent(values: impl Iterator<Item = String>) -> Option<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(String, usize)> = None;
    for (value, count) in counts {
        if best.as_ref().map_or(true, |(_, top)| count > *top) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin(status: PinStatus, country: &str) -> Pin {
        Pin { status, country: country.to_string(), ..Pin::default() }
    }

    fn dated(country: &str, date: &str) -> Pin {
        Pin { date: Some(date.to_string()), ..pin(PinStatus::Visited, country) }
    }

    #[test]
    fn reference_example() {
        let pins = vec![
            Pin { rating: Some(4), ..pin(PinStatus::Visited, "") },
            Pin { rating: Some(2), ..pin(PinStatus::Visited, "") },
            pin(PinStatus::Wishlist, ""),
        ];

        let stats = compute(&pins);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.visited, 2);
        assert_eq!(stats.wishlist, 1);
        assert!((stats.average_rating - 3.0).abs() < f64::EPSILON);
        assert!((round_one_decimal(stats.completion_rate) - 66.7).abs() < 1e-9);
        assert_eq!(stats.completion_percent(), 67);
        assert_eq!(stats.remaining(), 1);
    }

    #[test]
    fn empty_collection() {
        let stats = compute(&[]);
        assert_eq!(stats.total, 0);
        assert!(stats.average_rating.abs() < f64::EPSILON);
        assert_eq!(stats.average_notes_length, 0);
        assert_eq!(stats.most_visited_country, "None");
        assert_eq!(stats.top_month, "None");
        assert!(stats.completion_rate.abs() < f64::EPSILON);
        assert_eq!(stats.stars(), "☆☆☆☆☆");
    }

    #[test]
    fn unrated_visited_pins_count_as_zero() {
        let pins = vec![
            Pin { rating: Some(5), ..pin(PinStatus::Visited, "Chile") },
            pin(PinStatus::Visited, "Chile"),
            Pin { rating: Some(1), ..pin(PinStatus::Wishlist, "Chile") },
        ];
        let stats = compute(&pins);
        assert!((stats.average_rating - 2.5).abs() < f64::EPSILON);
        assert_eq!(stats.stars(), "★★★☆☆");
    }

    #[test]
    fn average_rating_rounds_to_one_decimal() {
        let pins = vec![
            Pin { rating: Some(5), ..pin(PinStatus::Visited, "") },
            Pin { rating: Some(4), ..pin(PinStatus::Visited, "") },
            Pin { rating: Some(4), ..pin(PinStatus::Visited, "") },
        ];
        assert!((compute(&pins).average_rating - 4.3).abs() < 1e-9);
    }

    #[test]
    fn distinct_countries_and_cities_skip_empty_values() {
        let pins = vec![
            Pin { city: Some("Lyon".into()), ..pin(PinStatus::Visited, "France") },
            Pin { city: Some("Lyon".into()), ..pin(PinStatus::Wishlist, "France") },
            Pin { city: Some(String::new()), ..pin(PinStatus::Favorite, "Spain") },
            pin(PinStatus::Wishlist, ""),
        ];
        let stats = compute(&pins);
        assert_eq!(stats.countries, 2);
        assert_eq!(stats.cities, 1);
        assert_eq!(stats.favorite, 1);
    }

    #[test]
    fn notes_length_counts_characters() {
        let pins = vec![
            Pin { notes: "héllo".into(), ..Pin::default() },
            Pin { notes: "ab".into(), ..Pin::default() },
            Pin::default(),
        ];
        // (5 + 2 + 0) / 3 = 2.33
        assert_eq!(compute(&pins).average_notes_length, 2);
    }

    #[test]
    fn blank_country_can_win_most_visited() {
        let pins = vec![
            pin(PinStatus::Visited, ""),
            pin(PinStatus::Wishlist, ""),
            pin(PinStatus::Visited, "France"),
        ];
        let stats = compute(&pins);
        assert_eq!(stats.most_visited_country, "None");
        assert_eq!(stats.countries, 1);

        let pins = vec![pin(PinStatus::Visited, ""), pin(PinStatus::Visited, "France"), pin(PinStatus::Visited, "France")];
        assert_eq!(compute(&pins).most_visited_country, "France");
    }

    #[test]
    fn most_visited_country_breaks_ties_by_first_seen() {
        let pins = vec![
            pin(PinStatus::Visited, "Japan"),
            pin(PinStatus::Visited, "Korea"),
            pin(PinStatus::Visited, "Korea"),
            pin(PinStatus::Visited, "Japan"),
        ];
        assert_eq!(compute(&pins).most_visited_country, "Japan");

        let pins = vec![
            pin(PinStatus::Visited, "Japan"),
            pin(PinStatus::Visited, "Korea"),
            pin(PinStatus::Visited, "Korea"),
        ];
        assert_eq!(compute(&pins).most_visited_country, "Korea");
    }

    #[test]
    fn top_month_uses_dated_pins_only() {
        let pins = vec![
            dated("A", "2023-03-01"),
            dated("B", "2022-07-19"),
            dated("C", "2024-07-02"),
            dated("D", "not a date"),
            pin(PinStatus::Visited, "E"),
        ];
        assert_eq!(compute(&pins).top_month, "Jul");

        assert_eq!(compute(&[pin(PinStatus::Visited, "E")]).top_month, "None");
    }

    #[test]
    fn compute_is_idempotent() {
        let pins = vec![dated("Fiji", "2021-12-24"), pin(PinStatus::Wishlist, "Tonga")];
        assert_eq!(compute(&pins), compute(&pins));
    }
}
