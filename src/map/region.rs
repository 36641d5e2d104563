//! Coarse region lookup for map-picked coordinates.

struct RegionBox {
    name: &'static str,
    lat: (f64, f64),
    lng: (f64, f64),
}

// Checked in order; boxes overlap (Japan sits inside China's box).
const REGIONS: &[RegionBox] = &[
    RegionBox { name: "Europe", lat: (35.0, 72.0), lng: (-10.0, 40.0) },
    RegionBox { name: "United States", lat: (25.0, 50.0), lng: (-125.0, -65.0) },
    RegionBox { name: "Japan", lat: (35.0, 55.0), lng: (135.0, 145.0) },
    RegionBox { name: "Australia", lat: (-40.0, -10.0), lng: (110.0, 155.0) },
    RegionBox { name: "China", lat: (20.0, 55.0), lng: (70.0, 140.0) },
];

/// Guesses a region name for a point, used to prefill the country of a new pin.
///
/// Bounds are inclusive. Returns `None` outside every known box.
///
/// ```
/// use pindrop::map::guess_region;
///
/// assert_eq!(guess_region(48.85, 2.35), Some("Europe"));
/// assert_eq!(guess_region(0.0, -30.0), None);
/// ```
#[must_use]
pub fn guess_region(lat: f64, lng: f64) -> Option<&'static str> {
    REGIONS
        .iter()
        .find(|r| (r.lat.0..=r.lat.1).contains(&lat) && (r.lng.0..=r.lng.1).contains(&lng))
        .map(|r| r.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_regions() {
        assert_eq!(guess_region(40.71, -74.0), Some("United States"));
        assert_eq!(guess_region(35.68, 139.69), Some("Japan"));
        assert_eq!(guess_region(-33.87, 151.21), Some("Australia"));
        assert_eq!(guess_region(39.9, 116.4), Some("China"));
    }

    #[test]
    fn bounds_are_inclusive_and_ordered() {
        assert_eq!(guess_region(35.0, -10.0), Some("Europe"));
        assert_eq!(guess_region(72.0, 40.0), Some("Europe"));
        // inside both the Japan and China boxes
        assert_eq!(guess_region(40.0, 136.0), Some("Japan"));
    }

    #[test]
    fn outside_every_box() {
        assert_eq!(guess_region(-60.0, 0.0), None);
        assert_eq!(guess_region(f64::NAN, 0.0), None);
    }
}
