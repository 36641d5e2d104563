//! User preferences.
//!
//! [`Settings`] is the flat preference record persisted next to the pin
//! collection. Fields with a closed set of legal values are modelled as enums so
//! that an illegal value cannot exist once a record has been reconciled; see
//! [`crate::store::reconcile`] for how persisted values are checked.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generates a closed settings enum with its persisted names.
macro_rules! settings_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            /// All legal values in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the persisted name.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }

            /// Parses a persisted name. Matching is exact.
            #[must_use]
            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

settings_enum! {
    /// Application colour scheme.
    Theme { Light => "light", Dark => "dark" }
}

settings_enum! {
    /// Map tile style. See [`crate::map::tiles`] for the tile sources.
    MapTheme {
        Standard => "standard",
        Satellite => "satellite",
        Dark => "dark",
        Topographic => "topographic",
    }
}

settings_enum! {
    /// View shown at startup.
    DefaultView { Map => "map", List => "list" }
}

settings_enum! {
    /// Distance unit for displayed measurements.
    MeasurementUnit { Km => "km", Miles => "miles" }
}

/// Default automatic backup interval in days.
pub const DEFAULT_BACKUP_INTERVAL_DAYS: u32 = 7;

/// Persisted user preferences.
///
/// # Examples
///
/// ```
/// use pindrop::{Settings, Theme, DefaultView};
///
/// let settings = Settings::default();
/// assert_eq!(settings.theme, Theme::Light);
/// assert_eq!(settings.default_view, DefaultView::Map);
/// assert_eq!(settings.backup_interval, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub theme: Theme,
    pub language: String,
    pub notifications: bool,
    pub auto_save: bool,
    pub map_theme: MapTheme,
    pub pin_animation: bool,
    pub auto_backup: bool,
    /// Days between automatic backups.
    pub backup_interval: u32,
    pub default_view: DefaultView,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_unit: Option<MeasurementUnit>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            language: "en".to_string(),
            notifications: true,
            auto_save: true,
            map_theme: MapTheme::Standard,
            pin_animation: true,
            auto_backup: true,
            backup_interval: DEFAULT_BACKUP_INTERVAL_DAYS,
            default_view: DefaultView::Map,
            measurement_unit: None,
        }
    }
}
