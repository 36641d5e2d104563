//! Settings reconciliation.
//!
//! Persisted settings may be partial, written by an older version, or edited by
//! hand. Reconciliation starts from [`Settings::default`] and overlays each field
//! of the persisted object through a table of `{key -> validator}` entries. A
//! value the validator rejects falls back to the default for that field only;
//! the rest of the record is kept.
//!
//! ```text
//! persisted {"theme": "neon", "mapTheme": "dark"}
//!        │
//!        ▼  FIELDS table, one entry per key
//! theme     "neon"  → rejected → Theme::Light (default)
//! mapTheme  "dark"  → accepted → MapTheme::Dark
//! (absent)          → default
//! ```

use crate::domain::settings::{DefaultView, MapTheme, MeasurementUnit, Settings, Theme};
use crate::domain::error::{PindropError, Result};
use crate::storage::LoadOutcome;
use serde_json::Value;

/// Writes a validated value into the settings, or reports that it was rejected.
type ApplyFn = fn(&mut Settings, &Value) -> bool;

/// One entry of the reconciliation table.
struct SettingField {
    /// Persisted (camelCase) key.
    key: &'static str,
    apply: ApplyFn,
}

/// Builds the field table from `key => field: validator` rows.
///
/// Each validator maps a JSON value to `Some(typed value)` when it is legal.
macro_rules! setting_fields {
    ($($key:literal => $field:ident : $validate:path),+ $(,)?) => {
        const FIELDS: &[SettingField] = &[
            $(
                SettingField {
                    key: $key,
                    apply: |settings: &mut Settings, value: &Value| match $validate(value) {
                        Some(valid) => {
                            settings.$field = valid;
                            true
                        }
                        None => false,
                    },
                },
            )+
        ];
    };
}

setting_fields! {
    "theme" => theme: closed::<Theme>,
    "language" => language: language,
    "notifications" => notifications: flag,
    "autoSave" => auto_save: flag,
    "mapTheme" => map_theme: closed::<MapTheme>,
    "pinAnimation" => pin_animation: flag,
    "autoBackup" => auto_backup: flag,
    "backupInterval" => backup_interval: interval_days,
    "defaultView" => default_view: closed::<DefaultView>,
    "measurementUnit" => measurement_unit: unit,
}

/// A closed settings enum that can be parsed from its persisted name.
trait ClosedValue: Sized {
    fn parse_name(name: &str) -> Option<Self>;
}

impl ClosedValue for Theme {
    fn parse_name(name: &str) -> Option<Self> {
        Self::parse(name)
    }
}

impl ClosedValue for MapTheme {
    fn parse_name(name: &str) -> Option<Self> {
        Self::parse(name)
    }
}

impl ClosedValue for DefaultView {
    fn parse_name(name: &str) -> Option<Self> {
        Self::parse(name)
    }
}

fn closed<T: ClosedValue>(value: &Value) -> Option<T> {
    value.as_str().and_then(T::parse_name)
}

fn language(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(String::from)
}

fn flag(value: &Value) -> Option<bool> {
    value.as_bool()
}

fn interval_days(value: &Value) -> Option<u32> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let days = value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 1.0 && *f <= f64::from(u32::MAX))
            .map(|f| f as u64)
    })?;
    u32::try_from(days).ok().filter(|d| *d >= 1)
}

/// `null` clears the unit; a legal name sets it.
#[allow(clippy::option_option)]
fn unit(value: &Value) -> Option<Option<MeasurementUnit>> {
    match value {
        Value::Null => Some(None),
        Value::String(name) => MeasurementUnit::parse(name).map(Some),
        _ => None,
    }
}

/// Settings produced by reconciliation, with the keys that were rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub settings: Settings,
    /// Keys whose persisted value was illegal and replaced by the default.
    pub rejected: Vec<&'static str>,
}

/// Overlays a persisted settings object onto the defaults.
///
/// Returns `None` when `persisted` is not a JSON object. Unknown keys are
/// ignored.
///
/// # Examples
///
/// ```
/// use pindrop::store::reconcile;
/// use pindrop::{MapTheme, Theme};
///
/// let persisted = serde_json::json!({ "theme": "neon", "mapTheme": "dark" });
/// let result = reconcile(&persisted).unwrap();
/// assert_eq!(result.settings.theme, Theme::Light);
/// assert_eq!(result.settings.map_theme, MapTheme::Dark);
/// assert_eq!(result.rejected, vec!["theme"]);
/// ```
#[must_use]
pub fn reconcile(persisted: &Value) -> Option<Reconciled> {
    let object = persisted.as_object()?;
    let mut settings = Settings::default();
    let mut rejected = Vec::new();

    for field in FIELDS {
        if let Some(value) = object.get(field.key) {
            if !(field.apply)(&mut settings, value) {
                tracing::warn!(key = field.key, value = %value, "illegal setting value, using default");
                rejected.push(field.key);
            }
        }
    }

    for key in object.keys().filter(|k| FIELDS.iter().all(|f| f.key != k.as_str())) {
        tracing::debug!(key = %key, "ignoring unknown setting");
    }

    Some(Reconciled { settings, rejected })
}

/// Reads persisted settings text into a fully populated record.
///
/// - `None` (nothing stored) gives [`LoadOutcome::Initialized`] with defaults.
/// - Text that is not a JSON object gives [`LoadOutcome::Repaired`] with
///   defaults.
/// - An object with rejected fields gives [`LoadOutcome::Repaired`] with the
///   reconciled record.
/// - Otherwise [`LoadOutcome::Loaded`].
#[must_use]
pub fn load_settings(text: Option<&str>) -> LoadOutcome<Settings> {
    let Some(text) = text else {
        return LoadOutcome::Initialized(Settings::default());
    };

    let persisted: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            return LoadOutcome::Repaired {
                value: Settings::default(),
                reason: format!("settings are not valid JSON: {e}"),
            };
        }
    };

    match reconcile(&persisted) {
        None => LoadOutcome::Repaired {
            value: Settings::default(),
            reason: "settings are not a JSON object".to_string(),
        },
        Some(Reconciled { settings, rejected }) if rejected.is_empty() => LoadOutcome::Loaded(settings),
        Some(Reconciled { settings, rejected }) => LoadOutcome::Repaired {
            value: settings,
            reason: format!("illegal values for {}", rejected.join(", ")),
        },
    }
}

/// Applies a single persisted-key update through the same validators.
///
/// # Errors
///
/// Returns [`PindropError::Validation`] if the key is unknown or the value is
/// not legal for it. `settings` is unchanged in that case.
pub fn apply_setting(settings: &mut Settings, key: &str, value: &Value) -> Result<()> {
    let field = FIELDS
        .iter()
        .find(|f| f.key == key)
        .ok_or_else(|| {
            let known: Vec<&str> = setting_keys().collect();
            PindropError::Validation(format!("unknown setting: {key} (expected one of {})", known.join(", ")))
        })?;

    let mut updated = settings.clone();
    if !(field.apply)(&mut updated, value) {
        return Err(PindropError::Validation(format!("illegal value for {key}: {value}")));
    }
    *settings = updated;
    Ok(())
}

/// Persisted keys of every known setting, in table order.
pub fn setting_keys() -> impl Iterator<Item = &'static str> {
    FIELDS.iter().map(|f| f.key)
}
