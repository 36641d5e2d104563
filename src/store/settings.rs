//! Settings operations on the store.

use serde_json::Value;

use super::reconcile::apply_setting;
use super::PinStore;
use crate::domain::error::Result;
use crate::domain::Settings;
use crate::storage::{KeyValueStore, SETTINGS_KEY};

impl<B: KeyValueStore> PinStore<B> {
    /// Current settings. Always fully populated with legal values.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replaces the settings and persists them.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails; the new settings stay in
    /// effect in memory.
    pub fn set_settings(&mut self, settings: Settings) -> Result<()> {
        self.settings = settings;
        self.persist_settings()
    }

    /// Changes one setting by its persisted key, e.g. `("mapTheme", "dark")`.
    ///
    /// The value goes through the same validation as persisted settings.
    ///
    /// # Errors
    ///
    /// Returns a validation error for unknown keys or illegal values (nothing
    /// changes), or a storage error if the write fails.
    pub fn update_setting(&mut self, key: &str, value: &Value) -> Result<()> {
        let _span = tracing::debug_span!("store_update_setting", key = %key).entered();
        apply_setting(&mut self.settings, key, value)?;
        self.persist_settings()
    }

    /// Restores and persists the default settings.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    pub fn reset_settings(&mut self) -> Result<()> {
        tracing::debug!("resetting settings to defaults");
        self.set_settings(Settings::default())
    }

    fn persist_settings(&mut self) -> Result<()> {
        let result = serde_json::to_string(&self.settings)
            .map_err(Into::into)
            .and_then(|json| self.backend.set(SETTINGS_KEY, &json));

        if let Err(e) = &result {
            tracing::error!(error = %e, "failed to persist settings");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MapTheme, PindropError, Theme};
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn persisted(store: &PinStore<MemoryStore>) -> Settings {
        let text = store.backend().get(SETTINGS_KEY).unwrap().unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn update_setting_persists_legal_values() {
        let mut store = PinStore::load(MemoryStore::new()).unwrap();
        store.update_setting("mapTheme", &json!("satellite")).unwrap();

        assert_eq!(store.settings().map_theme, MapTheme::Satellite);
        assert_eq!(persisted(&store).map_theme, MapTheme::Satellite);
    }

    #[test]
    fn update_setting_rejects_illegal_values() {
        let mut store = PinStore::load(MemoryStore::new()).unwrap();
        let err = store.update_setting("theme", &json!("neon")).unwrap_err();

        assert!(matches!(err, PindropError::Validation(_)));
        assert_eq!(store.settings().theme, Theme::Light);
        assert!(store.backend().get(SETTINGS_KEY).unwrap().is_none());
    }

    #[test]
    fn reset_restores_defaults() {
        let backend = MemoryStore::with_entries([(SETTINGS_KEY, r#"{"theme":"dark","backupInterval":30}"#)]);
        let mut store = PinStore::load(backend).unwrap();
        assert_eq!(store.settings().backup_interval, 30);

        store.reset_settings().unwrap();
        assert_eq!(store.settings(), &Settings::default());
        assert_eq!(persisted(&store), Settings::default());
    }

    #[test]
    fn settings_survive_reload() {
        let mut store = PinStore::load(MemoryStore::new()).unwrap();
        let settings = Settings { theme: Theme::Dark, language: "ja".into(), ..Settings::default() };
        store.set_settings(settings.clone()).unwrap();

        let reloaded = PinStore::load(store.into_backend()).unwrap();
        assert_eq!(reloaded.settings(), &settings);
    }
}
