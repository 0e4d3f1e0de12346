//! Persistence of the unit system and theme across sessions.

use anyhow::{Context, Result};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    Config,
    model::{Theme, UnitSystem, UserPreferences},
};

pub const UNIT_KEY: &str = "temperatureUnit";
pub const DARK_MODE_KEY: &str = "darkMode";

/// String-keyed store whose writes survive restarts.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Entries kept as a flat TOML table; every `set` rewrites the file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Store in the platform config directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::open(Config::config_dir()?.join("preferences.toml")))
    }

    /// A missing or unreadable file opens as an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path).unwrap_or_else(|e| {
            tracing::warn!("ignoring preference file {}: {e:#}", path.display());
            BTreeMap::new()
        });
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preference directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string(&self.entries).context("Failed to serialize preferences")?;
        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write preference file: {}", self.path.display()))
    }
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read preference file: {}", path.display()))?;
    let table: toml::Table = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse preference file: {}", path.display()))?;

    // Non-string values are dropped one by one; the rest stay usable.
    Ok(table
        .into_iter()
        .filter_map(|(key, value)| match value {
            toml::Value::String(s) => Some((key, s)),
            other => {
                tracing::warn!(%key, "ignoring non-string preference value: {other}");
                None
            }
        })
        .collect())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

/// Non-durable store for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed view over a [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct PreferenceStore<S> {
    store: S,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Missing or malformed entries fall back to their defaults independently.
    pub fn load(&self) -> UserPreferences {
        let defaults = UserPreferences::default();

        let unit_system = self
            .store
            .get(UNIT_KEY)
            .and_then(|v| match v.as_str() {
                "metric" => Some(UnitSystem::Metric),
                "imperial" => Some(UnitSystem::Imperial),
                _ => None,
            })
            .unwrap_or(defaults.unit_system);

        // Anything but "true" reads as light.
        let theme = self
            .store
            .get(DARK_MODE_KEY)
            .map(|v| Theme::from_dark(v == "true"))
            .unwrap_or(defaults.theme);

        UserPreferences { unit_system, theme }
    }

    pub fn save(&mut self, prefs: &UserPreferences) -> Result<()> {
        self.save_unit_system(prefs.unit_system)?;
        self.save_theme(prefs.theme)
    }

    pub fn save_unit_system(&mut self, units: UnitSystem) -> Result<()> {
        self.store.set(UNIT_KEY, units.as_str())
    }

    pub fn save_theme(&mut self, theme: Theme) -> Result<()> {
        self.store.set(DARK_MODE_KEY, &theme.is_dark().to_string())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_prefs() -> Vec<UserPreferences> {
        [UnitSystem::Metric, UnitSystem::Imperial]
            .into_iter()
            .flat_map(|unit_system| {
                [Theme::Light, Theme::Dark]
                    .into_iter()
                    .map(move |theme| UserPreferences { unit_system, theme })
            })
            .collect()
    }

    #[test]
    fn empty_store_loads_defaults() {
        let prefs = PreferenceStore::new(MemoryStore::default());
        assert_eq!(prefs.load(), UserPreferences::default());
    }

    #[test]
    fn save_then_load_roundtrip() {
        for p in all_prefs() {
            let mut prefs = PreferenceStore::new(MemoryStore::default());
            prefs.save(&p).expect("save must succeed");
            assert_eq!(prefs.load(), p);
        }
    }

    #[test]
    fn stored_values_use_expected_keys() {
        let mut prefs = PreferenceStore::new(MemoryStore::default());
        prefs
            .save(&UserPreferences {
                unit_system: UnitSystem::Imperial,
                theme: Theme::Dark,
            })
            .expect("save must succeed");

        assert_eq!(prefs.store().get("temperatureUnit").as_deref(), Some("imperial"));
        assert_eq!(prefs.store().get("darkMode").as_deref(), Some("true"));
    }

    #[test]
    fn malformed_values_fall_back_independently() {
        let mut store = MemoryStore::default();
        store.set(UNIT_KEY, "kelvin").expect("set");
        store.set(DARK_MODE_KEY, "true").expect("set");

        let loaded = PreferenceStore::new(store).load();
        assert_eq!(loaded.unit_system, UnitSystem::Metric);
        assert_eq!(loaded.theme, Theme::Dark);
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("skyview").join("preferences.toml");

        for p in all_prefs() {
            let mut prefs = PreferenceStore::new(FileStore::open(&path));
            prefs.save(&p).expect("save must succeed");

            let reopened = PreferenceStore::new(FileStore::open(&path));
            assert_eq!(reopened.load(), p);
        }
    }

    #[test]
    fn single_field_write_keeps_the_other() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("preferences.toml");

        let mut prefs = PreferenceStore::new(FileStore::open(&path));
        prefs.save_theme(Theme::Dark).expect("save theme");
        prefs.save_unit_system(UnitSystem::Imperial).expect("save units");

        let loaded = PreferenceStore::new(FileStore::open(&path)).load();
        assert_eq!(loaded.theme, Theme::Dark);
        assert_eq!(loaded.unit_system, UnitSystem::Imperial);
    }

    #[test]
    fn non_string_value_does_not_discard_others() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("preferences.toml");
        fs::write(&path, "darkMode = true\ntemperatureUnit = \"imperial\"\n").expect("write");

        let store = FileStore::open(&path);
        assert_eq!(store.get(DARK_MODE_KEY), None);

        let loaded = PreferenceStore::new(store).load();
        assert_eq!(loaded.unit_system, UnitSystem::Imperial);
        assert_eq!(loaded.theme, Theme::Light);
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("preferences.toml");
        fs::write(&path, "not = [valid").expect("write");

        let store = FileStore::open(&path);
        assert_eq!(store.path(), path.as_path());
        assert_eq!(PreferenceStore::new(store).load(), UserPreferences::default());
    }
}
