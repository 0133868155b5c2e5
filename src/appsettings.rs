use std::{path::PathBuf, time::Duration};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::storage::DEFAULT_STORAGE_KEY;

#[derive(Deserialize, Debug, Clone)]
pub struct StoreSettings {
    pub storage_key: String,
    pub tick_interval_ms: u64,
    pub bootstrap_samples: bool,
}

impl StoreSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            tick_interval_ms: 1000,
            bootstrap_samples: true,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ReminderSettings {
    pub enabled: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    pub store: StoreSettings,
    pub storage: StorageSettings,
    pub reminders: ReminderSettings,
}

impl AppSettings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load("appsettings")
    }

    /// Defaults, then `<base_name>` and `<base_name>.local` files if present,
    /// then `EVENTCOUNT_*` environment variables (`__` separates sections).
    pub fn load(base_name: &str) -> Result<Self, ConfigError> {
        let store_defaults = StoreSettings::default();
        let settings = Config::builder()
            .set_default("store.storage_key", store_defaults.storage_key)?
            .set_default("store.tick_interval_ms", store_defaults.tick_interval_ms as i64)?
            .set_default("store.bootstrap_samples", store_defaults.bootstrap_samples)?
            .set_default(
                "storage.data_dir",
                default_data_dir().to_string_lossy().into_owned(),
            )?
            .set_default("reminders.enabled", true)?
            .add_source(File::with_name(base_name).required(false))
            .add_source(File::with_name(&format!("{base_name}.local")).required(false))
            .add_source(
                Environment::with_prefix("EVENTCOUNT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("eventcount")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn defaults_apply_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("appsettings");

        let settings = AppSettings::load(base.to_str().unwrap()).unwrap();

        assert_eq!(settings.store.storage_key, "SavedEvents");
        assert_eq!(settings.store.tick_interval(), Duration::from_secs(1));
        assert!(settings.store.bootstrap_samples);
        assert!(settings.reminders.enabled);
        assert!(settings.storage.data_dir.ends_with("eventcount"));
    }

    #[test]
    fn local_file_overrides_base_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("appsettings.toml"),
            "[store]\ntick_interval_ms = 250\nbootstrap_samples = false\n\n[storage]\ndata_dir = \"/tmp/events\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("appsettings.local.toml"),
            "[reminders]\nenabled = false\n\n[store]\ntick_interval_ms = 500\n",
        )
        .unwrap();
        let base = dir.path().join("appsettings");

        let settings = AppSettings::load(base.to_str().unwrap()).unwrap();

        assert_eq!(settings.store.tick_interval(), Duration::from_millis(500));
        assert!(!settings.store.bootstrap_samples);
        assert!(!settings.reminders.enabled);
        assert_eq!(settings.storage.data_dir, PathBuf::from("/tmp/events"));
        assert_eq!(settings.store.storage_key, "SavedEvents");
    }
}
