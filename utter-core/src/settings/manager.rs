use anyhow::{Context, Result};
use std::fs;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::settings::config::Settings;

/// Settings shared across the process. Each handle clones cheaply and sees
/// the same in-memory instance; changes reach disk only through `save`.
#[derive(Clone)]
pub struct SettingsManager {
    settings_path: PathBuf,
    inner: Arc<Mutex<Settings>>,
}

impl SettingsManager {
    /// Create a settings manager at the default location
    /// (`~/.utter/settings.toml`).
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir().context("failed to get home directory")?;
        Self::from_settings_dir(home.join(".utter"), None)
    }

    /// Create a settings manager rooted at `dir`, optionally loading a
    /// named profile (`settings_{profile}.toml`).
    pub fn from_settings_dir(dir: PathBuf, profile: Option<&str>) -> Result<Self> {
        let file_name = match profile {
            Some(name) => format!("settings_{name}.toml"),
            None => "settings.toml".to_string(),
        };
        Self::from_path(dir.join(file_name))
    }

    /// Create a settings manager from a specific file path.
    pub fn from_path(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory: {parent:?}"))?;
            }
            let contents = toml::to_string_pretty(&Settings::default())
                .context("failed to serialize default settings")?;
            fs::write(&path, contents)
                .with_context(|| format!("failed to write default settings to {path:?}"))?;
        }

        let loaded = Self::load_from_file_with_backup(&path)?;

        Ok(Self {
            settings_path: path,
            inner: Arc::new(Mutex::new(loaded)),
        })
    }

    /// Load settings from a TOML file, moving a corrupted file aside and
    /// starting over from defaults rather than refusing to start.
    fn load_from_file_with_backup(path: &Path) -> Result<Settings> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {path:?}"))?;

        match toml::from_str(&contents) {
            Ok(settings) => Ok(settings),
            Err(_) => {
                let backup_path = path.with_extension("toml.backup");
                fs::rename(path, &backup_path).with_context(|| {
                    format!("failed to back up corrupted settings to {backup_path:?}")
                })?;

                let default_settings = Settings::default();
                let contents = toml::to_string_pretty(&default_settings)
                    .context("failed to serialize default settings")?;
                fs::write(path, contents)
                    .with_context(|| format!("failed to write default settings to {path:?}"))?;

                Ok(default_settings)
            }
        }
    }

    /// Get a copy of the in-memory settings.
    pub fn settings(&self) -> Settings {
        self.inner.lock().expect("settings lock poisoned").clone()
    }

    /// Update in-memory settings with a closure. Not persisted until `save`.
    pub fn update_setting<F>(&self, updater: F)
    where
        F: FnOnce(&mut Settings),
    {
        let mut guard = self.inner.lock().expect("settings lock poisoned");
        updater(guard.deref_mut());
    }

    /// Persist the provided settings and adopt them in memory.
    pub fn save_settings(&self, settings: Settings) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {parent:?}"))?;
        }

        let contents =
            toml::to_string_pretty(&settings).context("failed to serialize settings")?;
        fs::write(&self.settings_path, contents)
            .with_context(|| format!("failed to write settings to {:?}", self.settings_path))?;
        *self.inner.lock().expect("settings lock poisoned") = settings;

        Ok(())
    }

    /// Persist the current in-memory settings to disk.
    pub fn save(&self) -> Result<()> {
        self.save_settings(self.settings())
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }
}
