use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::config::project_dirs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Theme {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(anyhow::anyhow!("Unknown theme '{value}'. Supported themes: light, dark.")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    C,
    F,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::C => "C",
            TemperatureUnit::F => "F",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::C => "°C",
            TemperatureUnit::F => "°F",
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_uppercase().as_str() {
            "C" | "CELSIUS" => Ok(TemperatureUnit::C),
            "F" | "FAHRENHEIT" => Ok(TemperatureUnit::F),
            _ => Err(anyhow::anyhow!("Unknown unit '{value}'. Supported units: C, F.")),
        }
    }
}

/// The two persisted view preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub theme: Theme,
    pub unit: TemperatureUnit,
}

impl Preferences {
    pub fn toggle_theme(self) -> Self {
        Self { theme: self.theme.toggled(), ..self }
    }

    pub fn with_unit(self, unit: TemperatureUnit) -> Self {
        Self { unit, ..self }
    }
}

/// On-disk form. Values are kept as strings so that a hand-edited or stale
/// file falls back to defaults instead of failing to load.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredPreferences {
    theme: Option<String>,
    unit: Option<String>,
}

impl From<StoredPreferences> for Preferences {
    fn from(stored: StoredPreferences) -> Self {
        let theme = stored
            .theme
            .as_deref()
            .and_then(|s| Theme::try_from(s).ok())
            .unwrap_or_default();
        let unit = stored
            .unit
            .as_deref()
            .and_then(|s| TemperatureUnit::try_from(s).ok())
            .unwrap_or_default();
        Self { theme, unit }
    }
}

impl From<&Preferences> for StoredPreferences {
    fn from(prefs: &Preferences) -> Self {
        Self {
            theme: Some(prefs.theme.as_str().to_string()),
            unit: Some(prefs.unit.as_str().to_string()),
        }
    }
}

/// Key-value storage for [`Preferences`].
pub trait PreferenceStore: Send + Sync + std::fmt::Debug {
    fn load(&self) -> Result<Preferences>;
    fn save(&self, prefs: &Preferences) -> Result<()>;
}

/// Preferences persisted as a small TOML file.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store in the platform config directory.
    pub fn in_config_dir() -> Result<Self> {
        Ok(Self::new(project_dirs()?.config_dir().join("preferences.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Result<Preferences> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences: {}", self.path.display()))?;

        let stored: StoredPreferences = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse preferences: {}", self.path.display()))?;

        Ok(stored.into())
    }

    fn save(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preferences directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(&StoredPreferences::from(prefs))
            .context("Failed to serialize preferences to TOML")?;

        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write preferences: {}", self.path.display()))?;

        tracing::debug!(theme = %prefs.theme, unit = %prefs.unit, "preferences saved");
        Ok(())
    }
}

/// Session-only preferences.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    prefs: Mutex<Preferences>,
}

impl MemoryPreferenceStore {
    pub fn new(prefs: Preferences) -> Self {
        Self { prefs: Mutex::new(prefs) }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Preferences> {
        let prefs = self.prefs.lock().map_err(|_| anyhow::anyhow!("preference lock poisoned"))?;
        Ok(*prefs)
    }

    fn save(&self, prefs: &Preferences) -> Result<()> {
        let mut slot =
            self.prefs.lock().map_err(|_| anyhow::anyhow!("preference lock poisoned"))?;
        *slot = *prefs;
        Ok(())
    }
}
