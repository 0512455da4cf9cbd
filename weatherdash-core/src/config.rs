use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::Coordinates;

/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Environment variable that overrides the configured backend origin.
pub const BASE_URL_ENV: &str = "WEATHERDASH_BASE_URL";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// base_url = "https://weather.example.com"
///
/// [home]
/// latitude = 51.5
/// longitude = -0.12
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend origin; `None` means [`DEFAULT_BASE_URL`].
    pub base_url: Option<String>,

    /// Coordinates reported as the device position.
    pub home: Option<Coordinates>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    pub fn set_base_url(&mut self, url: impl Into<String>) {
        self.base_url = Some(url.into());
    }

    pub fn set_home(&mut self, home: Coordinates) {
        self.home = Some(home);
    }

    /// Picks the backend origin once at startup: explicit flag, then the
    /// environment, then the config file, then the default.
    pub fn resolve_base_url(&self, flag: Option<&str>, env: Option<&str>) -> String {
        [flag, env, self.base_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .to_string()
    }
}

pub(crate) fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weatherdash", "weatherdash")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}
