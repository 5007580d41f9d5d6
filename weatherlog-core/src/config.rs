use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Top-level configuration stored on disk.
///
/// A single optional credential decides which provider the selector hands
/// out: a non-empty `api_key` means the live OpenWeather provider, anything
/// else means the synthetic one. There is no separate mode flag.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeather API key. Absent or empty means "no credential".
    pub api_key: Option<String>,

    /// Override for the record log location. Defaults to `records.jsonl`
    /// in the platform data directory.
    pub data_file: Option<PathBuf>,
}

impl Config {
    /// True when a usable credential is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    ///
    /// The `OPENWEATHER_API_KEY` environment variable overrides the file.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            // First run: no config file, return empty.
            Self::default()
        };

        if let Ok(key) = std::env::var("OPENWEATHER_API_KEY") {
            if !key.trim().is_empty() {
                cfg.api_key = Some(key);
            }
        }

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Where the record log lives: the configured override, or the platform
    /// data directory.
    pub fn data_file_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.data_file {
            return Ok(path.clone());
        }

        let dirs = project_dirs()?;
        Ok(dirs.data_dir().join("records.jsonl"))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weatherlog", "weatherlog")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}
