use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::model::location::{DataLocation, join_path};

const APP_NAME: &str = "plugin-envs";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub general: GeneralConfig,
    #[serde(default)]
    pub runtimes: Vec<RuntimeConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    #[serde(default)]
    pub roaming_data_path: String,
    pub portable_folder: String,
    pub plugins_folder: String,
    pub interactive: bool,
}

/// One supported plugin runtime.
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    pub tag: String,
    pub name: String,
    pub folder: String,
    /// Version-qualified directory under the runtime root.
    pub install_dir: String,
    /// Executable relative to `install_dir`.
    pub executable: String,
    #[serde(default)]
    pub legacy_dir: Option<String>,
    /// File name the user should pick when locating the runtime by hand.
    #[serde(default)]
    pub executable_hint: Option<String>,
    #[serde(default)]
    pub install_command: Vec<String>,
}

impl AppConfig {
    /// Load configuration with layering: defaults → user config.
    pub fn load() -> Result<Self> {
        let mut config = Self::defaults()?;

        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", APP_NAME) {
            let config_path = proj_dirs.config_dir().join("config.toml");
            if config_path.exists() {
                let user_str = fs::read_to_string(&config_path)?;
                config = toml::from_str(&user_str)?;
            }
        }

        if config.general.roaming_data_path.is_empty() {
            config.general.roaming_data_path = default_roaming_dir().to_string_lossy().to_string();
        }

        Ok(config)
    }

    pub fn defaults() -> Result<Self> {
        let defaults = include_str!("../../config/default.toml");
        Ok(toml::from_str(defaults)?)
    }

    /// Resolve roaming vs portable data roots for an install in `app_dir`.
    pub fn data_location(&self, app_dir: &str) -> DataLocation {
        DataLocation::detect(
            self.general.roaming_data_path.clone(),
            join_path(app_dir, &self.general.portable_folder),
        )
    }
}

pub fn default_roaming_dir() -> PathBuf {
    if let Some(project_dirs) = directories::ProjectDirs::from("", "", APP_NAME) {
        return project_dirs.data_dir().to_path_buf();
    }

    if let Some(base_dirs) = directories::BaseDirs::new() {
        return base_dirs.data_dir().join(APP_NAME);
    }

    PathBuf::from(".plugin-envs")
}
