use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EnvError, Result};

/// Runtime family a plugin is written against (`python`, `node`, ...).
///
/// Tags compare case-insensitively; the stored form is lowercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RuntimeTag(String);

impl RuntimeTag {
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

impl From<String> for RuntimeTag {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<RuntimeTag> for String {
    fn from(tag: RuntimeTag) -> Self {
        tag.0
    }
}

impl fmt::Display for RuntimeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeSettings {
    /// Resolved executable; empty means unresolved. Whether it is managed
    /// is decided against the runtime's current install root, never stored.
    #[serde(default)]
    pub executable_path: String,
}

/// Persisted record of resolved runtime executables, keyed by tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSettings {
    #[serde(default)]
    pub runtimes: BTreeMap<RuntimeTag, RuntimeSettings>,
}

impl EnvironmentSettings {
    /// Missing file yields empty settings.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|err| EnvError::io(path, err))?;
        toml::from_str(&raw).map_err(|err| EnvError::Settings(format!("{}: {err}", path.display())))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| EnvError::io(parent, err))?;
        }

        let raw = toml::to_string_pretty(self).map_err(|err| EnvError::Settings(err.to_string()))?;
        fs::write(path, raw).map_err(|err| EnvError::io(path, err))
    }

    pub fn executable_path(&self, tag: &RuntimeTag) -> &str {
        self.runtimes
            .get(tag)
            .map(|runtime| runtime.executable_path.as_str())
            .unwrap_or("")
    }

    pub fn set_executable_path(&mut self, tag: &RuntimeTag, path: impl Into<String>) {
        self.runtimes.entry(tag.clone()).or_default().executable_path = path.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_case_insensitive() {
        assert_eq!(RuntimeTag::new("Python"), RuntimeTag::new("python"));
        assert!(RuntimeTag::new("node").matches("NODE"));
        assert!(!RuntimeTag::new("node").matches("python"));
    }

    #[test]
    fn unresolved_runtime_reads_as_empty() {
        let settings = EnvironmentSettings::default();
        assert_eq!(settings.executable_path(&RuntimeTag::new("python")), "");
    }

    #[test]
    fn save_then_load_keeps_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Settings").join("Environments.toml");

        let mut settings = EnvironmentSettings::default();
        settings.set_executable_path(&RuntimeTag::new("Python"), r"C:\Py\python.exe");
        settings.save(&path).unwrap();

        let loaded = EnvironmentSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(
            loaded.executable_path(&RuntimeTag::new("PYTHON")),
            r"C:\Py\python.exe"
        );
    }

    #[test]
    fn records_from_older_files_still_load() {
        let raw = r#"
            [runtimes.python]
            executable_path = 'C:\Py\python.exe'
            install_root = 'C:\Data\Environments\Python'
        "#;
        let settings: EnvironmentSettings = toml::from_str(raw).unwrap();
        assert_eq!(
            settings.executable_path(&RuntimeTag::new("python")),
            r"C:\Py\python.exe"
        );
        assert!(!toml::to_string(&settings).unwrap().contains("install_root"));
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = EnvironmentSettings::load(&dir.path().join("nope.toml")).unwrap();
        assert!(loaded.runtimes.is_empty());
    }
}
