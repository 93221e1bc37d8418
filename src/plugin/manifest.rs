use serde::Deserialize;

use crate::model::settings::RuntimeTag;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct PluginId(pub String);

impl PluginId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

/// On-disk `plugin.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginManifest {
    pub id: PluginId,
    pub name: String,
    pub language: String,
    #[serde(default)]
    pub entry: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

/// Read-only metadata for a discovered plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDescriptor {
    pub id: PluginId,
    pub name: String,
    pub language: RuntimeTag,
    pub install_dir: String,
    pub entry: Option<String>,
}

impl PluginDescriptor {
    pub fn new(
        id: impl Into<String>,
        language: impl AsRef<str>,
        install_dir: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id: PluginId::new(id),
            language: RuntimeTag::new(language),
            install_dir: install_dir.into(),
            entry: None,
        }
    }

    pub fn from_manifest(manifest: PluginManifest, install_dir: impl Into<String>) -> Self {
        Self {
            id: manifest.id,
            name: manifest.name,
            language: RuntimeTag::new(&manifest.language),
            install_dir: install_dir.into(),
            entry: manifest.entry,
        }
    }

    pub fn requires(&self, tag: &RuntimeTag) -> bool {
        &self.language == tag
    }
}

/// A plugin paired with the executable its runtime resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundPlugin {
    pub descriptor: PluginDescriptor,
    pub executable_path: String,
}

impl BoundPlugin {
    pub fn display_name(&self) -> &str {
        &self.descriptor.name
    }
}
