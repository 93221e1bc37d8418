use std::fs;
use std::path::Path;

use crate::error::{EnvError, Result};
use crate::plugin::manifest::{PluginDescriptor, PluginManifest};

const MANIFEST_FILE: &str = "plugin.toml";

/// Collect descriptors from every `<plugins_dir>/<plugin>/plugin.toml`.
///
/// Unreadable manifests are logged and skipped.
pub fn discover(plugins_dir: &Path) -> Vec<PluginDescriptor> {
    let Ok(entries) = fs::read_dir(plugins_dir) else {
        tracing::info!("no plugins directory at {}", plugins_dir.display());
        return Vec::new();
    };

    let mut plugins: Vec<PluginDescriptor> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter_map(|root_dir| match read_manifest(&root_dir) {
            Ok(manifest) => Some(PluginDescriptor::from_manifest(
                manifest,
                root_dir.to_string_lossy(),
            )),
            Err(err) => {
                tracing::warn!("skipping plugin: {err}");
                None
            }
        })
        .collect();

    plugins.sort_by(|a, b| a.id.0.cmp(&b.id.0));
    plugins
}

fn read_manifest(root_dir: &Path) -> Result<PluginManifest> {
    let manifest_path = root_dir.join(MANIFEST_FILE);
    let raw = fs::read_to_string(&manifest_path).map_err(|err| EnvError::Manifest {
        path: manifest_path.clone(),
        reason: err.to_string(),
    })?;

    toml::from_str::<PluginManifest>(&raw).map_err(|err| EnvError::Manifest {
        path: manifest_path,
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::settings::RuntimeTag;

    fn write_plugin(root: &Path, dir: &str, manifest: &str) {
        let plugin_dir = root.join(dir);
        fs::create_dir_all(&plugin_dir).unwrap();
        fs::write(plugin_dir.join(MANIFEST_FILE), manifest).unwrap();
    }

    #[test]
    fn reads_manifests_and_skips_broken_ones() {
        let dir = tempfile::tempdir().unwrap();
        write_plugin(
            dir.path(),
            "Weather",
            "id = \"weather\"\nname = \"Weather\"\nlanguage = \"Python\"\nentry = \"main.py\"\n",
        );
        write_plugin(
            dir.path(),
            "Clock",
            "id = \"clock\"\nname = \"Clock\"\nlanguage = \"node\"\n",
        );
        write_plugin(dir.path(), "Broken", "id = ");
        fs::create_dir_all(dir.path().join("NoManifest")).unwrap();

        let plugins = discover(dir.path());
        assert_eq!(plugins.len(), 2);
        assert_eq!(plugins[0].id.0, "clock");
        assert_eq!(plugins[1].language, RuntimeTag::new("python"));
        assert_eq!(plugins[1].entry.as_deref(), Some("main.py"));
        assert!(plugins[1].install_dir.ends_with("Weather"));
    }

    #[test]
    fn missing_directory_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(&dir.path().join("Plugins")).is_empty());
    }
}
