use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use crate::environment::fs::EnvFs;
use crate::error::Result;
use crate::model::location::{DataLocation, EnvironmentKey};
use crate::model::settings::EnvironmentSettings;

/// Version-qualified install directory, e.g. `app-1.10.2`.
static APP_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"app-\d+\.\d+\.\d+").expect("valid app version regex"));

pub fn app_dir_name(version: &str) -> String {
    format!("app-{version}")
}

/// Swap every `app-x.y.z` segment for `version`; other paths are returned as is.
pub fn rewrite_app_version(path: &str, version: &str) -> String {
    let replacement = app_dir_name(version);
    APP_VERSION_RE
        .replace_all(path, NoExpand(&replacement))
        .into_owned()
}

/// Leave a marker in the next release's environments root for every
/// runtime whose executable is managed under the current one.
///
/// Returns the markers created.
pub fn mark_for_update(
    settings: &EnvironmentSettings,
    location: &DataLocation,
    keys: &[EnvironmentKey],
    new_version: &str,
    fs: &dyn EnvFs,
) -> Result<Vec<String>> {
    let environments_root = location.environments_root();
    let mut markers = Vec::new();

    for key in keys {
        let path = settings.executable_path(&key.tag);
        if path.is_empty() || !path.starts_with(&environments_root) {
            continue;
        }

        let marker = rewrite_app_version(&location.marker_path(&key.folder), new_version);
        fs.create_marker(&marker)?;
        tracing::info!("marked {} path for update to {new_version}", key.tag);
        markers.push(marker);
    }

    Ok(markers)
}

/// Consume markers left by [`mark_for_update`], pointing stored paths at
/// the running release's directory.
///
/// Returns how many runtimes were rewritten; without markers this is a no-op.
/// A marker that cannot be removed is logged and left for the next start.
pub fn apply_pending_update(
    settings: &mut EnvironmentSettings,
    location: &DataLocation,
    keys: &[EnvironmentKey],
    current_version: &str,
    fs: &dyn EnvFs,
) -> usize {
    let mut applied = 0;

    for key in keys {
        let marker = location.marker_path(&key.folder);
        if !fs.file_exists(&marker) {
            continue;
        }

        let current = settings.executable_path(&key.tag);
        if !current.is_empty() {
            let updated = rewrite_app_version(current, current_version);
            tracing::info!("{} path updated after upgrade: {updated}", key.tag);
            settings.set_executable_path(&key.tag, updated);
            applied += 1;
        }

        if let Err(err) = fs.remove_file(&marker) {
            tracing::warn!("could not remove {} update marker: {err}", key.tag);
        }
    }

    applied
}
