use crate::model::location::{
    DataLocation, DataRootMode, ENVIRONMENTS_FOLDER, EnvironmentKey, join_path,
};
use crate::model::settings::EnvironmentSettings;

const SEPARATORS: [char; 2] = ['\\', '/'];

/// Whether `path` has the `<portable>/Environments/<runtime>` shape.
///
/// Detection is by shape only, so a user-supplied executable that happens
/// to live in a matching folder is treated as managed.
pub fn is_under_portable_root(path: &str, portable_folder: &str, runtime_folder: &str) -> bool {
    SEPARATORS.iter().any(|sep| {
        path.contains(&format!(
            "{portable_folder}{sep}{ENVIRONMENTS_FOLDER}{sep}{runtime_folder}"
        ))
    })
}

pub fn is_under_roaming_root(path: &str, roaming_base: &str) -> bool {
    !roaming_base.is_empty() && path.starts_with(roaming_base)
}

/// Move `path` under `target_base`, keeping everything from the runtime's
/// `Environments` segment on. Paths without that segment are returned as is.
pub fn reroot(path: &str, runtime_folder: &str, target_base: &str) -> String {
    let Some(index) = environments_segment(path, runtime_folder) else {
        return path.to_string();
    };

    let rest = &path[index + ENVIRONMENTS_FOLDER.len()..];
    format!("{}{rest}", join_path(target_base, ENVIRONMENTS_FOLDER))
}

/// Last `Environments<sep><runtime>` that forms whole path segments.
fn environments_segment(path: &str, runtime_folder: &str) -> Option<usize> {
    SEPARATORS
        .iter()
        .filter_map(|sep| {
            let needle = format!("{ENVIRONMENTS_FOLDER}{sep}{runtime_folder}");
            path.rmatch_indices(&needle)
                .map(|(index, _)| index)
                .find(|&index| {
                    let starts_segment = index == 0 || path[..index].ends_with(SEPARATORS);
                    let tail = &path[index + needle.len()..];
                    starts_segment && (tail.is_empty() || tail.starts_with(SEPARATORS))
                })
        })
        .max()
}

/// Point stored executables at the data root currently in use.
pub fn reconcile_data_root(
    settings: &mut EnvironmentSettings,
    location: &DataLocation,
    keys: &[EnvironmentKey],
) {
    let portable_folder = location.portable_folder();
    let portable_base = location.portable_data_path.as_str();
    let roaming_base = location.roaming_data_path.as_str();

    for key in keys {
        let mut path = settings.executable_path(&key.tag).to_string();
        if path.is_empty() {
            continue;
        }
        let original = path.clone();

        match location.mode {
            DataRootMode::Portable => {
                // Application folder moved since the path was stored.
                if is_under_portable_root(&path, portable_folder, &key.folder)
                    && !path.starts_with(portable_base)
                {
                    path = reroot(&path, &key.folder, portable_base);
                }

                // Switched from roaming to portable.
                if is_under_roaming_root(&path, roaming_base) && !path.starts_with(portable_base) {
                    path = format!("{portable_base}{}", &path[roaming_base.len()..]);
                }
            }
            DataRootMode::Roaming => {
                if is_under_portable_root(&path, portable_folder, &key.folder) {
                    path = reroot(&path, &key.folder, roaming_base);
                }
            }
        }

        if path != original {
            tracing::info!(
                "{} path moved to {} data root: {path}",
                key.tag,
                location.mode.label()
            );
            settings.set_executable_path(&key.tag, path);
        }
    }
}
