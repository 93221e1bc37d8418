use std::path::Path;

use crate::model::settings::RuntimeTag;

/// Folder under the data root holding every managed runtime.
pub const ENVIRONMENTS_FOLDER: &str = "Environments";

/// Present inside the portable folder when it is scheduled for removal.
pub const DELETION_INDICATOR: &str = ".dead";

const SETTINGS_FOLDER: &str = "Settings";
const SETTINGS_FILE: &str = "Environments.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataRootMode {
    #[default]
    Roaming,
    Portable,
}

impl DataRootMode {
    pub fn label(&self) -> &'static str {
        match self {
            DataRootMode::Roaming => "roaming",
            DataRootMode::Portable => "portable",
        }
    }
}

/// A runtime tag together with its folder under `Environments`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentKey {
    pub tag: RuntimeTag,
    pub folder: String,
}

impl EnvironmentKey {
    pub fn new(tag: impl AsRef<str>, folder: impl Into<String>) -> Self {
        Self {
            tag: RuntimeTag::new(tag),
            folder: folder.into(),
        }
    }
}

/// Where persisted application data lives for this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLocation {
    pub mode: DataRootMode,
    pub roaming_data_path: String,
    pub portable_data_path: String,
}

impl DataLocation {
    pub fn new(
        mode: DataRootMode,
        roaming_data_path: impl Into<String>,
        portable_data_path: impl Into<String>,
    ) -> Self {
        Self {
            mode,
            roaming_data_path: roaming_data_path.into(),
            portable_data_path: portable_data_path.into(),
        }
    }

    /// Portable mode is in use when the portable folder exists and is not
    /// marked for deletion.
    pub fn detect(roaming_data_path: impl Into<String>, portable_data_path: impl Into<String>) -> Self {
        let portable_data_path = portable_data_path.into();
        let portable = Path::new(&portable_data_path);
        let mode = if portable.is_dir() && !portable.join(DELETION_INDICATOR).exists() {
            DataRootMode::Portable
        } else {
            DataRootMode::Roaming
        };

        Self::new(mode, roaming_data_path, portable_data_path)
    }

    pub fn data_directory(&self) -> &str {
        match self.mode {
            DataRootMode::Roaming => &self.roaming_data_path,
            DataRootMode::Portable => &self.portable_data_path,
        }
    }

    /// Last segment of the portable base, e.g. `UserData`.
    pub fn portable_folder(&self) -> &str {
        last_segment(&self.portable_data_path)
    }

    pub fn environments_root(&self) -> String {
        join_path(self.data_directory(), ENVIRONMENTS_FOLDER)
    }

    pub fn runtime_root(&self, folder: &str) -> String {
        join_path(&self.environments_root(), folder)
    }

    /// Sentinel signalling a pending version rewrite for one runtime.
    pub fn marker_path(&self, folder: &str) -> String {
        join_path(&self.environments_root(), &marker_file_name(folder))
    }

    pub fn settings_file(&self) -> String {
        join_path(
            &join_path(self.data_directory(), SETTINGS_FOLDER),
            SETTINGS_FILE,
        )
    }
}

pub fn marker_file_name(folder: &str) -> String {
    format!(".update{folder}Path")
}

/// Separator style already used by `path`; host separator when it has none.
pub fn separator_of(path: &str) -> char {
    match (path.contains('\\'), path.contains('/')) {
        (true, false) => '\\',
        (false, true) => '/',
        (true, true) => {
            if path.rfind('\\') > path.rfind('/') {
                '\\'
            } else {
                '/'
            }
        }
        (false, false) => std::path::MAIN_SEPARATOR,
    }
}

pub fn join_path(base: &str, segment: &str) -> String {
    let segment = segment.trim_start_matches(['\\', '/']);
    if base.is_empty() {
        return segment.to_string();
    }

    let sep = separator_of(base);
    let base = base.trim_end_matches(['\\', '/']);
    let segment = segment.replace(['\\', '/'], &sep.to_string());
    format!("{base}{sep}{segment}")
}

pub fn starts_with_ignore_case(path: &str, prefix: &str) -> bool {
    !prefix.is_empty()
        && path
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn last_segment(path: &str) -> &str {
    path.trim_end_matches(['\\', '/'])
        .rsplit(['\\', '/'])
        .next()
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn windows_location(mode: DataRootMode) -> DataLocation {
        DataLocation::new(mode, r"C:\Data\Roaming", r"C:\App\UserData")
    }

    #[test]
    fn join_keeps_base_separator_style() {
        assert_eq!(join_path(r"C:\App\", "Environments"), r"C:\App\Environments");
        assert_eq!(join_path("/opt/app", "/Environments"), "/opt/app/Environments");
        assert_eq!(join_path("", "Environments"), "Environments");
        assert_eq!(
            join_path(r"C:\Node-v16", "node-x64/node.exe"),
            r"C:\Node-v16\node-x64\node.exe"
        );
    }

    #[test]
    fn data_directory_follows_mode() {
        assert_eq!(
            windows_location(DataRootMode::Roaming).environments_root(),
            r"C:\Data\Roaming\Environments"
        );
        assert_eq!(
            windows_location(DataRootMode::Portable).runtime_root("Python"),
            r"C:\App\UserData\Environments\Python"
        );
    }

    #[test]
    fn marker_lives_under_environments_root() {
        assert_eq!(
            windows_location(DataRootMode::Portable).marker_path("Node"),
            r"C:\App\UserData\Environments\.updateNodePath"
        );
    }

    #[test]
    fn portable_folder_is_last_segment() {
        assert_eq!(windows_location(DataRootMode::Roaming).portable_folder(), "UserData");
    }

    #[test]
    fn prefix_match_ignores_case() {
        assert!(starts_with_ignore_case(r"c:\data\x.exe", r"C:\Data"));
        assert!(!starts_with_ignore_case(r"C:\Other", r"C:\Data"));
        assert!(!starts_with_ignore_case("anything", ""));
    }

    #[test]
    fn detect_portable_requires_live_folder() {
        let dir = tempfile::tempdir().unwrap();
        let portable = dir.path().join("UserData");
        let roaming = dir.path().join("Roaming");
        let portable_str = portable.to_string_lossy().to_string();
        let roaming_str = roaming.to_string_lossy().to_string();

        let location = DataLocation::detect(roaming_str.clone(), portable_str.clone());
        assert_eq!(location.mode, DataRootMode::Roaming);

        std::fs::create_dir_all(&portable).unwrap();
        let location = DataLocation::detect(roaming_str.clone(), portable_str.clone());
        assert_eq!(location.mode, DataRootMode::Portable);

        std::fs::write(portable.join(DELETION_INDICATOR), "").unwrap();
        let location = DataLocation::detect(roaming_str, portable_str);
        assert_eq!(location.mode, DataRootMode::Roaming);
    }
}
