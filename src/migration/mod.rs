//! One-shot rewrites of persisted executable paths, run before any
//! environment setup.

pub mod path;
pub mod version;

use crate::environment::fs::EnvFs;
use crate::model::location::{DataLocation, EnvironmentKey};
use crate::model::settings::EnvironmentSettings;

/// Version rewrite first, then data-root reconciliation.
pub fn prestart_correction(
    settings: &mut EnvironmentSettings,
    location: &DataLocation,
    keys: &[EnvironmentKey],
    app_version: &str,
    fs: &dyn EnvFs,
) {
    version::apply_pending_update(settings, location, keys, app_version, fs);
    path::reconcile_data_root(settings, location, keys);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::fs::memory::MemoryFs;
    use crate::error::EnvError;
    use crate::model::location::DataRootMode;
    use crate::model::settings::RuntimeTag;

    const OLD_APP: &str = r"C:\L\app-1.0.0";
    const NEW_APP: &str = r"C:\L\app-1.1.0";
    const ROAMING: &str = r"C:\Data\Roaming";

    /// Refuses to delete one path, otherwise behaves like [`MemoryFs`].
    struct StuckFile {
        inner: MemoryFs,
        stuck: String,
    }

    impl EnvFs for StuckFile {
        fn file_exists(&self, path: &str) -> bool {
            self.inner.file_exists(path)
        }

        fn remove_dir_if_exists(&self, path: &str) -> Result<(), EnvError> {
            self.inner.remove_dir_if_exists(path)
        }

        fn create_marker(&self, path: &str) -> Result<(), EnvError> {
            self.inner.create_marker(path)
        }

        fn remove_file(&self, path: &str) -> Result<(), EnvError> {
            if path == self.stuck {
                return Err(EnvError::io(
                    path,
                    std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked"),
                ));
            }
            self.inner.remove_file(path)
        }
    }

    #[test]
    fn stuck_marker_does_not_block_other_runtimes() {
        let location = DataLocation::new(
            DataRootMode::Portable,
            ROAMING,
            format!(r"{NEW_APP}\UserData"),
        );
        let keys = vec![
            EnvironmentKey::new("python", "Python"),
            EnvironmentKey::new("node", "Node"),
            EnvironmentKey::new("java", "Java"),
        ];
        let python_marker = format!(r"{NEW_APP}\UserData\Environments\.updatePythonPath");
        let node_marker = format!(r"{NEW_APP}\UserData\Environments\.updateNodePath");
        let fs = StuckFile {
            inner: MemoryFs::with_files(&[python_marker.as_str(), node_marker.as_str()]),
            stuck: python_marker.clone(),
        };

        let python = RuntimeTag::new("python");
        let node = RuntimeTag::new("node");
        let java = RuntimeTag::new("java");
        let mut settings = EnvironmentSettings::default();
        settings.set_executable_path(
            &python,
            format!(r"{OLD_APP}\UserData\Environments\Python\python.exe"),
        );
        settings.set_executable_path(
            &node,
            format!(r"{OLD_APP}\UserData\Environments\Node\node.exe"),
        );
        settings.set_executable_path(&java, r"C:\Data\Roaming\Environments\Java\java.exe");

        prestart_correction(&mut settings, &location, &keys, "1.1.0", &fs);

        assert_eq!(
            settings.executable_path(&python),
            format!(r"{NEW_APP}\UserData\Environments\Python\python.exe")
        );
        assert_eq!(
            settings.executable_path(&node),
            format!(r"{NEW_APP}\UserData\Environments\Node\node.exe")
        );
        assert!(!fs.file_exists(&node_marker));
        assert!(fs.file_exists(&python_marker));

        // Data-root reconciliation still ran.
        assert_eq!(
            settings.executable_path(&java),
            format!(r"{NEW_APP}\UserData\Environments\Java\java.exe")
        );
    }
}
