use crate::environment::fs::EnvFs;
use crate::environment::installer::{InstallTarget, Installer};
use crate::model::config::RuntimeConfig;
use crate::model::location::{DataLocation, EnvironmentKey, join_path};
use crate::model::settings::{EnvironmentSettings, RuntimeTag};

/// Capability set of one supported plugin runtime.
pub trait PluginEnvironment {
    fn key(&self) -> &EnvironmentKey;

    fn env_name(&self) -> &str;

    /// Root this manager owns; executables under it are managed.
    fn install_root(&self) -> &str;

    /// Executable path the current release installs.
    fn expected_executable_path(&self) -> &str;

    /// Deprecated install location, removed on sight.
    fn legacy_root(&self) -> Option<&str> {
        None
    }

    /// File name shown when the user locates the executable by hand.
    fn executable_hint(&self) -> Option<&str> {
        None
    }

    /// Install the runtime and record its executable on success.
    fn install_environment(&self, settings: &mut EnvironmentSettings, fs: &dyn EnvFs);

    fn runtime_tag(&self) -> &RuntimeTag {
        &self.key().tag
    }
}

/// Configured runtime backed by an [`Installer`].
pub struct RuntimeEnvironment {
    key: EnvironmentKey,
    env_name: String,
    install_root: String,
    install_dir: String,
    executable_path: String,
    legacy_root: Option<String>,
    executable_hint: Option<String>,
    installer: Box<dyn Installer>,
}

impl RuntimeEnvironment {
    pub fn from_config(
        config: &RuntimeConfig,
        location: &DataLocation,
        installer: Box<dyn Installer>,
    ) -> Self {
        let install_root = location.runtime_root(&config.folder);
        let install_dir = join_path(&install_root, &config.install_dir);
        let executable_path = join_path(&install_dir, &config.executable);
        let legacy_root = config
            .legacy_dir
            .as_deref()
            .map(|legacy| join_path(location.data_directory(), legacy));

        Self {
            key: EnvironmentKey::new(&config.tag, config.folder.clone()),
            env_name: config.name.clone(),
            install_root,
            install_dir,
            executable_path,
            legacy_root,
            executable_hint: config.executable_hint.clone(),
            installer,
        }
    }

    fn target(&self) -> InstallTarget {
        InstallTarget {
            tag: self.key.tag.clone(),
            env_name: self.env_name.clone(),
            install_dir: self.install_dir.clone(),
            executable_path: self.executable_path.clone(),
        }
    }
}

impl PluginEnvironment for RuntimeEnvironment {
    fn key(&self) -> &EnvironmentKey {
        &self.key
    }

    fn env_name(&self) -> &str {
        &self.env_name
    }

    fn install_root(&self) -> &str {
        &self.install_root
    }

    fn expected_executable_path(&self) -> &str {
        &self.executable_path
    }

    fn legacy_root(&self) -> Option<&str> {
        self.legacy_root.as_deref()
    }

    fn executable_hint(&self) -> Option<&str> {
        self.executable_hint.as_deref()
    }

    fn install_environment(&self, settings: &mut EnvironmentSettings, fs: &dyn EnvFs) {
        let tag = &self.key.tag;

        if let Err(err) = self.installer.install(&self.target()) {
            tracing::error!("{err}");
            return;
        }

        if !fs.file_exists(&self.executable_path) {
            tracing::warn!(
                "{} installer finished but {} is missing",
                self.env_name,
                self.executable_path
            );
            return;
        }

        tracing::info!("{} installed at {}", self.env_name, self.executable_path);
        settings.set_executable_path(tag, self.executable_path.clone());
    }
}
