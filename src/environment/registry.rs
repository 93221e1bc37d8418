use crate::environment::fs::EnvFs;
use crate::environment::installer::CommandInstaller;
use crate::environment::runtime::{PluginEnvironment, RuntimeEnvironment};
use crate::environment::setup::{SetupContext, setup};
use crate::error::Result;
use crate::migration;
use crate::model::config::AppConfig;
use crate::model::location::{DataLocation, EnvironmentKey};
use crate::model::settings::EnvironmentSettings;
use crate::plugin::{BoundPlugin, PluginDescriptor};

/// Every runtime the launcher can host plugins for.
#[derive(Default)]
pub struct EnvironmentRegistry {
    environments: Vec<Box<dyn PluginEnvironment>>,
}

impl EnvironmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AppConfig, location: &DataLocation) -> Self {
        let mut registry = Self::new();

        for runtime in &config.runtimes {
            let installer = CommandInstaller::new(runtime.install_command.clone());
            registry.register(Box::new(RuntimeEnvironment::from_config(
                runtime,
                location,
                Box::new(installer),
            )));
        }

        registry
    }

    /// Later registrations for an already known tag are ignored.
    pub fn register(&mut self, environment: Box<dyn PluginEnvironment>) {
        let tag = environment.runtime_tag();
        if self.environments.iter().any(|env| env.runtime_tag() == tag) {
            tracing::warn!("duplicate environment for {tag}, ignoring");
            return;
        }

        self.environments.push(environment);
    }

    pub fn len(&self) -> usize {
        self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }

    pub fn keys(&self) -> Vec<EnvironmentKey> {
        self.environments.iter().map(|env| env.key().clone()).collect()
    }

    /// Rewrite stored paths after an upgrade or data-root change.
    pub fn prestart_correction(
        &self,
        settings: &mut EnvironmentSettings,
        location: &DataLocation,
        app_version: &str,
        fs: &dyn EnvFs,
    ) {
        migration::prestart_correction(settings, location, &self.keys(), app_version, fs);
    }

    /// Record that managed paths must follow the next release's directory.
    pub fn mark_for_update(
        &self,
        settings: &EnvironmentSettings,
        location: &DataLocation,
        new_version: &str,
        fs: &dyn EnvFs,
    ) -> Result<Vec<String>> {
        migration::version::mark_for_update(settings, location, &self.keys(), new_version, fs)
    }

    /// Run setup for every runtime and collect the bindings.
    pub fn setup_all(
        &self,
        plugins: &[PluginDescriptor],
        ctx: &mut SetupContext<'_>,
    ) -> Vec<BoundPlugin> {
        let mut bound = Vec::new();
        for env in &self.environments {
            bound.extend(setup(&**env, plugins, ctx));
        }
        bound
    }

    /// Plugins whose runtime has no registered environment.
    pub fn unmanaged_plugins<'a>(&self, plugins: &'a [PluginDescriptor]) -> Vec<&'a PluginDescriptor> {
        plugins
            .iter()
            .filter(|plugin| {
                !self
                    .environments
                    .iter()
                    .any(|env| plugin.requires(env.runtime_tag()))
            })
            .collect()
    }
}
