use crate::environment::fs::EnvFs;
use crate::environment::prompt::{Prompter, SetupChoice, SetupRequest};
use crate::environment::runtime::PluginEnvironment;
use crate::error::EnvError;
use crate::model::location::starts_with_ignore_case;
use crate::model::settings::EnvironmentSettings;
use crate::plugin::{BoundPlugin, PluginDescriptor};

/// Collaborators one setup run works against.
pub struct SetupContext<'a> {
    pub settings: &'a mut EnvironmentSettings,
    pub fs: &'a dyn EnvFs,
    pub prompter: &'a mut dyn Prompter,
}

/// Resolve an executable for `env` and bind every plugin that needs it.
///
/// Returns nothing (and touches nothing) when no plugin requires the
/// runtime. A runtime that cannot be resolved yields no bindings; other
/// runtimes are unaffected.
pub fn setup(
    env: &dyn PluginEnvironment,
    plugins: &[PluginDescriptor],
    ctx: &mut SetupContext<'_>,
) -> Vec<BoundPlugin> {
    let tag = env.runtime_tag();
    if !plugins.iter().any(|plugin| plugin.requires(tag)) {
        return Vec::new();
    }

    remove_legacy_install(env, ctx);

    let current = ctx.settings.executable_path(tag).to_string();
    if !current.is_empty() && ctx.fs.file_exists(&current) {
        // Only upgrade what this manager installed itself.
        if starts_with_ignore_case(&current, env.install_root()) {
            ensure_latest_installed(env, &current, ctx);
        }

        return bind_or_report(env, plugins, ctx);
    }

    let request = SetupRequest {
        tag: tag.clone(),
        env_name: env.env_name().to_string(),
        executable_hint: env.executable_hint().map(str::to_string),
    };

    match ctx.prompter.choose(&request) {
        SetupChoice::Install | SetupChoice::Cancelled => {
            env.install_environment(ctx.settings, ctx.fs);
        }
        SetupChoice::ManualPathChosen(path) => {
            tracing::info!("using {} at {path}", env.env_name());
            ctx.settings.set_executable_path(tag, path);
        }
    }

    bind_or_report(env, plugins, ctx)
}

fn remove_legacy_install(env: &dyn PluginEnvironment, ctx: &mut SetupContext<'_>) {
    let Some(legacy_root) = env.legacy_root() else {
        return;
    };

    let tag = env.runtime_tag();
    if !starts_with_ignore_case(ctx.settings.executable_path(tag), legacy_root) {
        return;
    }

    tracing::info!("removing legacy {} install at {legacy_root}", env.env_name());
    if let Err(err) = ctx.fs.remove_dir_if_exists(legacy_root) {
        tracing::warn!("{err}");
    }

    ctx.settings.set_executable_path(tag, "");
    env.install_environment(ctx.settings, ctx.fs);
}

/// Managed installs whose path differs from the current release's are
/// wiped and reinstalled.
fn ensure_latest_installed(env: &dyn PluginEnvironment, current: &str, ctx: &mut SetupContext<'_>) {
    let expected = env.expected_executable_path();
    if current == expected {
        return;
    }

    tracing::info!(
        "{} at {current} is outdated, reinstalling to {expected}",
        env.env_name()
    );
    if let Err(err) = ctx.fs.remove_dir_if_exists(env.install_root()) {
        tracing::warn!("{err}");
    }

    env.install_environment(ctx.settings, ctx.fs);
}

fn bind_or_report(
    env: &dyn PluginEnvironment,
    plugins: &[PluginDescriptor],
    ctx: &mut SetupContext<'_>,
) -> Vec<BoundPlugin> {
    let tag = env.runtime_tag();
    let resolved = ctx.settings.executable_path(tag).to_string();

    if ctx.fs.file_exists(&resolved) {
        return bind_plugins(plugins, env, &resolved);
    }

    let err = EnvError::UnreachablePath {
        tag: tag.clone(),
        path: resolved,
    };
    tracing::error!(
        "not able to set {} path, {tag} plugins will not be loaded: {err}",
        env.env_name()
    );
    ctx.prompter.report_failure(&format!(
        "Unable to set {tag} executable path, please try again from the settings."
    ));

    Vec::new()
}

fn bind_plugins(
    plugins: &[PluginDescriptor],
    env: &dyn PluginEnvironment,
    executable_path: &str,
) -> Vec<BoundPlugin> {
    let bound: Vec<BoundPlugin> = plugins
        .iter()
        .filter(|plugin| plugin.requires(env.runtime_tag()))
        .map(|plugin| BoundPlugin {
            descriptor: plugin.clone(),
            executable_path: executable_path.to_string(),
        })
        .collect();

    tracing::info!(
        "bound {} {} plugins to {executable_path}",
        bound.len(),
        env.runtime_tag()
    );
    bound
}
