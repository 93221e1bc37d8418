use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use plugin_envs::environment::fs::LocalFs;
use plugin_envs::environment::prompt::{AutoInstall, Prompter, TerminalPrompter};
use plugin_envs::model::config::AppConfig;
use plugin_envs::model::location::join_path;
use plugin_envs::plugin::discovery;
use plugin_envs::{EnvironmentRegistry, EnvironmentSettings, SetupContext};

#[derive(Debug, Parser)]
#[command(name = "plugin-envs", version, about = "Resolve plugin runtimes for the launcher")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Install missing runtimes without asking.
    #[arg(long, global = true)]
    non_interactive: bool,

    /// Launcher install directory (defaults to this executable's directory).
    #[arg(long, global = true)]
    app_dir: Option<PathBuf>,

    /// Directory holding one sub-directory per plugin.
    #[arg(long, global = true)]
    plugins_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Migrate stored paths, resolve runtimes and bind plugins (default).
    Setup,
    /// Mark managed runtime paths for rewrite by the given release.
    MarkUpdate { version: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;

    let app_dir = match cli.app_dir.clone() {
        Some(dir) => dir,
        None => current_app_dir()?,
    };
    let location = config.data_location(&app_dir.to_string_lossy());

    // Initialize logging to file (never stdout)
    let log_dir = PathBuf::from(join_path(location.data_directory(), "Logs"));
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "plugin-envs.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter("plugin_envs=info")
        .init();

    tracing::info!(
        "plugin-envs {} starting, {} data root at {}",
        env!("CARGO_PKG_VERSION"),
        location.mode.label(),
        location.data_directory()
    );

    let settings_path = PathBuf::from(location.settings_file());
    let mut settings = EnvironmentSettings::load(&settings_path)?;
    let registry = EnvironmentRegistry::from_config(&config, &location);

    match cli.command.unwrap_or(Command::Setup) {
        Command::MarkUpdate { version } => {
            let markers = registry.mark_for_update(&settings, &location, &version, &LocalFs)?;
            for marker in markers {
                println!("marked {marker}");
            }
        }
        Command::Setup => {
            registry.prestart_correction(
                &mut settings,
                &location,
                env!("CARGO_PKG_VERSION"),
                &LocalFs,
            );

            let plugins_dir = cli.plugins_dir.unwrap_or_else(|| {
                PathBuf::from(join_path(
                    location.data_directory(),
                    &config.general.plugins_folder,
                ))
            });
            let plugins = discovery::discover(&plugins_dir);

            let mut prompter: Box<dyn Prompter> = if config.general.interactive && !cli.non_interactive {
                Box::new(TerminalPrompter::stdio())
            } else {
                Box::new(AutoInstall)
            };

            let mut ctx = SetupContext {
                settings: &mut settings,
                fs: &LocalFs,
                prompter: &mut *prompter,
            };
            let bound = registry.setup_all(&plugins, &mut ctx);

            for plugin in &bound {
                println!("{} -> {}", plugin.display_name(), plugin.executable_path);
            }
            for plugin in registry.unmanaged_plugins(&plugins) {
                println!("{} ({})", plugin.name, plugin.language);
            }

            tracing::info!("{} of {} plugins bound to a runtime", bound.len(), plugins.len());
        }
    }

    settings
        .save(&settings_path)
        .with_context(|| format!("saving {}", settings_path.display()))?;

    Ok(())
}

fn current_app_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("locating the running executable")?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}
