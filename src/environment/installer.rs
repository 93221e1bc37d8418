use std::process::Command;

use crate::error::{EnvError, Result};
use crate::model::settings::RuntimeTag;

/// Where an installer should place a runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    pub tag: RuntimeTag,
    pub env_name: String,
    pub install_dir: String,
    pub executable_path: String,
}

pub trait Installer {
    fn install(&self, target: &InstallTarget) -> Result<()>;
}

/// Runs an external command to fetch and unpack a runtime.
///
/// `{install_dir}` and `{executable}` in the arguments are substituted.
#[derive(Debug, Clone, Default)]
pub struct CommandInstaller {
    command: Vec<String>,
}

impl CommandInstaller {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    fn expand(arg: &str, target: &InstallTarget) -> String {
        arg.replace("{install_dir}", &target.install_dir)
            .replace("{executable}", &target.executable_path)
    }
}

impl Installer for CommandInstaller {
    fn install(&self, target: &InstallTarget) -> Result<()> {
        let Some((program, args)) = self.command.split_first() else {
            return Err(EnvError::InstallFailure {
                tag: target.tag.clone(),
                reason: "no install command configured".to_string(),
            });
        };

        tracing::info!(
            "installing {} into {} with {program}",
            target.env_name,
            target.install_dir
        );

        let status = Command::new(program)
            .args(args.iter().map(|arg| Self::expand(arg, target)))
            .status()
            .map_err(|err| EnvError::InstallFailure {
                tag: target.tag.clone(),
                reason: format!("{program}: {err}"),
            })?;

        if !status.success() {
            return Err(EnvError::InstallFailure {
                tag: target.tag.clone(),
                reason: format!("{program} exited with {status}"),
            });
        }

        Ok(())
    }
}
