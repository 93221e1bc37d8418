use std::path::PathBuf;

use thiserror::Error;

use crate::model::settings::RuntimeTag;

pub type Result<T, E = EnvError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("{tag} executable not reachable: {path}")]
    UnreachablePath { tag: RuntimeTag, path: String },

    #[error("failed to install {tag} environment: {reason}")]
    InstallFailure { tag: RuntimeTag, reason: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("environment settings: {0}")]
    Settings(String),

    #[error("plugin manifest {}: {reason}", path.display())]
    Manifest { path: PathBuf, reason: String },
}

impl EnvError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
