use std::fs;
use std::path::Path;

use crate::error::{EnvError, Result};

/// Filesystem operations the environment lifecycle relies on.
pub trait EnvFs {
    fn file_exists(&self, path: &str) -> bool;

    fn remove_dir_if_exists(&self, path: &str) -> Result<()>;

    /// Create an empty sentinel file, creating parent directories.
    fn create_marker(&self, path: &str) -> Result<()>;

    fn remove_file(&self, path: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl EnvFs for LocalFs {
    fn file_exists(&self, path: &str) -> bool {
        !path.is_empty() && Path::new(path).is_file()
    }

    fn remove_dir_if_exists(&self, path: &str) -> Result<()> {
        let dir = Path::new(path);
        if path.is_empty() || !dir.is_dir() {
            return Ok(());
        }

        fs::remove_dir_all(dir).map_err(|err| EnvError::io(dir, err))
    }

    fn create_marker(&self, path: &str) -> Result<()> {
        let marker = Path::new(path);
        if let Some(parent) = marker.parent() {
            fs::create_dir_all(parent).map_err(|err| EnvError::io(parent, err))?;
        }

        fs::File::create(marker)
            .map(|_| ())
            .map_err(|err| EnvError::io(marker, err))
    }

    fn remove_file(&self, path: &str) -> Result<()> {
        fs::remove_file(path).map_err(|err| EnvError::io(path, err))
    }
}
