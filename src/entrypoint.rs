use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{AppPackError, Result};

pub const DEFAULT_ENTRYPOINT: &str = "process.ipynb";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entrypoint {
    Notebook(PathBuf),
    Script(PathBuf),
}

impl Entrypoint {
    pub fn classify(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ipynb") => Ok(Entrypoint::Notebook(path.to_path_buf())),
            Some("sh") => Ok(Entrypoint::Script(path.to_path_buf())),
            _ => Err(AppPackError::UnsupportedEntrypoint(
                path.display().to_string(),
            )),
        }
    }

    /// The requested entrypoint if it exists under `repo_dir`, otherwise
    /// [`DEFAULT_ENTRYPOINT`].
    pub fn resolve(repo_dir: &Path, requested: Option<&Path>) -> Result<Self> {
        let chosen = match requested {
            Some(path) if repo_dir.join(path).exists() => path.to_path_buf(),
            Some(path) => {
                warn!(
                    requested = %path.display(),
                    "Entrypoint not found in repository; falling back to {}",
                    DEFAULT_ENTRYPOINT
                );
                PathBuf::from(DEFAULT_ENTRYPOINT)
            }
            None => PathBuf::from(DEFAULT_ENTRYPOINT),
        };
        let entrypoint = Self::classify(&chosen)?;
        debug!(entrypoint = %entrypoint, "Resolved entrypoint");
        Ok(entrypoint)
    }

    pub fn path(&self) -> &Path {
        match self {
            Entrypoint::Notebook(path) | Entrypoint::Script(path) => path,
        }
    }
}

impl fmt::Display for Entrypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entrypoint::Notebook(path) => write!(f, "notebook {}", path.display()),
            Entrypoint::Script(path) => write!(f, "script {}", path.display()),
        }
    }
}
