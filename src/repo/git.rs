//! Read-only facts about a local checkout, collected through the `git` CLI.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::error::{AppPackError, Result};
use crate::repo::{IdentityOverrides, RepoIdentity, parse_remote_url};

#[derive(Debug, Clone)]
pub struct GitRepository {
    directory: PathBuf,
}

impl GitRepository {
    pub fn open(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn remote_url(&self) -> Result<String> {
        self.git(&["config", "--get", "remote.origin.url"])
    }

    pub fn commit_short_id(&self) -> Result<String> {
        self.git(&["rev-parse", "--short", "HEAD"])
    }

    pub fn commit_message(&self) -> Result<String> {
        self.git(&["log", "-1", "--pretty=%B"])
    }

    /// Identity from the origin remote and the checked-out commit. A checkout
    /// without a remote is named after its directory and has no owner.
    pub fn identity(&self) -> Result<RepoIdentity> {
        let (owner, name) = match self.remote_url().ok().as_deref().and_then(parse_remote_url) {
            Some(parsed) => parsed,
            None => {
                let name = self
                    .directory
                    .canonicalize()
                    .unwrap_or_else(|_| self.directory.clone())
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .ok_or_else(|| {
                        AppPackError::Git(format!(
                            "cannot name repository at {}",
                            self.directory.display()
                        ))
                    })?;
                (None, name)
            }
        };

        Ok(RepoIdentity {
            owner,
            name,
            commit_short_id: self.commit_short_id()?,
            commit_message: self.commit_message()?,
        })
    }

    /// `overrides` first; git is only asked for what they leave open.
    pub fn resolve_identity(&self, overrides: &IdentityOverrides) -> Result<RepoIdentity> {
        let remote = self.remote_url().ok();
        if let Some(identity) = overrides.without_checkout(remote.as_deref()) {
            return Ok(identity);
        }
        Ok(overrides.apply(self.identity()?))
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        debug!(directory = %self.directory.display(), ?args, "Running git");
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.directory)
            .args(args)
            .output()
            .map_err(|e| AppPackError::Git(format!("failed to run git {}: {}", args.join(" "), e)))?;

        if !output.status.success() {
            return Err(AppPackError::Git(format!(
                "git {} exited with {}: {}",
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
