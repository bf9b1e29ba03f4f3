pub mod git;

use serde::{Deserialize, Serialize};

pub use git::GitRepository;

/// Facts about the algorithm repository a package is generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoIdentity {
    pub owner: Option<String>,
    pub name: String,
    pub commit_short_id: String,
    pub commit_message: String,
}

impl RepoIdentity {
    /// `{owner}.{name}.{commit}`, or `{name}.{commit}` when no owner is known.
    pub fn process_id(&self) -> String {
        match self.owner.as_deref().filter(|o| !o.is_empty()) {
            Some(owner) => format!("{}.{}.{}", owner, self.name, self.commit_short_id),
            None => format!("{}.{}", self.name, self.commit_short_id),
        }
    }
}

/// Identity facts supplied by the caller. They win over anything read from
/// the checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityOverrides {
    pub owner: Option<String>,
    pub name: Option<String>,
    pub commit_short_id: Option<String>,
    pub commit_message: Option<String>,
}

impl IdentityOverrides {
    /// A complete identity when name, commit and message are all given, so no
    /// commit needs to be read. The owner still falls back to the remote.
    pub fn without_checkout(&self, remote_url: Option<&str>) -> Option<RepoIdentity> {
        let (Some(name), Some(commit), Some(message)) =
            (&self.name, &self.commit_short_id, &self.commit_message)
        else {
            return None;
        };
        let owner = self
            .owner
            .clone()
            .or_else(|| remote_url.and_then(parse_remote_url).and_then(|(owner, _)| owner));
        Some(RepoIdentity {
            owner,
            name: name.clone(),
            commit_short_id: commit.clone(),
            commit_message: message.clone(),
        })
    }

    pub fn apply(&self, mut identity: RepoIdentity) -> RepoIdentity {
        if self.owner.is_some() {
            identity.owner = self.owner.clone();
        }
        if let Some(name) = &self.name {
            identity.name = name.clone();
        }
        if let Some(commit) = &self.commit_short_id {
            identity.commit_short_id = commit.clone();
        }
        if let Some(message) = &self.commit_message {
            identity.commit_message = message.clone();
        }
        identity
    }
}

/// Owner and name from a remote URL such as `https://host/owner/name.git`
/// or `git@host:owner/name.git`. Returns `None` when no name can be found.
pub fn parse_remote_url(url: &str) -> Option<(Option<String>, String)> {
    let https = normalize_remote_url(url);
    let path = https
        .split_once("://")
        .map(|(_, rest)| rest.split_once('/').map(|(_, path)| path).unwrap_or(""))
        .unwrap_or(https.as_str());

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut segments = path.rsplit('/').map(str::trim).filter(|s| !s.is_empty());

    let name = segments.next()?.to_string();
    let owner = segments.next().map(String::from);
    Some((owner, name))
}

/// Rewrites an SSH remote (`git@host:owner/name`) as its HTTPS form.
pub fn normalize_remote_url(url: &str) -> String {
    let url = url.trim();
    match url.strip_prefix("git@") {
        Some(rest) => format!("https://{}", rest.replacen(':', "/", 1)),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ssh_to_https() {
        assert_eq!(
            normalize_remote_url("git@github.com:unity-sds/app-pack.git"),
            "https://github.com/unity-sds/app-pack.git"
        );
        assert_eq!(normalize_remote_url(" https://x/y "), "https://x/y");
    }
}
