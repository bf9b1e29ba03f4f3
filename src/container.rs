//! Container image references as produced by the external image build.

use std::fmt;
use std::str::FromStr;

use crate::error::AppPackError;

pub const MAX_TAG_LEN: usize = 128;

/// `[namespace/]repository[:tag]`, e.g. `ghcr.io/unity-sds/algorithms:owner.repo.main`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerReference {
    pub namespace: Option<String>,
    pub repository: String,
    pub tag: Option<String>,
}

impl ContainerReference {
    pub fn new(namespace: Option<&str>, repository: &str, tag: Option<&str>) -> Self {
        Self {
            namespace: namespace.filter(|n| !n.is_empty()).map(String::from),
            repository: repository.to_string(),
            tag: tag.filter(|t| !t.is_empty()).map(String::from),
        }
    }
}

impl fmt::Display for ContainerReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(namespace) = &self.namespace {
            write!(f, "{}/", namespace)?;
        }
        write!(f, "{}", self.repository)?;
        if let Some(tag) = &self.tag {
            write!(f, ":{}", tag)?;
        }
        Ok(())
    }
}

impl FromStr for ContainerReference {
    type Err = AppPackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AppPackError::Config("empty container reference".to_string()));
        }
        // A colon only starts the tag when it comes after the last slash;
        // earlier colons belong to a registry port.
        let last_slash = s.rfind('/');
        let (name, tag) = match s.rfind(':') {
            Some(colon) if last_slash.is_none_or(|slash| colon > slash) => {
                (&s[..colon], Some(&s[colon + 1..]))
            }
            _ => (s, None),
        };
        let (namespace, repository) = match name.rsplit_once('/') {
            Some((namespace, repository)) => (Some(namespace), repository),
            None => (None, name),
        };
        if repository.is_empty() {
            return Err(AppPackError::Config(format!(
                "container reference `{}` has no repository",
                s
            )));
        }
        Ok(Self::new(namespace, repository, tag))
    }
}

/// Image tag for a repository checkout: `owner.name.checkout`, lower-cased,
/// doubled dots collapsed and cut to [`MAX_TAG_LEN`] characters.
pub fn image_tag(owner: Option<&str>, name: &str, checkout: &str) -> String {
    let raw = format!("{}.{}.{}", owner.unwrap_or(""), name, checkout);
    let mut tag = raw.to_lowercase();
    while tag.contains("..") {
        tag = tag.replace("..", ".");
    }
    let tag = tag.trim_start_matches('.');
    tag.chars().take(MAX_TAG_LEN).collect()
}
