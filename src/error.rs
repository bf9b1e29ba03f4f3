use std::path::PathBuf;
use thiserror::Error;

use crate::params::Role;

/// Fatal conditions of a generation run. Any of these aborts the run before
/// a single artifact is written.
#[derive(Debug, Error)]
pub enum AppPackError {
    /// The notebook failed every configured format variant.
    #[error("notebook {path} is not a valid notebook in any supported format: {reason}")]
    Validation { path: String, reason: String },

    #[error("only one {role} parameter allowed per notebook (found `{first}` and `{second}`)")]
    RoleConflict {
        role: Role,
        first: String,
        second: String,
    },

    #[error("template contract violated in {template}: {detail}")]
    TemplateContract { template: String, detail: String },

    #[error("unsupported entrypoint `{0}`: expected a .ipynb notebook or a .sh script")]
    UnsupportedEntrypoint(String),

    #[error("no notebook named {0} was found")]
    NotebookNotFound(PathBuf),

    #[error("failed to parse notebook {path}: {source}")]
    NotebookParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize {artifact}: {detail}")]
    Serialization { artifact: String, detail: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("git command failed: {0}")]
    Git(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppPackError {
    pub fn template_contract(template: &str, detail: impl Into<String>) -> Self {
        AppPackError::TemplateContract {
            template: template.to_string(),
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppPackError>;
