//! Generator configuration: a TOML file plus `APPPACK_*` environment
//! overrides. Every field has a default, so no file is required.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{AppPackError, Result};
use crate::notebook::NotebookFormat;
use crate::params::CwlType;

pub const DEFAULT_DEPOSIT_URL: &str = "https://raw.githubusercontent.com/jplzhan/artifact-deposit-repo";
pub const RUNTIME_OUTDIR_PLACEHOLDER: &str = "$(runtime.outdir)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub templates_dir: Option<PathBuf>,
    pub deposit_url: String,
    pub deposit_branch: String,
    pub notebook_formats: Vec<NotebookFormat>,
    pub process: ProcessConfig,
    pub staging: StagingVariant,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            templates_dir: None,
            deposit_url: DEFAULT_DEPOSIT_URL.to_string(),
            deposit_branch: "main".to_string(),
            notebook_formats: NotebookFormat::ALL.to_vec(),
            process: ProcessConfig::default(),
            staging: StagingVariant::Plain,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    pub shell_interpreter: String,
    pub parameters_file: String,
    pub stage_in_kind: StageInKind,
    /// Placeholder the stage-out glob must contain. Empty disables the check.
    pub required_glob_placeholder: String,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            shell_interpreter: "sh".to_string(),
            parameters_file: "/tmp/inputs.json".to_string(),
            stage_in_kind: StageInKind::File,
            required_glob_placeholder: RUNTIME_OUTDIR_PLACEHOLDER.to_string(),
        }
    }
}

impl ProcessConfig {
    pub fn required_placeholder(&self) -> Option<&str> {
        Some(self.required_glob_placeholder.as_str()).filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StageInKind {
    #[default]
    File,
    Directory,
}

impl StageInKind {
    pub fn cwl_type(&self) -> CwlType {
        match self {
            StageInKind::File => CwlType::File,
            StageInKind::Directory => CwlType::Directory,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.cwl_type().as_str()
    }
}

impl FromStr for StageInKind {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "file" => Ok(StageInKind::File),
            "directory" => Ok(StageInKind::Directory),
            _ => Err(format!(
                "invalid stage_in_kind '{}'; supported values are File, Directory",
                value
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StagingVariant {
    #[default]
    Plain,
    Cache,
}

impl fmt::Display for StagingVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StagingVariant::Plain => write!(f, "plain"),
            StagingVariant::Cache => write!(f, "cache"),
        }
    }
}

impl FromStr for StagingVariant {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "plain" => Ok(StagingVariant::Plain),
            "cache" => Ok(StagingVariant::Cache),
            _ => Err(format!(
                "invalid staging '{}'; supported values are plain, cache",
                value
            )),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Config from `path` (defaults when it is `None` or missing), then
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<GeneratorConfig> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?.unwrap_or_default(),
            None => GeneratorConfig::default(),
        };
        Self::apply_env_overrides(&mut config, |key| env::var(key).ok())?;
        Ok(config)
    }

    /// Returns `Ok(None)` if the file doesn't exist.
    pub fn load_from_file(path: &Path) -> Result<Option<GeneratorConfig>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppPackError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
            .map(Some)
            .map_err(|e| AppPackError::Config(format!("{} ({})", e, path.display())))
    }

    pub fn parse(content: &str) -> Result<GeneratorConfig> {
        let config: GeneratorConfig = toml::from_str(content)
            .map_err(|e| AppPackError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Environment variables take precedence over file values. `lookup`
    /// resolves a variable name, which keeps the overrides testable.
    pub fn apply_env_overrides<F>(config: &mut GeneratorConfig, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("APPPACK_TEMPLATES_DIR") {
            config.templates_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = lookup("APPPACK_DEPOSIT_URL") {
            config.deposit_url = url;
        }
        if let Some(branch) = lookup("APPPACK_DEPOSIT_BRANCH") {
            config.deposit_branch = branch;
        }
        if let Some(kind) = lookup("APPPACK_STAGE_IN_KIND") {
            config.process.stage_in_kind = kind.parse().map_err(AppPackError::Config)?;
        }
        if let Some(staging) = lookup("APPPACK_STAGING") {
            config.staging = staging.parse().map_err(AppPackError::Config)?;
        }
        config.validate()
    }

    pub fn env_var_documentation() -> &'static [&'static str] {
        &[
            "APPPACK_TEMPLATES_DIR - Directory holding the CWL and descriptor templates",
            "APPPACK_DEPOSIT_URL - Base URL where generated workflows are published",
            "APPPACK_DEPOSIT_BRANCH - Branch segment of the published workflow URL (default: main)",
            "APPPACK_STAGE_IN_KIND - File or Directory input type for staged data (default: File)",
            "APPPACK_STAGING - plain or cache (default: plain)",
        ]
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.notebook_formats.is_empty() {
            return Err(AppPackError::Config(
                "notebook_formats must list at least one format".to_string(),
            ));
        }
        if self.deposit_url.trim().is_empty() {
            return Err(AppPackError::Config("deposit_url must not be empty".to_string()));
        }
        if self.process.shell_interpreter.trim().is_empty() {
            return Err(AppPackError::Config(
                "process.shell_interpreter must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
