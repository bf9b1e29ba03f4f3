//! Turns a parameterized notebook (or shell script) into a CWL application
//! package and an OGC process descriptor.

pub mod assembler;
pub mod config;
pub mod container;
pub mod entrypoint;
pub mod error;
pub mod logging;
pub mod notebook;
pub mod output;
pub mod params;
pub mod pipeline;
pub mod repo;
pub mod template;

pub use config::{ConfigLoader, GeneratorConfig};
pub use container::ContainerReference;
pub use entrypoint::Entrypoint;
pub use error::{AppPackError, Result};
pub use notebook::{Notebook, NotebookParameterExtractor};
pub use params::{CwlType, Parameter, ParameterSet, Role, infer_cwl_type};
pub use pipeline::{ApplicationPackage, Generator};
pub use repo::{IdentityOverrides, RepoIdentity};
pub use template::TemplateSet;
