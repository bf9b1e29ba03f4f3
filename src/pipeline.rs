//! One generation run: templates and parameters in, an application package
//! out. Nothing touches the filesystem until every artifact has rendered.

use anyhow::Context as AnyhowContext;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::assembler::{
    DescriptorAssembler, ProcessAssembler, StagingAssembler, WorkflowAssembler,
};
use crate::config::GeneratorConfig;
use crate::entrypoint::Entrypoint;
use crate::error::Result;
use crate::notebook::{Notebook, NotebookParameterExtractor};
use crate::output::{
    Artifact, CACHE_WORKFLOW_FILE, DESCRIPTOR_FILE, PROCESS_FILE, STAGE_IN_FILE, STAGE_OUT_FILE,
    WORKFLOW_FILE, render_cwl, render_descriptor,
};
use crate::params::ParameterSet;
use crate::repo::RepoIdentity;
use crate::template::{CwlDocument, Descriptor, ProcessDefinition, TemplateSet, WorkflowGraph};
use crate::template::loader::load_templates;

pub struct Generator {
    templates: TemplateSet,
    extractor: NotebookParameterExtractor,
    workflow: WorkflowAssembler,
    process: ProcessAssembler,
    staging: StagingAssembler,
    descriptor: DescriptorAssembler,
}

impl Generator {
    pub fn new(config: &GeneratorConfig, templates: TemplateSet) -> Self {
        Self {
            templates,
            extractor: NotebookParameterExtractor::new(config.notebook_formats.clone()),
            workflow: WorkflowAssembler::new(),
            process: ProcessAssembler::new(config.process.clone()),
            staging: StagingAssembler::new(config.staging),
            descriptor: DescriptorAssembler::new(&config.deposit_url, &config.deposit_branch),
        }
    }

    /// Loads the templates named by `config`, or the built-in set.
    pub fn from_config(config: &GeneratorConfig) -> anyhow::Result<Self> {
        let templates = load_templates(config.templates_dir.as_deref())?;
        Ok(Self::new(config, templates))
    }

    /// Parameters declared by the entrypoint. Scripts declare none.
    pub fn parameters_for(&self, repo_dir: &Path, entrypoint: &Entrypoint) -> Result<ParameterSet> {
        match entrypoint {
            Entrypoint::Notebook(path) => {
                let notebook = Notebook::from_path(&repo_dir.join(path))?;
                self.extractor.extract(&notebook)
            }
            Entrypoint::Script(_) => Ok(ParameterSet::new()),
        }
    }

    pub fn generate(
        &self,
        entrypoint: &Entrypoint,
        params: &ParameterSet,
        repo: &RepoIdentity,
        container_ref: &str,
    ) -> Result<ApplicationPackage> {
        let workflow = self.workflow.assemble(self.templates.workflow.clone(), params)?;
        let stage_in = self.staging.stage_in(&self.templates.stage_in);
        let cache_workflow = self.staging.cache_workflow(&workflow, params)?;
        let process = self.process.assemble(
            self.templates.process.clone(),
            params,
            entrypoint,
            container_ref,
        )?;
        let stage_out = self.staging.stage_out(&self.templates.stage_out);
        let descriptor = self.descriptor.assemble(
            self.templates.descriptor.clone(),
            params,
            repo,
            container_ref,
        )?;

        let mut artifacts = vec![
            Artifact::new(WORKFLOW_FILE, render_cwl(WORKFLOW_FILE, &workflow)?),
            Artifact::new(STAGE_IN_FILE, render_cwl(STAGE_IN_FILE, &stage_in)?),
        ];
        if let Some(cache) = &cache_workflow {
            artifacts.push(Artifact::new(
                CACHE_WORKFLOW_FILE,
                render_cwl(CACHE_WORKFLOW_FILE, cache)?,
            ));
        }
        artifacts.push(Artifact::new(PROCESS_FILE, render_cwl(PROCESS_FILE, &process)?));
        artifacts.push(Artifact::new(STAGE_OUT_FILE, render_cwl(STAGE_OUT_FILE, &stage_out)?));
        artifacts.push(Artifact::new(
            DESCRIPTOR_FILE,
            render_descriptor(DESCRIPTOR_FILE, &descriptor)?,
        ));

        info!(
            process_id = %repo.process_id(),
            artifacts = artifacts.len(),
            "Generated application package"
        );
        Ok(ApplicationPackage {
            workflow,
            cache_workflow,
            process,
            descriptor,
            artifacts,
        })
    }
}

/// Everything one run produced, rendered and ready to write.
#[derive(Debug, Clone)]
pub struct ApplicationPackage {
    workflow: WorkflowGraph,
    cache_workflow: Option<WorkflowGraph>,
    process: ProcessDefinition,
    descriptor: Descriptor,
    artifacts: Vec<Artifact>,
}

impl ApplicationPackage {
    pub fn workflow(&self) -> &WorkflowGraph {
        &self.workflow
    }

    pub fn cache_workflow(&self) -> Option<&CwlDocument> {
        self.cache_workflow.as_ref()
    }

    pub fn process(&self) -> &ProcessDefinition {
        &self.process
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn artifact(&self, file_name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.file_name == file_name)
    }

    /// Writes every artifact into `outdir`, creating it if needed, and
    /// returns the written paths in generation order.
    pub fn write_to(&self, outdir: &Path) -> anyhow::Result<Vec<PathBuf>> {
        fs::create_dir_all(outdir)
            .with_context(|| format!("Failed to create output directory {}", outdir.display()))?;
        self.artifacts
            .iter()
            .map(|artifact| {
                artifact.write_to(outdir).with_context(|| {
                    format!("Failed to write {} to {}", artifact.file_name, outdir.display())
                })
            })
            .collect()
    }
}
