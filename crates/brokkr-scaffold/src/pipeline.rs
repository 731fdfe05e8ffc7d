//! Project initialization pipeline
//!
//! Strictly ordered phases with no backtracking once a phase commits side
//! effects: directory safety, metadata collection, template download,
//! installation. A user declining the safety check is a normal early
//! return, not an error; nothing is downloaded or installed without a
//! committed `ProjectInfo`.

use std::path::PathBuf;

use serde_json::json;
use tracing::{debug, info, warn};

use brokkr_core::config::DEPENDENCY_STORE;
use brokkr_core::utils::{clear_dir, copy_dir_all, host_command, ENTRY_RUNTIME};
use brokkr_core::{validation, RuntimeConfig};
use brokkr_packages::PackageCache;

use crate::error::{Error, Result};
use crate::prompt::Prompter;
use crate::renderer::TemplateRenderer;
use crate::runner;
use crate::types::{filter_by_kind, ProjectInfo, ProjectKind, TemplateDescriptor, TemplateKind};

/// Staged source tree inside a template package
const TEMPLATE_SUBDIR: &str = "template";

/// Version preseeded into the version prompt
const DEFAULT_VERSION: &str = "1.0.0";

/// Options carried in from the CLI surface
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Positionally supplied project name; used only if grammar-valid
    pub name: Option<String>,

    /// First affirmative signal for installing into a non-empty directory
    pub force: bool,
}

/// Result of the preparation phases
#[derive(Debug, Clone)]
pub enum Prepared {
    /// Metadata committed; download and install may proceed
    Ready(ProjectInfo),

    /// User declined the directory safety check; clean no-op
    Declined,
}

/// Result of a full pipeline run
#[derive(Debug, Clone)]
pub enum Outcome {
    Completed(ProjectInfo),
    Declined,
}

/// Orchestrates `init` from safety checks through installation
pub struct ProjectInitPipeline<'a> {
    config: &'a RuntimeConfig,
    prompter: &'a dyn Prompter,
    catalog: Vec<TemplateDescriptor>,
    workdir: PathBuf,
    options: InitOptions,
}

impl<'a> ProjectInitPipeline<'a> {
    /// Create a pipeline over a loaded catalog, rooted at `workdir`
    pub fn new(
        config: &'a RuntimeConfig,
        prompter: &'a dyn Prompter,
        catalog: Vec<TemplateDescriptor>,
        workdir: impl Into<PathBuf>,
        options: InitOptions,
    ) -> Self {
        Self {
            config,
            prompter,
            catalog,
            workdir: workdir.into(),
            options,
        }
    }

    /// Run every phase in order
    pub async fn run(&self) -> Result<Outcome> {
        match self.prepare()? {
            Prepared::Declined => Ok(Outcome::Declined),
            Prepared::Ready(info) => {
                let cache = self.download(&info).await?;
                self.install(&info, &cache).await?;
                Ok(Outcome::Completed(info))
            }
        }
    }

    /// Directory safety check and metadata collection.
    ///
    /// Returns `Prepared::Declined` when the user opts out on a non-empty
    /// directory; no download or install may run in that case.
    pub fn prepare(&self) -> Result<Prepared> {
        if self.catalog.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        if !self.ensure_workdir_ready()? {
            return Ok(Prepared::Declined);
        }
        let info = self.collect_project_info()?;
        debug!("collected project info: {:?}", info);
        Ok(Prepared::Ready(info))
    }

    /// Install-or-update the chosen template package into the user cache
    pub async fn download(&self, info: &ProjectInfo) -> Result<PackageCache> {
        let descriptor = self.descriptor_for(info)?;
        let mut cache = PackageCache::new(
            &descriptor.npm_name,
            &descriptor.version,
            self.config.template_cache_dir(),
        )
        .with_store_dir(self.config.template_store_dir())
        .with_registry(self.config.registry_url());

        if cache.exists().await {
            info!("updating template {}", descriptor.npm_name);
            cache.update().await?;
        } else {
            info!("downloading template {}", descriptor.npm_name);
            cache.install().await?;
        }
        Ok(cache)
    }

    /// Materialize the template into the working directory
    pub async fn install(&self, info: &ProjectInfo, cache: &PackageCache) -> Result<()> {
        let descriptor = self.descriptor_for(info)?;
        match descriptor.kind {
            TemplateKind::Normal => self.install_normal(info, descriptor, cache).await,
            TemplateKind::Custom => self.install_custom(info, descriptor, cache).await,
        }
    }

    /// Copy, render, then run the declared install/start commands
    async fn install_normal(
        &self,
        info: &ProjectInfo,
        descriptor: &TemplateDescriptor,
        cache: &PackageCache,
    ) -> Result<()> {
        let source = cache
            .package_root()
            .map(|root| root.join(TEMPLATE_SUBDIR))
            .ok_or_else(|| Error::template_source_missing(descriptor.npm_name.clone()))?;
        if !source.is_dir() {
            return Err(Error::template_source_missing(source.display().to_string()));
        }

        info!("copying template into {}", self.workdir.display());
        copy_dir_all(&source, &self.workdir)?;

        let renderer = TemplateRenderer::new(&descriptor.ignore)?;
        let rendered = renderer.render_dir(&self.workdir, info).await?;
        info!("rendered {} files", rendered);

        if let Some(command) = &descriptor.install_command {
            runner::exec_command(command, &self.workdir).await?;
        }
        if let Some(command) = &descriptor.start_command {
            runner::exec_command(command, &self.workdir).await?;
        }
        Ok(())
    }

    /// Delegate installation to the template's own entry script.
    ///
    /// The script runs in an isolated child process and receives one JSON
    /// argument: `{templateInfo, projectInfo, sourcePath, targetPath}`.
    async fn install_custom(
        &self,
        info: &ProjectInfo,
        descriptor: &TemplateDescriptor,
        cache: &PackageCache,
    ) -> Result<()> {
        let entry = cache
            .entry_path()
            .ok_or_else(|| Error::missing_entry(descriptor.npm_name.clone()))?;
        let source = cache
            .package_root()
            .map(|root| root.join(TEMPLATE_SUBDIR))
            .ok_or_else(|| Error::missing_entry(descriptor.npm_name.clone()))?;

        let payload = json!({
            "templateInfo": descriptor,
            "projectInfo": info,
            "sourcePath": source,
            "targetPath": self.workdir,
        })
        .to_string();

        info!("delegating install to {}", descriptor.npm_name);
        let status = host_command(ENTRY_RUNTIME)
            .arg(&entry)
            .arg(&payload)
            .current_dir(&self.workdir)
            .status()
            .await
            .map_err(|e| Error::custom_install_failed(descriptor.npm_name.clone(), e.to_string()))?;

        if !status.success() {
            return Err(Error::custom_install_failed(
                descriptor.npm_name.clone(),
                format!("exited with {status}"),
            ));
        }
        Ok(())
    }

    /// Working-directory entries that count as content: everything except
    /// dotfiles and the dependency-cache directory.
    fn visible_entries(&self) -> Result<Vec<String>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.workdir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') || name == DEPENDENCY_STORE {
                continue;
            }
            entries.push(name);
        }
        Ok(entries)
    }

    /// Directory safety check.
    ///
    /// An empty directory passes silently. A non-empty one requires a
    /// continue signal (force flag or confirmation); declining aborts the
    /// pipeline. The destructive clear additionally requires its own
    /// explicit confirmation — declining that keeps the files and
    /// continues.
    fn ensure_workdir_ready(&self) -> Result<bool> {
        let entries = self.visible_entries()?;
        if entries.is_empty() {
            return Ok(true);
        }
        debug!("working directory has {} visible entries", entries.len());

        let proceed = self.options.force
            || self.prompter.confirm(
                "Current directory is not empty. Continue and create the project here?",
                false,
            )?;
        if !proceed {
            info!("init aborted: directory not empty");
            return Ok(false);
        }

        let confirmed = self.prompter.confirm(
            "Confirm emptying the current directory before install?",
            false,
        )?;
        if confirmed {
            info!("clearing {}", self.workdir.display());
            clear_dir(&self.workdir)?;
        } else {
            debug!("keeping existing files in place");
        }
        Ok(true)
    }

    /// Interactive metadata collection
    fn collect_project_info(&self) -> Result<ProjectInfo> {
        let kind = self.ask_kind()?;
        let name = self.ask_name()?;
        let version = self.ask_version()?;
        let template = self.ask_template(kind)?;
        let description = match kind {
            ProjectKind::Component => Some(self.ask_description()?),
            ProjectKind::Project => None,
        };
        Ok(ProjectInfo::new(
            kind,
            name,
            version,
            template.npm_name,
            description,
        ))
    }

    fn ask_kind(&self) -> Result<ProjectKind> {
        const KINDS: [ProjectKind; 2] = [ProjectKind::Project, ProjectKind::Component];
        let labels: Vec<String> = KINDS.iter().map(|k| k.label().to_string()).collect();
        let index = self.prompter.select("What do you want to create?", &labels)?;
        Ok(KINDS[index])
    }

    /// A grammar-valid positional name skips the prompt
    fn ask_name(&self) -> Result<String> {
        if let Some(name) = &self.options.name {
            if validation::is_valid_project_name(name) {
                debug!("using positional project name '{}'", name);
                return Ok(name.clone());
            }
            warn!("'{}' is not a valid project name, asking again", name);
        }
        self.prompter.input("Project name", None, &|answer| {
            validation::validate_project_name(answer).map_err(|e| e.to_string())
        })
    }

    fn ask_version(&self) -> Result<String> {
        let raw = self
            .prompter
            .input("Version", Some(DEFAULT_VERSION), &|answer| {
                validation::normalize_version(answer)
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })?;
        Ok(validation::normalize_version(&raw)?)
    }

    /// Selection is restricted to templates tagged for the chosen kind
    fn ask_template(&self, kind: ProjectKind) -> Result<TemplateDescriptor> {
        let mut candidates = filter_by_kind(&self.catalog, kind);
        if candidates.is_empty() {
            return Err(Error::no_templates_for_kind(kind.label()));
        }
        let labels: Vec<String> = candidates.iter().map(|t| t.name.clone()).collect();
        let index = self.prompter.select("Project template", &labels)?;
        Ok(candidates.swap_remove(index))
    }

    fn ask_description(&self) -> Result<String> {
        self.prompter
            .input("Component description", None, &|answer| {
                if answer.trim().is_empty() {
                    Err("description must not be empty".to_string())
                } else {
                    Ok(())
                }
            })
    }

    fn descriptor_for(&self, info: &ProjectInfo) -> Result<&TemplateDescriptor> {
        self.catalog
            .iter()
            .find(|t| t.npm_name == info.template)
            .ok_or_else(|| {
                Error::catalog(format!("template {} is not in the catalog", info.template))
            })
    }
}
