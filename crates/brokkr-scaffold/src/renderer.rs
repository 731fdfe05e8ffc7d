//! In-place rendering of a materialized template tree
//!
//! Every regular file under the target directory that is not excluded by
//! an ignore glob is treated as a template, rendered against the project
//! context, and overwritten where it stands. Per-file renders fan out
//! concurrently; they share nothing but the read-only context. One failing
//! file fails the whole call — already-written files stay written (the
//! operation is not transactional).

use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use globset::{Glob, GlobSet, GlobSetBuilder};
use tera::{Context, Tera};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::ProjectInfo;

/// Globs excluded from rendering in every template
const DEFAULT_IGNORES: &[&str] = &["**/node_modules/**"];

/// Renders a project tree against collected project metadata
pub struct TemplateRenderer {
    ignore: GlobSet,
}

impl TemplateRenderer {
    /// Build a renderer from template-declared ignore globs.
    ///
    /// The dependency-cache directory is always excluded.
    pub fn new(ignore_globs: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in DEFAULT_IGNORES {
            builder.add(Glob::new(pattern).map_err(|_| Error::ignore_pattern(*pattern))?);
        }
        for pattern in ignore_globs {
            builder.add(Glob::new(pattern).map_err(|_| Error::ignore_pattern(pattern))?);
        }
        let ignore = builder
            .build()
            .map_err(|e| Error::ignore_pattern(e.to_string()))?;
        Ok(Self { ignore })
    }

    /// Substitution context exposed to templates
    pub fn context(info: &ProjectInfo) -> Context {
        let mut ctx = Context::new();
        ctx.insert("project_name", &info.name);
        ctx.insert("version", &info.version);
        ctx.insert("class_name", &info.class_name);
        ctx.insert("description", info.description.as_deref().unwrap_or(""));
        ctx
    }

    /// Render every non-ignored file under `root` in place.
    ///
    /// Returns the number of files rendered.
    pub async fn render_dir(&self, root: &Path, info: &ProjectInfo) -> Result<usize> {
        let files = self.collect_files(root);
        debug!("rendering {} files under {}", files.len(), root.display());

        let ctx = Self::context(info);
        let rendered = try_join_all(files.into_iter().map(|path| {
            let ctx = ctx.clone();
            async move { render_file(&path, &ctx).await }
        }))
        .await?;

        Ok(rendered.len())
    }

    /// Regular files under `root` that escape the ignore set
    fn collect_files(&self, root: &Path) -> Vec<PathBuf> {
        WalkDir::new(root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
                !self.ignore.is_match(relative)
            })
            .map(|entry| entry.into_path())
            .collect()
    }
}

/// Render a single file against the context and overwrite it
async fn render_file(path: &Path, ctx: &Context) -> Result<()> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::render(path.display().to_string(), e.to_string()))?;

    let rendered = Tera::one_off(&content, ctx, false)
        .map_err(|e| Error::render(path.display().to_string(), e.to_string()))?;

    tokio::fs::write(path, rendered)
        .await
        .map_err(|e| Error::render(path.display().to_string(), e.to_string()))?;
    Ok(())
}
