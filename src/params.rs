//! The baked parameter record: the strict data contract between the
//! configuration phase and the deferred build-time phase.
//!
//! The configure phase resolves everything it can — derived strings, ambient
//! build context, file layout — into an immutable [`RenderParams`] record and
//! writes it to disk together with the two template files. The build-time
//! phase is then a pure function from this record plus freshly observed git
//! state to the two output files, and re-validates nothing.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{AmbientContext, Language};
use crate::error::{Error, Result};
use crate::namespace::NamespaceSpec;
use crate::render;
use crate::request::ValidatedRequest;
use crate::version::VersionSpec;

/// Everything the deferred phase needs, resolved at configuration time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderParams {
    pub artifact_name: String,
    pub language: Language,
    pub project_name: String,
    pub project_version: String,
    pub version: VersionSpec,
    pub namespace: NamespaceSpec,
    pub compiler_id: String,
    pub compiler_version: String,
    pub system_processor: String,
    pub build_config: String,
    pub worktree: Option<PathBuf>,
    pub params_path: PathBuf,
    pub header_template: PathBuf,
    pub source_template: PathBuf,
    pub include_dir: PathBuf,
    pub header_out: PathBuf,
    pub source_out: PathBuf,
}

impl RenderParams {
    /// Resolve the full record from a validated request and the generation
    /// directory layout.
    pub fn bake(request: &ValidatedRequest, ctx: &AmbientContext, gen_dir: &Path) -> Self {
        let name = &request.name;
        let lang = request.language;
        let include_dir = gen_dir.join("include");
        let header_out = include_dir
            .join(name)
            .join(format!("{name}.{}", lang.header_extension()));
        let source_out = gen_dir
            .join("src")
            .join(format!("{name}.{}", lang.source_extension()));
        let template_dir = gen_dir.join("templates");

        Self {
            artifact_name: name.clone(),
            language: lang,
            project_name: request.project_name.clone(),
            project_version: request.project_version.clone(),
            version: VersionSpec::parse(&request.project_version),
            namespace: NamespaceSpec::compose(&request.namespace),
            compiler_id: ctx.compiler_id.clone(),
            compiler_version: ctx.compiler_version.clone(),
            system_processor: ctx.system_processor.clone(),
            build_config: ctx.build_config.clone(),
            worktree: request.worktree.clone(),
            params_path: gen_dir.join("params.json"),
            header_template: template_dir.join(format!("{lang}_header.tera")),
            source_template: template_dir.join(format!("{lang}_source.tera")),
            include_dir,
            header_out,
            source_out,
        }
    }

    /// Write the record and materialize the selected template pair.
    ///
    /// The templates become the declared inputs of the generation step; a
    /// caller may edit them between builds, and their absence at build time
    /// fails the step.
    pub fn emit(&self) -> Result<()> {
        let (header_src, source_src) = render::template_sources(self.language);
        write_file(&self.header_template, header_src)?;
        write_file(&self.source_template, source_src)?;

        let encoded = serde_json::to_string_pretty(self).map_err(|e| Error::MalformedParams {
            path: self.params_path.clone(),
            reason: e.to_string(),
        })?;
        write_file(&self.params_path, &encoded)?;
        tracing::debug!(params = ?self.params_path, "parameter record baked");
        Ok(())
    }

    /// Load a record baked by a previous configure run.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&contents).map_err(|e| Error::MalformedParams {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Relative include path of the generated header, as the source file
    /// references it.
    pub fn header_include(&self) -> String {
        format!(
            "{name}/{name}.{ext}",
            name = self.artifact_name,
            ext = self.language.header_extension()
        )
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| Error::io(path, e))
}
