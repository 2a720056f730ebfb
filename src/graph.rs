//! Build-graph wiring.
//!
//! The host build-orchestration system is a black box reached through the
//! [`BuildGraph`] trait: target existence queries, declaration of the
//! deferred generation step and the static library, an explicit ordering
//! edge between them, and private link edges from caller targets.
//! [`MemoryBuildGraph`] backs tests; [`JsonBuildGraph`] persists the plan to
//! a file the host tooling consumes.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::params::RenderParams;
use crate::request::ValidatedRequest;

/// A deferred build step executed on every build invocation.
///
/// `always_run` is load-bearing: the step must never be skipped based on
/// prior output, since capturing fresh source-control state is the whole
/// point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationStep {
    pub name: String,
    pub command: Vec<String>,
    pub inputs: Vec<PathBuf>,
    pub outputs: Vec<PathBuf>,
    pub always_run: bool,
}

/// A static library whose sources are exactly the generated pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticLibrary {
    pub name: String,
    pub sources: Vec<PathBuf>,
    pub include_dirs: Vec<PathBuf>,
}

/// Interface the pipeline requires from the host build system.
pub trait BuildGraph {
    fn has_target(&self, name: &str) -> bool;
    fn add_generation_step(&mut self, step: GenerationStep) -> Result<()>;
    fn add_static_library(&mut self, lib: StaticLibrary) -> Result<()>;
    /// `after` must not start before `before` has fully completed.
    fn add_ordering_edge(&mut self, before: &str, after: &str) -> Result<()>;
    /// Private link relationship: `from` links `to` without re-exporting it.
    fn add_private_link(&mut self, from: &str, to: &str) -> Result<()>;
}

/// In-memory graph, also the serialized body of the JSON plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryBuildGraph {
    pub targets: BTreeSet<String>,
    pub steps: Vec<GenerationStep>,
    pub libraries: Vec<StaticLibrary>,
    pub ordering_edges: Vec<(String, String)>,
    pub private_links: Vec<(String, String)>,
}

impl MemoryBuildGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pre-existing host target, e.g. a caller's executable.
    pub fn seed_target(&mut self, name: impl Into<String>) {
        self.targets.insert(name.into());
    }
}

impl BuildGraph for MemoryBuildGraph {
    fn has_target(&self, name: &str) -> bool {
        self.targets.contains(name)
    }

    fn add_generation_step(&mut self, step: GenerationStep) -> Result<()> {
        // Redeclaration replaces the previous step so re-configuration stays
        // idempotent; a collision warning has already been issued upstream.
        self.steps.retain(|existing| existing.name != step.name);
        self.targets.insert(step.name.clone());
        self.steps.push(step);
        Ok(())
    }

    fn add_static_library(&mut self, lib: StaticLibrary) -> Result<()> {
        self.libraries.retain(|existing| existing.name != lib.name);
        self.targets.insert(lib.name.clone());
        self.libraries.push(lib);
        Ok(())
    }

    fn add_ordering_edge(&mut self, before: &str, after: &str) -> Result<()> {
        if !self.targets.contains(before) {
            return Err(Error::UnknownLinkTarget {
                target: before.to_string(),
            });
        }
        if !self.targets.contains(after) {
            return Err(Error::UnknownLinkTarget {
                target: after.to_string(),
            });
        }
        let edge = (before.to_string(), after.to_string());
        if !self.ordering_edges.contains(&edge) {
            self.ordering_edges.push(edge);
        }
        Ok(())
    }

    fn add_private_link(&mut self, from: &str, to: &str) -> Result<()> {
        let link = (from.to_string(), to.to_string());
        if !self.private_links.contains(&link) {
            self.private_links.push(link);
        }
        Ok(())
    }
}

/// File-backed graph used by the CLI: loads an existing plan if present so
/// repeated configure runs observe previously declared targets.
#[derive(Debug)]
pub struct JsonBuildGraph {
    path: PathBuf,
    inner: MemoryBuildGraph,
}

impl JsonBuildGraph {
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let inner = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("failed to read plan file {:?}", path))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("failed to parse plan file {:?}", path))?
        } else {
            MemoryBuildGraph::new()
        };
        Ok(Self { path, inner })
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create plan directory {:?}", parent))?;
        }
        let contents =
            serde_json::to_string_pretty(&self.inner).context("failed to encode plan")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write plan file {:?}", self.path))?;
        Ok(())
    }

    pub fn graph(&self) -> &MemoryBuildGraph {
        &self.inner
    }
}

impl BuildGraph for JsonBuildGraph {
    fn has_target(&self, name: &str) -> bool {
        self.inner.has_target(name)
    }

    fn add_generation_step(&mut self, step: GenerationStep) -> Result<()> {
        self.inner.add_generation_step(step)
    }

    fn add_static_library(&mut self, lib: StaticLibrary) -> Result<()> {
        self.inner.add_static_library(lib)
    }

    fn add_ordering_edge(&mut self, before: &str, after: &str) -> Result<()> {
        self.inner.add_ordering_edge(before, after)
    }

    fn add_private_link(&mut self, from: &str, to: &str) -> Result<()> {
        self.inner.add_private_link(from, to)
    }
}

/// Declare the generation step and the library, wire the ordering edge and
/// the caller link edges, and create placeholder output files.
///
/// Placeholders are created only when absent: a later configure run must not
/// wipe content produced by an earlier build.
pub fn wire(request: &ValidatedRequest, params: &RenderParams, graph: &mut dyn BuildGraph) -> Result<()> {
    let step_name = format!("{}-generate", request.name);

    create_placeholder(&params.header_out)?;
    create_placeholder(&params.source_out)?;

    graph.add_generation_step(GenerationStep {
        name: step_name.clone(),
        command: vec![
            "buildmeta".to_string(),
            "generate".to_string(),
            "--params".to_string(),
            params.params_path.to_string_lossy().into_owned(),
        ],
        inputs: vec![
            params.header_template.clone(),
            params.source_template.clone(),
        ],
        outputs: vec![params.header_out.clone(), params.source_out.clone()],
        always_run: true,
    })?;

    // The header is exposed at two nesting depths so callers may include
    // either "<name>.h" or "<name>/<name>.h".
    let include_root = params.include_dir.clone();
    let include_nested = include_root.join(&request.name);
    graph.add_static_library(StaticLibrary {
        name: request.name.clone(),
        sources: vec![params.header_out.clone(), params.source_out.clone()],
        include_dirs: vec![include_root, include_nested],
    })?;

    graph.add_ordering_edge(&step_name, &request.name)?;

    for target in &request.link_targets {
        graph.add_private_link(target, &request.name)?;
    }

    tracing::info!(
        artifact = %request.name,
        step = %step_name,
        language = %request.language,
        "build graph wired"
    );
    Ok(())
}

fn create_placeholder(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::write(path, "").map_err(|e| Error::io(path, e))
}
