//! buildmeta — bakes project and source-control metadata into linkable
//! C/C++ constants.
//!
//! The pipeline runs in two phases with a strict data contract between them:
//!
//! ```text
//! configure: validate -> derive (version, namespace) -> bake params -> wire graph
//! generate:  load params -> query git -> render templates -> overwrite outputs
//! ```
//!
//! The configure phase runs once at build-graph setup; the generate phase is
//! re-executed on every build so the captured metadata stays fresh.

pub mod config;
pub mod error;
pub mod gitinfo;
pub mod graph;
pub mod logging;
pub mod namespace;
pub mod params;
pub mod render;
pub mod request;
pub mod version;

pub use config::{AmbientContext, Language};
pub use error::{Error, Phase, Result};
pub use gitinfo::GitSnapshot;
pub use graph::{BuildGraph, JsonBuildGraph, MemoryBuildGraph};
pub use logging::{LogFormat, init_logging};
pub use namespace::NamespaceSpec;
pub use params::RenderParams;
pub use request::{GenerationRequest, ValidatedRequest, ValidationReport};
pub use version::VersionSpec;

use std::path::Path;

/// Configuration phase: validate the request, resolve every derived string,
/// bake the parameter record and template files, create placeholder outputs
/// and wire the build graph.
///
/// Returns the baked record so callers can locate the deferred step's
/// parameter file.
pub fn run_configure(
    request: GenerationRequest,
    ctx: &AmbientContext,
    gen_dir: &Path,
    graph: &mut dyn BuildGraph,
) -> Result<RenderParams> {
    let validated = request.validate(ctx, graph)?;
    let params = RenderParams::bake(&validated, ctx, gen_dir);
    params.emit()?;
    graph::wire(&validated, &params, graph)?;

    tracing::info!(
        artifact = %params.artifact_name,
        warnings = validated.report.warning_count(),
        "configuration complete"
    );
    Ok(params)
}

/// Deferred build-time phase: a pure function from the baked record plus
/// freshly observed git state to the two output files.
///
/// Trusts the record completely; any external failure (git, missing
/// template) fails the build step rather than emitting partial metadata.
pub fn run_generate(params_path: &Path) -> Result<()> {
    let params = RenderParams::load(params_path)?;
    let renderer = render::TemplateRenderer::from_params(&params)?;

    let snapshot = match &params.worktree {
        Some(worktree) => Some(gitinfo::collect(worktree)?),
        None => None,
    };

    let rendered = renderer.render(&params, snapshot.as_ref())?;
    render::write_atomic(&params.header_out, &rendered.header)?;
    render::write_atomic(&params.source_out, &rendered.source)?;

    tracing::info!(
        header = %params.header_out.display(),
        source = %params.source_out.display(),
        git = snapshot.is_some(),
        "metadata artifacts regenerated"
    );
    Ok(())
}
