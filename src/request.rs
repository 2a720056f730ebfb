//! Generation requests and eager validation.
//!
//! All validation happens here, at configuration time, before any build-graph
//! wiring. The deferred phase trusts the baked parameter record and
//! re-validates nothing. Fatal conditions surface as [`Error`]; tolerated
//! conditions (name collisions, unrecognized extra arguments) are collected
//! in a [`ValidationReport`] and logged.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::{AmbientContext, Language};
use crate::error::{Error, Result};
use crate::gitinfo;
use crate::graph::BuildGraph;

static IDENTIFIER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"));

/// Severity of a collected validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationSeverity {
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: ValidationSeverity,
    pub message: String,
}

/// Non-fatal findings produced while validating a request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn add_warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.issues.push(ValidationIssue {
            severity: ValidationSeverity::Warning,
            message,
        });
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == ValidationSeverity::Warning)
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }
}

/// Raw caller input to the pipeline, prior to validation.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub name: String,
    pub link_targets: Vec<String>,
    pub namespace: Vec<String>,
    pub language: Option<Language>,
    pub worktree: Option<PathBuf>,
    pub project_name: Option<String>,
    pub project_version: Option<String>,
    pub extra_args: Vec<String>,
}

/// A validated, fully resolved request.
///
/// Once constructed this is immutable and, together with the ambient
/// context, fully determines every derived string in the artifact pair.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub name: String,
    pub link_targets: Vec<String>,
    pub namespace: Vec<String>,
    pub language: Language,
    pub worktree: Option<PathBuf>,
    pub project_name: String,
    pub project_version: String,
    pub report: ValidationReport,
}

impl GenerationRequest {
    /// Run every configuration-time check, in order, failing fast on the
    /// first fatal violation.
    pub fn validate(
        self,
        ctx: &AmbientContext,
        graph: &dyn BuildGraph,
    ) -> Result<ValidatedRequest> {
        let mut report = ValidationReport::default();

        // (a) artifact name: required; collision is tolerated so the caller
        // may re-invoke the pipeline idempotently.
        if self.name.is_empty() {
            return Err(Error::MissingArtifactName);
        }
        require_identifier(&self.name)?;
        if graph.has_target(&self.name) {
            report.add_warning(format!(
                "target '{}' already exists in the build graph; redeclaring",
                self.name
            ));
        }

        // (b) namespace identifier syntax.
        for ident in &self.namespace {
            require_identifier(ident)?;
        }

        // (c) every link target must already exist.
        for target in &self.link_targets {
            if !graph.has_target(target) {
                return Err(Error::UnknownLinkTarget {
                    target: target.clone(),
                });
            }
        }

        // (d) the working tree, if supplied, must exist and resolve to a
        // repository root right now; the deferred phase will not re-check.
        if let Some(worktree) = &self.worktree {
            if !worktree.exists() {
                return Err(Error::WorktreeMissing {
                    path: worktree.clone(),
                });
            }
            gitinfo::repository_root(worktree)?;
        }

        // (e) language tag: already constrained by the enum; default to the
        // richer mode.
        let language = self.language.unwrap_or(Language::Cxx);

        // (f) the selected language's compiler must have been resolved by
        // the host build system.
        if ctx.compiler_id.is_empty() {
            return Err(Error::CompilerUnavailable {
                language: language.to_string(),
            });
        }

        // Unknown input is tolerated, not rejected.
        for arg in &self.extra_args {
            report.add_warning(format!("ignoring unrecognized argument '{arg}'"));
        }

        Ok(ValidatedRequest {
            name: self.name,
            link_targets: self.link_targets,
            namespace: self.namespace,
            language,
            worktree: self.worktree,
            project_name: self
                .project_name
                .unwrap_or_else(|| ctx.project_name.clone()),
            project_version: self
                .project_version
                .unwrap_or_else(|| ctx.project_version.clone()),
            report,
        })
    }
}

fn require_identifier(ident: &str) -> Result<()> {
    if IDENTIFIER_PATTERN.is_match(ident) {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier {
            ident: ident.to_string(),
        })
    }
}
