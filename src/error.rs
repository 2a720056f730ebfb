//! Error handling for the metadata generation pipeline.
//!
//! Errors split along the two-phase boundary: configuration errors abort
//! before any build-graph wiring has happened, build errors fail the
//! deferred generation step. Non-fatal conditions (target-name collisions,
//! unrecognized arguments, a dirty working tree) are not errors at all;
//! they travel through the [`ValidationReport`](crate::request::ValidationReport)
//! or the build log.

use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("artifact name is required and may not be empty")]
    MissingArtifactName,

    #[error("'{ident}' is not a valid identifier (expected [A-Za-z_][A-Za-z0-9_]*)")]
    InvalidIdentifier { ident: String },

    #[error("link target '{target}' does not exist in the build graph")]
    UnknownLinkTarget { target: String },

    #[error("working tree {path:?} does not exist")]
    WorktreeMissing { path: PathBuf },

    #[error("{path:?} is not inside a git repository: {reason}")]
    NotARepository { path: PathBuf, reason: String },

    #[error("unknown target language '{tag}' (expected 'c' or 'cxx')")]
    UnknownLanguage { tag: String },

    #[error("no {language} compiler was resolved by the host build system")]
    CompilerUnavailable { language: String },

    #[error("git executable could not be launched: {source}")]
    GitUnavailable {
        #[source]
        source: std::io::Error,
    },

    #[error("git {args:?} failed: {stderr}")]
    GitCommandFailed { args: Vec<String>, stderr: String },

    #[error("template file {path:?} is missing")]
    TemplateMissing { path: PathBuf },

    #[error("template rendering failed: {source}")]
    Render {
        #[from]
        source: tera::Error,
    },

    #[error("parameter record {path:?} could not be decoded: {reason}")]
    MalformedParams { path: PathBuf, reason: String },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Phase in which this error is raised, for log routing.
    pub fn phase(&self) -> Phase {
        match self {
            Error::MissingArtifactName
            | Error::InvalidIdentifier { .. }
            | Error::UnknownLinkTarget { .. }
            | Error::WorktreeMissing { .. }
            | Error::NotARepository { .. }
            | Error::UnknownLanguage { .. }
            | Error::CompilerUnavailable { .. } => Phase::Configure,
            Error::GitUnavailable { .. }
            | Error::GitCommandFailed { .. }
            | Error::TemplateMissing { .. }
            | Error::Render { .. }
            | Error::MalformedParams { .. }
            | Error::Io { .. } => Phase::Build,
        }
    }
}

/// The pipeline phase an error belongs to.
///
/// `Configure` errors abort before any artifact is declared; `Build` errors
/// fail the deferred generation step so a half-populated artifact is never
/// linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Configure,
    Build,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Configure => write!(f, "configure"),
            Phase::Build => write!(f, "build"),
        }
    }
}
