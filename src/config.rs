//! CLI surface and ambient build context.
//!
//! The ambient context carries the host-resolved values the pipeline falls
//! back to (project name/version) or embeds verbatim (compiler identity,
//! processor, build configuration). It is an explicit read-only record passed
//! into validation rather than hidden global state, so tests can supply
//! arbitrary fallback values.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Target language for the generated artifact pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Flat underscore-prefixed constant names, `const char*` bindings.
    C,
    /// Nested-namespace constant names, `bool` for the dirty flag.
    #[value(alias = "c++", alias = "cpp")]
    #[serde(alias = "c++", alias = "cpp")]
    Cxx,
}

impl Language {
    /// Parse a language tag coming from a context file or baked record.
    pub fn from_tag(tag: &str) -> Result<Self, Error> {
        match tag.to_ascii_lowercase().as_str() {
            "c" => Ok(Language::C),
            "cxx" | "c++" | "cpp" => Ok(Language::Cxx),
            _ => Err(Error::UnknownLanguage {
                tag: tag.to_string(),
            }),
        }
    }

    pub fn header_extension(&self) -> &'static str {
        "h"
    }

    pub fn source_extension(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cxx => "cpp",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::C => write!(f, "c"),
            Language::Cxx => write!(f, "cxx"),
        }
    }
}

/// Host-resolved ambient values consumed by validation and rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AmbientContext {
    pub project_name: String,
    pub project_version: String,
    pub compiler_id: String,
    pub compiler_version: String,
    pub system_processor: String,
    pub build_config: String,
}

impl AmbientContext {
    /// Merge CLI-supplied values over an optional context file.
    ///
    /// CLI flags win; the file fills the gaps; anything still unset stays an
    /// empty string and is caught by validation where it matters (compiler
    /// identity) or rendered verbatim where it does not.
    pub fn resolve(cli: &ContextArgs) -> Result<Self> {
        let file = match cli.context.as_deref() {
            Some(path) => load_context_file(path)?,
            None => PartialContext::default(),
        };

        Ok(Self {
            project_name: cli
                .ambient_project_name
                .clone()
                .or(file.project_name)
                .unwrap_or_default(),
            project_version: cli
                .ambient_project_version
                .clone()
                .or(file.project_version)
                .unwrap_or_default(),
            compiler_id: cli.compiler_id.clone().or(file.compiler_id).unwrap_or_default(),
            compiler_version: cli
                .compiler_version
                .clone()
                .or(file.compiler_version)
                .unwrap_or_default(),
            system_processor: cli
                .system_processor
                .clone()
                .or(file.system_processor)
                .unwrap_or_default(),
            build_config: cli
                .build_config
                .clone()
                .or(file.build_config)
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct PartialContext {
    project_name: Option<String>,
    project_version: Option<String>,
    compiler_id: Option<String>,
    compiler_version: Option<String>,
    system_processor: Option<String>,
    build_config: Option<String>,
}

fn load_context_file(path: &Path) -> Result<PartialContext> {
    if !path.exists() {
        anyhow::bail!("context file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read context file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML context {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON context {:?}", path))?,
        other => anyhow::bail!("unsupported context file extension: {other}"),
    };
    Ok(parsed)
}

#[derive(Parser, Debug)]
#[command(
    name = "buildmeta",
    about = "Bakes project and git metadata into linkable C/C++ constants",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a generation request and wire the build-graph plan.
    Configure(ConfigureArgs),
    /// Deferred build-time phase: query git and render the artifact pair.
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
pub struct ConfigureArgs {
    #[arg(long, value_name = "NAME", help = "Name of the metadata library artifact")]
    pub name: String,

    #[arg(
        long = "link-target",
        value_name = "TARGET",
        help = "Existing build target that should privately link the metadata library"
    )]
    pub link_targets: Vec<String>,

    #[arg(
        long,
        value_name = "IDENT",
        value_delimiter = ',',
        help = "Ordered namespace identifiers for the generated constants"
    )]
    pub namespace: Vec<String>,

    #[arg(long, value_enum, value_name = "LANG", help = "Target language (default cxx)")]
    pub language: Option<Language>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Git working tree to snapshot at build time"
    )]
    pub worktree: Option<PathBuf>,

    #[arg(long, value_name = "NAME", help = "Project name override")]
    pub project_name: Option<String>,

    #[arg(long, value_name = "VERSION", help = "Project version override")]
    pub project_version: Option<String>,

    #[arg(
        long,
        env = "BUILDMETA_GEN_DIR",
        value_name = "DIR",
        default_value = "buildmeta-gen",
        help = "Directory receiving baked parameters, templates and outputs"
    )]
    pub gen_dir: PathBuf,

    #[arg(
        long,
        value_name = "FILE",
        help = "Build-graph plan file (defaults to <gen-dir>/plan.json)"
    )]
    pub plan: Option<PathBuf>,

    #[command(flatten)]
    pub context: ContextArgs,

    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        hide = true,
        help = "Unrecognized extra arguments (tolerated with a warning)"
    )]
    pub extra: Vec<String>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[arg(long, value_name = "FILE", help = "Baked parameter record from the configure phase")]
    pub params: PathBuf,
}

/// Ambient values, individually overridable from the command line or taken
/// from a YAML/JSON context file.
#[derive(Args, Debug, Default)]
pub struct ContextArgs {
    #[arg(long, value_name = "FILE", help = "YAML or JSON ambient context file")]
    pub context: Option<PathBuf>,

    #[arg(long, env = "BUILDMETA_PROJECT_NAME", value_name = "NAME", hide = true)]
    pub ambient_project_name: Option<String>,

    #[arg(long, env = "BUILDMETA_PROJECT_VERSION", value_name = "VERSION", hide = true)]
    pub ambient_project_version: Option<String>,

    #[arg(long, env = "BUILDMETA_COMPILER_ID", value_name = "ID")]
    pub compiler_id: Option<String>,

    #[arg(long, env = "BUILDMETA_COMPILER_VERSION", value_name = "VERSION")]
    pub compiler_version: Option<String>,

    #[arg(long, env = "BUILDMETA_SYSTEM_PROCESSOR", value_name = "ARCH")]
    pub system_processor: Option<String>,

    #[arg(long, env = "BUILDMETA_BUILD_CONFIG", value_name = "CONFIG")]
    pub build_config: Option<String>,
}
