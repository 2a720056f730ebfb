//! Build-time template rendering.
//!
//! Both artifacts are rendered fully in memory before anything touches the
//! output paths, and writes go through a temp-file-then-persist step, so an
//! artifact is never observable in a partially written state. Substitution
//! is verbatim apart from quoting for the target language's string-literal
//! syntax. Git-derived bindings are structurally optional fragments: when no
//! working tree was supplied they are omitted as whole blocks, never filled
//! with placeholder values.

use std::fs;
use std::io::Write;
use std::path::Path;

use tera::Tera;

use crate::config::Language;
use crate::error::{Error, Result};
use crate::gitinfo::GitSnapshot;
use crate::params::RenderParams;

const C_HEADER_TEMPLATE: &str = include_str!("../templates/c_header.tera");
const C_SOURCE_TEMPLATE: &str = include_str!("../templates/c_source.tera");
const CXX_HEADER_TEMPLATE: &str = include_str!("../templates/cxx_header.tera");
const CXX_SOURCE_TEMPLATE: &str = include_str!("../templates/cxx_source.tera");

const HEADER_TEMPLATE_NAME: &str = "header";
const SOURCE_TEMPLATE_NAME: &str = "source";

/// Embedded template pair (header, source) for a language, materialized as
/// files by the configure phase.
pub fn template_sources(language: Language) -> (&'static str, &'static str) {
    match language {
        Language::C => (C_HEADER_TEMPLATE, C_SOURCE_TEMPLATE),
        Language::Cxx => (CXX_HEADER_TEMPLATE, CXX_SOURCE_TEMPLATE),
    }
}

/// The fully rendered artifact pair, held in memory until both are complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPair {
    pub header: String,
    pub source: String,
}

pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Load the template pair from the files the configure phase declared as
    /// step inputs. A missing template fails the build step.
    pub fn from_params(params: &RenderParams) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        for (name, path) in [
            (HEADER_TEMPLATE_NAME, &params.header_template),
            (SOURCE_TEMPLATE_NAME, &params.source_template),
        ] {
            if !path.exists() {
                return Err(Error::TemplateMissing { path: path.clone() });
            }
            let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
            tera.add_raw_template(name, &contents)?;
        }
        Ok(Self { tera })
    }

    pub fn render(
        &self,
        params: &RenderParams,
        git: Option<&GitSnapshot>,
    ) -> Result<RenderedPair> {
        let context = build_context(params, git);
        let header = self.tera.render(HEADER_TEMPLATE_NAME, &context)?;
        let source = self.tera.render(SOURCE_TEMPLATE_NAME, &context)?;
        Ok(RenderedPair { header, source })
    }
}

/// Human-readable multi-line summary for a caller's `--version` output.
pub fn version_summary(params: &RenderParams, git: Option<&GitSnapshot>) -> String {
    let mut summary = format!(
        "{} {} ({}, {})\ncompiler: {} {}",
        params.project_name,
        params.project_version,
        params.build_config,
        params.system_processor,
        params.compiler_id,
        params.compiler_version,
    );
    if let Some(snapshot) = git {
        let dirty_marker = if snapshot.dirty { "-dirty" } else { "" };
        summary.push_str(&format!(
            "\ncommit: {}{} ({} <{}>, {})",
            snapshot.commit_hash,
            dirty_marker,
            snapshot.committer_name,
            snapshot.committer_email,
            snapshot.commit_date,
        ));
    }
    summary
}

fn build_context(params: &RenderParams, git: Option<&GitSnapshot>) -> tera::Context {
    let mut ctx = tera::Context::new();
    ctx.insert("artifact_name", &params.artifact_name);
    ctx.insert("header_include", &params.header_include());
    ctx.insert("prefix", &params.namespace.access_prefix);
    ctx.insert("scope_open", &params.namespace.scope_open);
    ctx.insert("scope_close", &params.namespace.scope_close);

    ctx.insert("project_name", &c_string_escape(&params.project_name));
    ctx.insert("project_version", &c_string_escape(&params.project_version));
    ctx.insert("version_major", &c_string_escape(&params.version.major));
    ctx.insert("version_minor", &c_string_escape(&params.version.minor));
    ctx.insert("version_patch", &c_string_escape(&params.version.patch));
    ctx.insert("version_tweak", &c_string_escape(&params.version.tweak));
    ctx.insert("compiler_id", &c_string_escape(&params.compiler_id));
    ctx.insert("compiler_version", &c_string_escape(&params.compiler_version));
    ctx.insert("system_processor", &c_string_escape(&params.system_processor));
    ctx.insert("build_config", &c_string_escape(&params.build_config));
    ctx.insert(
        "version_summary",
        &c_string_escape(&version_summary(params, git)),
    );

    ctx.insert("git", &git.is_some());
    if let Some(snapshot) = git {
        let dirty_literal = match (params.language, snapshot.dirty) {
            (Language::Cxx, true) => "true",
            (Language::Cxx, false) => "false",
            (Language::C, true) => "1",
            (Language::C, false) => "0",
        };
        ctx.insert("git_dirty", dirty_literal);
        ctx.insert("git_hash", &c_string_escape(&snapshot.commit_hash));
        ctx.insert("git_date", &c_string_escape(&snapshot.commit_date));
        ctx.insert(
            "git_committer_name",
            &c_string_escape(&snapshot.committer_name),
        );
        ctx.insert(
            "git_committer_email",
            &c_string_escape(&snapshot.committer_email),
        );
    }
    ctx
}

/// Quote a value for a C/C++ string literal. The only transformation applied
/// to substituted values.
fn c_string_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Write `contents` next to `path` and atomically move it into place.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| Error::io(parent, e))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| Error::io(path, e))?;
    tmp.persist(path)
        .map_err(|e| Error::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes_backslashes_and_newlines() {
        assert_eq!(c_string_escape(r#"a"b\c"#), r#"a\"b\\c"#);
        assert_eq!(c_string_escape("line1\nline2"), "line1\\nline2");
    }

    #[test]
    fn summary_without_git_has_no_commit_line() {
        let params = crate::params::RenderParams {
            artifact_name: "meta".into(),
            language: Language::Cxx,
            project_name: "proj".into(),
            project_version: "1.0".into(),
            version: crate::version::VersionSpec::parse("1.0"),
            namespace: crate::namespace::NamespaceSpec::compose(&[]),
            compiler_id: "GNU".into(),
            compiler_version: "13.2".into(),
            system_processor: "x86_64".into(),
            build_config: "Debug".into(),
            worktree: None,
            params_path: "params.json".into(),
            header_template: "h.tera".into(),
            source_template: "s.tera".into(),
            include_dir: "include".into(),
            header_out: "meta.h".into(),
            source_out: "meta.cpp".into(),
        };
        let summary = version_summary(&params, None);
        assert!(summary.contains("proj 1.0 (Debug, x86_64)"));
        assert!(!summary.contains("commit:"));
    }
}
