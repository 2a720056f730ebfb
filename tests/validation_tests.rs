//! Tests for configuration-time request validation.
//!
//! Fatal checks fail fast with a distinct error; tolerated conditions land
//! in the validation report as warnings.

use assert_matches::assert_matches;
use buildmeta::{AmbientContext, Error, GenerationRequest, Language, MemoryBuildGraph, Phase};

fn ambient() -> AmbientContext {
    AmbientContext {
        project_name: "ambient-proj".into(),
        project_version: "9.8.7".into(),
        compiler_id: "GNU".into(),
        compiler_version: "13.2.0".into(),
        system_processor: "x86_64".into(),
        build_config: "Release".into(),
    }
}

fn request(name: &str) -> GenerationRequest {
    GenerationRequest {
        name: name.into(),
        ..Default::default()
    }
}

#[test]
fn empty_artifact_name_is_fatal() {
    let graph = MemoryBuildGraph::new();
    let err = request("").validate(&ambient(), &graph).unwrap_err();
    assert_matches!(err, Error::MissingArtifactName);
    assert_eq!(err.phase(), Phase::Configure);
}

#[test]
fn artifact_name_must_be_an_identifier() {
    let graph = MemoryBuildGraph::new();
    let err = request("my-lib!").validate(&ambient(), &graph).unwrap_err();
    assert_matches!(err, Error::InvalidIdentifier { .. });
}

#[test]
fn invalid_namespace_identifier_is_fatal() {
    let graph = MemoryBuildGraph::new();
    let mut req = request("meta");
    req.namespace = vec!["ok".into(), "1bad".into()];
    let err = req.validate(&ambient(), &graph).unwrap_err();
    assert_matches!(err, Error::InvalidIdentifier { ident } if ident == "1bad");
}

#[test]
fn unknown_link_target_is_fatal() {
    let graph = MemoryBuildGraph::new();
    let mut req = request("meta");
    req.link_targets = vec!["app".into()];
    let err = req.validate(&ambient(), &graph).unwrap_err();
    assert_matches!(err, Error::UnknownLinkTarget { target } if target == "app");
}

#[test]
fn existing_link_target_passes() {
    let mut graph = MemoryBuildGraph::new();
    graph.seed_target("app");
    let mut req = request("meta");
    req.link_targets = vec!["app".into()];
    let validated = req.validate(&ambient(), &graph).unwrap();
    assert_eq!(validated.link_targets, vec!["app".to_string()]);
}

#[test]
fn name_collision_is_a_warning_not_an_error() {
    let mut graph = MemoryBuildGraph::new();
    graph.seed_target("meta");
    let validated = request("meta").validate(&ambient(), &graph).unwrap();
    assert_eq!(validated.report.warning_count(), 1);
    assert!(
        validated
            .report
            .warnings()
            .any(|issue| issue.message.contains("already exists"))
    );
}

#[test]
fn unrecognized_extra_arguments_are_warnings() {
    let graph = MemoryBuildGraph::new();
    let mut req = request("meta");
    req.extra_args = vec!["--frobnicate".into(), "--legacy-mode".into()];
    let validated = req.validate(&ambient(), &graph).unwrap();
    assert_eq!(validated.report.warning_count(), 2);
}

#[test]
fn missing_compiler_is_fatal() {
    let graph = MemoryBuildGraph::new();
    let ctx = AmbientContext {
        compiler_id: String::new(),
        ..ambient()
    };
    let err = request("meta").validate(&ctx, &graph).unwrap_err();
    assert_matches!(err, Error::CompilerUnavailable { .. });
}

#[test]
fn missing_worktree_path_is_fatal() {
    let graph = MemoryBuildGraph::new();
    let mut req = request("meta");
    req.worktree = Some("/nonexistent/worktree/path".into());
    let err = req.validate(&ambient(), &graph).unwrap_err();
    assert_matches!(err, Error::WorktreeMissing { .. });
}

#[test]
fn language_defaults_to_the_richer_mode() {
    let graph = MemoryBuildGraph::new();
    let validated = request("meta").validate(&ambient(), &graph).unwrap();
    assert_eq!(validated.language, Language::Cxx);
}

#[test]
fn project_fields_fall_back_to_ambient_values() {
    let graph = MemoryBuildGraph::new();
    let validated = request("meta").validate(&ambient(), &graph).unwrap();
    assert_eq!(validated.project_name, "ambient-proj");
    assert_eq!(validated.project_version, "9.8.7");

    let mut overridden = request("meta");
    overridden.project_name = Some("explicit".into());
    overridden.project_version = Some("1.0".into());
    let validated = overridden.validate(&ambient(), &graph).unwrap();
    assert_eq!(validated.project_name, "explicit");
    assert_eq!(validated.project_version, "1.0");
}

#[test]
fn unknown_language_tag_is_rejected() {
    let err = Language::from_tag("fortran").unwrap_err();
    assert_matches!(err, Error::UnknownLanguage { tag } if tag == "fortran");
    assert_eq!(Language::from_tag("c++").unwrap(), Language::Cxx);
    assert_eq!(Language::from_tag("C").unwrap(), Language::C);
}
