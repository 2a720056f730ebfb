//! Tests for namespace composition across both naming schemes.

use buildmeta::NamespaceSpec;
use buildmeta::namespace::DEFAULT_NAMESPACE;
use proptest::prelude::*;

fn compose(idents: &[&str]) -> NamespaceSpec {
    let idents: Vec<String> = idents.iter().map(|s| s.to_string()).collect();
    NamespaceSpec::compose(&idents)
}

#[test]
fn two_level_namespace_matches_both_schemes() {
    let spec = compose(&["QrX", "WdZ"]);

    assert_eq!(spec.access_prefix, "QrX_WdZ_");
    assert_eq!(spec.scope_open, "namespace QrX { namespace WdZ {");
    assert_eq!(spec.scope_close, "} // namespace WdZ\n} // namespace QrX");
    assert_eq!(spec.scope_resolution, "QrX::WdZ::");
}

#[test]
fn closing_annotations_appear_innermost_first() {
    let spec = compose(&["outer", "mid", "inner"]);
    let lines: Vec<&str> = spec.scope_close.lines().collect();
    assert_eq!(
        lines,
        vec![
            "} // namespace inner",
            "} // namespace mid",
            "} // namespace outer",
        ]
    );
}

#[test]
fn empty_list_substitutes_the_default_identifier() {
    let spec = NamespaceSpec::compose(&[]);
    assert_eq!(spec.scope_open, format!("namespace {DEFAULT_NAMESPACE} {{"));
    assert_eq!(spec.access_prefix, format!("{DEFAULT_NAMESPACE}_"));
}

proptest! {
    /// Opening and closing strings always contain the same number of scope
    /// tokens, and the resolution string has one segment per identifier.
    #[test]
    fn scope_tokens_balance(idents in proptest::collection::vec("[A-Za-z_][A-Za-z0-9_]{0,7}", 1..6)) {
        let spec = NamespaceSpec::compose(&idents);

        let opens = spec.scope_open.matches('{').count();
        let closes = spec.scope_close.matches('}').count();
        prop_assert_eq!(opens, idents.len());
        prop_assert_eq!(closes, idents.len());
        prop_assert_eq!(spec.scope_resolution.matches("::").count(), idents.len());
        prop_assert!(spec.access_prefix.matches('_').count() >= idents.len());
        prop_assert!(spec.access_prefix.ends_with('_'));
    }
}
