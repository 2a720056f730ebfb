//! Namespace composition.
//!
//! From an ordered list of identifiers this derives the four scoping strings
//! the templates consume: a flat underscore access prefix for C, and
//! scope-opening/closing/resolution strings for C++. All four are always
//! computed so either template can consume the spec uniformly.

use serde::{Deserialize, Serialize};

/// Identifier used when the caller supplies no namespace at all.
pub const DEFAULT_NAMESPACE: &str = "buildmeta";

/// Language-specific scoping strings derived from a namespace identifier list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceSpec {
    /// `A_B_` — flat accessor prefix for the C naming scheme.
    pub access_prefix: String,
    /// `namespace A { namespace B {`
    pub scope_open: String,
    /// Matching closing braces in reverse order, annotated per level.
    pub scope_close: String,
    /// `A::B::` — fully qualified access path.
    pub scope_resolution: String,
}

impl NamespaceSpec {
    /// Compose scoping strings from `idents`.
    ///
    /// An empty list falls back to [`DEFAULT_NAMESPACE`]. Identifiers are
    /// assumed to be pre-validated; composition itself never fails.
    pub fn compose(idents: &[String]) -> Self {
        let fallback = [DEFAULT_NAMESPACE.to_string()];
        let idents: &[String] = if idents.is_empty() { &fallback } else { idents };

        let root = &idents[0];
        let mut access_prefix = format!("{root}_");
        let mut scope_open = format!("namespace {root} {{");
        let mut scope_close = format!("}} // namespace {root}");
        let mut scope_resolution = format!("{root}::");

        for ident in &idents[1..] {
            access_prefix.push_str(&format!("{ident}_"));
            scope_open.push_str(&format!(" namespace {ident} {{"));
            scope_close = format!("}} // namespace {ident}\n{scope_close}");
            scope_resolution.push_str(&format!("{ident}::"));
        }

        Self {
            access_prefix,
            scope_open,
            scope_close,
            scope_resolution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compose(idents: &[&str]) -> NamespaceSpec {
        let idents: Vec<String> = idents.iter().map(|s| s.to_string()).collect();
        NamespaceSpec::compose(&idents)
    }

    #[test]
    fn single_identifier_produces_one_scope_level() {
        let spec = compose(&["QrX"]);
        assert_eq!(spec.access_prefix, "QrX_");
        assert_eq!(spec.scope_open, "namespace QrX {");
        assert_eq!(spec.scope_close, "} // namespace QrX");
        assert_eq!(spec.scope_resolution, "QrX::");
    }

    #[test]
    fn nested_identifiers_close_in_reverse_order() {
        let spec = compose(&["QrX", "WdZ"]);
        assert_eq!(spec.access_prefix, "QrX_WdZ_");
        assert_eq!(spec.scope_open, "namespace QrX { namespace WdZ {");
        assert_eq!(spec.scope_close, "} // namespace WdZ\n} // namespace QrX");
        assert_eq!(spec.scope_resolution, "QrX::WdZ::");
    }

    #[test]
    fn empty_list_uses_fallback_namespace() {
        let spec = NamespaceSpec::compose(&[]);
        assert_eq!(spec.access_prefix, format!("{DEFAULT_NAMESPACE}_"));
        assert_eq!(spec.scope_resolution, format!("{DEFAULT_NAMESPACE}::"));
    }

    #[test]
    fn open_and_close_token_counts_match() {
        let spec = compose(&["a", "b", "c", "d"]);
        assert_eq!(
            spec.scope_open.matches('{').count(),
            spec.scope_close.matches('}').count()
        );
        assert_eq!(spec.scope_resolution.matches("::").count(), 4);
    }
}
