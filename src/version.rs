//! Version string decomposition.
//!
//! A raw version string is split into up to four components following the
//! grammar `major[.minor[.patch[(.|-)tweak]]]`. Optionality is strictly
//! nested left to right: a component is only populated when everything to
//! its left matched. Trailing text beyond the matched portion is ignored
//! rather than rejected, so `"1.2.3+build5"` parses the same as `"1.2.3"`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static VERSION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+)(?:\.([0-9]+)(?:\.([0-9]+)(?:[.-]([0-9A-Za-z]+))?)?)?")
        .expect("version pattern is valid")
});

/// The decomposed components of a version string.
///
/// Absent components are empty strings, never placeholders, so templates can
/// substitute them verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSpec {
    pub major: String,
    pub minor: String,
    pub patch: String,
    pub tweak: String,
}

impl VersionSpec {
    /// Decompose `raw` into version components.
    ///
    /// A string that does not start with a digit run yields all-empty
    /// components; that is not an error since the version may be an
    /// arbitrary ambient project value.
    pub fn parse(raw: &str) -> Self {
        let Some(caps) = VERSION_PATTERN.captures(raw) else {
            return Self::default();
        };
        let group = |i: usize| {
            caps.get(i)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default()
        };
        Self {
            major: group(1),
            minor: group(2),
            patch: group(3),
            tweak: group(4),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_only_is_legal() {
        let spec = VersionSpec::parse("7");
        assert_eq!(spec.major, "7");
        assert_eq!(spec.minor, "");
        assert_eq!(spec.patch, "");
        assert_eq!(spec.tweak, "");
    }

    #[test]
    fn full_version_with_dot_tweak() {
        let spec = VersionSpec::parse("1.2.3.rc1");
        assert_eq!(
            spec,
            VersionSpec {
                major: "1".into(),
                minor: "2".into(),
                patch: "3".into(),
                tweak: "rc1".into(),
            }
        );
    }

    #[test]
    fn hyphen_separates_tweak() {
        let spec = VersionSpec::parse("1.2.3-beta");
        assert_eq!(spec.tweak, "beta");
    }

    #[test]
    fn trailing_garbage_is_ignored() {
        let spec = VersionSpec::parse("1.2.3+build.5");
        assert_eq!(spec.patch, "3");
        assert_eq!(spec.tweak, "");
    }

    #[test]
    fn non_numeric_input_yields_empty_components() {
        assert_eq!(VersionSpec::parse("snapshot"), VersionSpec::default());
        assert_eq!(VersionSpec::parse(""), VersionSpec::default());
    }
}
