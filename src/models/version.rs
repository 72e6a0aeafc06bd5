//! Canonical version representation shared by all naming schemes

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Structured version information for a release.
///
/// `semver` is always derived from the structured fields, never taken from
/// the raw input, so two versions with identical fields render identically.
/// `openjdk_version` preserves the raw version substring as published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionData {
    pub major: u32,
    pub minor: u32,
    pub security: u32,
    pub pre: Option<String>,
    pub adopt_build_number: Option<u32>,
    pub semver: String,
    pub openjdk_version: String,
    pub build: u32,
    pub optional: Option<String>,
}

impl VersionData {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        major: u32,
        minor: u32,
        security: u32,
        pre: Option<String>,
        adopt_build_number: Option<u32>,
        build: u32,
        optional: Option<String>,
        openjdk_version: String,
    ) -> Self {
        let semver = form_semver(
            major,
            minor,
            security,
            pre.as_deref(),
            adopt_build_number,
            build,
            optional.as_deref(),
        );
        Self {
            major,
            minor,
            security,
            pre,
            adopt_build_number,
            semver,
            openjdk_version,
            build,
            optional,
        }
    }

    /// Total order over the structured fields, used for range matching.
    ///
    /// A version without a pre-release tag ranks above the same version with
    /// one. The derived strings do not participate in the comparison.
    pub fn compare(&self, other: &VersionData) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.security.cmp(&other.security))
            .then(compare_pre(self.pre.as_deref(), other.pre.as_deref()))
            .then(self.build.cmp(&other.build))
            .then(
                self.adopt_build_number
                    .unwrap_or(0)
                    .cmp(&other.adopt_build_number.unwrap_or(0)),
            )
            .then_with(|| self.optional.cmp(&other.optional))
    }
}

fn compare_pre(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(b),
    }
}

/// Renders the canonical semver string.
///
/// The build-metadata segment after `+` is `build[.adopt][.optional]`; a
/// structurally absent build (0) is omitted rather than rendered, and the
/// whole segment disappears when every part is absent.
fn form_semver(
    major: u32,
    minor: u32,
    security: u32,
    pre: Option<&str>,
    adopt_build_number: Option<u32>,
    build: u32,
    optional: Option<&str>,
) -> String {
    let mut semver = format!("{major}.{minor}.{security}");

    if let Some(pre) = pre {
        semver.push('-');
        semver.push_str(pre);
    }

    let mut metadata: Vec<String> = Vec::new();
    if build != 0 {
        metadata.push(build.to_string());
    }
    if let Some(adopt) = adopt_build_number {
        metadata.push(adopt.to_string());
    }
    if let Some(optional) = optional {
        metadata.push(optional.to_string());
    }

    if !metadata.is_empty() {
        semver.push('+');
        semver.push_str(&metadata.join("."));
    }

    semver
}
