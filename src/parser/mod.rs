//! Release name parsing
//!
//! The JDK version naming scheme changed with JEP 223; both the legacy
//! (`jdk8u222-b10`) and the current (`jdk-11.0.4+11.4`) forms remain in use
//! across the build repositories, alongside a few compact and nightly
//! variations. Patterns are tried in a fixed priority order and the first
//! match wins; unmatched numeric groups default to 0.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::models::VersionData;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unrecognised version string: {0}")]
    UnrecognisedVersion(String),

    #[error("invalid build number: {0}")]
    InvalidBuildNumber(String),

    #[error("invalid version range: {0}")]
    InvalidVersionRange(String),
}

// Legacy pre-JEP-223 forms. The `b<build>` token is mandatory here, e.g.
// "jdk8u222-b10" and the compact "8u222b10" used in asset names.
static LEGACY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"jdk-?(?P<version>(?P<major>[0-8]+)(?:u(?P<update>[0-9]+))?-b(?P<build>[0-9]+)(?:_(?P<opt>[-a-zA-Z0-9.]+))?)",
    )
    .expect("legacy version regex compiles")
});

static LEGACY_COMPACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<version>(?P<major>[0-8]+)u(?P<update>[0-9]+)b(?P<build>[0-9]+))")
        .expect("compact legacy version regex compiles")
});

// Alternate legacy form embedding a dotted "1.<major>.0_<update>" version,
// e.g. "1.8.0_202-internal-201903130451-b08". Build and timestamp tokens
// hide in the dash-separated tail.
static LEGACY_DOTTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<version>1\.(?P<major>[0-8])\.0(?:_(?P<update>[0-9]+))?(?:-(?P<additional>.*))?)")
        .expect("dotted legacy version regex compiles")
});

static DOTTED_BUILD_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^b(?P<build>[0-9]+)$").expect("build token regex compiles"));

static DOTTED_TIMESTAMP_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("timestamp token regex compiles"));

// Nightly tags carry a date-time instead of a build, e.g.
// "jdk13u-2019-10-30-23-10"; the date lands in the optional field.
static NIGHTLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<version>(?P<major>[0-9]+)u-(?P<opt>[0-9]{4}(?:-[0-9]{2}){4}))")
        .expect("nightly version regex compiles")
});

// GA tags occasionally drop the build entirely, e.g. "OpenJDK 8u212 GA Release".
static LEGACY_NO_BUILD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<version>(?P<major>[0-8]+)u(?P<update>[0-9]+))")
        .expect("buildless legacy version regex compiles")
});

// JEP 223 forms, three sub-variants tried in order: build present,
// pre-release without build, bare version with optional suffix. The
// standard allows arbitrarily many version numbers; three are supported.
const VNUM: &str = r"(?P<major>[0-9]+)(?:\.(?P<minor>[0-9]+))?(?:\.(?P<security>[0-9]+))?";
const PRE: &str = r"(?P<pre>[a-zA-Z0-9]+)";
const BUILD: &str = r"(?P<build>[0-9]+)(?:\.(?P<adopt>[0-9]+))?";
const OPT: &str = r"(?P<opt>[-a-zA-Z0-9.]+)";

static V223_BUILD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?:jdk-)?(?P<version>{VNUM}(?:-{PRE})?\+{BUILD}(?:-{OPT})?)"
    ))
    .expect("223 build regex compiles")
});

static V223_PRE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?:jdk-)?(?P<version>{VNUM}-{PRE}(?:-{OPT})?)"))
        .expect("223 pre-release regex compiles")
});

static V223_BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?:jdk-)?(?P<version>{VNUM}(?:\+-{OPT})?)")).expect("223 bare regex compiles")
});

static FEATURE_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/adoptopenjdk/openjdk(?P<feature>[0-9]+)").expect("feature version regex compiles")
});

#[derive(Debug)]
struct RawVersion {
    major: u32,
    minor: u32,
    security: u32,
    pre: Option<String>,
    adopt: Option<u32>,
    build: u32,
    optional: Option<String>,
    version: String,
}

/// Parses a published release or asset name into canonical version data.
///
/// `explicit_adopt_build_number`, when supplied by the caller (e.g. from
/// sidecar metadata), overrides anything inferred from the name itself.
pub fn parse(
    publish_name: &str,
    explicit_adopt_build_number: Option<&str>,
) -> Result<VersionData, ParseError> {
    let raw = match_version(publish_name)
        .ok_or_else(|| ParseError::UnrecognisedVersion(publish_name.to_string()))?;

    let adopt_build_number = match explicit_adopt_build_number {
        Some(value) => Some(
            value
                .parse()
                .map_err(|_| ParseError::InvalidBuildNumber(value.to_string()))?,
        ),
        None => raw.adopt,
    };

    Ok(VersionData::new(
        raw.major,
        raw.minor,
        raw.security,
        raw.pre,
        adopt_build_number,
        raw.build,
        raw.optional,
        raw.version,
    ))
}

/// Fallback for early-access releases whose names defy parsing: extract the
/// feature version from the repository resource path, e.g.
/// "/AdoptOpenJDK/openjdk13-nightly/...".
pub fn feature_version_from_resource_path(resource_path: &str) -> Result<VersionData, ParseError> {
    let lower = resource_path.to_lowercase();
    let caps = FEATURE_VERSION
        .captures(&lower)
        .ok_or_else(|| ParseError::UnrecognisedVersion(resource_path.to_string()))?;
    let major = caps["feature"]
        .parse()
        .map_err(|_| ParseError::UnrecognisedVersion(resource_path.to_string()))?;

    Ok(VersionData::new(major, 0, 0, None, None, 0, None, String::new()))
}

fn match_version(publish_name: &str) -> Option<RawVersion> {
    match_legacy(publish_name)
        .or_else(|| match_legacy_dotted(publish_name))
        .or_else(|| match_nightly(publish_name))
        .or_else(|| match_legacy_no_build(publish_name))
        .or_else(|| match_223(publish_name))
}

fn match_legacy(publish_name: &str) -> Option<RawVersion> {
    let caps = LEGACY
        .captures(publish_name)
        .or_else(|| LEGACY_COMPACT.captures(publish_name))?;

    Some(RawVersion {
        major: group_u32(&caps, "major"),
        minor: 0,
        security: group_u32(&caps, "update"),
        pre: None,
        adopt: None,
        build: group_u32(&caps, "build"),
        optional: group_string(&caps, "opt"),
        version: caps["version"].to_string(),
    })
}

fn match_legacy_dotted(publish_name: &str) -> Option<RawVersion> {
    let caps = LEGACY_DOTTED.captures(publish_name)?;

    let mut build = 0;
    let mut optional = None;
    if let Some(additional) = caps.name("additional") {
        for token in additional.as_str().split('-').filter(|t| !t.is_empty()) {
            if let Some(build_caps) = DOTTED_BUILD_TOKEN.captures(token) {
                build = group_u32(&build_caps, "build");
            } else if DOTTED_TIMESTAMP_TOKEN.is_match(token) {
                optional = Some(token.to_string());
            }
        }
    }

    Some(RawVersion {
        major: group_u32(&caps, "major"),
        minor: 0,
        security: group_u32(&caps, "update"),
        pre: None,
        adopt: None,
        build,
        optional,
        version: caps["version"].to_string(),
    })
}

fn match_nightly(publish_name: &str) -> Option<RawVersion> {
    let caps = NIGHTLY.captures(publish_name)?;

    Some(RawVersion {
        major: group_u32(&caps, "major"),
        minor: 0,
        security: 0,
        pre: None,
        adopt: None,
        build: 0,
        optional: group_string(&caps, "opt"),
        version: caps["version"].to_string(),
    })
}

fn match_legacy_no_build(publish_name: &str) -> Option<RawVersion> {
    let caps = LEGACY_NO_BUILD.captures(publish_name)?;

    Some(RawVersion {
        major: group_u32(&caps, "major"),
        minor: 0,
        security: group_u32(&caps, "update"),
        pre: None,
        adopt: None,
        build: 0,
        optional: None,
        version: caps["version"].to_string(),
    })
}

fn match_223(publish_name: &str) -> Option<RawVersion> {
    for regex in [&*V223_BUILD, &*V223_PRE, &*V223_BARE] {
        if let Some(caps) = regex.captures(publish_name) {
            return Some(RawVersion {
                major: group_u32(&caps, "major"),
                minor: group_u32(&caps, "minor"),
                security: group_u32(&caps, "security"),
                pre: group_string(&caps, "pre"),
                adopt: caps.name("adopt").and_then(|m| m.as_str().parse().ok()),
                build: group_u32(&caps, "build"),
                optional: group_string(&caps, "opt"),
                version: caps["version"].to_string(),
            });
        }
    }
    None
}

fn group_u32(caps: &Captures, name: &str) -> u32 {
    caps.name(name)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

fn group_string(caps: &Captures, name: &str) -> Option<String> {
    caps.name(name).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[allow(clippy::too_many_arguments)]
    #[rstest]
    #[case("jdk8u222-b10", 8, 0, 222, None, 10, None, "8u222-b10", "8.0.222+10")]
    #[case(
        "OpenJDK8U-jdk_x64_linux_8u222b10.tar.gz",
        8, 0, 222, None, 10, None, "8u222b10", "8.0.222+10"
    )]
    #[case("OpenJDK 8u212 GA Release", 8, 0, 212, None, 0, None, "8u212", "8.0.212")]
    #[case("jdk8u152-b01-20172803", 8, 0, 152, None, 1, None, "8u152-b01", "8.0.152+1")]
    #[case("jdk-9.0.4+11", 9, 0, 4, None, 11, None, "9.0.4+11", "9.0.4+11")]
    #[case("jdk-13+33", 13, 0, 0, None, 33, None, "13+33", "13.0.0+33")]
    #[case("jdk-13+33_openj9-0.16.0", 13, 0, 0, None, 33, None, "13+33", "13.0.0+33")]
    #[case(
        "https://github.com/AdoptOpenJDK/openjdk11-upstream-binaries/releases/tag/jdk-11.0.5+10",
        11, 0, 5, None, 10, None, "11.0.5+10", "11.0.5+10"
    )]
    #[case(
        "jdk13u-2019-10-30-23-10",
        13, 0, 0, None, 0, Some("2019-10-30-23-10"), "13u-2019-10-30-23-10", "13.0.0+2019-10-30-23-10"
    )]
    #[case(
        "1.8.0_202-internal-201903130451-b08",
        8, 0, 202, None, 8, Some("201903130451"),
        "1.8.0_202-internal-201903130451-b08", "8.0.202+8.201903130451"
    )]
    fn parses_published_names(
        #[case] input: &str,
        #[case] major: u32,
        #[case] minor: u32,
        #[case] security: u32,
        #[case] pre: Option<&str>,
        #[case] build: u32,
        #[case] optional: Option<&str>,
        #[case] openjdk_version: &str,
        #[case] semver: &str,
    ) {
        let parsed = parse(input, None).expect("version parses");

        assert_eq!(parsed.major, major, "major of {input}");
        assert_eq!(parsed.minor, minor, "minor of {input}");
        assert_eq!(parsed.security, security, "security of {input}");
        assert_eq!(parsed.pre.as_deref(), pre, "pre of {input}");
        assert_eq!(parsed.build, build, "build of {input}");
        assert_eq!(parsed.optional.as_deref(), optional, "optional of {input}");
        assert_eq!(parsed.openjdk_version, openjdk_version, "version of {input}");
        assert_eq!(parsed.semver, semver, "semver of {input}");
    }

    #[rstest]
    #[case("jdk-10.0.2+13.1", 13, Some(1), "10.0.2+13.1")]
    #[case("jdk-11.0.4+11.4", 11, Some(4), "11.0.4+11.4")]
    fn parses_adopt_build_number_from_name(
        #[case] input: &str,
        #[case] build: u32,
        #[case] adopt: Option<u32>,
        #[case] semver: &str,
    ) {
        let parsed = parse(input, None).expect("version parses");

        assert_eq!(parsed.build, build);
        assert_eq!(parsed.adopt_build_number, adopt);
        assert_eq!(parsed.semver, semver);
    }

    #[test]
    fn explicit_adopt_build_number_overrides_the_name() {
        let parsed = parse("jdk-11.0.4+11.4", Some("2")).expect("version parses");
        assert_eq!(parsed.adopt_build_number, Some(2));
        assert_eq!(parsed.semver, "11.0.4+11.2");
    }

    #[test]
    fn invalid_explicit_adopt_build_number_is_an_error() {
        let result = parse("jdk-11.0.4+11", Some("not-a-number"));
        assert_eq!(
            result,
            Err(ParseError::InvalidBuildNumber("not-a-number".to_string()))
        );
    }

    #[test]
    fn pre_release_without_build_parses() {
        let parsed = parse("jdk-12-ea", None).expect("version parses");
        assert_eq!(parsed.major, 12);
        assert_eq!(parsed.pre.as_deref(), Some("ea"));
        assert_eq!(parsed.build, 0);
        assert_eq!(parsed.semver, "12.0.0-ea");
    }

    #[test]
    fn parse_is_deterministic_across_calls() {
        let first = parse("jdk8u222-b10", None).expect("version parses");
        let second = parse("jdk8u222-b10", None).expect("version parses");
        assert_eq!(first, second);
        assert_eq!(first.semver, second.semver);
    }

    #[test]
    fn unrecognised_name_is_an_error() {
        let result = parse("not a version at all", None);
        assert_eq!(
            result,
            Err(ParseError::UnrecognisedVersion("not a version at all".to_string()))
        );
    }

    #[test]
    fn feature_version_falls_back_to_resource_path() {
        let parsed = feature_version_from_resource_path("/AdoptOpenJDK/openjdk13-nightly/releases/tag/x")
            .expect("feature version extracts");
        assert_eq!(parsed.major, 13);
        assert_eq!(parsed.semver, "13.0.0");
    }

    #[test]
    fn feature_version_fallback_rejects_unrelated_paths() {
        let result = feature_version_from_resource_path("/somewhere/else");
        assert!(matches!(result, Err(ParseError::UnrecognisedVersion(_))));
    }
}
