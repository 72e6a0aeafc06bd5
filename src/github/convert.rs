//! GitHub release to domain release conversion

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::warn;

use crate::github::assets::{fetch_release_metadata, to_binary_list};
use crate::github::models::{GHMetaData, GHRelease, parse_github_time};
use crate::github::transport::HttpFetcher;
use crate::models::{Release, ReleaseType, Vendor, VersionData};
use crate::parser::{self, ParseError};

// Names carrying a date token are early-access builds; plain tags are GA.
static DATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"20[0-9]{2}-[0-9]{2}-[0-9]{2}|20[0-9]{6}").expect("date token regex compiles")
});

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("bad release timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

pub fn release_type_for_name(name: &str) -> ReleaseType {
    if DATE_TOKEN.is_match(name) {
        ReleaseType::Ea
    } else {
        ReleaseType::Ga
    }
}

/// Converts one fetched release into the domain model, classifying its
/// assets and summing their download counts.
pub async fn to_release(
    gh_release: &GHRelease,
    fetcher: &dyn HttpFetcher,
) -> Result<Release, ConvertError> {
    let release_type = release_type_for_name(&gh_release.name);
    let timestamp = parse_github_time(&gh_release.published_at)?;

    let metadata = fetch_release_metadata(&gh_release.release_assets, fetcher).await;
    let version_data = resolve_version(gh_release, release_type, metadata.values().next())?;
    let binaries = to_binary_list(&gh_release.release_assets, &metadata, fetcher).await;
    let download_count = binaries.iter().map(|b| b.download_count).sum();

    Ok(Release {
        id: gh_release.id.clone(),
        release_type,
        release_link: gh_release.url.clone(),
        release_name: gh_release.name.clone(),
        timestamp,
        binaries,
        download_count,
        vendor: Vendor::Adoptopenjdk,
        version_data,
    })
}

/// Sidecar metadata carries an authoritative version block; without one the
/// name is parsed, and an unparseable early-access name falls back to the
/// feature version embedded in the resource path.
fn resolve_version(
    gh_release: &GHRelease,
    release_type: ReleaseType,
    metadata: Option<&GHMetaData>,
) -> Result<VersionData, ParseError> {
    if let Some(metadata) = metadata {
        return Ok(metadata.version.to_version_data());
    }

    match parser::parse(&gh_release.name, None) {
        Ok(version) => Ok(version),
        Err(error) if release_type == ReleaseType::Ea => {
            warn!(release = %gh_release.name, %error, "using feature version from resource path");
            parser::feature_version_from_resource_path(&gh_release.resource_path)
        }
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::models::{GHAsset, GHAssets, PageInfo};
    use crate::github::transport::MockHttpFetcher;
    use rstest::rstest;

    fn gh_release(name: &str, asset_names: &[&str]) -> GHRelease {
        GHRelease {
            id: "rel-1".to_string(),
            name: name.to_string(),
            published_at: "2019-07-17T12:00:00Z".to_string(),
            updated_at: "2019-07-17T12:00:00Z".to_string(),
            release_assets: GHAssets {
                assets: asset_names
                    .iter()
                    .enumerate()
                    .map(|(i, n)| GHAsset {
                        name: n.to_string(),
                        size: 1024,
                        download_count: (i as u64 + 1) * 10,
                        updated_at: "2019-07-17T12:00:00Z".to_string(),
                        download_url: format!("https://example.com/{n}"),
                    })
                    .collect(),
                page_info: PageInfo {
                    has_next_page: false,
                    end_cursor: None,
                },
            },
            resource_path: "/AdoptOpenJDK/openjdk8-binaries/releases/tag/x".to_string(),
            url: "https://github.com/AdoptOpenJDK/openjdk8-binaries/releases/tag/x".to_string(),
        }
    }

    #[rstest]
    #[case("jdk8u222-b10", ReleaseType::Ga)]
    #[case("jdk-11.0.4+11", ReleaseType::Ga)]
    #[case("jdk8u-2019-07-17-07-32", ReleaseType::Ea)]
    #[case("jdk8u212-b04-20190717", ReleaseType::Ea)]
    fn date_tokens_mark_early_access(#[case] name: &str, #[case] expected: ReleaseType) {
        assert_eq!(release_type_for_name(name), expected);
    }

    #[tokio::test]
    async fn release_sums_binary_download_counts() {
        let gh = gh_release(
            "jdk8u222-b10",
            &[
                "OpenJDK8U-jdk_x64_linux_hotspot_8u222b10.tar.gz",
                "OpenJDK8U-jdk_x64_windows_hotspot_8u222b10.zip",
            ],
        );
        let fetcher = MockHttpFetcher::new();

        let release = to_release(&gh, &fetcher).await.expect("release converts");

        assert_eq!(release.release_type, ReleaseType::Ga);
        assert_eq!(release.binaries.len(), 2);
        assert_eq!(release.download_count, 10 + 20);
        assert_eq!(release.version_data.semver, "8.0.222+10");
        assert_eq!(release.timestamp.to_string(), "2019-07-17 12:00:00");
        assert_eq!(release.vendor, Vendor::Adoptopenjdk);
    }

    #[tokio::test]
    async fn nightly_names_parse_with_their_date() {
        let gh = gh_release("jdk13u-2019-10-30-23-10", &[]);
        let fetcher = MockHttpFetcher::new();

        let release = to_release(&gh, &fetcher).await.expect("release converts");

        assert_eq!(release.release_type, ReleaseType::Ea);
        assert_eq!(release.version_data.major, 13);
        assert_eq!(release.version_data.semver, "13.0.0+2019-10-30-23-10");
    }

    #[tokio::test]
    async fn metadata_version_outranks_the_release_name() {
        let gh = gh_release(
            "jdk8u222-b10",
            &[
                "OpenJDK8U-jdk_x64_linux_hotspot_8u222b10.tar.gz",
                "OpenJDK8U-jdk_x64_linux_hotspot_8u222b10.tar.gz.json",
            ],
        );
        let mut fetcher = MockHttpFetcher::new();
        fetcher.expect_fetch().times(1).returning(|_| {
            Ok(serde_json::json!({
                "os": "linux",
                "arch": "x64",
                "variant": "hotspot",
                "binary_type": "jdk",
                "sha256": "deadbeef",
                "version": {
                    "major": 8, "minor": 0, "security": 222,
                    "adopt_build_number": 1, "build": 10,
                    "version": "1.8.0_222-b10"
                }
            })
            .to_string())
        });

        let release = to_release(&gh, &fetcher).await.expect("release converts");

        assert_eq!(release.version_data.adopt_build_number, Some(1));
        assert_eq!(release.version_data.semver, "8.0.222+10.1");
        assert_eq!(release.version_data.openjdk_version, "1.8.0_222-b10");
    }

    #[tokio::test]
    async fn unparseable_ga_name_is_an_error() {
        let gh = gh_release("just a plain announcement", &[]);
        let fetcher = MockHttpFetcher::new();

        let error = to_release(&gh, &fetcher).await.expect_err("name defies parsing");

        assert!(matches!(
            error,
            ConvertError::Parse(ParseError::UnrecognisedVersion(_))
        ));
    }
}
