//! GitHub GraphQL wire models
//!
//! These mirror the shapes returned by the v4 API and the metadata files
//! attached to releases. They stay at the ingestion boundary; everything
//! downstream works with the domain models.

use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

use crate::models::VersionData;

/// GitHub publishes RFC 3339 instants; the index stores them as UTC
/// local date-times.
pub fn parse_github_time(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    Ok(DateTime::parse_from_rfc3339(raw)?.naive_utc())
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryData {
    pub repository: Option<GHRepository>,
    pub rate_limit: Option<RateLimit>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RateLimit {
    pub cost: u32,
    pub remaining: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GHRepository {
    pub releases: GHReleases,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GHReleases {
    #[serde(rename = "nodes")]
    pub releases: Vec<GHRelease>,
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GHRelease {
    pub id: String,
    pub name: String,
    pub published_at: String,
    pub updated_at: String,
    pub release_assets: GHAssets,
    pub resource_path: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GHAssets {
    #[serde(rename = "nodes")]
    pub assets: Vec<GHAsset>,
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GHAsset {
    pub name: String,
    pub size: u64,
    pub download_count: u64,
    pub updated_at: String,
    pub download_url: String,
}

/// Response shape of the per-release asset continuation query.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetNodeData {
    pub node: Option<GHAssetNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GHAssetNode {
    pub release_assets: GHAssets,
}

/// Sidecar metadata file published next to a binary.
///
/// When present it is authoritative over anything inferred from the file
/// name.
#[derive(Debug, Clone, Deserialize)]
pub struct GHMetaData {
    #[serde(rename = "WARNING", default)]
    pub warning: Option<String>,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
    #[serde(default)]
    pub variant: Option<String>,
    pub version: GHVersion,
    #[serde(rename = "scmRef", default)]
    pub scm_ref: Option<String>,
    #[serde(default)]
    pub binary_type: Option<String>,
    #[serde(default)]
    pub sha256: Option<String>,
}

/// Version block inside a metadata file, already split into fields.
#[derive(Debug, Clone, Deserialize)]
pub struct GHVersion {
    pub major: u32,
    #[serde(default)]
    pub minor: u32,
    #[serde(default)]
    pub security: u32,
    #[serde(default)]
    pub pre: Option<String>,
    #[serde(default)]
    pub adopt_build_number: Option<u32>,
    #[serde(default)]
    pub build: u32,
    #[serde(default)]
    pub opt: Option<String>,
    pub version: String,
}

impl GHVersion {
    pub fn to_version_data(&self) -> VersionData {
        VersionData::new(
            self.major,
            self.minor,
            self.security,
            self.pre.clone(),
            self.adopt_build_number,
            self.build,
            self.opt.clone(),
            self.version.clone(),
        )
    }
}
