//! Release and binary domain models
//!
//! Field names on these types are a wire contract: persisted documents and
//! the query surface both serialize through them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::platform::{Architecture, HeapSize, ImageType, JvmImpl, OperatingSystem};
use crate::models::version::VersionData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    Ga,
    Ea,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Adoptopenjdk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One downloadable artifact for a specific platform/variant combination.
///
/// Identity is the download link; a binary is never mutated once built.
/// Installer fields mirror the binary fields and are populated only when a
/// separate installer artifact exists for the same build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binary {
    pub name: String,
    pub link: String,
    pub size: u64,
    pub download_count: u64,
    pub updated_at: NaiveDateTime,
    pub scm_ref: Option<String>,
    pub checksum: Option<String>,
    pub checksum_link: Option<String>,
    pub installer_name: Option<String>,
    pub installer_link: Option<String>,
    pub installer_size: Option<u64>,
    pub installer_checksum: Option<String>,
    pub installer_checksum_link: Option<String>,
    pub heap_size: HeapSize,
    pub os: OperatingSystem,
    pub architecture: Architecture,
    pub image_type: ImageType,
    pub jvm_impl: JvmImpl,
}

/// One published build/tag with its platform binaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: String,
    pub release_type: ReleaseType,
    pub release_link: String,
    pub release_name: String,
    /// Publication time as a UTC local date-time
    pub timestamp: NaiveDateTime,
    pub binaries: Vec<Binary>,
    pub download_count: u64,
    pub vendor: Vendor,
    pub version_data: VersionData,
}

impl Release {
    /// Returns a copy of this release containing only the binaries accepted
    /// by `keep`. The original release is left untouched.
    pub fn filter_binaries(&self, keep: impl Fn(&Binary) -> bool) -> Release {
        Release {
            binaries: self.binaries.iter().filter(|b| keep(b)).cloned().collect(),
            ..self.clone()
        }
    }
}
