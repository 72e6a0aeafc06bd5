//! Attribute predicates over releases and binaries

use crate::index::range::VersionRangeFilter;
use crate::models::{
    Architecture, Binary, HeapSize, ImageType, JvmImpl, OperatingSystem, Release, ReleaseType,
    Vendor,
};

/// Conjunction of optional release attributes; an unset field matches
/// everything.
#[derive(Debug, Clone, Default)]
pub struct ReleaseFilter {
    pub release_type: Option<ReleaseType>,
    pub feature_version: Option<u32>,
    pub release_name: Option<String>,
    pub vendor: Option<Vendor>,
    pub version_range: Option<VersionRangeFilter>,
}

impl ReleaseFilter {
    pub fn matches(&self, release: &Release) -> bool {
        self.release_type.is_none_or(|t| t == release.release_type)
            && self
                .feature_version
                .is_none_or(|v| v == release.version_data.major)
            && self
                .release_name
                .as_deref()
                .is_none_or(|n| n == release.release_name)
            && self.vendor.is_none_or(|v| v == release.vendor)
            && self
                .version_range
                .as_ref()
                .is_none_or(|r| r.matches(&release.version_data))
    }
}

/// Conjunction of optional binary attributes; an unset field matches
/// everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryFilter {
    pub os: Option<OperatingSystem>,
    pub architecture: Option<Architecture>,
    pub image_type: Option<ImageType>,
    pub jvm_impl: Option<JvmImpl>,
    pub heap_size: Option<HeapSize>,
}

impl BinaryFilter {
    pub fn matches(&self, binary: &Binary) -> bool {
        self.os.is_none_or(|os| os == binary.os)
            && self
                .architecture
                .is_none_or(|arch| arch == binary.architecture)
            && self.image_type.is_none_or(|i| i == binary.image_type)
            && self.jvm_impl.is_none_or(|j| j == binary.jvm_impl)
            && self.heap_size.is_none_or(|h| h == binary.heap_size)
    }
}
