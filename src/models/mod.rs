//! Domain model layer
//! - platform.rs: platform attribute enums and file-name token matching
//! - version.rs: canonical structured version data and semver derivation
//! - release.rs: release and binary wire models

pub mod platform;
pub mod release;
pub mod version;

pub use platform::{
    Architecture, ClassificationError, FileNameMatcher, HeapSize, ImageType, JvmImpl,
    OperatingSystem, from_file_name,
};
pub use release::{Binary, Release, ReleaseType, SortOrder, Vendor};
pub use version::VersionData;
