//! In-memory release index
//! - releases.rs: ordered per-version release collection
//! - repos.rs: aggregate snapshot across feature versions
//! - filters.rs: attribute predicates
//! - range.rs: maven-style version range matching
//! - query.rs: pagination

pub mod filters;
pub mod query;
pub mod range;
pub mod releases;
pub mod repos;

pub use filters::{BinaryFilter, ReleaseFilter};
pub use query::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, QueryError, paginate};
pub use range::VersionRangeFilter;
pub use releases::Releases;
pub use repos::{AdoptRepos, FeatureRelease};
