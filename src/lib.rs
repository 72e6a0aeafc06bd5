//! Release metadata aggregation for the AdoptOpenJDK build repositories
//!
//! # Modules
//!
//! - [`parser`]: Version-string parsing across historical naming schemes
//! - [`models`]: Domain model (releases, binaries, platform attributes)
//! - [`index`]: Immutable in-memory release index with filtering and pagination
//! - [`github`]: Paginated GraphQL ingestion and asset classification
//! - [`store`]: Published snapshot shared between updater and queries
//! - [`updater`]: Full and incremental update cycles
//! - [`persistence`]: One JSON document per feature version

pub mod config;
pub mod github;
pub mod index;
pub mod models;
pub mod parser;
pub mod persistence;
pub mod store;
pub mod updater;
