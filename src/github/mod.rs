//! GitHub ingestion layer
//! - transport.rs: HTTP boundary, retry classification
//! - client.rs: paginated GraphQL walks with retry/backoff
//! - models.rs: GraphQL and metadata wire shapes
//! - assets.rs: asset-to-binary classification
//! - convert.rs: wire release to domain release

pub mod assets;
pub mod client;
pub mod convert;
pub mod models;
pub mod transport;

pub use client::{GitHubClient, GitHubError};
pub use convert::{ConvertError, to_release};
pub use transport::{GraphQlTransport, HttpFetcher, HttpTransport, ReqwestFetcher, TransportError};
