//! GraphQL client for walking release listings
//!
//! Pagination is an explicit cursor loop, both over release pages and over
//! the asset continuation of a single release. Transient failures are
//! retried with a linear back-off up to a fixed ceiling.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config;
use crate::github::models::{
    AssetNodeData, GHAssets, GHRelease, GHReleases, GraphQlError, GraphQlResponse, QueryData,
    RateLimit,
};
use crate::github::transport::{GraphQlTransport, TransportError};

const PAGE_SIZE: u32 = 50;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("giving up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: TransportError },

    #[error("graphql error: {0}")]
    GraphQl(String),

    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}

enum PageOutcome<T> {
    Data(T),
    RepositoryNotFound,
}

pub struct GitHubClient {
    transport: Arc<dyn GraphQlTransport>,
    retry_ceiling: u32,
    retry_base_delay: Duration,
}

impl GitHubClient {
    pub fn new(transport: Arc<dyn GraphQlTransport>) -> Self {
        Self::with_retry_policy(transport, config::RETRY_CEILING, config::RETRY_BASE_DELAY)
    }

    pub fn with_retry_policy(
        transport: Arc<dyn GraphQlTransport>,
        retry_ceiling: u32,
        retry_base_delay: Duration,
    ) -> Self {
        Self {
            transport,
            retry_ceiling,
            retry_base_delay,
        }
    }

    /// Every release of `owner/repo_name`, walking all pages. A repository
    /// that does not exist yields no releases rather than an error.
    pub async fn get_repository(
        &self,
        owner: &str,
        repo_name: &str,
    ) -> Result<Vec<GHRelease>, GitHubError> {
        let query = releases_query(owner, repo_name);
        let mut releases = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = match self.fetch_release_page(repo_name, &query, cursor).await? {
                PageOutcome::Data(page) => page,
                PageOutcome::RepositoryNotFound => {
                    info!(owner, repo_name, "repository does not exist, skipping");
                    return Ok(vec![]);
                }
            };

            let GHReleases {
                releases: page_releases,
                page_info,
            } = page;
            for release in page_releases {
                releases.push(self.with_complete_assets(release).await?);
            }

            if !page_info.has_next_page {
                break;
            }
            match page_info.end_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        debug!(owner, repo_name, count = releases.len(), "repository walked");
        Ok(releases)
    }

    /// The most recently updated releases of `owner/repo_name`; a single
    /// page, newest first.
    pub async fn get_recent_releases(
        &self,
        owner: &str,
        repo_name: &str,
    ) -> Result<Vec<GHRelease>, GitHubError> {
        let query = releases_query(owner, repo_name);
        let page = match self.fetch_release_page(repo_name, &query, None).await? {
            PageOutcome::Data(page) => page,
            PageOutcome::RepositoryNotFound => return Ok(vec![]),
        };

        let mut releases = Vec::new();
        for release in page.releases {
            releases.push(self.with_complete_assets(release).await?);
        }
        Ok(releases)
    }

    async fn fetch_release_page(
        &self,
        repo_name: &str,
        query: &str,
        cursor: Option<String>,
    ) -> Result<PageOutcome<GHReleases>, GitHubError> {
        let value = self.query_with_retry(query, cursor).await?;
        let response: GraphQlResponse<QueryData> = serde_json::from_value(value)?;

        if repository_not_found(&response.errors) {
            return Ok(PageOutcome::RepositoryNotFound);
        }
        check_errors(&response.errors)?;

        let data = response
            .data
            .ok_or_else(|| GitHubError::GraphQl("response carried no data".to_string()))?;
        log_rate_limit(repo_name, data.rate_limit);

        match data.repository {
            Some(repository) => Ok(PageOutcome::Data(repository.releases)),
            None => Ok(PageOutcome::RepositoryNotFound),
        }
    }

    /// Follows the asset cursor of one release until every asset is loaded.
    async fn with_complete_assets(&self, release: GHRelease) -> Result<GHRelease, GitHubError> {
        if !release.release_assets.page_info.has_next_page {
            return Ok(release);
        }

        let mut release = release;
        let mut assets = std::mem::take(&mut release.release_assets.assets);
        let mut cursor = release.release_assets.page_info.end_cursor.clone();
        let query = assets_query(&release.id);

        loop {
            let value = self.query_with_retry(&query, cursor).await?;
            let response: GraphQlResponse<AssetNodeData> = serde_json::from_value(value)?;
            check_errors(&response.errors)?;

            let node = response
                .data
                .and_then(|d| d.node)
                .ok_or_else(|| GitHubError::GraphQl("asset node vanished mid-walk".to_string()))?;

            let GHAssets {
                assets: page_assets,
                page_info,
            } = node.release_assets;
            assets.extend(page_assets);

            release.release_assets.page_info = page_info.clone();
            if !page_info.has_next_page {
                break;
            }
            match page_info.end_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        release.release_assets.assets = assets;
        Ok(release)
    }

    async fn query_with_retry(
        &self,
        query: &str,
        cursor: Option<String>,
    ) -> Result<Value, GitHubError> {
        let mut last_error: Option<TransportError> = None;

        for attempt in 1..=self.retry_ceiling {
            match self.transport.query(query, cursor.clone()).await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_retryable() => {
                    warn!(attempt, %error, "query failed, backing off");
                    tokio::time::sleep(self.retry_base_delay * attempt).await;
                    last_error = Some(error);
                }
                Err(error) => return Err(error.into()),
            }
        }

        Err(GitHubError::RetriesExhausted {
            attempts: self.retry_ceiling,
            last: last_error
                .unwrap_or(TransportError::InvalidResponse("no attempt made".to_string())),
        })
    }
}

fn repository_not_found(errors: &[GraphQlError]) -> bool {
    errors
        .iter()
        .any(|e| e.message.contains("Could not resolve to a Repository"))
}

fn check_errors(errors: &[GraphQlError]) -> Result<(), GitHubError> {
    if errors.is_empty() {
        return Ok(());
    }
    let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
    Err(GitHubError::GraphQl(messages.join("; ")))
}

fn log_rate_limit(repo_name: &str, rate_limit: Option<RateLimit>) {
    let Some(rate_limit) = rate_limit else { return };
    if rate_limit.remaining < config::RATE_LIMIT_LOW_WATER_MARK {
        warn!(
            repo_name,
            cost = rate_limit.cost,
            remaining = rate_limit.remaining,
            "rate limit quota running low"
        );
    } else {
        debug!(
            repo_name,
            cost = rate_limit.cost,
            remaining = rate_limit.remaining,
            "rate limit"
        );
    }
}

fn releases_query(owner: &str, repo_name: &str) -> String {
    format!(
        r#"query($cursorPointer: String) {{
  repository(owner: "{owner}", name: "{repo_name}") {{
    releases(first: {PAGE_SIZE}, after: $cursorPointer, orderBy: {{field: CREATED_AT, direction: DESC}}) {{
      nodes {{
        id
        name
        publishedAt
        updatedAt
        resourcePath
        url
        releaseAssets(first: {PAGE_SIZE}) {{
          nodes {{
            name
            size
            downloadCount
            updatedAt
            downloadUrl
          }}
          pageInfo {{ hasNextPage endCursor }}
        }}
      }}
      pageInfo {{ hasNextPage endCursor }}
    }}
  }}
  rateLimit {{ cost remaining }}
}}"#
    )
}

fn assets_query(release_id: &str) -> String {
    format!(
        r#"query($cursorPointer: String) {{
  node(id: "{release_id}") {{
    ... on Release {{
      releaseAssets(first: {PAGE_SIZE}, after: $cursorPointer) {{
        nodes {{
          name
          size
          downloadCount
          updatedAt
          downloadUrl
        }}
        pageInfo {{ hasNextPage endCursor }}
      }}
    }}
  }}
  rateLimit {{ cost remaining }}
}}"#
    )
}
