//! Full and incremental update cycles
//!
//! A full cycle rebuilds every feature version from scratch; an incremental
//! cycle folds recently changed releases into the current snapshot. Both
//! publish a complete new snapshot and persist it; neither ever mutates the
//! published one. Cycle failures are logged and the scheduler keeps ticking.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{error, info, warn};

#[cfg(test)]
use mockall::automock;

use crate::config;
use crate::github::client::{GitHubClient, GitHubError};
use crate::github::convert::to_release;
use crate::github::transport::HttpFetcher;
use crate::index::{AdoptRepos, FeatureRelease, Releases};
use crate::models::Release;
use crate::persistence::{ApiPersistence, PersistenceError};
use crate::store::ApiDataStore;

pub const GITHUB_OWNER: &str = "AdoptOpenJDK";

/// The repositories carrying builds for one feature version. The variant
/// nightlies do not exist for every version; a missing repository fetches
/// as empty.
pub fn repository_names(feature_version: u32) -> Vec<String> {
    vec![
        format!("openjdk{feature_version}-binaries"),
        format!("openjdk{feature_version}-nightly"),
        format!("openjdk{feature_version}-openj9-nightly"),
    ]
}

/// Produces domain releases for one named repository.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Every release of the repository.
    async fn fetch_repository(&self, repo_name: &str) -> Result<Vec<Release>, GitHubError>;

    /// The most recently updated releases only.
    async fn fetch_recent(&self, repo_name: &str) -> Result<Vec<Release>, GitHubError>;
}

pub struct GitHubReleaseSource {
    client: GitHubClient,
    fetcher: Arc<dyn HttpFetcher>,
}

impl GitHubReleaseSource {
    pub fn new(client: GitHubClient, fetcher: Arc<dyn HttpFetcher>) -> Self {
        Self { client, fetcher }
    }

    async fn convert_all(&self, fetched: Vec<crate::github::models::GHRelease>) -> Vec<Release> {
        let mut releases = Vec::new();
        for gh_release in &fetched {
            match to_release(gh_release, self.fetcher.as_ref()).await {
                Ok(release) => releases.push(release),
                Err(error) => {
                    warn!(release = %gh_release.name, %error, "skipping unconvertible release");
                }
            }
        }
        releases
    }
}

#[async_trait::async_trait]
impl ReleaseSource for GitHubReleaseSource {
    async fn fetch_repository(&self, repo_name: &str) -> Result<Vec<Release>, GitHubError> {
        let fetched = self.client.get_repository(GITHUB_OWNER, repo_name).await?;
        Ok(self.convert_all(fetched).await)
    }

    async fn fetch_recent(&self, repo_name: &str) -> Result<Vec<Release>, GitHubError> {
        let fetched = self.client.get_recent_releases(GITHUB_OWNER, repo_name).await?;
        Ok(self.convert_all(fetched).await)
    }
}

pub struct AdoptReposBuilder {
    source: Arc<dyn ReleaseSource>,
}

impl AdoptReposBuilder {
    pub fn new(source: Arc<dyn ReleaseSource>) -> Self {
        Self { source }
    }

    /// Rebuilds the whole index, fanning out one fetch per repository. A
    /// failed repository is logged and contributes nothing; its siblings
    /// are unaffected.
    pub async fn build(&self, versions: &[u32]) -> AdoptRepos {
        let features = join_all(versions.iter().map(|&v| self.build_feature(v))).await;
        AdoptRepos::new(features)
    }

    async fn build_feature(&self, feature_version: u32) -> FeatureRelease {
        let names = repository_names(feature_version);
        let results = join_all(names.iter().map(|n| self.source.fetch_repository(n))).await;

        let mut releases = Vec::new();
        for (name, result) in names.iter().zip(results) {
            match result {
                Ok(mut fetched) => releases.append(&mut fetched),
                Err(error) => {
                    warn!(repo = %name, %error, "repository fetch failed, keeping siblings");
                }
            }
        }

        info!(feature_version, count = releases.len(), "feature version rebuilt");
        FeatureRelease::new(feature_version, Releases::new(releases))
    }

    /// Folds recently changed releases into `current`. Only releases that
    /// are unknown or carry a different timestamp are merged; nothing is
    /// removed.
    pub async fn incremental_update(&self, versions: &[u32], current: &AdoptRepos) -> AdoptRepos {
        let mut next = current.clone();

        for &feature_version in versions {
            let names = repository_names(feature_version);
            let results = join_all(names.iter().map(|n| self.source.fetch_recent(n))).await;

            let mut updated = Vec::new();
            for (name, result) in names.iter().zip(results) {
                match result {
                    Ok(fetched) => updated.extend(fetched.into_iter().filter(|r| {
                        current
                            .all_releases()
                            .has_release_been_updated(&r.id, r.timestamp)
                    })),
                    Err(error) => {
                        warn!(repo = %name, %error, "recent release fetch failed, keeping siblings");
                    }
                }
            }

            if !updated.is_empty() {
                info!(feature_version, count = updated.len(), "merging changed releases");
                next = next.add_releases(feature_version, updated);
            }
        }

        next
    }
}

pub struct Updater {
    builder: AdoptReposBuilder,
    store: Arc<ApiDataStore>,
    persistence: Arc<dyn ApiPersistence>,
    versions: Vec<u32>,
}

impl Updater {
    pub fn new(
        builder: AdoptReposBuilder,
        store: Arc<ApiDataStore>,
        persistence: Arc<dyn ApiPersistence>,
        versions: Vec<u32>,
    ) -> Self {
        Self {
            builder,
            store,
            persistence,
            versions,
        }
    }

    /// Rebuilds everything, publishes the snapshot, then persists it.
    pub async fn run_full_update(&self) -> Result<(), PersistenceError> {
        info!("full update started");
        let repos = self.builder.build(&self.versions).await;

        self.store.publish(repos.clone());
        self.persistence.update_all_repos(&repos).await?;

        info!(releases = repos.all_releases().len(), "full update finished");
        Ok(())
    }

    /// Merges recent changes into the current snapshot; publishes and
    /// persists only when something actually changed.
    pub async fn run_incremental_update(&self) -> Result<(), PersistenceError> {
        let current = self.store.current();
        let next = self.builder.incremental_update(&self.versions, &current).await;

        if next == *current {
            return Ok(());
        }

        self.store.publish(next.clone());
        self.persistence.update_all_repos(&next).await?;

        info!(releases = next.all_releases().len(), "incremental update published");
        Ok(())
    }

    /// Runs forever: one full update at startup, then full updates on the
    /// long interval and incremental updates on the short one. A failed
    /// cycle never stops the next tick.
    pub async fn run(&self) {
        if let Err(update_error) = self.run_full_update().await {
            error!(error = %update_error, "full update failed");
        }

        let mut full = tokio::time::interval(config::FULL_UPDATE_INTERVAL);
        let mut incremental = tokio::time::interval(config::INCREMENTAL_UPDATE_INTERVAL);
        // the immediate first tick of each interval is already covered above
        full.tick().await;
        incremental.tick().await;

        loop {
            tokio::select! {
                _ = full.tick() => {
                    if let Err(update_error) = self.run_full_update().await {
                        error!(error = %update_error, "full update failed");
                    }
                }
                _ = incremental.tick() => {
                    if let Err(update_error) = self.run_incremental_update().await {
                        error!(error = %update_error, "incremental update failed");
                    }
                }
            }
        }
    }
}
