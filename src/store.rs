//! Published index snapshot shared between the updater and the query surface
//!
//! Readers clone an `Arc` to the current snapshot and work on it without
//! locking anything else; the updater swaps in a replacement atomically.

use std::sync::{Arc, RwLock};

use tracing::warn;

use crate::index::{AdoptRepos, BinaryFilter, QueryError, ReleaseFilter, paginate};
use crate::models::{Release, SortOrder};
use crate::persistence::{ApiPersistence, PersistenceError};

pub struct ApiDataStore {
    current: RwLock<Arc<AdoptRepos>>,
}

impl ApiDataStore {
    pub fn new(repos: AdoptRepos) -> Self {
        Self {
            current: RwLock::new(Arc::new(repos)),
        }
    }

    pub fn empty() -> Self {
        Self::new(AdoptRepos::empty())
    }

    /// Loads every stored feature version. Versions without a document are
    /// skipped, so a cold start simply begins with an empty index.
    pub async fn load(persistence: &dyn ApiPersistence, versions: &[u32]) -> Self {
        let mut features = Vec::new();
        for &version in versions {
            match persistence.read_release_data(version).await {
                Ok(feature) => features.push(feature),
                Err(PersistenceError::NotFound(_)) => {}
                Err(error) => warn!(version, %error, "stored release data unreadable, skipping"),
            }
        }
        Self::new(AdoptRepos::new(features))
    }

    /// The currently published snapshot.
    pub fn current(&self) -> Arc<AdoptRepos> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Atomically replaces the published snapshot. Readers holding the old
    /// one keep a consistent view until they drop it.
    pub fn publish(&self, repos: AdoptRepos) {
        let next = Arc::new(repos);
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    /// Query surface: releases matching the release filter, with their
    /// binaries reduced by the binary filter, releases left without any
    /// binary dropped, then paginated.
    pub fn get_filtered_releases(
        &self,
        release_filter: &ReleaseFilter,
        binary_filter: &BinaryFilter,
        sort_order: SortOrder,
        page_size: Option<usize>,
        page: Option<usize>,
    ) -> Result<Vec<Release>, QueryError> {
        let snapshot = self.current();
        let releases: Vec<Release> = snapshot
            .filtered_releases(release_filter, sort_order)
            .map(|release| release.filter_binaries(|binary| binary_filter.matches(binary)))
            .filter(|release| !release.binaries.is_empty())
            .collect();

        paginate(releases, page_size, page)
    }
}
