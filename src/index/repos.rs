//! Aggregate index over every tracked feature version

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::index::filters::ReleaseFilter;
use crate::index::releases::Releases;
use crate::models::{Release, SortOrder};

/// All releases published for a single feature version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRelease {
    pub feature_version: u32,
    pub releases: Releases,
}

impl FeatureRelease {
    pub fn new(feature_version: u32, releases: Releases) -> Self {
        Self {
            feature_version,
            releases,
        }
    }
}

/// Immutable snapshot of the whole index, keyed by feature version.
///
/// `all_releases` is a flattened view across versions, rebuilt whenever the
/// snapshot is constructed so cross-version queries stay a single ordered
/// scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AdoptReposWire")]
pub struct AdoptRepos {
    repos: BTreeMap<u32, FeatureRelease>,
    #[serde(skip_serializing)]
    all_releases: Releases,
}

#[derive(Deserialize)]
struct AdoptReposWire {
    repos: BTreeMap<u32, FeatureRelease>,
}

impl From<AdoptReposWire> for AdoptRepos {
    fn from(wire: AdoptReposWire) -> Self {
        AdoptRepos::new(wire.repos.into_values().collect())
    }
}

impl AdoptRepos {
    pub fn new(feature_releases: Vec<FeatureRelease>) -> Self {
        let repos: BTreeMap<u32, FeatureRelease> = feature_releases
            .into_iter()
            .map(|f| (f.feature_version, f))
            .collect();
        let all_releases = Releases::new(
            repos
                .values()
                .flat_map(|f| f.releases.nodes().values().cloned())
                .collect(),
        );

        Self { repos, all_releases }
    }

    pub fn empty() -> Self {
        AdoptRepos::new(vec![])
    }

    pub fn repos(&self) -> &BTreeMap<u32, FeatureRelease> {
        &self.repos
    }

    pub fn feature_release(&self, feature_version: u32) -> Option<&FeatureRelease> {
        self.repos.get(&feature_version)
    }

    pub fn all_releases(&self) -> &Releases {
        &self.all_releases
    }

    /// Releases across every feature version, filtered and ordered.
    pub fn filtered_releases<'a>(
        &'a self,
        filter: &'a ReleaseFilter,
        sort_order: SortOrder,
    ) -> Box<dyn Iterator<Item = &'a Release> + 'a> {
        self.all_releases.filtered(filter, sort_order)
    }

    /// Returns a new snapshot with `new_releases` merged into the named
    /// feature version, creating it if it was not tracked before.
    pub fn add_releases(&self, feature_version: u32, new_releases: Vec<Release>) -> AdoptRepos {
        let updated = match self.repos.get(&feature_version) {
            Some(feature) => feature.releases.add(new_releases),
            None => Releases::new(new_releases),
        };

        let mut repos = self.repos.clone();
        repos.insert(feature_version, FeatureRelease::new(feature_version, updated));
        AdoptRepos::new(repos.into_values().collect())
    }

    pub fn remove_release(&self, feature_version: u32, id: &str) -> AdoptRepos {
        let mut repos = self.repos.clone();
        if let Some(feature) = repos.get(&feature_version) {
            let reduced = FeatureRelease::new(feature_version, feature.releases.remove(id));
            repos.insert(feature_version, reduced);
        }
        AdoptRepos::new(repos.into_values().collect())
    }
}
