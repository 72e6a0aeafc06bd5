//! Timestamp-ordered, id-keyed release collection

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::index::filters::ReleaseFilter;
use crate::models::{Release, SortOrder};

/// Immutable collection of releases for one feature version.
///
/// Releases are keyed by id (one release per id) and iterated in ascending
/// timestamp order, ties broken by insertion order. Every mutation returns
/// a new collection; a published one is never touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ReleasesWire")]
pub struct Releases {
    nodes: IndexMap<String, Release>,
}

#[derive(Deserialize)]
struct ReleasesWire {
    nodes: IndexMap<String, Release>,
}

impl From<ReleasesWire> for Releases {
    fn from(wire: ReleasesWire) -> Self {
        // stored documents are not trusted to be ordered
        Releases::new(wire.nodes.into_values().collect())
    }
}

impl Releases {
    pub fn new(releases: Vec<Release>) -> Self {
        let mut releases = releases;
        releases.sort_by_key(|r| r.timestamp);

        Self {
            nodes: releases.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }

    pub fn nodes(&self) -> &IndexMap<String, Release> {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn has_release_id(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// True when the release is unknown or its timestamp differs from the
    /// stored one; drives the incremental merge.
    pub fn has_release_been_updated(&self, id: &str, timestamp: NaiveDateTime) -> bool {
        self.nodes.get(id).is_none_or(|r| r.timestamp != timestamp)
    }

    /// Releases in the requested timestamp order.
    pub fn releases(&self, sort_order: SortOrder) -> Box<dyn Iterator<Item = &Release> + '_> {
        match sort_order {
            SortOrder::Asc => Box::new(self.nodes.values()),
            SortOrder::Desc => Box::new(self.nodes.values().rev()),
        }
    }

    pub fn filtered<'a>(
        &'a self,
        filter: &'a ReleaseFilter,
        sort_order: SortOrder,
    ) -> Box<dyn Iterator<Item = &'a Release> + 'a> {
        Box::new(self.releases(sort_order).filter(move |r| filter.matches(r)))
    }

    /// Returns a new collection with `new_releases` merged in; an incoming
    /// release replaces any stored one with the same id.
    pub fn add(&self, new_releases: Vec<Release>) -> Releases {
        let mut nodes = self.nodes.clone();
        for release in new_releases {
            nodes.shift_remove(&release.id);
            nodes.insert(release.id.clone(), release);
        }
        Releases::new(nodes.into_values().collect())
    }

    pub fn remove(&self, id: &str) -> Releases {
        let mut nodes = self.nodes.clone();
        nodes.shift_remove(id);
        Releases { nodes }
    }

    /// Keeps only the releases whose ids appear in `ids`.
    pub fn retain(&self, ids: &[String]) -> Releases {
        Releases {
            nodes: self
                .nodes
                .iter()
                .filter(|(id, _)| ids.contains(id))
                .map(|(id, r)| (id.clone(), r.clone()))
                .collect(),
        }
    }
}
