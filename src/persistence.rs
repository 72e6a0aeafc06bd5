//! Durable storage of the release index
//!
//! One JSON document per feature version. Writes go through a temporary
//! file and a rename so a crashed write never leaves a half document.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use crate::index::{AdoptRepos, FeatureRelease};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("no stored data for feature version {0}")]
    NotFound(u32),
}

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ApiPersistence: Send + Sync {
    async fn update_all_repos(&self, repos: &AdoptRepos) -> Result<(), PersistenceError>;

    async fn write_releases(
        &self,
        feature_version: u32,
        feature_release: &FeatureRelease,
    ) -> Result<(), PersistenceError>;

    async fn read_release_data(&self, feature_version: u32)
    -> Result<FeatureRelease, PersistenceError>;
}

pub struct JsonFilePersistence {
    dir: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn document_path(&self, feature_version: u32) -> PathBuf {
        self.dir.join(format!("{feature_version}.json"))
    }
}

#[async_trait::async_trait]
impl ApiPersistence for JsonFilePersistence {
    async fn update_all_repos(&self, repos: &AdoptRepos) -> Result<(), PersistenceError> {
        for (feature_version, feature_release) in repos.repos() {
            self.write_releases(*feature_version, feature_release).await?;
        }
        Ok(())
    }

    async fn write_releases(
        &self,
        feature_version: u32,
        feature_release: &FeatureRelease,
    ) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;

        let document = serde_json::to_vec(feature_release)?;
        let path = self.document_path(feature_version);
        let tmp_path = self.dir.join(format!("{feature_version}.json.tmp"));

        fs::write(&tmp_path, document)?;
        fs::rename(&tmp_path, &path)?;

        debug!(feature_version, path = %path.display(), "feature release stored");
        Ok(())
    }

    async fn read_release_data(
        &self,
        feature_version: u32,
    ) -> Result<FeatureRelease, PersistenceError> {
        let path = self.document_path(feature_version);
        if !path.exists() {
            return Err(PersistenceError::NotFound(feature_version));
        }

        let document = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&document)?)
    }
}
