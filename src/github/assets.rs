//! Asset-to-binary classification
//!
//! Only whitelisted archive assets become binaries. Attributes come from
//! the file name unless a sidecar metadata descriptor names the asset, in
//! which case the descriptor wins. Checksums travel either inside the
//! descriptor or in a companion `.sha256.txt` asset whose body is fetched
//! lazily, at most one call per asset.

use futures::future::join_all;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::warn;

use crate::github::models::{GHAsset, GHAssets, GHMetaData, parse_github_time};
use crate::github::transport::HttpFetcher;
use crate::models::{
    Binary, ClassificationError, FileNameMatcher, HeapSize, ImageType, JvmImpl, from_file_name,
};

pub const ARCHIVE_WHITELIST: &[&str] = &[".tar.gz", ".zip"];

#[derive(Debug, Error)]
pub enum AssetError {
    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error("bad asset timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

fn is_archive(name: &str) -> bool {
    ARCHIVE_WHITELIST.iter().any(|suffix| name.ends_with(suffix))
}

/// Downloads and decodes every sidecar descriptor of a release, keyed by
/// descriptor file name. Unreadable descriptors are dropped with a warning.
pub async fn fetch_release_metadata(
    assets: &GHAssets,
    fetcher: &dyn HttpFetcher,
) -> IndexMap<String, GHMetaData> {
    let descriptors: Vec<&GHAsset> = assets
        .assets
        .iter()
        .filter(|a| a.name.ends_with(".json"))
        .collect();

    let bodies = join_all(descriptors.iter().map(|a| fetcher.fetch(&a.download_url))).await;

    descriptors
        .into_iter()
        .zip(bodies)
        .filter_map(|(asset, body)| match body {
            Ok(body) => match serde_json::from_str::<GHMetaData>(&body) {
                Ok(metadata) => Some((asset.name.clone(), metadata)),
                Err(error) => {
                    warn!(asset = %asset.name, %error, "unreadable metadata descriptor");
                    None
                }
            },
            Err(error) => {
                warn!(asset = %asset.name, %error, "metadata descriptor fetch failed");
                None
            }
        })
        .collect()
}

/// A descriptor names its binary: the binary file name is a prefix of the
/// descriptor file name.
pub fn metadata_for<'m>(
    metadata: &'m IndexMap<String, GHMetaData>,
    binary_name: &str,
) -> Option<&'m GHMetaData> {
    metadata
        .iter()
        .find(|(name, _)| name.starts_with(binary_name))
        .map(|(_, m)| m)
}

/// Classifies every whitelisted asset of a release, fetching checksums
/// concurrently. Assets that cannot be classified are skipped, never
/// failing the release.
pub async fn to_binary_list(
    assets: &GHAssets,
    metadata: &IndexMap<String, GHMetaData>,
    fetcher: &dyn HttpFetcher,
) -> Vec<Binary> {
    let archives: Vec<&GHAsset> = assets.assets.iter().filter(|a| is_archive(&a.name)).collect();

    let results = join_all(archives.iter().map(|&asset| {
        to_binary(asset, &assets.assets, metadata_for(metadata, &asset.name), fetcher)
    }))
    .await;

    results
        .into_iter()
        .zip(archives)
        .filter_map(|(result, asset)| match result {
            Ok(binary) => Some(binary),
            Err(error) => {
                warn!(asset = %asset.name, %error, "skipping unclassifiable asset");
                None
            }
        })
        .collect()
}

async fn to_binary(
    asset: &GHAsset,
    siblings: &[GHAsset],
    metadata: Option<&GHMetaData>,
    fetcher: &dyn HttpFetcher,
) -> Result<Binary, AssetError> {
    let updated_at = parse_github_time(&asset.updated_at)?;

    let os = resolve_attribute(metadata.and_then(|m| m.os.as_deref()), &asset.name, None)?;
    let architecture =
        resolve_attribute(metadata.and_then(|m| m.arch.as_deref()), &asset.name, None)?;
    let image_type = resolve_attribute(
        metadata.and_then(|m| m.binary_type.as_deref()),
        &asset.name,
        Some(ImageType::Jdk),
    )?;
    let jvm_impl = resolve_attribute(
        metadata.and_then(|m| m.variant.as_deref()),
        &asset.name,
        Some(JvmImpl::Hotspot),
    )?;
    let heap_size = from_file_name(&asset.name, Some(HeapSize::Normal))?;

    let checksum_link = checksum_link(&asset.name, siblings);
    let checksum = match metadata.and_then(|m| m.sha256.clone()) {
        Some(sum) => Some(sum),
        None => match &checksum_link {
            Some(link) => fetch_checksum(link, fetcher).await,
            None => None,
        },
    };

    Ok(Binary {
        name: asset.name.clone(),
        link: asset.download_url.clone(),
        size: asset.size,
        download_count: asset.download_count,
        updated_at,
        scm_ref: metadata
            .and_then(|m| m.scm_ref.clone())
            .filter(|s| !s.is_empty()),
        checksum,
        checksum_link,
        installer_name: None,
        installer_link: None,
        installer_size: None,
        installer_checksum: None,
        installer_checksum_link: None,
        heap_size,
        os,
        architecture,
        image_type,
        jvm_impl,
    })
}

/// Metadata values are single tokens; an unknown value falls back to
/// file-name inference.
fn resolve_attribute<T: FileNameMatcher>(
    metadata_value: Option<&str>,
    file_name: &str,
    default: Option<T>,
) -> Result<T, ClassificationError> {
    if let Some(value) = metadata_value {
        let value = value.to_lowercase();
        if let Some(variant) = T::variants()
            .iter()
            .copied()
            .find(|v| v.file_name_tokens().contains(&value.as_str()))
        {
            return Ok(variant);
        }
    }
    from_file_name(file_name, default)
}

/// Locates the companion checksum asset, either `<name>.sha256.txt` or the
/// variant derived from the name before its first dot.
fn checksum_link(asset_name: &str, siblings: &[GHAsset]) -> Option<String> {
    let exact = format!("{asset_name}.sha256.txt");
    if let Some(asset) = siblings.iter().find(|a| a.name == exact) {
        return Some(asset.download_url.clone());
    }

    let base = asset_name.split('.').next()?;
    let derived = format!("{base}.sha256.txt");
    siblings
        .iter()
        .find(|a| a.name == derived)
        .map(|a| a.download_url.clone())
}

async fn fetch_checksum(link: &str, fetcher: &dyn HttpFetcher) -> Option<String> {
    match fetcher.fetch(link).await {
        // bodies look like "<hash>  <file name>"
        Ok(body) => body.split_whitespace().next().map(str::to_string),
        Err(error) => {
            warn!(link, %error, "checksum fetch failed");
            None
        }
    }
}
