//! OCI document handling: manifest/index discrimination, platform
//! selection, and description-label extraction.
//!
//! Data structures come from the `oci-spec` crate; this module adds the
//! wire-format branching the resolution chain needs.

pub use oci_spec::image::{
    Descriptor, ImageConfiguration, ImageIndex, ImageManifest, Platform,
};

use crate::error::{Result, ScryError};

#[cfg(test)]
mod tests;

/// The label key carrying a human-readable image description.
pub const DESCRIPTION_LABEL: &str = "org.opencontainers.image.description";

/// Either a single-platform image manifest or a multi-platform index.
///
/// A manifest-by-reference fetch may return either document; the media
/// type decides which, with a structural fallback for registries that
/// omit it.
#[derive(Debug, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum ManifestOrIndex {
    /// A single-platform image manifest
    Manifest(ImageManifest),
    /// A multi-platform image index
    Index(ImageIndex),
}

impl ManifestOrIndex {
    /// Parses manifest bytes, detecting whether they hold a manifest or
    /// an index.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| ScryError::validation_with_source("Failed to parse manifest JSON", e))?;

        let media_type = value
            .get("mediaType")
            .and_then(|v| v.as_str())
            .unwrap_or("");

        if media_type.contains("index") || media_type.contains("list") {
            let index: ImageIndex = serde_json::from_slice(bytes)
                .map_err(|e| ScryError::validation_with_source("Failed to parse image index", e))?;
            Ok(ManifestOrIndex::Index(index))
        } else if media_type.contains("manifest") {
            let manifest: ImageManifest = serde_json::from_slice(bytes).map_err(|e| {
                ScryError::validation_with_source("Failed to parse image manifest", e)
            })?;
            Ok(ManifestOrIndex::Manifest(manifest))
        } else if value.get("manifests").is_some() {
            // No usable mediaType; a "manifests" array marks an index.
            let index: ImageIndex = serde_json::from_slice(bytes)
                .map_err(|e| ScryError::validation_with_source("Failed to parse image index", e))?;
            Ok(ManifestOrIndex::Index(index))
        } else if value.get("layers").is_some() || value.get("config").is_some() {
            let manifest: ImageManifest = serde_json::from_slice(bytes).map_err(|e| {
                ScryError::validation_with_source("Failed to parse image manifest", e)
            })?;
            Ok(ManifestOrIndex::Manifest(manifest))
        } else {
            Err(ScryError::validation(
                "Unable to determine if content is a manifest or index",
            ))
        }
    }

    /// The config blob digest, when this is a single-platform manifest.
    pub fn config_digest(&self) -> Option<String> {
        match self {
            ManifestOrIndex::Manifest(m) => Some(m.config().digest().to_string()),
            ManifestOrIndex::Index(_) => None,
        }
    }

    /// Returns the index if this is a multi-platform image.
    pub fn as_index(&self) -> Option<&ImageIndex> {
        match self {
            ManifestOrIndex::Manifest(_) => None,
            ManifestOrIndex::Index(i) => Some(i),
        }
    }
}

/// Selects one descriptor from a multi-platform index.
///
/// Prefers an exact `(os, architecture)` match; otherwise falls back to
/// the first listed entry. An empty index yields `None`.
pub fn select_platform<'a>(index: &'a ImageIndex, os: &str, arch: &str) -> Option<&'a Descriptor> {
    index
        .manifests()
        .iter()
        .find(|desc| {
            desc.platform().as_ref().is_some_and(|p| {
                p.os().to_string() == os && p.architecture().to_string() == arch
            })
        })
        .or_else(|| index.manifests().first())
}

/// Extracts the description label from a config blob.
///
/// Returns `None` when the blob is not a parsable image configuration;
/// `Some("")` when it parses but carries no description label.
pub fn description_from_config(bytes: &[u8]) -> Option<String> {
    let configuration: ImageConfiguration = serde_json::from_slice(bytes).ok()?;

    let label = configuration
        .config()
        .as_ref()
        .and_then(|c| c.labels().as_ref())
        .and_then(|labels| labels.get(DESCRIPTION_LABEL))
        .map(|value| value.trim().to_string())
        .unwrap_or_default();

    Some(label)
}
