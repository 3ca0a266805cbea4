//! Reading and writing the manifest document.
//!
//! The document is pretty-printed JSON, UTF-8, with non-ASCII text written
//! verbatim (no `\u` escapes) and a trailing newline. Reading it back checks
//! that every photo's category and subcategory are keys of the category map.
//!
//! [`build`] is the scan-then-write sequence the CLI runs. The document is
//! only written once the whole scan has succeeded, so a fatal scan error
//! leaves any previous document at the output path as it was.

use crate::config::ManifestConfig;
use crate::scan::{self, ScanError, ScanResult};
use crate::types::Manifest;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestIoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("photo {photo} refers to unknown category {category}")]
    DanglingReference { photo: String, category: String },
}

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Write(#[from] ManifestIoError),
}

/// Scan `root` and write the manifest to `output`.
pub fn build(
    root: &Path,
    config: &ManifestConfig,
    output: &Path,
) -> Result<ScanResult, BuildError> {
    let result = scan::scan_with_config(root, config)?;
    write_manifest(&result.manifest, output)?;
    Ok(result)
}

/// Render the manifest as pretty-printed JSON.
pub fn to_json(manifest: &Manifest) -> Result<String, ManifestIoError> {
    Ok(serde_json::to_string_pretty(manifest)?)
}

/// Write the manifest to `path`, creating parent directories as needed.
pub fn write_manifest(manifest: &Manifest, path: &Path) -> Result<(), ManifestIoError> {
    let mut json = to_json(manifest)?;
    json.push('\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    Ok(())
}

/// Parse a manifest document and check its references.
pub fn from_json(json: &str) -> Result<Manifest, ManifestIoError> {
    let manifest: Manifest = serde_json::from_str(json)?;
    if let Some(photo) = manifest.dangling_photos().first() {
        let category = match &photo.subcategory {
            Some(sub) => format!("{}/{}", photo.category, sub),
            None => photo.category.clone(),
        };
        return Err(ManifestIoError::DanglingReference {
            photo: photo.full.clone(),
            category,
        });
    }
    Ok(manifest)
}

/// Read and validate a manifest file.
pub fn read_manifest(path: &Path) -> Result<Manifest, ManifestIoError> {
    let content = fs::read_to_string(path)?;
    from_json(&content)
}
