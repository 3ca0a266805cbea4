//! # Gallery Manifest
//!
//! Builds the JSON document a static photo-gallery front-end reads. The
//! filesystem is the data source: top-level directories under the asset root
//! become categories, their immediate subdirectories become subcategories,
//! and image files become photos.
//!
//! ```text
//! photos/  →  scan  →  Manifest  →  photos_data.json
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the asset root and assembles the manifest |
//! | [`naming`] | Natural ("human") filename ordering and extension splitting |
//! | [`metadata`] | EXIF capture date extraction and display-text resolution |
//! | [`descriptions`] | `description.txt` / `_category.txt` parsing |
//! | [`types`] | The manifest document: categories, subcategories, photos |
//! | [`serialize`] | Writing and re-reading the JSON document |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Determinism
//!
//! Given the same tree on disk, a scan produces byte-identical JSON. Nothing
//! depends on the order the OS lists directory entries in: categories are
//! ordered by configured rank, photos by natural filename order, and maps
//! serialize with sorted keys.
//!
//! # Failure model
//!
//! Structural problems (missing asset root, unreadable directory, invalid
//! config) abort the run before anything is written. Per-photo problems
//! (no EXIF, unparseable date) are warnings: the photo is kept with a null
//! date and the warning is logged and returned alongside the manifest.

pub mod config;
pub mod descriptions;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod scan;
pub mod serialize;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
