//! Filesystem scanning and manifest assembly.
//!
//! Walks the asset root two levels deep and turns it into a [`Manifest`].
//!
//! ## Directory Structure
//!
//! ```text
//! photos/                          # Asset root
//! ├── config.toml                  # Optional, see crate::config
//! ├── thumbs/                      # Reserved: thumbnails, never a category
//! │   └── kazan/1-thumb.jpg
//! ├── kazan/                       # Category
//! │   ├── _category.txt            # Descriptions (or description.txt)
//! │   ├── 1.jpg
//! │   ├── 2.jpg
//! │   └── old/                     # Subcategory
//! │       ├── description.txt
//! │       └── 3.jpg
//! └── peterburg/
//!     └── ...
//! ```
//!
//! Deeper directories are ignored, as are entries whose name starts with a
//! dot and files that are not `.jpg`, `.jpeg` or `.png` (any case).
//!
//! ## Ordering
//!
//! Categories are visited by rank from the config order table, ties broken
//! by natural order of the name. Inside a category its own photos come
//! first, then each subcategory's photos; subcategories listed in the config
//! come first in listed order, the rest in natural order. Photos within a
//! directory are in natural filename order. The result does not depend on
//! the order the filesystem lists entries in.
//!
//! ## Derived fields
//!
//! For `kazan/old/3.jpg` with default prefixes:
//!
//! ```text
//! full  = photos/kazan/old/3.jpg
//! thumb = photos/thumbs/kazan/old/3-thumb.jpg
//! alt   = authored description, else "kazan old 3"
//! date  = EXIF DateTimeOriginal as DD-MM-YYYY, else null
//! ```
//!
//! ## Failures
//!
//! An unreadable asset root, category or subcategory directory aborts the
//! scan. Symlinks are followed; an entry that can't be stat'ed (dangling
//! link) is logged and skipped. A missing capture date does not abort
//! either: it is logged, recorded in [`ScanResult::warnings`], and the photo
//! gets `date: null`.

use crate::config::{self, ManifestConfig};
use crate::descriptions::{self, Descriptions};
use crate::metadata::{self, MetadataWarning};
use crate::naming;
use crate::types::{Category, Manifest, Photo, Subcategory};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Asset root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("Cannot read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// A photo whose capture date could not be resolved.
#[derive(Debug)]
pub struct PhotoWarning {
    /// Path relative to the asset root, `/`-separated.
    pub photo: String,
    pub warning: MetadataWarning,
}

/// Everything a scan produces.
#[derive(Debug)]
pub struct ScanResult {
    pub manifest: Manifest,
    pub warnings: Vec<PhotoWarning>,
}

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Scan `root`, reading `config.toml` from it (stock defaults when absent).
pub fn scan(root: &Path) -> Result<ScanResult, ScanError> {
    let config = config::load_config(root)?;
    scan_with_config(root, &config)
}

/// Scan `root` with an already-loaded config.
pub fn scan_with_config(root: &Path, config: &ManifestConfig) -> Result<ScanResult, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let prefixes = Prefixes::new(root, config);
    let mut categories = BTreeMap::new();
    let mut photos = Vec::new();
    let mut warnings = Vec::new();

    let mut category_dirs: Vec<Entry> = list_dir(root)?
        .dirs
        .into_iter()
        .filter(|dir| dir.name != config.thumbs_dir)
        .collect();
    category_dirs.sort_by(|a, b| {
        config
            .categories
            .rank(&a.name)
            .cmp(&config.categories.rank(&b.name))
            .then_with(|| naming::natural_cmp(&a.name, &b.name))
    });

    for Entry { name, path: dir } in category_dirs {
        let listing = list_dir(&dir)?;
        let descriptions = descriptions::read_descriptions(&dir, config.descriptions.convention);
        let order = config.categories.rank(&name);
        debug!(category = %name, order, photos = listing.images.len(), "scanning category");

        let location = Location {
            category: &name,
            subcategory: None,
        };
        collect_photos(
            &location,
            &listing.images,
            &descriptions,
            &prefixes,
            &mut photos,
            &mut warnings,
        );

        let mut sub_dirs = listing.dirs;
        sub_dirs.sort_by(|a, b| {
            let pos_a = config.categories.subcategory_position(&name, &a.name);
            let pos_b = config.categories.subcategory_position(&name, &b.name);
            match (pos_a, pos_b) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => naming::natural_cmp(&a.name, &b.name),
            }
        });

        let mut subcategories = BTreeMap::new();
        for Entry {
            name: sub_name,
            path: sub_dir,
        } in sub_dirs
        {
            let sub_listing = list_dir(&sub_dir)?;
            let sub_descriptions =
                descriptions::read_descriptions(&sub_dir, config.descriptions.convention);

            let location = Location {
                category: &name,
                subcategory: Some(sub_name.as_str()),
            };
            collect_photos(
                &location,
                &sub_listing.images,
                &sub_descriptions,
                &prefixes,
                &mut photos,
                &mut warnings,
            );

            subcategories.insert(
                sub_name,
                Subcategory {
                    description: sub_descriptions.text,
                },
            );
        }

        categories.insert(
            name,
            Category {
                description: descriptions.text,
                order,
                subcategories,
            },
        );
    }

    Ok(ScanResult {
        manifest: Manifest { categories, photos },
        warnings,
    })
}

/// A directory child: its display name and the path to reach it.
///
/// `name` is lossy for names that aren't valid UTF-8; `path` is the real
/// one and is what every filesystem call uses.
#[derive(Debug)]
struct Entry {
    name: String,
    path: PathBuf,
}

impl AsRef<str> for Entry {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

/// Immediate children of a directory, split by kind. Images are in natural order.
#[derive(Debug, Default)]
struct Listing {
    dirs: Vec<Entry>,
    images: Vec<Entry>,
}

fn list_dir(path: &Path) -> Result<Listing, ScanError> {
    let mut listing = Listing::default();

    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            // A child that can't be stat'ed (dangling symlink, link loop).
            Err(err) if err.depth() > 0 => {
                warn!(path = ?err.path(), error = %err, "skipping unreadable entry");
                continue;
            }
            Err(source) => {
                return Err(ScanError::ReadDir {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        if entry.file_name().to_str().is_none() {
            warn!(
                path = ?entry.path(),
                name = %name,
                "name is not valid UTF-8, using lossy form in manifest"
            );
        }

        let file_type = entry.file_type();
        let child = Entry {
            name,
            path: entry.into_path(),
        };
        if file_type.is_dir() {
            listing.dirs.push(child);
        } else if file_type.is_file() && is_image(&child.name) {
            listing.images.push(child);
        }
    }

    naming::sort_natural(&mut listing.images);
    Ok(listing)
}

fn is_image(filename: &str) -> bool {
    let (_, ext) = naming::split_extension(filename);
    let ext = ext.trim_start_matches('.').to_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// Where a directory of photos sits in the category tree.
struct Location<'a> {
    category: &'a str,
    subcategory: Option<&'a str>,
}

impl Location<'_> {
    /// `category` or `category/subcategory`.
    fn rel_dir(&self) -> String {
        match self.subcategory {
            Some(sub) => format!("{}/{}", self.category, sub),
            None => self.category.to_string(),
        }
    }

    /// Alt text used when no description was authored.
    fn fallback_alt(&self, stem: &str) -> String {
        match self.subcategory {
            Some(sub) => format!("{} {} {}", self.category, sub, stem),
            None => format!("{} {}", self.category, stem),
        }
    }
}

/// Path prefixes for `full` and `thumb`, resolved once per scan.
struct Prefixes {
    asset: String,
    thumb: String,
}

impl Prefixes {
    fn new(root: &Path, config: &ManifestConfig) -> Self {
        let asset = config.paths.asset_prefix.clone().unwrap_or_else(|| {
            root.to_string_lossy()
                .replace('\\', "/")
                .trim_end_matches('/')
                .to_string()
        });
        let thumb = config
            .paths
            .thumb_prefix
            .clone()
            .unwrap_or_else(|| join_path(&[asset.as_str(), config.thumbs_dir.as_str()]));
        Self { asset, thumb }
    }
}

/// Join `/`-separated path parts, skipping empty ones and doubled slashes.
fn join_path(parts: &[&str]) -> String {
    let mut joined = String::new();
    for part in parts {
        let part = if joined.is_empty() {
            part.trim_end_matches('/')
        } else {
            part.trim_matches('/')
        };
        if part.is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push('/');
        }
        joined.push_str(part);
    }
    joined
}

/// Append one directory's photos (already in natural order) to `photos`.
///
/// Capture dates are probed in parallel; results come back in input order.
fn collect_photos(
    location: &Location<'_>,
    images: &[Entry],
    descriptions: &Descriptions,
    prefixes: &Prefixes,
    photos: &mut Vec<Photo>,
    warnings: &mut Vec<PhotoWarning>,
) {
    let probes: Vec<_> = images
        .par_iter()
        .map(|image| metadata::probe_capture_date(&image.path))
        .collect();

    let rel_dir = location.rel_dir();
    for (image, probe) in images.iter().zip(probes) {
        let filename = image.name.as_str();
        let (stem, ext) = naming::split_extension(filename);
        let authored = descriptions
            .for_photo(filename)
            .map(str::trim)
            .filter(|text| !text.is_empty());

        if let Some(warning) = probe.warning {
            let photo = format!("{rel_dir}/{filename}");
            warn!(photo = %photo, error = %warning, "capture date unavailable");
            warnings.push(PhotoWarning { photo, warning });
        }

        photos.push(Photo {
            thumb: join_path(&[
                prefixes.thumb.as_str(),
                rel_dir.as_str(),
                format!("{stem}-thumb{ext}").as_str(),
            ]),
            full: join_path(&[prefixes.asset.as_str(), rel_dir.as_str(), filename]),
            category: location.category.to_string(),
            subcategory: location.subcategory.map(String::from),
            alt: authored
                .map(String::from)
                .unwrap_or_else(|| location.fallback_alt(stem)),
            description: authored.unwrap_or_default().to_string(),
            date: probe.date,
        });
    }
}
