//! Deployment configuration.
//!
//! Handles loading, validating, and merging an optional `config.toml` placed
//! at the asset root. Stock defaults are overridden by the user file; only
//! the keys being changed need to appear.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! thumbs_dir = "thumbs"          # Never treated as a category
//!
//! [paths]
//! # asset_prefix = "photos"      # Prefix of `full` paths (default: asset root as given)
//! # thumb_prefix = "photos/thumbs" # Prefix of `thumb` paths (default: <asset_prefix>/<thumbs_dir>)
//!
//! [descriptions]
//! convention = "auto"            # auto | plain | structured
//!
//! [categories]
//! default_order = 999            # Rank for categories not listed below
//!
//! [categories.order]
//! kazan = 1
//! peterburg = 2
//! other = 3
//!
//! [categories.subcategory_order]
//! other = ["moscow", "irbis", "hands"]
//!
//! [processing]
//! max_processes = 4              # Parallel EXIF readers (omit for auto = CPU cores)
//! ```
//!
//! ## Extending the order table
//!
//! Tables merge key by key, so adding a category rank keeps the stock ones:
//!
//! ```toml
//! [categories.order]
//! moscow = 4
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::descriptions::Convention;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Manifest build configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestConfig {
    /// Directory directly under the asset root that holds thumbnails.
    pub thumbs_dir: String,
    /// Prefixes used to build `full` and `thumb` paths.
    pub paths: PathsConfig,
    /// Which description files are read.
    pub descriptions: DescriptionsConfig,
    /// Category ranking.
    pub categories: CategoriesConfig,
    /// Parallel metadata extraction settings.
    pub processing: ProcessingConfig,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            thumbs_dir: "thumbs".to_string(),
            paths: PathsConfig::default(),
            descriptions: DescriptionsConfig::default(),
            categories: CategoriesConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl ManifestConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thumbs_dir.is_empty() {
            return Err(ConfigError::Validation("thumbs_dir must not be empty".into()));
        }
        if self.thumbs_dir.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "thumbs_dir must be a single directory name".into(),
            ));
        }
        let default_order = self.categories.default_order;
        if let Some((name, rank)) = self
            .categories
            .order
            .iter()
            .find(|&(_, &rank)| rank >= default_order)
        {
            return Err(ConfigError::Validation(format!(
                "categories.order.{name} = {rank} must be below categories.default_order ({default_order})"
            )));
        }
        Ok(())
    }
}

/// Path prefixes written into the manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Prefix of every `full` path. When absent, the asset root as passed
    /// to the scanner.
    pub asset_prefix: Option<String>,
    /// Prefix of every `thumb` path. When absent, `<asset_prefix>/<thumbs_dir>`.
    pub thumb_prefix: Option<String>,
}

/// Description file settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DescriptionsConfig {
    pub convention: Convention,
}

/// Category ranking table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoriesConfig {
    /// Rank given to category names missing from `order`.
    pub default_order: u32,
    /// Category name → rank. Lower ranks come first.
    pub order: BTreeMap<String, u32>,
    /// Category name → subcategory names visited first, in this order.
    /// Subcategories not listed follow in natural order.
    pub subcategory_order: BTreeMap<String, Vec<String>>,
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            default_order: 999,
            order: BTreeMap::from([
                ("kazan".to_string(), 1),
                ("peterburg".to_string(), 2),
                ("other".to_string(), 3),
            ]),
            subcategory_order: BTreeMap::from([(
                "other".to_string(),
                vec!["moscow".to_string(), "irbis".to_string(), "hands".to_string()],
            )]),
        }
    }
}

impl CategoriesConfig {
    /// Rank of a category name (case-sensitive).
    pub fn rank(&self, category: &str) -> u32 {
        self.order
            .get(category)
            .copied()
            .unwrap_or(self.default_order)
    }

    /// Configured position of a subcategory within its category, if listed.
    pub fn subcategory_position(&self, category: &str, subcategory: &str) -> Option<usize> {
        self.subcategory_order
            .get(category)?
            .iter()
            .position(|name| name == subcategory)
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel EXIF readers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// Base layer that user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ManifestConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ManifestConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ManifestConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the asset root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<ManifestConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Gallery Manifest Configuration
# ==============================
# All settings are optional. Place this file at the root of the photo
# directory. Values shown below are the defaults; each key only needs to
# appear if you want to change it. Unknown keys will cause an error.

# Directory under the photo root that holds generated thumbnails.
# It is never treated as a category.
thumbs_dir = "thumbs"

# ---------------------------------------------------------------------------
# Paths written into the manifest
# ---------------------------------------------------------------------------
[paths]
# Prefix of every "full" path. Defaults to the photo root as passed on the
# command line.
# asset_prefix = "photos"

# Prefix of every "thumb" path. Defaults to <asset_prefix>/<thumbs_dir>.
# thumb_prefix = "photos/thumbs"

# ---------------------------------------------------------------------------
# Description files
# ---------------------------------------------------------------------------
[descriptions]
# auto       - _category.txt if present, otherwise description.txt
# plain      - description.txt only (whole file = category description)
# structured - _category.txt only (#CATEGORY and #PHOTOS sections)
convention = "auto"

# ---------------------------------------------------------------------------
# Category ranking
# ---------------------------------------------------------------------------
[categories]
# Rank given to categories not listed in [categories.order].
# Must be larger than every listed rank.
default_order = 999

# Category directory name -> rank. Lower ranks come first.
# Entries here are added to the stock table, not replacing it.
[categories.order]
kazan = 1
peterburg = 2
other = 3

# Category -> subcategories whose photos come first, in this order.
# Unlisted subcategories follow in natural order.
[categories.subcategory_order]
other = ["moscow", "irbis", "hands"]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel EXIF readers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
