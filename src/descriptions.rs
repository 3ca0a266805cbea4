//! Human-authored description text for categories, subcategories and photos.
//!
//! Two file formats are understood. Both live directly in the directory they
//! describe.
//!
//! ## Plain: `description.txt`
//!
//! The whole file, trimmed, is the directory's description. No per-photo text.
//!
//! ## Structured: `_category.txt`
//!
//! Sections introduced by a header line. `#CATEGORY` holds the directory's
//! description; `#PHOTOS` holds one `filename | description` line per photo:
//!
//! ```text
//! #CATEGORY
//! Kazan in the nineties.
//! Mostly scanned negatives.
//! #PHOTOS
//! 1.jpg | Sunset over the Kremlin
//! 2.jpg|Bauman street
//! ```
//!
//! Photo lines split on the first `|`, both halves trimmed. Lines without a
//! `|`, lines before the first header, and sections with unknown headers are
//! skipped. A repeated `#CATEGORY` section replaces the earlier one; a
//! repeated filename replaces its earlier description.
//!
//! ## Choosing a format
//!
//! A leading UTF-8 byte-order mark is ignored in both formats.
//!
//! [`Convention`] comes from config. `auto` (the default) uses the structured
//! file when present and falls back to the plain one. A missing file is not an
//! error: the result is an empty description and no per-photo text.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

pub const PLAIN_FILE: &str = "description.txt";
pub const STRUCTURED_FILE: &str = "_category.txt";

const CATEGORY_HEADER: &str = "#CATEGORY";
const PHOTOS_HEADER: &str = "#PHOTOS";

/// Which description file(s) a deployment reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Convention {
    /// `_category.txt` if present, else `description.txt`.
    #[default]
    Auto,
    Plain,
    Structured,
}

impl Convention {
    /// Formats to try, in priority order.
    fn candidates(self) -> &'static [DescriptionFormat] {
        match self {
            Convention::Auto => &[DescriptionFormat::Structured, DescriptionFormat::Plain],
            Convention::Plain => &[DescriptionFormat::Plain],
            Convention::Structured => &[DescriptionFormat::Structured],
        }
    }
}

/// A description file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionFormat {
    Plain,
    Structured,
}

impl DescriptionFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            DescriptionFormat::Plain => PLAIN_FILE,
            DescriptionFormat::Structured => STRUCTURED_FILE,
        }
    }

    pub fn parse(self, content: &str) -> Descriptions {
        match self {
            DescriptionFormat::Plain => parse_plain(content),
            DescriptionFormat::Structured => parse_structured(content),
        }
    }
}

/// Text recovered for one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptions {
    /// Description of the directory itself.
    pub text: String,
    /// Filename → description.
    pub photos: BTreeMap<String, String>,
    /// Format the text came from; `None` when no file was read.
    pub source: Option<DescriptionFormat>,
}

impl Descriptions {
    pub fn for_photo(&self, filename: &str) -> Option<&str> {
        self.photos.get(filename).map(String::as_str)
    }
}

/// Read the descriptions for `dir` under the given convention.
///
/// Never fails. A candidate file that exists but can't be read is logged
/// and skipped.
pub fn read_descriptions(dir: &Path, convention: Convention) -> Descriptions {
    for &format in convention.candidates() {
        let path = dir.join(format.file_name());
        match fs::read_to_string(&path) {
            Ok(content) => {
                debug!(path = %path.display(), "read descriptions");
                let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
                return format.parse(content);
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable description file");
            }
        }
    }
    Descriptions::default()
}

fn parse_plain(content: &str) -> Descriptions {
    Descriptions {
        text: content.trim().to_string(),
        photos: BTreeMap::new(),
        source: Some(DescriptionFormat::Plain),
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Preamble,
    Category,
    Photos,
    Unknown,
}

fn parse_structured(content: &str) -> Descriptions {
    let mut result = Descriptions {
        source: Some(DescriptionFormat::Structured),
        ..Descriptions::default()
    };
    let mut section = Section::Preamble;
    let mut category_lines: Vec<&str> = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('#') {
            if section == Section::Category {
                result.text = category_lines.join("\n").trim().to_string();
                category_lines.clear();
            }
            section = match trimmed {
                CATEGORY_HEADER => Section::Category,
                PHOTOS_HEADER => Section::Photos,
                _ => Section::Unknown,
            };
            continue;
        }

        match section {
            Section::Category => category_lines.push(line),
            Section::Photos => {
                if let Some((name, text)) = trimmed.split_once('|') {
                    let name = name.trim();
                    if !name.is_empty() {
                        result.photos.insert(name.to_string(), text.trim().to_string());
                    }
                }
            }
            Section::Preamble | Section::Unknown => {}
        }
    }

    if section == Section::Category {
        result.text = category_lines.join("\n").trim().to_string();
    }

    result
}
