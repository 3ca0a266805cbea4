//! CLI output formatting.
//!
//! # Information-First Display
//!
//! The scan listing is a content inventory: every category, subcategory and
//! photo leads with its positional index and name, with descriptions and
//! capture dates as indented context lines. Categories appear in display
//! order (rank, then name), photos in manifest order.
//!
//! ```text
//! Categories
//! 001 kazan (order 1, 2 photos)
//!     Kazan city
//!     001 1.jpg
//!         Description: Sunset
//!         Date: 14-07-2023
//!     002 2.jpg
//!     001 old (1 photo)
//!         001 3.jpg
//!
//! Warnings
//!     kazan/2.jpg: no EXIF data: ...
//! ```
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::scan::ScanResult;
use crate::types::{Manifest, Photo};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
/// Multi-line text is cut at the first line break.
fn truncate_desc(text: &str, max: usize) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    let cut_at_line = first_line.len() < text.trim_end().len();
    if first_line.chars().count() <= max {
        if cut_at_line {
            format!("{first_line}...")
        } else {
            first_line.to_string()
        }
    } else {
        let head: String = first_line.chars().take(max).collect();
        format!("{head}...")
    }
}

fn photo_lines(lines: &mut Vec<String>, photos: &[&Photo], depth: usize) {
    let pad = indent(depth);
    for (i, photo) in photos.iter().enumerate() {
        lines.push(format!("{}{} {}", pad, format_index(i + 1), photo.filename()));
        if !photo.description.is_empty() {
            lines.push(format!(
                "{}    Description: {}",
                pad,
                truncate_desc(&photo.description, 60)
            ));
        }
        if let Some(date) = photo.date {
            lines.push(format!("{}    Date: {}", pad, date));
        }
    }
}

// ============================================================================
// Scan listing
// ============================================================================

/// Format the discovered category tree and any per-photo warnings.
pub fn format_scan_output(result: &ScanResult) -> Vec<String> {
    let manifest = &result.manifest;
    let mut lines = vec!["Categories".to_string()];

    for (i, (name, category)) in manifest.ordered_categories().into_iter().enumerate() {
        let total = manifest.photos.iter().filter(|p| p.category == name).count();
        lines.push(format!(
            "{} {} (order {}, {})",
            format_index(i + 1),
            name,
            category.order,
            plural(total, "photo", "photos")
        ));

        let preview = truncate_desc(&category.description, 60);
        if !preview.is_empty() {
            lines.push(format!("    {}", preview));
        }

        let own: Vec<&Photo> = manifest.photos_in(name, None).collect();
        photo_lines(&mut lines, &own, 1);

        // Subcategories in the order their photos appear in the manifest;
        // empty ones trail in name order.
        let mut subs: Vec<&str> = Vec::new();
        for photo in manifest.photos.iter().filter(|p| p.category == name) {
            if let Some(sub) = photo.subcategory.as_deref() {
                if !subs.contains(&sub) {
                    subs.push(sub);
                }
            }
        }
        for sub in category.subcategories.keys() {
            if !subs.contains(&sub.as_str()) {
                subs.push(sub);
            }
        }

        for (j, sub) in subs.into_iter().enumerate() {
            let photos: Vec<&Photo> = manifest.photos_in(name, Some(sub)).collect();
            lines.push(format!(
                "    {} {} ({})",
                format_index(j + 1),
                sub,
                plural(photos.len(), "photo", "photos")
            ));
            if let Some(subcategory) = category.subcategories.get(sub) {
                let preview = truncate_desc(&subcategory.description, 60);
                if !preview.is_empty() {
                    lines.push(format!("        {}", preview));
                }
            }
            photo_lines(&mut lines, &photos, 2);
        }
    }

    if !result.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for warning in &result.warnings {
            lines.push(format!("    {}: {}", warning.photo, warning.warning));
        }
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(result: &ScanResult) {
    for line in format_scan_output(result) {
        println!("{}", line);
    }
}

// ============================================================================
// Build and check summaries
// ============================================================================

/// One-line summary after the manifest file is written.
pub fn format_build_summary(result: &ScanResult, path: &Path) -> Vec<String> {
    let manifest = &result.manifest;
    let mut summary = format!(
        "Wrote {} in {} to {}",
        plural(manifest.photos.len(), "photo", "photos"),
        plural(manifest.categories.len(), "category", "categories"),
        path.display()
    );
    let dated = manifest.photos.iter().filter(|p| p.date.is_some()).count();
    if dated < manifest.photos.len() {
        summary.push_str(&format!(
            " ({} without a capture date)",
            manifest.photos.len() - dated
        ));
    }
    vec![summary]
}

pub fn print_build_summary(result: &ScanResult, path: &Path) {
    for line in format_build_summary(result, path) {
        println!("{}", line);
    }
}

/// Per-category photo counts of an existing manifest file.
pub fn format_check_output(manifest: &Manifest, path: &Path) -> Vec<String> {
    let mut lines = vec![format!("{}: valid", path.display())];
    for (i, (name, category)) in manifest.ordered_categories().into_iter().enumerate() {
        let count = manifest.photos.iter().filter(|p| p.category == name).count();
        lines.push(format!(
            "    {} {} ({}, {})",
            format_index(i + 1),
            name,
            plural(count, "photo", "photos"),
            plural(category.subcategories.len(), "subcategory", "subcategories")
        ));
    }
    lines
}

pub fn print_check_output(manifest: &Manifest, path: &Path) {
    for line in format_check_output(manifest, path) {
        println!("{}", line);
    }
}
