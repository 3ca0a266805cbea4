//! Shared test utilities for the gallery-manifest test suite.
//!
//! Provides tree builders for temporary asset roots, tiny JPEG and PNG
//! fixtures with and without EXIF capture dates, and lookup helpers over a [`Manifest`].
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_photos(tmp.path(), &["kazan/1.jpg", "kazan/old/3.jpg"]);
//!
//! let manifest = scan(tmp.path()).unwrap().manifest;
//! assert_eq!(photo_names(&manifest), vec!["1.jpg", "3.jpg"]);
//! assert_eq!(find_photo(&manifest, "3.jpg").alt, "kazan old 3");
//! ```

use std::fs;
use std::path::Path;

use crate::types::{Manifest, Photo};

// =========================================================================
// Tree builders
// =========================================================================

/// Write `bytes` to `root/rel`, creating parent directories.
pub fn write_bytes(root: &Path, rel: &str, bytes: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, bytes).unwrap();
}

pub fn write_text(root: &Path, rel: &str, text: &str) {
    write_bytes(root, rel, text.as_bytes());
}

/// Create placeholder image files. They carry no EXIF, so every one of
/// them produces a missing-date warning when scanned.
pub fn write_photos(root: &Path, rels: &[&str]) {
    for rel in rels {
        write_bytes(root, rel, b"not really a jpeg");
    }
}

// =========================================================================
// Image fixtures
// =========================================================================

/// Minimal JPEG whose EXIF block holds `DateTimeOriginal = datetime`.
pub fn jpeg_with_capture_date(datetime: &str) -> Vec<u8> {
    wrap_in_jpeg(&tiff_with_capture_date(datetime))
}

/// Minimal PNG (1x1 header, no image data) carrying the same EXIF block
/// in an `eXIf` chunk.
pub fn png_with_capture_date(datetime: &str) -> Vec<u8> {
    let mut png = b"\x89PNG\r\n\x1a\n".to_vec();

    let mut ihdr = Vec::new();
    ihdr.extend_from_slice(&1u32.to_be_bytes());
    ihdr.extend_from_slice(&1u32.to_be_bytes());
    ihdr.extend_from_slice(&[8, 2, 0, 0, 0]);
    png_chunk(&mut png, b"IHDR", &ihdr);
    png_chunk(&mut png, b"eXIf", &tiff_with_capture_date(datetime));
    png_chunk(&mut png, b"IEND", &[]);
    png
}

/// Little-endian TIFF holding only `DateTimeOriginal = datetime`.
///
/// ```text
/// 0   II*\0, IFD0 at 8
/// 8   IFD0: one entry, ExifIFDPointer -> 26
/// 26  Exif IFD: one entry, DateTimeOriginal (ASCII) -> 44
/// 44  datetime + NUL
/// ```
fn tiff_with_capture_date(datetime: &str) -> Vec<u8> {
    let mut tiff = tiff_header();

    // IFD0
    tiff.extend_from_slice(&1u16.to_le_bytes());
    ifd_entry(&mut tiff, 0x8769, 4, 1, 26);
    tiff.extend_from_slice(&0u32.to_le_bytes());

    // Exif IFD
    let value_len = datetime.len() as u32 + 1;
    tiff.extend_from_slice(&1u16.to_le_bytes());
    ifd_entry(&mut tiff, 0x9003, 2, value_len, 44);
    tiff.extend_from_slice(&0u32.to_le_bytes());

    assert_eq!(tiff.len(), 44);
    tiff.extend_from_slice(datetime.as_bytes());
    tiff.push(0);
    tiff
}

/// Minimal JPEG with an EXIF block that has no capture date (only Orientation).
pub fn jpeg_without_capture_date() -> Vec<u8> {
    let mut tiff = tiff_header();
    tiff.extend_from_slice(&1u16.to_le_bytes());
    ifd_entry(&mut tiff, 0x0112, 3, 1, 1);
    tiff.extend_from_slice(&0u32.to_le_bytes());
    wrap_in_jpeg(&tiff)
}

fn tiff_header() -> Vec<u8> {
    let mut tiff = b"II*\0".to_vec();
    tiff.extend_from_slice(&8u32.to_le_bytes());
    tiff
}

fn ifd_entry(buf: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: u32) {
    buf.extend_from_slice(&tag.to_le_bytes());
    buf.extend_from_slice(&kind.to_le_bytes());
    buf.extend_from_slice(&count.to_le_bytes());
    buf.extend_from_slice(&value.to_le_bytes());
}

fn png_chunk(png: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(kind);
    png.extend_from_slice(data);

    let mut crc = 0xFFFF_FFFFu32;
    for &byte in kind.iter().chain(data) {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            crc = if crc & 1 == 1 {
                (crc >> 1) ^ 0xEDB8_8320
            } else {
                crc >> 1
            };
        }
    }
    png.extend_from_slice(&(crc ^ 0xFFFF_FFFF).to_be_bytes());
}

fn wrap_in_jpeg(tiff: &[u8]) -> Vec<u8> {
    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    let segment_len = (2 + 6 + tiff.len()) as u16;
    jpeg.extend_from_slice(&segment_len.to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(tiff);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}

// =========================================================================
// Manifest lookups: panic with a clear message on miss
// =========================================================================

/// Find a photo by filename. Panics if not found.
pub fn find_photo<'a>(manifest: &'a Manifest, filename: &str) -> &'a Photo {
    manifest
        .photos
        .iter()
        .find(|p| p.filename() == filename)
        .unwrap_or_else(|| {
            let names = photo_names(manifest);
            panic!("photo '{filename}' not found. Available: {names:?}")
        })
}

/// All photo filenames in manifest order.
pub fn photo_names(manifest: &Manifest) -> Vec<&str> {
    manifest.photos.iter().map(Photo::filename).collect()
}
