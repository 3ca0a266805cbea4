//! Per-photo metadata: capture date.
//!
//! ## Capture date
//!
//! The date comes from the EXIF `DateTimeOriginal` tag (0x9003), the moment
//! the shutter fired. Cameras write it as `YYYY:MM:DD HH:MM:SS`; only the
//! date half is kept and re-rendered as `DD-MM-YYYY` for the document.
//!
//! Extraction is best effort. A photo without a date is still a photo, so
//! [`probe_capture_date`] never fails: it hands back the date when it has one
//! and a [`MetadataWarning`] describing what went wrong when it doesn't. The
//! caller decides what to do with the warning (the scanner logs it and keeps
//! going).
//!
//! JPEG, PNG (`eXIf` chunk), TIFF and WebP containers are understood.

use crate::types::CaptureDate;
use chrono::NaiveDate;
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

/// EXIF date layout: `YYYY:MM:DD`.
const EXIF_DATE_FORMAT: &str = "%Y:%m:%d";

/// Why a photo ended up without a capture date.
#[derive(Error, Debug)]
pub enum MetadataWarning {
    #[error("cannot open image: {0}")]
    Unreadable(#[from] std::io::Error),
    #[error("no EXIF data: {0}")]
    NoExif(#[from] exif::Error),
    #[error("EXIF has no DateTimeOriginal")]
    MissingDate,
    #[error("DateTimeOriginal is not a text value: {0}")]
    UnsupportedValue(String),
    #[error("malformed DateTimeOriginal {0:?}")]
    MalformedDate(String),
}

/// Outcome of a capture-date lookup. Exactly one of `date` and `warning` is set.
#[derive(Debug)]
pub struct DateProbe {
    pub date: Option<CaptureDate>,
    pub warning: Option<MetadataWarning>,
}

/// Look up the capture date of the image at `path`.
pub fn probe_capture_date(path: &Path) -> DateProbe {
    match read_capture_date(path) {
        Ok(date) => DateProbe {
            date: Some(date),
            warning: None,
        },
        Err(warning) => DateProbe {
            date: None,
            warning: Some(warning),
        },
    }
}

fn read_capture_date(path: &Path) -> Result<CaptureDate, MetadataWarning> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let exif = Reader::new().read_from_container(&mut reader)?;

    let field = exif
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .ok_or(MetadataWarning::MissingDate)?;

    let raw = match &field.value {
        Value::Ascii(values) => match values.first() {
            Some(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            None => return Err(MetadataWarning::MissingDate),
        },
        _ => {
            return Err(MetadataWarning::UnsupportedValue(
                field.display_value().to_string(),
            ));
        }
    };

    parse_exif_date(&raw)
}

/// Parse the date half of an EXIF `YYYY:MM:DD HH:MM:SS` timestamp.
pub fn parse_exif_date(raw: &str) -> Result<CaptureDate, MetadataWarning> {
    let date_part = raw.trim().split(' ').next().unwrap_or_default();
    NaiveDate::parse_from_str(date_part, EXIF_DATE_FORMAT)
        .map(CaptureDate::new)
        .map_err(|_| MetadataWarning::MalformedDate(raw.to_string()))
}
