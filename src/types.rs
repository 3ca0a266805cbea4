//! The manifest document and its parts.
//!
//! These types are what the gallery front-end reads. Field names follow the
//! document shape it expects (`thumb`, `full`, `alt`, `date`, ...), and
//! optional values serialize as `null` rather than being omitted so a consumer
//! can tell "no subcategory" from a missing key.

use crate::naming;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Root of the generated document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub categories: BTreeMap<String, Category>,
    /// Discovery order: categories by rank, each category's own photos
    /// first, then each subcategory's photos.
    pub photos: Vec<Photo>,
}

impl Manifest {
    /// Categories sorted by `order`, ties broken by natural order of name.
    pub fn ordered_categories(&self) -> Vec<(&str, &Category)> {
        let mut categories: Vec<(&str, &Category)> = self
            .categories
            .iter()
            .map(|(name, category)| (name.as_str(), category))
            .collect();
        categories.sort_by(|(a_name, a), (b_name, b)| {
            a.order
                .cmp(&b.order)
                .then_with(|| naming::natural_cmp(a_name, b_name))
        });
        categories
    }

    /// Photos filed directly under `category` (`subcategory = None`) or
    /// under one of its subcategories.
    pub fn photos_in<'a>(
        &'a self,
        category: &'a str,
        subcategory: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Photo> + 'a {
        self.photos.iter().filter(move |p| {
            p.category == category && p.subcategory.as_deref() == subcategory
        })
    }

    /// Photos whose category or subcategory is not a key in `categories`.
    pub fn dangling_photos(&self) -> Vec<&Photo> {
        self.photos
            .iter()
            .filter(|photo| match self.categories.get(&photo.category) {
                None => true,
                Some(category) => photo
                    .subcategory
                    .as_ref()
                    .is_some_and(|sub| !category.subcategories.contains_key(sub)),
            })
            .collect()
    }
}

/// A top-level directory under the asset root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub description: String,
    /// Rank from the configured order table; unlisted names get the
    /// configured sentinel.
    pub order: u32,
    #[serde(default)]
    pub subcategories: BTreeMap<String, Subcategory>,
}

/// A directory nested one level inside a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    #[serde(default)]
    pub description: String,
}

/// One image file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub thumb: String,
    pub full: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub alt: String,
    #[serde(default)]
    pub description: String,
    pub date: Option<CaptureDate>,
}

impl Photo {
    /// Filename of the full-size image (last path segment of `full`).
    pub fn filename(&self) -> &str {
        self.full.rsplit('/').next().unwrap_or(&self.full)
    }
}

/// Day a photo was taken, serialized as `DD-MM-YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaptureDate(NaiveDate);

impl CaptureDate {
    /// Document format of the date.
    pub const FORMAT: &'static str = "%d-%m-%Y";

    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Parse a `DD-MM-YYYY` string.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        NaiveDate::parse_from_str(s, Self::FORMAT).map(Self)
    }
}

impl fmt::Display for CaptureDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl Serialize for CaptureDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CaptureDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(category: &str, subcategory: Option<&str>, name: &str) -> Photo {
        Photo {
            thumb: format!("thumbs/{category}/{name}"),
            full: format!("photos/{category}/{name}"),
            category: category.to_string(),
            subcategory: subcategory.map(String::from),
            alt: name.to_string(),
            description: String::new(),
            date: None,
        }
    }

    fn category(order: u32, subs: &[&str]) -> Category {
        Category {
            description: String::new(),
            order,
            subcategories: subs
                .iter()
                .map(|s| (s.to_string(), Subcategory::default()))
                .collect(),
        }
    }

    #[test]
    fn capture_date_displays_day_first() {
        let date = CaptureDate::new(NaiveDate::from_ymd_opt(2023, 7, 4).unwrap());
        assert_eq!(date.to_string(), "04-07-2023");
    }

    #[test]
    fn capture_date_serializes_as_string() {
        let date = CaptureDate::new(NaiveDate::from_ymd_opt(2021, 12, 31).unwrap());
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"31-12-2021\"");
    }

    #[test]
    fn capture_date_rejects_other_formats() {
        let result: Result<CaptureDate, _> = serde_json::from_str("\"2021-12-31\"");
        assert!(result.is_err());
    }

    #[test]
    fn photo_serializes_nulls() {
        let json = serde_json::to_value(photo("kazan", None, "1.jpg")).unwrap();
        assert!(json["subcategory"].is_null());
        assert!(json["date"].is_null());
        assert_eq!(json["alt"], "1.jpg");
    }

    #[test]
    fn photo_filename_is_last_segment() {
        assert_eq!(photo("kazan", Some("old"), "3.jpg").filename(), "3.jpg");
    }

    #[test]
    fn ordered_categories_by_rank_then_name() {
        let mut manifest = Manifest::default();
        manifest.categories.insert("zoo".into(), category(999, &[]));
        manifest.categories.insert("peterburg".into(), category(2, &[]));
        manifest.categories.insert("kazan".into(), category(1, &[]));
        manifest.categories.insert("alps".into(), category(999, &[]));

        let names: Vec<&str> = manifest
            .ordered_categories()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["kazan", "peterburg", "alps", "zoo"]);
    }

    #[test]
    fn photos_in_separates_main_and_sub() {
        let mut manifest = Manifest::default();
        manifest.categories.insert("kazan".into(), category(1, &["old"]));
        manifest.photos = vec![
            photo("kazan", None, "1.jpg"),
            photo("kazan", Some("old"), "2.jpg"),
        ];

        assert_eq!(manifest.photos_in("kazan", None).count(), 1);
        assert_eq!(manifest.photos_in("kazan", Some("old")).count(), 1);
        assert_eq!(manifest.photos_in("kazan", Some("new")).count(), 0);
    }

    #[test]
    fn dangling_photos_detected() {
        let mut manifest = Manifest::default();
        manifest.categories.insert("kazan".into(), category(1, &["old"]));
        manifest.photos = vec![
            photo("kazan", Some("old"), "ok.jpg"),
            photo("kazan", Some("new"), "missing-sub.jpg"),
            photo("moscow", None, "missing-cat.jpg"),
        ];

        let dangling: Vec<&str> = manifest
            .dangling_photos()
            .into_iter()
            .map(Photo::filename)
            .collect();
        assert_eq!(dangling, vec!["missing-sub.jpg", "missing-cat.jpg"]);
    }
}
