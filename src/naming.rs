//! Natural ordering of filenames and `name.ext` splitting.
//!
//! Camera exports and hand-numbered scans rarely zero-pad their counters, so a
//! plain lexical sort puts `img-10.jpg` before `img-9.jpg`. The natural key
//! splits a filename into alternating text and digit runs and compares the
//! digit runs by numeric value:
//!
//! ```text
//! "img-9.jpg"   → ["img-", 9,  ".jpg"]
//! "img-10.jpg"  → ["img-", 10, ".jpg"]
//! "photo-10b.jpg" → ["photo-", 10, "b.jpg"]
//! ```
//!
//! Text runs compare case-insensitively. A key always starts with a text run
//! (possibly empty) and alternates from there, so two keys always hold the
//! same kind of chunk at the same position. When one key is a prefix of the
//! other, the shorter one sorts first.
//!
//! Digit runs are compared without parsing into a fixed-width integer:
//! leading zeros are dropped, then the longer run is the larger number. Any
//! length of counter works.

use std::cmp::Ordering;

/// A run of ASCII digits, compared by numeric value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digits(String);

impl Digits {
    fn new(run: &str) -> Self {
        let trimmed = run.trim_start_matches('0');
        Self(trimmed.to_string())
    }
}

impl Ord for Digits {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Digits {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One chunk of a [`NaturalKey`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Chunk {
    /// Lowercased text between digit runs.
    Text(String),
    Number(Digits),
}

/// Ordering key for a filename. See the module docs for the chunking rules.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Chunk>);

impl NaturalKey {
    pub fn chunks(&self) -> &[Chunk] {
        &self.0
    }
}

/// Build the natural ordering key for `name`.
pub fn natural_key(name: &str) -> NaturalKey {
    let mut chunks = Vec::new();
    let mut rest = name;

    loop {
        let text_end = rest
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(rest.len());
        chunks.push(Chunk::Text(rest[..text_end].to_lowercase()));
        rest = &rest[text_end..];
        if rest.is_empty() {
            break;
        }

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        chunks.push(Chunk::Number(Digits::new(&rest[..digits_end])));
        rest = &rest[digits_end..];
    }

    NaturalKey(chunks)
}

/// Compare two filenames in natural order.
///
/// Names with equal keys (`img-09.jpg` vs `img-9.jpg`, `A.jpg` vs `a.jpg`)
/// fall back to a byte comparison of the raw names, so the result is a
/// total order and sorting is reproducible.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a)
        .cmp(&natural_key(b))
        .then_with(|| a.cmp(b))
}

/// Sort filenames in place in natural order.
pub fn sort_natural<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by_cached_key(|n| (natural_key(n.as_ref()), n.as_ref().to_string()));
}

/// Split a filename into stem and extension, keeping the dot on the extension.
///
/// - `"sunset.jpg"` → `("sunset", ".jpg")`
/// - `"a.b.JPG"` → `("a.b", ".JPG")`
/// - `"README"` → `("README", "")`
/// - `".hidden"` → `(".hidden", "")`
pub fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(pos) if !filename[..pos].trim_start_matches('.').is_empty() => {
            filename.split_at(pos)
        }
        _ => (filename, ""),
    }
}
