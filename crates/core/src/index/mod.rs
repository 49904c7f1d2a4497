//! Alphabetic sectioning of the catalog for indexed list navigation.
//!
//! Entries are sorted by collation key, bucketed into a fixed ordered
//! alphabet (plus a trailing catch-all), and exposed as non-empty sections.
//! The full title list stays available for index-bar navigation even when
//! some letters currently hold no entries.

pub mod collation;

use serde::{Deserialize, Serialize};

use crate::service::Entry;

/// Sectioning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Section letters, in collation order.
    #[serde(default = "default_letters")]
    pub letters: Vec<String>,
    /// Title of the trailing bucket for entries outside the alphabet.
    #[serde(default = "default_catch_all")]
    pub catch_all: String,
    /// Section headers are suppressed while the total entry count is at or
    /// below this value.
    #[serde(default = "default_header_threshold")]
    pub header_threshold: usize,
}

fn default_letters() -> Vec<String> {
    ('A'..='Z').map(|c| c.to_string()).collect()
}

fn default_catch_all() -> String {
    "#".to_string()
}

fn default_header_threshold() -> usize {
    5
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            letters: default_letters(),
            catch_all: default_catch_all(),
            header_threshold: default_header_threshold(),
        }
    }
}

/// The ordered set of section titles: a fixed alphabet plus the catch-all.
#[derive(Debug, Clone)]
pub struct Alphabet {
    titles: Vec<String>,
    /// Folded first character of each letter title, parallel to `titles`
    /// minus the catch-all.
    folded: Vec<Option<char>>,
}

impl Alphabet {
    /// Build the alphabet from configuration. The catch-all always comes last.
    pub fn new(config: &IndexConfig) -> Self {
        let mut titles = config.letters.clone();
        titles.push(config.catch_all.clone());

        let folded = config
            .letters
            .iter()
            .map(|t| collation::fold_key(t).chars().next())
            .collect();

        Self { titles, folded }
    }

    /// All section titles, including letters with no entries.
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Bucket index for a collation key. Keys starting outside the alphabet
    /// land in the trailing catch-all.
    pub fn position(&self, key: &str) -> usize {
        let catch_all = self.titles.len() - 1;
        let Some(first) = key.chars().next() else {
            return catch_all;
        };

        self.folded
            .iter()
            .position(|f| *f == Some(first))
            .unwrap_or(catch_all)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new(&IndexConfig::default())
    }
}

/// A titled bucket of entries. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    title: String,
    entries: Vec<Entry>,
}

impl Section {
    /// Create a section, or `None` when there are no entries to hold.
    pub fn new(title: impl Into<String>, entries: Vec<Entry>) -> Option<Self> {
        if entries.is_empty() {
            return None;
        }

        Some(Self {
            title: title.into(),
            entries,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The section narrowed to entries whose collation key contains every
    /// search term. `None` when nothing survives.
    pub fn filtered(&self, terms: &[String]) -> Option<Self> {
        let entries = self
            .entries
            .iter()
            .filter(|e| terms.iter().all(|t| e.collation_key.contains(t.as_str())))
            .cloned()
            .collect();

        Self::new(self.title.clone(), entries)
    }
}

/// Rebuilds the sectioned view of the catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    alphabet: Alphabet,
}

impl CatalogIndex {
    pub fn new(config: &IndexConfig) -> Self {
        Self {
            alphabet: Alphabet::new(config),
        }
    }

    /// Full title list for the index bar, empty letters included.
    pub fn titles(&self) -> &[String] {
        self.alphabet.titles()
    }

    /// Partition entries into sections: sort by collation key, bucket by
    /// alphabet position, drop letters that stay empty.
    pub fn rebuild(&self, entries: &[Entry]) -> Vec<Section> {
        let mut sorted: Vec<Entry> = entries.to_vec();
        sorted.sort_by(|a, b| a.collation_key.cmp(&b.collation_key));

        let mut buckets: Vec<Vec<Entry>> = vec![Vec::new(); self.alphabet.titles().len()];
        for entry in sorted {
            let position = self.alphabet.position(&entry.collation_key);
            buckets[position].push(entry);
        }

        self.alphabet
            .titles()
            .iter()
            .zip(buckets)
            .filter_map(|(title, entries)| Section::new(title.clone(), entries))
            .collect()
    }
}

/// Offset of the non-empty section carrying `title`, or `fallback` unchanged
/// when no section currently does. Index-bar taps on an empty letter keep
/// whatever target the caller supplied.
pub fn section_index(sections: &[Section], title: &str, fallback: usize) -> usize {
    sections
        .iter()
        .position(|s| s.title() == title)
        .unwrap_or(fallback)
}
