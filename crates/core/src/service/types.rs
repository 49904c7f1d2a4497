//! Domain types produced by the catalog service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::index::collation;

/// A lightweight catalog entry - enough to list, search, and later resolve
/// the full record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EntryRecord", into = "EntryRecord")]
pub struct Entry {
    /// Unique name, also the cache key for the resolved detail.
    pub name: String,
    /// Locator of the detail record on the remote service.
    pub url: String,
    /// Folded form of the name, used for sectioning and search matching.
    /// Derived at construction and on deserialization, never stored.
    pub collation_key: String,
}

impl Entry {
    /// Create an entry, deriving its collation key from the name.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let name = name.into();
        let collation_key = collation::fold_key(&name);
        Self {
            name,
            url: url.into(),
            collation_key,
        }
    }

    /// Human-readable form of the name (leading character uppercased).
    pub fn display_text(&self) -> String {
        capitalize(&self.name)
    }
}

/// Serialized shape of an [`Entry`] - the collation key is derived state.
#[derive(Debug, Serialize, Deserialize)]
struct EntryRecord {
    name: String,
    url: String,
}

impl From<EntryRecord> for Entry {
    fn from(record: EntryRecord) -> Self {
        Entry::new(record.name, record.url)
    }
}

impl From<Entry> for EntryRecord {
    fn from(entry: Entry) -> Self {
        EntryRecord {
            name: entry.name,
            url: entry.url,
        }
    }
}

/// The full entry set from one bulk fetch, as persisted locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// All entries, in service order.
    pub entries: Vec<Entry>,
    /// When the snapshot was fetched from the remote service.
    pub fetched_at: DateTime<Utc>,
}

impl Catalog {
    /// Create a snapshot stamped with the current time.
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            fetched_at: Utc::now(),
        }
    }
}

/// A fully resolved record for one entry, assembled from the metadata
/// fetch plus the sprite asset fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    /// Entry name this detail belongs to (cache key).
    pub name: String,
    /// Display name (capitalized).
    pub display_name: String,
    /// Height in decimetres, as reported by the service.
    pub height: u32,
    /// Type names, in slot order.
    pub types: Vec<String>,
    /// Raw sprite image bytes.
    #[serde(with = "base64_bytes")]
    pub sprite: Vec<u8>,
}

impl Detail {
    /// Type list joined for presentation, e.g. "Grass/Poison".
    pub fn display_types(&self) -> String {
        self.types
            .iter()
            .map(|t| capitalize(t))
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Uppercase the first character, leave the rest untouched.
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Sprite bytes are embedded in the persisted JSON as base64.
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_derives_collation_key() {
        let entry = Entry::new("Flabébé", "https://pokeapi.co/api/v2/pokemon/669/");
        assert_eq!(entry.collation_key, "flabebe");
        assert_eq!(entry.display_text(), "Flabébé");
    }

    #[test]
    fn test_entry_round_trip_rederives_key() {
        let entry = Entry::new("bulbasaur", "https://pokeapi.co/api/v2/pokemon/1/");
        let json = serde_json::to_string(&entry).unwrap();
        // Only name and url are persisted.
        assert!(!json.contains("collation_key"));

        let parsed: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
        assert_eq!(parsed.collation_key, "bulbasaur");
    }

    #[test]
    fn test_detail_sprite_base64_round_trip() {
        let detail = Detail {
            name: "bulbasaur".to_string(),
            display_name: "Bulbasaur".to_string(),
            height: 7,
            types: vec!["grass".to_string(), "poison".to_string()],
            sprite: vec![0x89, 0x50, 0x4e, 0x47],
        };

        let json = serde_json::to_string(&detail).unwrap();
        assert!(json.contains("\"sprite\":\"iVBORw==\""));

        let parsed: Detail = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, detail);
    }

    #[test]
    fn test_display_types_joined() {
        let detail = Detail {
            name: "bulbasaur".to_string(),
            display_name: "Bulbasaur".to_string(),
            height: 7,
            types: vec!["grass".to_string(), "poison".to_string()],
            sprite: vec![],
        };

        assert_eq!(detail.display_types(), "Grass/Poison");
    }

    #[test]
    fn test_catalog_serialization() {
        let catalog = Catalog::new(vec![
            Entry::new("bulbasaur", "https://pokeapi.co/api/v2/pokemon/1/"),
            Entry::new("charmander", "https://pokeapi.co/api/v2/pokemon/4/"),
        ]);

        let json = serde_json::to_string(&catalog).unwrap();
        let parsed: Catalog = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed, catalog);
    }
}
