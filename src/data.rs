//! Data Loading and Management
//!
//! Handles loading the commander dataset (one JSON object keyed by commander
//! name) and the card metadata dump (one JSON card printing per line).
//!
//! Both datasets are loaded fully into memory before scoring and are read-only
//! afterwards. Missing or malformed per-commander fields degrade to empty
//! values instead of failing the run; only unreadable files and a top-level
//! commander document that is not a JSON object are errors.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

// ============================================================================
// Color identity
// ============================================================================

/// Commander-format color identity as a 5-bit set over W, U, B, R, G
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct ColorIdentity(u8);

impl ColorIdentity {
    pub const COLORLESS: ColorIdentity = ColorIdentity(0);

    const SYMBOLS: [(&'static str, u8); 5] =
        [("W", 1), ("U", 1 << 1), ("B", 1 << 2), ("R", 1 << 3), ("G", 1 << 4)];

    /// Build from color symbols; anything outside WUBRG is ignored
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let bits = symbols.into_iter().fold(0u8, |acc, symbol| {
            let symbol = symbol.as_ref().trim();
            let bit = Self::SYMBOLS
                .iter()
                .find(|(s, _)| s.eq_ignore_ascii_case(symbol))
                .map_or(0, |(_, b)| *b);
            acc | bit
        });
        ColorIdentity(bits)
    }

    pub fn intersection(self, other: ColorIdentity) -> ColorIdentity {
        ColorIdentity(self.0 & other.0)
    }

    /// True when every color of `self` is also in `other` (colorless fits anywhere)
    pub fn is_subset_of(self, other: ColorIdentity) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn is_colorless(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn symbols(self) -> Vec<&'static str> {
        Self::SYMBOLS
            .iter()
            .filter(|(_, bit)| self.0 & bit != 0)
            .map(|(s, _)| *s)
            .collect()
    }
}

impl From<Vec<String>> for ColorIdentity {
    fn from(symbols: Vec<String>) -> Self {
        ColorIdentity::from_symbols(symbols)
    }
}

// ============================================================================
// Commander dataset
// ============================================================================

/// One tribal theme and the number of decks built around it
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TribeCount {
    pub name: String,
    pub count: u64,
}

#[derive(Deserialize)]
struct CardRef {
    name: String,
}

/// Per-commander deck statistics and card lists
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommanderRecord {
    pub deck_count: Option<u64>,
    pub rank: Option<i64>,
    pub color_identity: Vec<String>,
    /// Category name → ordered card names
    #[serde(deserialize_with = "deserialize_card_groups")]
    pub card_groups: FxHashMap<String, Vec<String>>,
    /// `None` when the record carries no `tribes` key
    pub tribes: Option<Vec<TribeCount>>,
}

fn deserialize_card_groups<'de, D>(
    deserializer: D,
) -> std::result::Result<FxHashMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<FxHashMap<String, Option<Vec<CardRef>>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(category, cards)| {
            let names = cards
                .unwrap_or_default()
                .into_iter()
                .map(|card| card.name)
                .collect();
            (category, names)
        })
        .collect())
}

impl CommanderRecord {
    /// Parse one commander entry; `None` for null or empty records
    pub fn from_value(name: &str, value: &Value) -> Option<Self> {
        match value {
            Value::Null => return None,
            Value::Object(map) if map.is_empty() => return None,
            _ => {}
        }

        match serde_json::from_value::<CommanderRecord>(value.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(commander = name, error = %e, "Malformed commander record, salvaging fields");
                Some(Self::salvage(value))
            }
        }
    }

    /// Field-by-field parse that drops whatever does not decode
    fn salvage(value: &Value) -> Self {
        fn field<T: DeserializeOwned>(value: &Value, key: &str) -> Option<T> {
            value
                .get(key)
                .and_then(|v| serde_json::from_value(v.clone()).ok())
        }

        let card_groups = value
            .get("card_groups")
            .and_then(Value::as_object)
            .map(|groups| {
                groups
                    .iter()
                    .map(|(category, cards)| {
                        let names = cards
                            .as_array()
                            .map(|cards| {
                                cards
                                    .iter()
                                    .filter_map(|c| c.get("name").and_then(Value::as_str))
                                    .map(str::to_string)
                                    .collect()
                            })
                            .unwrap_or_default();
                        (category.clone(), names)
                    })
                    .collect()
            })
            .unwrap_or_default();

        let tribes = value.get("tribes").and_then(Value::as_array).map(|tribes| {
            tribes
                .iter()
                .filter_map(|t| serde_json::from_value::<TribeCount>(t.clone()).ok())
                .collect()
        });

        Self {
            deck_count: field(value, "deck_count"),
            rank: field(value, "rank"),
            color_identity: field::<Vec<Value>>(value, "color_identity")
                .map(|symbols| {
                    symbols
                        .iter()
                        .filter_map(|s| s.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default(),
            card_groups,
            tribes,
        }
    }

    pub fn colors(&self) -> ColorIdentity {
        ColorIdentity::from_symbols(&self.color_identity)
    }

    /// Card names listed under `category`; empty when the category is missing
    pub fn cards(&self, category: &str) -> &[String] {
        self.card_groups
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// All commanders in input order; null entries are kept so totals match the file
#[derive(Debug, Clone, Default)]
pub struct CommanderDataset {
    entries: Vec<(String, Option<CommanderRecord>)>,
    index: FxHashMap<String, usize>,
}

impl CommanderDataset {
    /// Load commander dataset from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        tracing::info!("Loading commander data from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read commander data: {:?}", path))?;

        let dataset = Self::from_json_str(&contents)
            .with_context(|| format!("Failed to parse commander data: {:?}", path))?;

        tracing::info!(
            "  Commanders: {} ({} with data)",
            dataset.len(),
            dataset.records().count()
        );
        Ok(dataset)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(contents)?;
        let Value::Object(map) = value else {
            bail!("Commander data must be a JSON object keyed by commander name");
        };

        Ok(Self::from_entries(map.iter().map(|(name, value)| {
            (name.clone(), CommanderRecord::from_value(name, value))
        })))
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<CommanderRecord>)>,
    {
        let mut dataset = Self::default();
        for (name, record) in entries {
            match dataset.index.get(&name) {
                Some(&idx) => dataset.entries[idx].1 = record,
                None => {
                    dataset.index.insert(name.clone(), dataset.entries.len());
                    dataset.entries.push((name, record));
                }
            }
        }
        dataset
    }

    /// Number of entries, including commanders without data
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CommanderRecord> {
        self.index
            .get(name)
            .and_then(|&idx| self.entries[idx].1.as_ref())
    }

    /// Every entry in input order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&CommanderRecord>)> {
        self.entries
            .iter()
            .map(|(name, record)| (name.as_str(), record.as_ref()))
    }

    /// Entries that carry data, in input order
    pub fn records(&self) -> impl Iterator<Item = (&str, &CommanderRecord)> {
        self.entries
            .iter()
            .filter_map(|(name, record)| record.as_ref().map(|r| (name.as_str(), r)))
    }
}

// ============================================================================
// Card metadata
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImageUris {
    pub small: Option<String>,
    pub normal: Option<String>,
}

/// Metadata for one card name (merged across printings)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardMetadata {
    pub color_identity: ColorIdentity,
    pub rarity: String,
    pub image_uris: ImageUris,
    pub edhrec_rank: Option<u64>,
    pub type_line: Option<String>,
    /// Earliest release date across all printings
    pub released_at: Option<NaiveDate>,
}

/// One printing as it appears in the card dump
#[derive(Deserialize)]
struct CardPrinting {
    name: String,
    #[serde(default)]
    color_identity: ColorIdentity,
    rarity: Option<String>,
    released_at: Option<String>,
    #[serde(default)]
    image_uris: Option<ImageUris>,
    edhrec_rank: Option<u64>,
    type_line: Option<String>,
}

/// Strip surrounding ASCII whitespace, then trailing commas
fn trim_printing_line(line: &[u8]) -> &[u8] {
    let start = line
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(line.len());
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    let mut line = &line[start..end];
    while let [rest @ .., b','] = line {
        line = rest;
    }
    line
}

/// Card name → metadata, shared read-only across all comparisons
#[derive(Debug, Clone, Default)]
pub struct CardMetadataTable {
    cards: FxHashMap<String, CardMetadata>,
    skipped_lines: usize,
}

impl CardMetadataTable {
    /// Load card metadata from a newline-delimited JSON dump
    pub fn load(path: &Path) -> Result<Self> {
        tracing::info!("Loading card metadata from {:?}", path);
        let file = File::open(path)
            .with_context(|| format!("Failed to open card metadata: {:?}", path))?;

        let table = Self::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to read card metadata: {:?}", path))?;

        tracing::info!(
            "  Cards: {} ({} lines skipped)",
            table.len(),
            table.skipped_lines
        );
        Ok(table)
    }

    /// Parse printings line by line; lines that fail to decode are skipped
    ///
    /// Lines are read as raw bytes, so a line with invalid UTF-8 is skipped
    /// like any other undecodable line.
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut table = Self::default();
        let mut release_dates: FxHashMap<String, NaiveDate> = FxHashMap::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            // Array dumps put one printing per line with a trailing comma
            let trimmed = trim_printing_line(&buf);
            if trimmed.is_empty() {
                continue;
            }

            let printing: CardPrinting = match serde_json::from_slice(trimmed) {
                Ok(p) => p,
                Err(_) => {
                    table.skipped_lines += 1;
                    continue;
                }
            };

            if let Some(date) = printing
                .released_at
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            {
                release_dates
                    .entry(printing.name.clone())
                    .and_modify(|earliest| *earliest = (*earliest).min(date))
                    .or_insert(date);
            }

            let image_uris = printing.image_uris.unwrap_or_default();
            let replace = match table.cards.get(&printing.name) {
                None => true,
                // Prefer a printing that has a normal-size image
                Some(existing) => existing.image_uris.normal.is_none() && image_uris.normal.is_some(),
            };

            if replace {
                table.cards.insert(
                    printing.name,
                    CardMetadata {
                        color_identity: printing.color_identity,
                        rarity: printing.rarity.unwrap_or_else(|| "common".to_string()),
                        image_uris,
                        edhrec_rank: printing.edhrec_rank,
                        type_line: printing.type_line,
                        released_at: None,
                    },
                );
            }
        }

        for (name, date) in release_dates {
            if let Some(card) = table.cards.get_mut(&name) {
                card.released_at = Some(date);
            }
        }

        Ok(table)
    }

    pub fn insert(&mut self, name: impl Into<String>, metadata: CardMetadata) {
        self.cards.insert(name.into(), metadata);
    }

    pub fn get(&self, name: &str) -> Option<&CardMetadata> {
        self.cards.get(name)
    }

    /// Color identity of a card; unknown cards count as colorless
    pub fn color_identity(&self, name: &str) -> ColorIdentity {
        self.cards
            .get(name)
            .map_or(ColorIdentity::COLORLESS, |c| c.color_identity)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Lines that could not be decoded during loading
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }
}

impl FromIterator<(String, ColorIdentity)> for CardMetadataTable {
    fn from_iter<T: IntoIterator<Item = (String, ColorIdentity)>>(iter: T) -> Self {
        let mut table = Self::default();
        for (name, color_identity) in iter {
            table.insert(
                name,
                CardMetadata {
                    color_identity,
                    rarity: "common".to_string(),
                    ..Default::default()
                },
            );
        }
        table
    }
}
