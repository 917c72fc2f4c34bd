//! Card list extraction and per-commander card profiles
//!
//! The pair loop compares every commander with every other one, so each
//! commander's category lists are resolved once up front: names, a lookup set
//! and the color identity of every listed card.

use crate::data::{CardMetadataTable, ColorIdentity, CommanderDataset, CommanderRecord};
use ahash::AHashSet;

/// Card names of `commander` under `category`
///
/// Missing commander, null record or missing category all resolve to an empty
/// list.
pub fn cards_from_category<'a>(
    dataset: &'a CommanderDataset,
    commander: &str,
    category: &str,
) -> &'a [String] {
    dataset
        .get(commander)
        .map(|record| record.cards(category))
        .unwrap_or(&[])
}

/// One category's card list, ready for overlap queries
#[derive(Debug, Clone, Default)]
pub struct CategoryCards<'a> {
    /// Listed names in input order, duplicates kept
    names: Vec<&'a str>,
    /// Distinct names in first-seen order
    unique: Vec<&'a str>,
    set: AHashSet<&'a str>,
    /// Color identity per entry of `names`
    identities: Vec<ColorIdentity>,
}

impl<'a> CategoryCards<'a> {
    pub fn new<I>(names: I, metadata: &CardMetadataTable) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: Vec<&'a str> = names.into_iter().collect();
        let mut set = AHashSet::with_capacity(names.len());
        let unique: Vec<&'a str> = names.iter().copied().filter(|name| set.insert(*name)).collect();
        let identities = names
            .iter()
            .map(|name| metadata.color_identity(name))
            .collect();

        Self {
            names,
            unique,
            set,
            identities,
        }
    }

    pub fn from_names(names: &'a [String], metadata: &CardMetadataTable) -> Self {
        Self::new(names.iter().map(String::as_str), metadata)
    }

    /// Number of listed entries (duplicates included)
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[&'a str] {
        &self.names
    }

    pub fn contains(&self, card: &str) -> bool {
        self.set.contains(card)
    }

    /// Distinct cards listed by both, in `self`'s first-seen order
    pub fn shared<'s>(&'s self, other: &'s CategoryCards<'a>) -> impl Iterator<Item = &'a str> + 's {
        self.unique
            .iter()
            .copied()
            .filter(move |card| other.set.contains(card))
    }

    /// Entries whose color identity fits inside `allowed`
    pub fn count_admissible(&self, allowed: ColorIdentity) -> usize {
        self.identities
            .iter()
            .filter(|identity| identity.is_subset_of(allowed))
            .count()
    }
}

/// A commander's resolved color identity and category lists
#[derive(Debug, Clone)]
pub struct CommanderProfile<'a> {
    pub name: &'a str,
    pub colors: ColorIdentity,
    /// Indexed like the configured category list
    pub categories: Vec<CategoryCards<'a>>,
    /// Listed entries across all categories
    pub total_cards: usize,
}

impl<'a> CommanderProfile<'a> {
    pub fn build(
        name: &'a str,
        record: &'a CommanderRecord,
        categories: &[String],
        metadata: &CardMetadataTable,
    ) -> Self {
        let categories: Vec<CategoryCards<'a>> = categories
            .iter()
            .map(|category| CategoryCards::from_names(record.cards(category), metadata))
            .collect();
        let total_cards = categories.iter().map(CategoryCards::len).sum();

        Self {
            name,
            colors: record.colors(),
            categories,
            total_cards,
        }
    }
}
