//! Card Usage Counter
//!
//! Counts how many commanders list each card in any of the compared
//! categories. A card listed under several categories of the same commander
//! counts once for that commander. Used by the frequency calculator.

use crate::data::CommanderDataset;
use rustc_hash::FxHashMap;

/// Count commanders using each card
///
/// Returns a map of card_name → commander_count. Commanders without data
/// contribute nothing.
pub fn count_card_usage<'a>(
    dataset: &'a CommanderDataset,
    categories: &[String],
) -> FxHashMap<&'a str, usize> {
    let mut counts: FxHashMap<&'a str, usize> = FxHashMap::default();

    // Reused across commanders
    let mut commander_cards: Vec<&'a str> = Vec::new();

    for (_name, record) in dataset.records() {
        commander_cards.clear();
        for category in categories {
            commander_cards.extend(record.cards(category).iter().map(String::as_str));
        }

        // Deduplicate cards for this commander
        commander_cards.sort_unstable();
        commander_cards.dedup();

        for &card in &commander_cards {
            *counts.entry(card).or_insert(0) += 1;
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CARD_CATEGORIES;

    fn categories() -> Vec<String> {
        CARD_CATEGORIES.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_count_card_usage() {
        let json = r#"{
            "A": { "card_groups": {
                "Creatures": [{"name": "Goblin King"}],
                "Mana Artifacts": [{"name": "Sol Ring"}]
            }},
            "B": { "card_groups": {
                "Mana Artifacts": [{"name": "Sol Ring"}, {"name": "Arcane Signet"}]
            }},
            "C": null
        }"#;
        let dataset = CommanderDataset::from_json_str(json).unwrap();
        let counts = count_card_usage(&dataset, &categories());

        assert_eq!(counts.get("Sol Ring"), Some(&2));
        assert_eq!(counts.get("Goblin King"), Some(&1));
        assert_eq!(counts.get("Arcane Signet"), Some(&1));
        assert_eq!(counts.get("Lightning Bolt"), None);
    }

    #[test]
    fn test_card_in_two_categories_counts_once() {
        let json = r#"{
            "A": { "card_groups": {
                "High Synergy Cards": [{"name": "Goblin King"}],
                "Creatures": [{"name": "Goblin King"}],
                "Unlisted Category": [{"name": "Goblin Lackey"}]
            }}
        }"#;
        let dataset = CommanderDataset::from_json_str(json).unwrap();
        let counts = count_card_usage(&dataset, &categories());

        assert_eq!(counts.get("Goblin King"), Some(&1));
        // Only configured categories are scanned
        assert_eq!(counts.get("Goblin Lackey"), None);
    }
}
