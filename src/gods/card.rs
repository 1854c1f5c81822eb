//! The god card catalog.
//!
//! ## GodName
//!
//! The closed set of implemented gods. Because the set is closed, name
//! resolution cannot fail past the transport's parse step.
//!
//! ## GodCatalog
//!
//! Immutable lookup table from name to card. Cards never leave the
//! catalog; the per-match [`Deck`](crate::gods::Deck) only stores names.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::power::GodPower;

/// Name of an implemented god card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GodName {
    Apollo,
    Atlas,
    Minotaur,
    Pan,
}

impl GodName {
    /// Every implemented god, in catalog order.
    pub const ALL: [GodName; 4] = [
        GodName::Apollo,
        GodName::Atlas,
        GodName::Minotaur,
        GodName::Pan,
    ];

    /// The power this god grants its workers.
    #[must_use]
    pub const fn power(self) -> GodPower {
        match self {
            GodName::Apollo => GodPower::Apollo,
            GodName::Atlas => GodPower::Atlas,
            GodName::Minotaur => GodPower::Minotaur,
            GodName::Pan => GodPower::Pan,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            GodName::Apollo => "Apollo",
            GodName::Atlas => "Atlas",
            GodName::Minotaur => "Minotaur",
            GodName::Pan => "Pan",
        }
    }

    /// Resolve a name case-insensitively. Transport convenience; the
    /// engine itself only ever sees resolved names.
    ///
    /// ```
    /// use santorini_engine::gods::GodName;
    ///
    /// assert_eq!(GodName::parse("minotaur"), Some(GodName::Minotaur));
    /// assert_eq!(GodName::parse("APOLLO"), Some(GodName::Apollo));
    /// assert_eq!(GodName::parse("zeus"), None);
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Option<GodName> {
        GodName::ALL
            .iter()
            .copied()
            .find(|god| god.as_str().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for GodName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog entry: the official card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GodCard {
    name: GodName,
    description: String,
    power: GodPower,
}

impl GodCard {
    #[must_use]
    pub fn name(&self) -> GodName {
        self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn power(&self) -> GodPower {
        self.power
    }
}

/// The full set of god cards, indexed by name.
pub struct GodCatalog {
    cards: Vec<GodCard>,
    by_name: FxHashMap<GodName, usize>,
}

impl GodCatalog {
    /// Build the catalog of implemented cards.
    #[must_use]
    pub fn new() -> Self {
        let cards: Vec<GodCard> = GodName::ALL
            .iter()
            .map(|&name| GodCard {
                name,
                description: Self::card_text(name).to_string(),
                power: name.power(),
            })
            .collect();

        let by_name = cards
            .iter()
            .enumerate()
            .map(|(i, card)| (card.name, i))
            .collect();

        Self { cards, by_name }
    }

    const fn card_text(name: GodName) -> &'static str {
        match name {
            GodName::Apollo => {
                "Your Move: Your Worker may move into an opponent Worker's space \
                 by forcing their Worker to the space yours just vacated."
            }
            GodName::Atlas => "Your Build: Your Worker may build a dome at any level.",
            GodName::Minotaur => {
                "Your Move: Your Worker may move into an opponent Worker's space, \
                 if their Worker can be forced one space straight backwards to an \
                 unoccupied space at any level."
            }
            GodName::Pan => {
                "Win Condition: You also win if your Worker moves down two or more levels."
            }
        }
    }

    /// Look up a card. Infallible: every `GodName` is in the catalog.
    #[must_use]
    pub fn card(&self, name: GodName) -> &GodCard {
        &self.cards[self.by_name[&name]]
    }

    /// All cards in catalog order.
    #[must_use]
    pub fn cards(&self) -> &[GodCard] {
        &self.cards
    }

    /// Number of cards in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for GodCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_every_god() {
        let catalog = GodCatalog::new();
        assert_eq!(catalog.len(), GodName::ALL.len());

        for god in GodName::ALL {
            let card = catalog.card(god);
            assert_eq!(card.name(), god);
            assert_eq!(card.power(), god.power());
            assert!(!card.description().is_empty());
        }
    }

    #[test]
    fn test_name_power_mapping() {
        assert_eq!(GodName::Apollo.power(), GodPower::Apollo);
        assert_eq!(GodName::Atlas.power(), GodPower::Atlas);
        assert_eq!(GodName::Minotaur.power(), GodPower::Minotaur);
        assert_eq!(GodName::Pan.power(), GodPower::Pan);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(GodName::parse("pan"), Some(GodName::Pan));
        assert_eq!(GodName::parse("Pan"), Some(GodName::Pan));
        assert_eq!(GodName::parse("ATLAS"), Some(GodName::Atlas));
        assert_eq!(GodName::parse(""), None);
        assert_eq!(GodName::parse("hermes"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", GodName::Minotaur), "Minotaur");
    }

    #[test]
    fn test_card_serialization() {
        let catalog = GodCatalog::new();
        let card = catalog.card(GodName::Pan);
        let json = serde_json::to_string(card).unwrap();
        let back: GodCard = serde_json::from_str(&json).unwrap();
        assert_eq!(*card, back);
    }
}
