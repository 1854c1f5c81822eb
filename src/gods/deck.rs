//! The per-match god deck.
//!
//! The challenger fills the deck with one card per player; assignment
//! then empties it one pick at a time. Each outcome of an add is an
//! explicit variant so the controller can answer a duplicate with an
//! info message and a full deck with an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::card::GodName;

/// Why a card could not be added to the deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DeckError {
    /// The god is already in the deck. Soft rejection: the challenger
    /// is told and asked again.
    #[error("that god is already in the deck")]
    Duplicate,

    /// The deck already holds one card per player.
    #[error("the deck is already full")]
    Full,
}

/// The cards the challenger picked for this match.
///
/// Capacity equals the player count. Insertion order is preserved; the
/// assignment prompts list cards in the order the challenger added them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    capacity: usize,
    cards: Vec<GodName>,
}

impl Deck {
    /// An empty deck that will hold `capacity` cards.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            cards: Vec::with_capacity(capacity),
        }
    }

    /// Add a card. Duplicates and overflow leave the deck unchanged.
    pub fn add(&mut self, god: GodName) -> Result<(), DeckError> {
        if self.cards.len() >= self.capacity {
            return Err(DeckError::Full);
        }
        if self.cards.contains(&god) {
            return Err(DeckError::Duplicate);
        }
        self.cards.push(god);
        Ok(())
    }

    /// Take a card out of the deck. Returns `false` if it is not there.
    pub fn remove(&mut self, god: GodName) -> bool {
        match self.cards.iter().position(|&g| g == god) {
            Some(i) => {
                self.cards.remove(i);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn contains(&self, god: GodName) -> bool {
        self.cards.contains(&god)
    }

    /// Remaining cards, insertion order.
    #[must_use]
    pub fn cards(&self) -> &[GodName] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// How many cards the deck holds when full.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Whether the deck holds one card per player.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cards.len() == self.capacity
    }

    /// The single leftover card, if exactly one remains.
    #[must_use]
    pub fn sole_remaining(&self) -> Option<GodName> {
        match self.cards.as_slice() {
            [god] => Some(*god),
            _ => None,
        }
    }
}
