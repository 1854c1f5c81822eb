//! God cards: the catalog, the per-match deck, and power capabilities.

pub mod card;
pub mod deck;
pub mod power;

pub use card::{GodCard, GodCatalog, GodName};
pub use deck::{Deck, DeckError};
pub use power::GodPower;
