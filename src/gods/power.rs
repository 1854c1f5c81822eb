//! God power capabilities.
//!
//! Powers are a closed enum, not a trait object: every worker carries a
//! `GodPower` by value and the rule engine dispatches on it. A power is
//! a set of overrides over the base contract; `Normal` overrides
//! nothing.

use serde::{Deserialize, Serialize};

/// The ability a worker moves and builds with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GodPower {
    /// Base rules only.
    #[default]
    Normal,
    /// May move into an opponent's space, swapping places with them.
    Apollo,
    /// May move into an opponent's space, pushing them one space
    /// straight back.
    Minotaur,
    /// May build a dome at any level.
    Atlas,
    /// Also wins by moving down two or more levels.
    Pan,
}

impl GodPower {
    /// Whether this power can ever target an opponent-occupied space.
    ///
    /// Apollo and Minotaur relax the occupancy rule; whether a given
    /// occupied target is actually legal still depends on the board
    /// (Minotaur needs a free space behind the victim).
    #[must_use]
    pub const fn can_target_occupied(self) -> bool {
        matches!(self, GodPower::Apollo | GodPower::Minotaur)
    }

    /// Whether a dome may be built below full height.
    #[must_use]
    pub const fn allows_early_dome(self) -> bool {
        matches!(self, GodPower::Atlas)
    }

    /// Whether a descent of two or more levels wins on its own.
    #[must_use]
    pub const fn wins_on_descent(self) -> bool {
        matches!(self, GodPower::Pan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_flags() {
        assert!(GodPower::Apollo.can_target_occupied());
        assert!(GodPower::Minotaur.can_target_occupied());
        assert!(!GodPower::Atlas.can_target_occupied());
        assert!(!GodPower::Pan.can_target_occupied());
        assert!(!GodPower::Normal.can_target_occupied());

        assert!(GodPower::Atlas.allows_early_dome());
        assert!(!GodPower::Apollo.allows_early_dome());

        assert!(GodPower::Pan.wins_on_descent());
        assert!(!GodPower::Minotaur.wins_on_descent());
    }

    #[test]
    fn test_default_is_normal() {
        assert_eq!(GodPower::default(), GodPower::Normal);
    }
}
