//! Rank catalog: the twelve piece categories and their rules.
//!
//! Instead of one type per rank, every rank maps to a [`RankProfile`] row in a
//! lookup table. The row carries everything that differs between ranks:
//! army count, symbol, how the piece moves and which fights it wins.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, IntoEnumIterator};

use crate::error::ParseError;

/// Number of pieces in a full army.
pub const ARMY_SIZE: usize = 40;

/// Piece rank, ordered by combat strength (Bomb excepted).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumCount,
    strum::Display,
)]
#[repr(u8)]
pub enum Rank {
    /// The piece to protect; capturing it ends the game.
    Flag = 0,
    /// Weakest fighter, but defeats the Marshal when attacking.
    Spy = 1,
    /// Moves any distance in a straight line.
    Scout = 2,
    /// Defuses bombs.
    Miner = 3,
    /// Rank 4.
    Sergeant = 4,
    /// Rank 5.
    Lieutenant = 5,
    /// Rank 6.
    Captain = 6,
    /// Rank 7.
    Major = 7,
    /// Rank 8.
    Colonel = 8,
    /// Rank 9.
    General = 9,
    /// Strongest fighter.
    Marshal = 10,
    /// Immobile trap that destroys every attacker but a Miner.
    Bomb = 11,
}

/// How a rank is allowed to travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    /// Never moves nor attacks.
    Immobile,
    /// One orthogonal step.
    Adjacent,
    /// Any distance along a clear row or column.
    Scout,
}

/// Combat predicate, evaluated as `wins(attacker, defender)`.
pub type WinPredicate = fn(Rank, Rank) -> bool;

/// Static description of a rank.
#[derive(Debug, Clone, Copy)]
pub struct RankProfile {
    /// Display name.
    pub name: &'static str,
    /// Token used in army layouts.
    pub symbol: &'static str,
    /// Number of pieces of this rank in a full army.
    pub count: usize,
    /// Movement rule.
    pub movement: MovementKind,
    /// Combat rule when this rank attacks.
    pub wins: WinPredicate,
    /// Short rules summary.
    pub description: &'static str,
}

fn outranks(attacker: Rank, defender: Rank) -> bool {
    attacker.value() > defender.value()
}

fn miner_wins(attacker: Rank, defender: Rank) -> bool {
    outranks(attacker, defender) || defender == Rank::Bomb
}

fn spy_wins(attacker: Rank, defender: Rank) -> bool {
    outranks(attacker, defender) || defender == Rank::Marshal
}

const fn fighter(
    name: &'static str,
    symbol: &'static str,
    count: usize,
    description: &'static str,
) -> RankProfile {
    RankProfile {
        name,
        symbol,
        count,
        movement: MovementKind::Adjacent,
        wins: outranks,
        description,
    }
}

/// Catalog indexed by rank value.
static PROFILES: [RankProfile; Rank::COUNT] = [
    RankProfile {
        name: "Flag",
        symbol: "D",
        count: 1,
        movement: MovementKind::Immobile,
        wins: outranks,
        description: "Cannot move. Losing it loses the game.",
    },
    RankProfile {
        name: "Spy",
        symbol: "1",
        count: 1,
        movement: MovementKind::Adjacent,
        wins: spy_wins,
        description: "Loses every fight except when it attacks the Marshal.",
    },
    RankProfile {
        name: "Scout",
        symbol: "2",
        count: 8,
        movement: MovementKind::Scout,
        wins: outranks,
        description: "Moves and attacks any distance along a clear row or column.",
    },
    RankProfile {
        name: "Miner",
        symbol: "3",
        count: 5,
        movement: MovementKind::Adjacent,
        wins: miner_wins,
        description: "The only piece that survives attacking a Bomb.",
    },
    fighter("Sergeant", "4", 4, "Moves one square at a time."),
    fighter("Lieutenant", "5", 4, "Moves one square at a time."),
    fighter("Captain", "6", 4, "Moves one square at a time."),
    fighter("Major", "7", 3, "Moves one square at a time."),
    fighter("Colonel", "8", 2, "Moves one square at a time."),
    fighter("General", "9", 1, "Moves one square at a time."),
    fighter("Marshal", "10", 1, "Strongest piece, vulnerable to the Spy."),
    RankProfile {
        name: "Bomb",
        symbol: "B",
        count: 6,
        movement: MovementKind::Immobile,
        wins: outranks,
        description: "Cannot move. Destroys any attacker except a Miner.",
    },
];

impl Rank {
    /// Numeric rank, 0 (Flag) to 11 (Bomb).
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Rank with the given numeric value.
    pub fn from_value(value: u8) -> Option<Rank> {
        Rank::iter().find(|rank| rank.value() == value)
    }

    /// Catalog entry for this rank.
    pub fn profile(self) -> &'static RankProfile {
        &PROFILES[usize::from(self.value())]
    }

    /// Number of pieces of this rank in a full army.
    pub fn count(self) -> usize {
        self.profile().count
    }

    /// Token used in army layouts.
    pub fn symbol(self) -> &'static str {
        self.profile().symbol
    }

    /// Movement rule of this rank.
    pub fn movement(self) -> MovementKind {
        self.profile().movement
    }

    /// False for Bomb and Flag.
    pub fn is_movable(self) -> bool {
        self.movement() != MovementKind::Immobile
    }

    /// Whether an attacking piece of this rank beats `defender`.
    pub fn beats(self, defender: Rank) -> bool {
        (self.profile().wins)(self, defender)
    }

    /// Parses a layout token (`1`-`10`, `D`, `B`; case-insensitive).
    pub fn from_symbol(symbol: &str) -> Result<Rank, ParseError> {
        Rank::iter()
            .find(|rank| rank.symbol().eq_ignore_ascii_case(symbol.trim()))
            .ok_or_else(|| ParseError::Rank(symbol.to_string()))
    }

    /// Every rank repeated by its army count, in rank order.
    pub fn full_army() -> Vec<Rank> {
        Rank::iter()
            .flat_map(|rank| std::iter::repeat_n(rank, rank.count()))
            .collect()
    }
}

impl FromStr for Rank {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rank::from_symbol(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_army_size_matches_catalog() {
        let total: usize = Rank::iter().map(Rank::count).sum();
        assert_eq!(total, ARMY_SIZE);
        assert_eq!(Rank::full_army().len(), ARMY_SIZE);
    }

    #[test]
    fn test_profile_index_matches_value() {
        for rank in Rank::iter() {
            assert_eq!(Rank::from_value(rank.value()), Some(rank));
            assert_eq!(Rank::from_symbol(rank.symbol()).unwrap(), rank);
        }
        assert_eq!(Rank::Marshal.symbol(), "10");
        assert!(Rank::from_value(12).is_none());
    }

    #[test]
    fn test_symbols_case_insensitive() {
        assert_eq!(Rank::from_symbol("d").unwrap(), Rank::Flag);
        assert_eq!(Rank::from_symbol("b").unwrap(), Rank::Bomb);
        assert!(Rank::from_symbol("11").is_err());
        assert!(Rank::from_symbol("X").is_err());
    }

    #[test]
    fn test_default_predicate() {
        assert!(Rank::General.beats(Rank::Colonel));
        assert!(!Rank::Colonel.beats(Rank::General));
        assert!(!Rank::Major.beats(Rank::Major));
        assert!(!Rank::Marshal.beats(Rank::Bomb));
    }

    #[test]
    fn test_special_predicates() {
        assert!(Rank::Miner.beats(Rank::Bomb));
        assert!(Rank::Spy.beats(Rank::Marshal));
        assert!(!Rank::Spy.beats(Rank::Scout));
        assert!(!Rank::Spy.beats(Rank::Spy));
        assert!(Rank::Marshal.beats(Rank::Spy));
    }

    #[test]
    fn test_immobile_ranks() {
        let immobile: Vec<_> = Rank::iter().filter(|r| !r.is_movable()).collect();
        assert_eq!(immobile, vec![Rank::Flag, Rank::Bomb]);
        assert_eq!(Rank::Scout.movement(), MovementKind::Scout);
    }
}
