//! First-class invariants for the game model.
//!
//! Invariants are logical properties that must hold after every command.
//! Debug builds check them once each command completed; tests check them
//! directly.

use derive_more::Display;

/// A property of `S` that holds between two commands.
pub trait Invariant<S> {
    /// Whether `state` satisfies the property.
    fn holds(state: &S) -> bool;

    /// Reported when the property is broken.
    fn description() -> &'static str;
}

/// A broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{description}")]
pub struct InvariantViolation {
    /// What was broken.
    pub description: String,
}

impl InvariantViolation {
    /// Violation of the invariant described by `description`.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Invariants checked together, implemented for triples.
pub trait InvariantSet<S> {
    /// Every violated invariant, or `Ok(())`.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<_> = [
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
            (I3::holds(state), I3::description()),
        ]
        .into_iter()
        .filter(|(holds, _)| !holds)
        .map(|(_, description)| InvariantViolation::new(description))
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

pub mod army_accounting;
pub mod board_layout;
pub mod single_occupancy;

pub use army_accounting::ArmyAccountingInvariant;
pub use board_layout::BoardLayoutInvariant;
pub use single_occupancy::SingleOccupancyInvariant;

/// Every invariant of the game model.
pub type ModelInvariants = (
    BoardLayoutInvariant,
    SingleOccupancyInvariant,
    ArmyAccountingInvariant,
);
