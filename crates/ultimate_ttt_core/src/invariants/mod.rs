//! First-class invariants for the game state.
//!
//! Invariants are logical properties every reachable state satisfies. They
//! back the debug-build postcondition of every move and screen snapshots
//! that arrive from a peer or a save file.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description)
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples of invariants.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns Ok(()) if all invariants hold, or Err with a list of
    /// violations if any invariant fails.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($inv:ident),+) => {
        impl<S, $($inv),+> InvariantSet<S> for ($($inv,)+)
        where
            $($inv: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(
                    if !$inv::holds(state) {
                        violations.push(InvariantViolation::new($inv::description()));
                    }
                )+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(I1, I2);
impl_invariant_set!(I1, I2, I3);
impl_invariant_set!(I1, I2, I3, I4);
impl_invariant_set!(I1, I2, I3, I4, I5);

mod constraint_playable;
mod level_markers;
mod settled_owners;
mod turn_order;
mod winner_mirrors_root;

pub use constraint_playable::ConstraintPlayableInvariant;
pub use level_markers::LevelMarkersInvariant;
pub use settled_owners::SettledOwnersInvariant;
pub use turn_order::TurnOrderInvariant;
pub use winner_mirrors_root::WinnerMirrorsRootInvariant;

/// All game state invariants as a composable set.
pub type GameStateInvariants = (
    LevelMarkersInvariant,
    SettledOwnersInvariant,
    WinnerMirrorsRootInvariant,
    ConstraintPlayableInvariant,
    TurnOrderInvariant,
);
