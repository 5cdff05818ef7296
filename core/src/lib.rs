//! Battle resolver and rating engine for Cardclash.
//!
//! Two independent, pure components:
//!
//! - [`battle`]: a turn-based combat resolver that pits two rosters of card
//!   units against each other and produces a replayable event log plus a
//!   winner. Randomness (target selection, damage variance) comes from an
//!   injected seedable RNG, so the same seed always replays the same battle.
//! - [`rating`]: ELO-style rating updates and closest-rating matchmaking.
//!
//! Neither component does I/O or holds state across calls; persistence of
//! rosters, ratings, and battle history is entirely the caller's concern.

pub mod battle;
pub mod error;
pub mod rating;
pub mod rng;
pub mod types;

#[cfg(test)]
mod tests;

pub use battle::{
    casualties_from_log, damage_dealt_from_log, resolve_battle, resolve_battle_with, BattleEvent,
    BattleRecord, FinalUnits, MAX_ROUNDS,
};
pub use error::EngineError;
pub use rating::{
    expected_score, find_best_matches, k_factor, update_ratings, win_probability, Rated,
    RatingDelta, RatingRecord, RatingUpdate, DEFAULT_RATING, RATING_FLOOR,
};
pub use rng::{BattleRng, XorShiftRng};
pub use types::{CombatUnit, Team, UnitSnapshot, UnitSpec};
