//! ELO-style rating updates and matchmaking.
//!
//! Pure arithmetic over caller-supplied records; applying the resulting
//! deltas to storage is the caller's job, under whatever transactional
//! discipline its storage layer provides.

use serde::{Deserialize, Serialize};

use crate::types::Team;

/// Rating assumed for a team that has never been rated.
pub const DEFAULT_RATING: i32 = 1000;

/// Ratings never drop below this, no matter how badly a team loses.
pub const RATING_FLOOR: i32 = 100;

/// Per-team rating state, as persisted by the caller.
///
/// Every field is optional on the wire; a blank record reads as an unrated
/// team with no games played.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
}

impl RatingRecord {
    pub fn effective_rating(&self) -> i32 {
        self.rating.unwrap_or(DEFAULT_RATING)
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.losses
    }
}

/// Probability in (0, 1) that `rating_self` beats `rating_opponent`,
/// by the standard logistic formula.
pub fn expected_score(rating_self: f64, rating_opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((rating_opponent - rating_self) / 400.0))
}

/// Maximum rating swing per match.
///
/// New teams converge fast (40), veterans are damped (16), everyone else
/// gets the standard 32.
pub fn k_factor(games_played: u32) -> f64 {
    if games_played < 10 {
        40.0
    } else if games_played > 50 {
        16.0
    } else {
        32.0
    }
}

/// One side of a rating update, with everything a UI needs to display it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingDelta {
    pub old_rating: i32,
    pub new_rating: i32,
    pub change: i32,
    pub expected: f64,
}

/// Result of rating both sides of one finished battle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingUpdate {
    pub team_a: RatingDelta,
    pub team_b: RatingDelta,
}

/// Compute new ratings for both teams given the battle's winner.
///
/// K-factors are chosen per side from each team's own games played. The
/// floor of [`RATING_FLOOR`] is applied after the update; there is no
/// ceiling. Pure function, no side effects.
pub fn update_ratings(team_a: &RatingRecord, team_b: &RatingRecord, winner: Team) -> RatingUpdate {
    let rating_a = team_a.effective_rating();
    let rating_b = team_b.effective_rating();

    let expected_a = expected_score(f64::from(rating_a), f64::from(rating_b));
    let expected_b = expected_score(f64::from(rating_b), f64::from(rating_a));

    let (score_a, score_b) = match winner {
        Team::A => (1.0, 0.0),
        Team::B => (0.0, 1.0),
    };

    let change_a = (k_factor(team_a.games_played()) * (score_a - expected_a)).round() as i32;
    let change_b = (k_factor(team_b.games_played()) * (score_b - expected_b)).round() as i32;

    RatingUpdate {
        team_a: RatingDelta {
            old_rating: rating_a,
            new_rating: (rating_a + change_a).max(RATING_FLOOR),
            change: change_a,
            expected: expected_a,
        },
        team_b: RatingDelta {
            old_rating: rating_b,
            new_rating: (rating_b + change_b).max(RATING_FLOOR),
            change: change_b,
            expected: expected_b,
        },
    }
}

/// Anything with a (possibly unset) rating can enter a matchmaking pool.
pub trait Rated {
    fn rating(&self) -> Option<i32>;
}

impl Rated for RatingRecord {
    fn rating(&self) -> Option<i32> {
        self.rating
    }
}

/// Pick the `limit` candidates whose ratings sit closest to `self_rating`.
///
/// Unrated candidates count as [`DEFAULT_RATING`]. Ties keep pool order
/// (stable sort). A full sort over the pool is fine at the pool sizes this
/// game sees; swap in a range query if pools ever grow past a few hundred.
pub fn find_best_matches<C: Rated>(self_rating: i32, pool: &[C], limit: usize) -> Vec<&C> {
    let mut ranked: Vec<&C> = pool.iter().collect();
    ranked.sort_by_key(|c| (self_rating - c.rating().unwrap_or(DEFAULT_RATING)).abs());
    ranked.truncate(limit);
    ranked
}

/// Display convenience: chance of A beating B as a whole percentage.
pub fn win_probability(rating_a: i32, rating_b: i32) -> u32 {
    (expected_score(f64::from(rating_a), f64::from(rating_b)) * 100.0).round() as u32
}
