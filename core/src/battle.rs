//! Turn-based battle resolver.
//!
//! Simulates two rosters fighting to the death and returns a chronological
//! event log for client playback plus the winner and final unit states.
//! Turn order and win-condition evaluation are fully deterministic; target
//! selection and damage variance come from the injected RNG, so a fixed seed
//! replays the exact same battle.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::rng::{BattleRng, XorShiftRng};
use crate::types::{CombatUnit, Team, UnitSnapshot, UnitSpec};

/// Hard cap on rounds, so zero-attack stalemates still terminate.
pub const MAX_ROUNDS: u32 = 50;

/// Damage swings ±20% around base attack: variance in [0.8, 1.2).
const VARIANCE_MIN: f64 = 0.8;
const VARIANCE_SPAN: f64 = 0.4;

/// Events generated during combat for UI playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BattleEvent {
    #[serde(rename_all = "camelCase")]
    Start {
        roster_a: Vec<UnitSnapshot>,
        roster_b: Vec<UnitSnapshot>,
    },
    #[serde(rename_all = "camelCase")]
    RoundStart {
        round: u32,
        alive_a: usize,
        alive_b: usize,
    },
    #[serde(rename_all = "camelCase")]
    Attack {
        round: u32,
        attacker: String,
        attacker_team: Team,
        attacker_image: Option<String>,
        target: String,
        target_image: Option<String>,
        damage: i32,
        target_health: i32,
        died: bool,
    },
    #[serde(rename_all = "camelCase")]
    End {
        winner: Team,
        rounds_played: u32,
        final_a: Vec<UnitSnapshot>,
        final_b: Vec<UnitSnapshot>,
    },
}

/// Everything a caller needs from one resolved battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleRecord {
    pub log: Vec<BattleEvent>,
    pub winner: Team,
    pub rounds_played: u32,
    pub final_units: FinalUnits,
}

/// Final health/alive state of both rosters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalUnits {
    pub a: Vec<CombatUnit>,
    pub b: Vec<CombatUnit>,
}

/// Resolve a battle using a seeded [`XorShiftRng`].
///
/// The same seed and rosters always produce the same [`BattleRecord`].
pub fn resolve_battle(
    roster_a: &[UnitSpec],
    roster_b: &[UnitSpec],
    seed: u64,
) -> Result<BattleRecord, EngineError> {
    let mut rng = XorShiftRng::seed_from_u64(seed);
    resolve_battle_with(roster_a, roster_b, &mut rng)
}

/// Resolve a battle with a caller-supplied random source.
pub fn resolve_battle_with(
    roster_a: &[UnitSpec],
    roster_b: &[UnitSpec],
    rng: &mut impl BattleRng,
) -> Result<BattleRecord, EngineError> {
    if roster_a.is_empty() {
        return Err(EngineError::EmptyRoster { team: Team::A });
    }
    if roster_b.is_empty() {
        return Err(EngineError::EmptyRoster { team: Team::B });
    }

    let mut units_a: Vec<CombatUnit> = roster_a
        .iter()
        .map(|s| CombatUnit::from_spec(s, Team::A))
        .collect();
    let mut units_b: Vec<CombatUnit> = roster_b
        .iter()
        .map(|s| CombatUnit::from_spec(s, Team::B))
        .collect();

    let mut log = vec![BattleEvent::Start {
        roster_a: snapshots(&units_a),
        roster_b: snapshots(&units_b),
    }];

    let mut rounds_played = 0;
    for round in 1..=MAX_ROUNDS {
        let alive_a = count_alive(&units_a);
        let alive_b = count_alive(&units_b);
        if alive_a == 0 || alive_b == 0 {
            break;
        }

        rounds_played = round;
        log.push(BattleEvent::RoundStart {
            round,
            alive_a,
            alive_b,
        });
        log::debug!("round {round}: {alive_a} alive on A, {alive_b} on B");

        // One combined turn order per round: all living units, fastest first.
        // Stable sort, with A pushed before B, so speed ties keep insertion
        // order rather than encoding any semantic tie-break.
        let mut order: Vec<(Team, usize)> = Vec::new();
        for (i, u) in units_a.iter().enumerate() {
            if u.is_alive {
                order.push((Team::A, i));
            }
        }
        for (i, u) in units_b.iter().enumerate() {
            if u.is_alive {
                order.push((Team::B, i));
            }
        }
        order.sort_by_key(|&(team, idx)| {
            let speed = match team {
                Team::A => units_a[idx].speed,
                Team::B => units_b[idx].speed,
            };
            core::cmp::Reverse(speed)
        });

        for (team, idx) in order {
            // Units killed earlier in the same round lose their turn.
            let (attacker_name, attacker_image, attack) = {
                let attacker = match team {
                    Team::A => &units_a[idx],
                    Team::B => &units_b[idx],
                };
                if !attacker.is_alive {
                    continue;
                }
                (attacker.name.clone(), attacker.image.clone(), attacker.attack)
            };

            let defenders = match team {
                Team::A => &mut units_b,
                Team::B => &mut units_a,
            };
            let living: Vec<usize> = defenders
                .iter()
                .enumerate()
                .filter(|(_, u)| u.is_alive)
                .map(|(i, _)| i)
                .collect();
            if living.is_empty() {
                // Battle decided mid-round, remaining turns are forfeit.
                break;
            }

            let target_idx = living[rng.gen_range(living.len())];
            let damage = roll_damage(attack, rng);
            let target = &mut defenders[target_idx];
            let died = target.take_damage(damage);

            log.push(BattleEvent::Attack {
                round,
                attacker: attacker_name,
                attacker_team: team,
                attacker_image,
                target: target.name.clone(),
                target_image: target.image.clone(),
                damage,
                target_health: target.current_health,
                died,
            });

            if count_alive(&units_a) == 0 || count_alive(&units_b) == 0 {
                break;
            }
        }
    }

    let winner = determine_winner(&units_a, &units_b);
    log.push(BattleEvent::End {
        winner,
        rounds_played,
        final_a: snapshots(&units_a),
        final_b: snapshots(&units_b),
    });
    log::debug!("battle over after {rounds_played} rounds, winner {winner}");

    Ok(BattleRecord {
        log,
        winner,
        rounds_played,
        final_units: FinalUnits {
            a: units_a,
            b: units_b,
        },
    })
}

/// `round(attack × variance)` with variance uniform in [0.8, 1.2).
///
/// Zero-attack units deal zero damage; that is the documented behavior, not
/// a floor waiting to be added. Callers that want a guaranteed dent apply
/// `max(1, attack)` before building the roster.
fn roll_damage(attack: i32, rng: &mut impl BattleRng) -> i32 {
    let variance = VARIANCE_MIN + rng.next_fraction() * VARIANCE_SPAN;
    (f64::from(attack) * variance).round() as i32
}

/// More survivors wins; on a tie, more total remaining health wins, with
/// exact ties going to side A.
fn determine_winner(units_a: &[CombatUnit], units_b: &[CombatUnit]) -> Team {
    let alive_a = count_alive(units_a);
    let alive_b = count_alive(units_b);
    if alive_a != alive_b {
        return if alive_a > alive_b { Team::A } else { Team::B };
    }
    let hp_a: i32 = units_a.iter().map(|u| u.current_health).sum();
    let hp_b: i32 = units_b.iter().map(|u| u.current_health).sum();
    if hp_a >= hp_b {
        Team::A
    } else {
        Team::B
    }
}

fn count_alive(units: &[CombatUnit]) -> usize {
    units.iter().filter(|u| u.is_alive).count()
}

fn snapshots(units: &[CombatUnit]) -> Vec<UnitSnapshot> {
    units.iter().map(CombatUnit::snapshot).collect()
}

// ==========================================
// LOG INSPECTION HELPERS
// ==========================================

/// Count units of `team` that died over the course of a battle log.
pub fn casualties_from_log(log: &[BattleEvent], team: Team) -> usize {
    log.iter()
        .filter(|e| {
            matches!(
                e,
                BattleEvent::Attack {
                    attacker_team,
                    died: true,
                    ..
                } if attacker_team.opponent() == team
            )
        })
        .count()
}

/// Total damage dealt by `team` over a battle log.
pub fn damage_dealt_from_log(log: &[BattleEvent], team: Team) -> i64 {
    log.iter()
        .filter_map(|e| match e {
            BattleEvent::Attack {
                attacker_team,
                damage,
                ..
            } if *attacker_team == team => Some(i64::from(*damage)),
            _ => None,
        })
        .sum()
}
