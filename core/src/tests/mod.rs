
use crate::battle::{resolve_battle, BattleEvent, BattleRecord};
use crate::types::{Team, UnitSpec};

// ==========================================
// HELPER FUNCTIONS (Boilerplate Reduction)
// ==========================================

fn unit(name: &str, attack: i32, health: i32, speed: i32) -> UnitSpec {
    UnitSpec::new(name).with_stats(attack, health, speed)
}

fn bare_unit(name: &str) -> UnitSpec {
    UnitSpec::new(name)
}

fn run(roster_a: &[UnitSpec], roster_b: &[UnitSpec], seed: u64) -> BattleRecord {
    resolve_battle(roster_a, roster_b, seed).expect("well-formed rosters must resolve")
}

/// Per-unit health readings in log order, for monotonicity checks.
fn health_readings(record: &BattleRecord) -> Vec<(String, i32)> {
    record
        .log
        .iter()
        .filter_map(|e| match e {
            BattleEvent::Attack {
                target,
                target_health,
                ..
            } => Some((target.clone(), *target_health)),
            _ => None,
        })
        .collect()
}

/// Names of units that have died so far, scanning the log in order.
fn deaths_in_order(record: &BattleRecord) -> Vec<(String, Team)> {
    record
        .log
        .iter()
        .filter_map(|e| match e {
            BattleEvent::Attack {
                target,
                attacker_team,
                died: true,
                ..
            } => Some((target.clone(), attacker_team.opponent())),
            _ => None,
        })
        .collect()
}
