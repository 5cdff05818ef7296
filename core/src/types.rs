use core::fmt;

use serde::{Deserialize, Serialize};

/// Stat defaults applied when a caller-supplied card omits a field.
pub const DEFAULT_ATTACK: i32 = 1;
pub const DEFAULT_HEALTH: i32 = 10;
pub const DEFAULT_SPEED: i32 = 1;

/// Which side of the battle a unit fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::A => write!(f, "A"),
            Team::B => write!(f, "B"),
        }
    }
}

/// Caller-supplied stats for one card entering a battle.
///
/// All stats are optional; missing values fall back to the defaults above.
/// `health` also accepts the `maxHealth` key some card payloads use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSpec {
    pub name: String,
    #[serde(default)]
    pub attack: Option<i32>,
    #[serde(default, alias = "maxHealth")]
    pub health: Option<i32>,
    #[serde(default)]
    pub speed: Option<i32>,
    #[serde(default)]
    pub image: Option<String>,
}

impl UnitSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_stats(mut self, attack: i32, health: i32, speed: i32) -> Self {
        self.attack = Some(attack);
        self.health = Some(health);
        self.speed = Some(speed);
        self
    }
}

/// Mutable working copy of one card for the duration of a battle.
///
/// The resolver clones these from the caller's [`UnitSpec`]s at battle start;
/// the caller's data is never touched. `current_health` only ever decreases
/// and `is_alive` flips to `false` exactly once (there is no healing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatUnit {
    pub name: String,
    pub team: Team,
    pub attack: i32,
    pub max_health: i32,
    pub current_health: i32,
    pub speed: i32,
    pub is_alive: bool,
    pub image: Option<String>,
}

impl CombatUnit {
    pub(crate) fn from_spec(spec: &UnitSpec, team: Team) -> Self {
        let max_health = spec.health.unwrap_or(DEFAULT_HEALTH).max(1);
        Self {
            name: spec.name.clone(),
            team,
            attack: spec.attack.unwrap_or(DEFAULT_ATTACK).max(0),
            max_health,
            current_health: max_health,
            speed: spec.speed.unwrap_or(DEFAULT_SPEED).max(0),
            is_alive: true,
            image: spec.image.clone(),
        }
    }

    /// Clamp health at zero and flip the alive flag on the killing blow.
    pub(crate) fn take_damage(&mut self, damage: i32) -> bool {
        self.current_health = (self.current_health - damage).max(0);
        if self.current_health == 0 && self.is_alive {
            self.is_alive = false;
            return true;
        }
        false
    }

    pub fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            name: self.name.clone(),
            health: self.current_health,
            max_health: self.max_health,
            alive: self.is_alive,
            image: self.image.clone(),
        }
    }
}

/// Immutable per-unit view carried by `start` and `end` log entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSnapshot {
    pub name: String,
    pub health: i32,
    pub max_health: i32,
    pub alive: bool,
    pub image: Option<String>,
}
