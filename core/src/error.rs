//! Error types for the battle resolver.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Team;

/// Errors surfaced to callers of the resolver.
///
/// All of these are caller contract violations; the resolver itself does not
/// fail on well-formed input, so there is no retry story here.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EngineError {
    /// A battle needs at least one unit on each side.
    #[error("roster for side {team} is empty")]
    EmptyRoster { team: Team },
}
