//! Victory and defeat conditions

use serde::{Deserialize, Serialize};

use crate::core::config::EndStateConfig;
use crate::core::types::MAX_RANK;
use crate::world::{StatKind, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefeatCause {
    /// The player is no longer free
    Purged,
    /// Stability hit zero
    Collapse,
    /// The army and the elite both turned
    Coup,
    /// Standing hit zero
    Ousted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Ongoing,
    Victory,
    Defeat(DefeatCause),
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }
}

/// Check the end conditions. Defeats are checked before victory.
pub fn check_end_state(world: &World, config: &EndStateConfig) -> GameStatus {
    let player = world.player();
    if !player.is_free() {
        return GameStatus::Defeat(DefeatCause::Purged);
    }
    if world.stat(StatKind::Stability) <= 0 {
        return GameStatus::Defeat(DefeatCause::Collapse);
    }
    if world.stat(StatKind::MilitaryLoyalty) < config.coup_threshold
        && world.stat(StatKind::EliteLoyalty) < config.coup_threshold
    {
        return GameStatus::Defeat(DefeatCause::Coup);
    }
    let standing = world.stat(StatKind::PlayerStanding);
    if standing <= 0 {
        return GameStatus::Defeat(DefeatCause::Ousted);
    }
    if player.position.rank >= MAX_RANK && standing >= config.victory_standing {
        return GameStatus::Victory;
    }
    GameStatus::Ongoing
}
