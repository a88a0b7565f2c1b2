//! Core type definitions used throughout the codebase

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Game turn counter (simulation time unit)
pub type Turn = u32;

/// Unique identifier for actors (index into the world's actor arena)
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[display(fmt = "actor#{}", _0)]
pub struct ActorId(pub u32);

impl ActorId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Unique identifier for factions
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[display(fmt = "faction#{}", _0)]
pub struct FactionId(pub u32);

/// Unique identifier for laws in force
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[display(fmt = "law#{}", _0)]
pub struct LawId(pub u32);

/// Unique identifier for scheduled consequences
///
/// Issued from a single monotonic counter, so ordering by id is creation order.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[display(fmt = "consequence#{}", _0)]
pub struct ConsequenceId(pub u64);

/// Unique identifier for in-flight processes (detentions, trials, campaigns)
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[display(fmt = "process#{}", _0)]
pub struct ProcessId(pub u32);

/// Career rank on the position ladder (1 = lowest, 8 = top of the apparatus)
pub type Rank = u8;

/// Highest rank on the ladder
pub const MAX_RANK: Rank = 8;

/// Career track an actor climbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    Party,
    State,
    Security,
    Military,
    Economic,
}

/// A career slot: which ladder and how high on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub track: Track,
    pub rank: Rank,
}

impl Position {
    pub fn new(track: Track, rank: Rank) -> Self {
        Self {
            track,
            rank: rank.clamp(1, MAX_RANK),
        }
    }

    /// Returns true if this position outranks the other
    pub fn outranks(&self, other: &Position) -> bool {
        self.rank > other.rank
    }

    pub fn promoted(self) -> Self {
        Self::new(self.track, self.rank.saturating_add(1))
    }

    pub fn demoted(self) -> Self {
        Self::new(self.track, self.rank.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_id_display() {
        assert_eq!(ActorId(7).to_string(), "actor#7");
        assert_eq!(ConsequenceId(3).to_string(), "consequence#3");
    }

    #[test]
    fn test_consequence_id_orders_by_creation() {
        assert!(ConsequenceId(1) < ConsequenceId(2));
    }

    #[test]
    fn test_position_rank_is_clamped() {
        assert_eq!(Position::new(Track::Party, 0).rank, 1);
        assert_eq!(Position::new(Track::Party, 12).rank, MAX_RANK);
    }

    #[test]
    fn test_promotion_and_demotion_stay_on_ladder() {
        let top = Position::new(Track::State, MAX_RANK);
        assert_eq!(top.promoted().rank, MAX_RANK);

        let bottom = Position::new(Track::State, 1);
        assert_eq!(bottom.demoted().rank, 1);

        let mid = Position::new(Track::Security, 4);
        assert!(mid.promoted().outranks(&mid));
        assert!(!mid.demoted().outranks(&mid));
    }
}
