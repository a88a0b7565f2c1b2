//! Actors - the officials, rivals and the player persona
//!
//! Actors are never removed from the world; they only move between statuses so
//! every historical reference stays valid.

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};
use crate::core::types::{ActorId, FactionId, Position, Turn};

/// Where an actor stands with the regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorStatus {
    Active,
    Detained,
    UnderInvestigation,
    Imprisoned,
    Exiled,
    Disappeared,
    Executed,
    Dead,
    Retired,
    Rehabilitated,
}

impl ActorStatus {
    /// Free actors hold office and can act
    pub fn is_free(&self) -> bool {
        matches!(self, ActorStatus::Active | ActorStatus::Rehabilitated)
    }

    pub fn is_alive(&self) -> bool {
        !matches!(self, ActorStatus::Dead | ActorStatus::Executed)
    }

    /// Statuses an actor can come back from
    pub fn can_return(&self) -> bool {
        matches!(
            self,
            ActorStatus::UnderInvestigation
                | ActorStatus::Imprisoned
                | ActorStatus::Exiled
                | ActorStatus::Disappeared
        )
    }

    /// Chance over the whole absence that the actor returns
    pub fn return_probability(&self) -> f64 {
        match self {
            ActorStatus::UnderInvestigation => 0.6,
            ActorStatus::Imprisoned => 0.2,
            ActorStatus::Exiled => 0.15,
            ActorStatus::Disappeared => 0.05,
            _ => 0.0,
        }
    }

    /// How far removed from power a status is
    fn severity(&self) -> u8 {
        match self {
            ActorStatus::Active | ActorStatus::Rehabilitated => 0,
            ActorStatus::UnderInvestigation => 1,
            ActorStatus::Detained => 2,
            ActorStatus::Exiled | ActorStatus::Imprisoned | ActorStatus::Disappeared => 3,
            ActorStatus::Retired => 4,
            ActorStatus::Executed | ActorStatus::Dead => 5,
        }
    }

    /// Whether `self -> next` is a legal status change
    pub fn can_transition_to(&self, next: ActorStatus) -> bool {
        use ActorStatus::*;

        if *self == next {
            return false;
        }
        match self {
            Dead | Executed => false,
            Retired => next == Dead,
            Active | Rehabilitated => !next.is_free(),
            Detained | UnderInvestigation | Imprisoned | Exiled | Disappeared => {
                if next.is_free() {
                    // Release from custody clears to Active; return from
                    // a reversible absence is rehabilitation
                    next == Rehabilitated || (next == Active && self.severity() <= 2)
                } else {
                    next != Retired && next.severity() > self.severity()
                        || next == Dead
                        || next == Executed
                }
            }
        }
    }
}

/// Personality vector, each trait 0-100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personality {
    pub ambitious: i32,
    pub loyal: i32,
    pub paranoid: i32,
    pub ruthless: i32,
    pub corrupt: i32,
    pub competent: i32,
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            ambitious: 50,
            loyal: 50,
            paranoid: 50,
            ruthless: 50,
            corrupt: 50,
            competent: 50,
        }
    }
}

impl Personality {
    pub fn clamped(self) -> Self {
        let c = |v: i32| v.clamp(0, 100);
        Self {
            ambitious: c(self.ambitious),
            loyal: c(self.loyal),
            paranoid: c(self.paranoid),
            ruthless: c(self.ruthless),
            corrupt: c(self.corrupt),
            competent: c(self.competent),
        }
    }
}

/// How an actor feels about the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// -100 (hostile) to +100 (devoted)
    pub disposition: i32,
    pub grudge: i32,
    pub gratitude: i32,
    pub fear: i32,
    pub trust: i32,
}

impl Default for Relationship {
    fn default() -> Self {
        Self {
            disposition: 0,
            grudge: 0,
            gratitude: 0,
            fear: 20,
            trust: 30,
        }
    }
}

impl Relationship {
    pub fn adjust_disposition(&mut self, delta: i32) {
        self.disposition = (self.disposition + delta).clamp(-100, 100);
    }

    pub fn adjust_grudge(&mut self, delta: i32) {
        self.grudge = (self.grudge + delta).clamp(0, 100);
    }

    pub fn adjust_gratitude(&mut self, delta: i32) {
        self.gratitude = (self.gratitude + delta).clamp(0, 100);
    }

    pub fn adjust_fear(&mut self, delta: i32) {
        self.fear = (self.fear + delta).clamp(0, 100);
    }

    pub fn adjust_trust(&mut self, delta: i32) {
        self.trust = (self.trust + delta).clamp(0, 100);
    }
}

/// What an actor is working toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    SeekPromotion,
    RemovePlayer,
    SupportPlayer,
    ProtectFaction,
    Revenge { target: ActorId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub kind: GoalKind,
    /// 0-100
    pub priority: i32,
    pub created_turn: Turn,
    pub deadline: Option<Turn>,
    /// Turns the goal has gone unmet past its deadline or after a failed attempt
    pub frustration: u32,
}

impl Goal {
    pub fn new(kind: GoalKind, priority: i32, created_turn: Turn) -> Self {
        Self {
            kind,
            priority: priority.clamp(0, 100),
            created_turn,
            deadline: None,
            frustration: 0,
        }
    }

    pub fn with_deadline(mut self, deadline: Turn) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn is_overdue(&self, turn: Turn) -> bool {
        self.deadline.map_or(false, |d| turn > d)
    }

    pub fn is_frustrated(&self) -> bool {
        self.frustration > 0
    }

    /// Priority raised by accumulated frustration, capped at 100
    pub fn effective_priority(&self) -> i32 {
        (self.priority + (self.frustration as i32 * 5).min(25)).min(100)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    Grudge,
    Gratitude,
    Trauma,
}

/// Something an actor remembers, fading over time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    pub kind: MemoryKind,
    /// 0-100
    pub intensity: i32,
    pub turn: Turn,
    pub about: Option<ActorId>,
}

impl Memory {
    pub fn new(kind: MemoryKind, intensity: i32, turn: Turn, about: Option<ActorId>) -> Self {
        Self {
            kind,
            intensity: intensity.clamp(0, 100),
            turn,
            about,
        }
    }

    /// Intensity scaled by how recent the memory is (linear fade over `horizon` turns)
    pub fn weighted_intensity(&self, current_turn: Turn, horizon: u32) -> i32 {
        if horizon == 0 {
            return 0;
        }
        let age = current_turn.saturating_sub(self.turn).min(horizon);
        self.intensity * (horizon - age) as i32 / horizon as i32
    }
}

/// An NPC or the player persona
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub is_player: bool,
    pub position: Position,
    pub faction: Option<FactionId>,
    pub status: ActorStatus,
    pub status_since: Turn,
    pub personality: Personality,
    pub relationship: Relationship,
    pub goals: Vec<Goal>,
    pub memories: Vec<Memory>,
}

impl Actor {
    pub fn new(id: ActorId, name: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            is_player: false,
            position,
            faction: None,
            status: ActorStatus::Active,
            status_since: 0,
            personality: Personality::default(),
            relationship: Relationship::default(),
            goals: Vec::new(),
            memories: Vec::new(),
        }
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = personality.clamped();
        self
    }

    pub fn with_faction(mut self, faction: FactionId) -> Self {
        self.faction = Some(faction);
        self
    }

    pub fn is_free(&self) -> bool {
        self.status.is_free()
    }

    pub fn is_alive(&self) -> bool {
        self.status.is_alive()
    }

    /// Move to a new status if the lifecycle allows it
    pub fn transition_to(&mut self, next: ActorStatus, turn: Turn) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(EngineError::InvalidStatusTransition {
                actor: self.id,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.status_since = turn;
        Ok(())
    }

    pub fn remember(&mut self, memory: Memory) {
        self.memories.push(memory);
    }

    pub fn goal_mut(&mut self, kind: GoalKind) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|g| g.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Track;

    fn test_actor() -> Actor {
        Actor::new(ActorId(1), "Comrade Test", Position::new(Track::Party, 3))
    }

    #[test]
    fn test_terminal_statuses_stay_terminal() {
        for next in [ActorStatus::Active, ActorStatus::Rehabilitated, ActorStatus::Imprisoned] {
            assert!(!ActorStatus::Dead.can_transition_to(next));
            assert!(!ActorStatus::Executed.can_transition_to(next));
        }
        assert!(ActorStatus::Retired.can_transition_to(ActorStatus::Dead));
        assert!(!ActorStatus::Retired.can_transition_to(ActorStatus::Active));
    }

    #[test]
    fn test_reversible_statuses_can_return() {
        for status in [
            ActorStatus::UnderInvestigation,
            ActorStatus::Imprisoned,
            ActorStatus::Exiled,
            ActorStatus::Disappeared,
        ] {
            assert!(status.can_return());
            assert!(status.return_probability() > 0.0);
            assert!(status.can_transition_to(ActorStatus::Rehabilitated));
        }
        assert!(!ActorStatus::Executed.can_return());
        assert_eq!(ActorStatus::Retired.return_probability(), 0.0);
    }

    #[test]
    fn test_detained_released_to_active() {
        assert!(ActorStatus::Detained.can_transition_to(ActorStatus::Active));
        assert!(ActorStatus::Detained.can_transition_to(ActorStatus::Imprisoned));
        assert!(!ActorStatus::Imprisoned.can_transition_to(ActorStatus::Active));
        assert!(!ActorStatus::Imprisoned.can_transition_to(ActorStatus::Detained));
    }

    #[test]
    fn test_transition_records_turn() {
        let mut actor = test_actor();
        actor.transition_to(ActorStatus::Detained, 4).unwrap();
        assert_eq!(actor.status, ActorStatus::Detained);
        assert_eq!(actor.status_since, 4);
    }

    #[test]
    fn test_invalid_transition_is_error() {
        let mut actor = test_actor();
        actor.transition_to(ActorStatus::Dead, 2).unwrap();
        let result = actor.transition_to(ActorStatus::Active, 3);
        assert!(matches!(result, Err(EngineError::InvalidStatusTransition { .. })));
        assert_eq!(actor.status, ActorStatus::Dead);
    }

    #[test]
    fn test_goal_effective_priority() {
        let mut goal = Goal::new(GoalKind::SeekPromotion, 60, 0).with_deadline(5);
        assert_eq!(goal.effective_priority(), 60);
        assert!(!goal.is_overdue(5));
        assert!(goal.is_overdue(6));

        goal.frustration = 3;
        assert_eq!(goal.effective_priority(), 75);
        goal.frustration = 20;
        assert_eq!(goal.effective_priority(), 85);
    }

    #[test]
    fn test_memory_fades_linearly() {
        let memory = Memory::new(MemoryKind::Grudge, 80, 10, None);
        assert_eq!(memory.weighted_intensity(10, 20), 80);
        assert_eq!(memory.weighted_intensity(20, 20), 40);
        assert_eq!(memory.weighted_intensity(40, 20), 0);
    }

    #[test]
    fn test_personality_clamped() {
        let actor = test_actor().with_personality(Personality {
            ambitious: 150,
            loyal: -20,
            ..Personality::default()
        });
        assert_eq!(actor.personality.ambitious, 100);
        assert_eq!(actor.personality.loyal, 0);
    }
}
