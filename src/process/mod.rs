//! Multi-turn processes: detentions, show trials, campaigns
//!
//! Every process kind is a forward-only phase machine sharing [`ProcessCore`]
//! and driven by the generic [`advance`] in `machine`. Reaching the terminal
//! phase resolves an outcome and applies it exactly once.

pub mod campaign;
pub mod detention;
pub mod machine;
pub mod registry;
pub mod trial;

pub use campaign::{Campaign, CampaignKind, CampaignOutcome, CampaignPhase};
pub use detention::{Detention, DetentionPhase};
pub use machine::{advance, apply_outcome, PhaseMachine};
pub use registry::{advance_all, AdvanceSummary, ProcessRegistry};
pub use trial::{Charge, ConfessionType, ShowTrial, TrialPhase};

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::error::{EngineError, Result};
use crate::core::types::{ActorId, ProcessId, Turn};
use crate::outcome::{DetentionOutcome, Fate, TrialSentence};
use crate::world::{ActorStatus, StatKind, World};

/// An ordered phase sequence
pub trait Phase: Copy + Ord + Debug {
    /// The phase after this one, `None` for the terminal phase
    fn next(self) -> Option<Self>;

    fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

/// State every process carries regardless of kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessCore<P, O> {
    pub id: ProcessId,
    pub initiated_turn: Turn,
    /// Precomputed end turn, for kinds with a fixed total duration
    pub completion_turn: Option<Turn>,
    phase: P,
    phase_entered: Turn,
    pub progress: u32,
    /// Evidence, pressure or intensity, depending on kind (0-100)
    pub score: i32,
    outcome: Option<O>,
    applied: bool,
}

impl<P: Phase, O: Copy> ProcessCore<P, O> {
    pub fn new(id: ProcessId, first: P, turn: Turn) -> Self {
        Self {
            id,
            initiated_turn: turn,
            completion_turn: None,
            phase: first,
            phase_entered: turn,
            progress: 0,
            score: 0,
            outcome: None,
            applied: false,
        }
    }

    pub fn phase(&self) -> P {
        self.phase
    }

    pub fn phase_entered(&self) -> Turn {
        self.phase_entered
    }

    pub fn turns_in_phase(&self, turn: Turn) -> u32 {
        turn.saturating_sub(self.phase_entered)
    }

    /// Move to a strictly later phase
    pub fn enter(&mut self, next: P, turn: Turn) -> Result<()> {
        if next <= self.phase {
            return Err(EngineError::PhaseRegression {
                process: self.id,
                from: format!("{:?}", self.phase),
                to: format!("{:?}", next),
            });
        }
        self.phase = next;
        self.phase_entered = turn;
        Ok(())
    }

    pub fn outcome(&self) -> Option<O> {
        self.outcome
    }

    /// Record the terminal outcome. Fails if one is already set.
    pub fn set_outcome(&mut self, outcome: O) -> Result<()> {
        if self.outcome.is_some() {
            return Err(EngineError::OutcomeAlreadySet(self.id));
        }
        self.outcome = Some(outcome);
        Ok(())
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    pub(crate) fn mark_applied(&mut self) {
        self.applied = true;
    }

    /// Terminal and applied: ready to leave the active set
    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal() && self.applied
    }

    pub fn add_score(&mut self, delta: i32) {
        self.score = (self.score + delta).clamp(0, 100);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessKind {
    Detention,
    ShowTrial,
    Campaign(CampaignKind),
}

/// Phase of any process kind, for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessPhase {
    Detention(DetentionPhase),
    Trial(TrialPhase),
    Campaign(CampaignPhase),
}

/// Terminal outcome of any process kind, for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTag {
    Detention(DetentionOutcome),
    Trial(TrialSentence),
    Campaign(CampaignOutcome),
}

/// What one `advance` call did, tags and numbers only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseResult {
    pub process: ProcessId,
    pub kind: ProcessKind,
    pub subject: Option<ActorId>,
    pub phase: ProcessPhase,
    /// Whether the phase changed this call
    pub advanced: bool,
    /// World stat changes actually applied
    pub effects: Vec<(StatKind, i32)>,
    pub outcome: Option<OutcomeTag>,
    /// Actors newly dragged into an investigation
    pub implicated: Vec<ActorId>,
    /// Status changes applied to actors
    pub status_changes: Vec<(ActorId, ActorStatus)>,
}

impl PhaseResult {
    pub fn new(process: ProcessId, kind: ProcessKind, subject: Option<ActorId>, phase: ProcessPhase) -> Self {
        Self {
            process,
            kind,
            subject,
            phase,
            advanced: false,
            effects: Vec::new(),
            outcome: None,
            implicated: Vec::new(),
            status_changes: Vec::new(),
        }
    }

    /// Apply a stat delta and record what actually changed
    pub fn apply_stat(&mut self, world: &mut World, stat: StatKind, delta: i32) {
        let applied = world.apply_stat(stat, delta);
        if applied != 0 {
            self.effects.push((stat, applied));
        }
    }

    /// Change an actor's status, recording it. An illegal transition is logged
    /// and skipped.
    pub fn set_status(&mut self, world: &mut World, actor: ActorId, status: ActorStatus) -> bool {
        if set_status(world, actor, status) {
            self.status_changes.push((actor, status));
            true
        } else {
            false
        }
    }
}

/// Change an actor's status if the lifecycle allows it
pub fn set_status(world: &mut World, actor: ActorId, status: ActorStatus) -> bool {
    let turn = world.turn();
    match world.actor_mut(actor) {
        Some(a) if a.status == status => true,
        Some(a) => match a.transition_to(status, turn) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Status change skipped");
                false
            }
        },
        None => {
            warn!(actor = %actor, "Status change for unknown actor");
            false
        }
    }
}

/// Carry out a fate on an official. Returns the status the actor ended in,
/// if it changed.
pub fn apply_fate(world: &mut World, actor: ActorId, fate: Fate) -> Option<ActorStatus> {
    let status = match fate {
        Fate::Untouched => return None,
        Fate::Demoted => {
            let a = world.actor_mut(actor)?;
            a.position = a.position.demoted();
            a.relationship.adjust_grudge(15);
            return None;
        }
        Fate::Retired => ActorStatus::Retired,
        Fate::Exiled => ActorStatus::Exiled,
        Fate::Imprisoned => ActorStatus::Imprisoned,
        Fate::Disappeared => ActorStatus::Disappeared,
    };
    if set_status(world, actor, status) {
        Some(status)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Position, Track};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Step {
        One,
        Two,
        Done,
    }

    impl Phase for Step {
        fn next(self) -> Option<Self> {
            match self {
                Step::One => Some(Step::Two),
                Step::Two => Some(Step::Done),
                Step::Done => None,
            }
        }
    }

    #[test]
    fn test_phase_only_moves_forward() {
        let mut core: ProcessCore<Step, u8> = ProcessCore::new(ProcessId(1), Step::One, 0);
        core.enter(Step::Two, 2).unwrap();
        assert_eq!(core.turns_in_phase(5), 3);

        assert!(matches!(core.enter(Step::One, 6), Err(EngineError::PhaseRegression { .. })));
        assert!(core.enter(Step::Two, 6).is_err());
        assert_eq!(core.phase(), Step::Two);
        assert_eq!(core.phase_entered(), 2);
    }

    #[test]
    fn test_outcome_set_once() {
        let mut core: ProcessCore<Step, u8> = ProcessCore::new(ProcessId(1), Step::One, 0);
        core.set_outcome(3).unwrap();
        assert!(matches!(core.set_outcome(4), Err(EngineError::OutcomeAlreadySet(_))));
        assert_eq!(core.outcome(), Some(3));
    }

    #[test]
    fn test_score_clamped() {
        let mut core: ProcessCore<Step, u8> = ProcessCore::new(ProcessId(1), Step::One, 0);
        core.add_score(150);
        assert_eq!(core.score, 100);
        core.add_score(-300);
        assert_eq!(core.score, 0);
    }

    #[test]
    fn test_apply_fate() {
        let mut world = World::new("Player", Position::new(Track::Party, 5));
        let a = world.spawn_actor("A", Position::new(Track::State, 4));
        assert_eq!(apply_fate(&mut world, a, Fate::Demoted), None);
        assert_eq!(world.actor(a).unwrap().position.rank, 3);

        assert_eq!(apply_fate(&mut world, a, Fate::Exiled), Some(ActorStatus::Exiled));
        // Exile cannot be followed by retirement
        assert_eq!(apply_fate(&mut world, a, Fate::Retired), None);
        assert_eq!(world.actor(a).unwrap().status, ActorStatus::Exiled);
    }
}
