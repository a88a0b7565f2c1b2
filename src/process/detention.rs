//! Detention: custody, interrogation, review, verdict

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::config::ProcessConfig;
use crate::core::dice::Dice;
use crate::core::error::{EngineError, Result};
use crate::core::types::{ActorId, Turn};
use crate::outcome::{DetentionOutcome, DETENTION_CONFESSED, DETENTION_UNCONFESSED};
use crate::process::{
    OutcomeTag, Phase, PhaseMachine, PhaseResult, ProcessCore, ProcessKind, ProcessPhase,
};
use crate::world::{ActorStatus, Memory, MemoryKind, StatKind, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetentionPhase {
    Detention,
    Interrogation,
    Review,
    Completed,
}

impl Phase for DetentionPhase {
    fn next(self) -> Option<Self> {
        match self {
            DetentionPhase::Detention => Some(DetentionPhase::Interrogation),
            DetentionPhase::Interrogation => Some(DetentionPhase::Review),
            DetentionPhase::Review => Some(DetentionPhase::Completed),
            DetentionPhase::Completed => None,
        }
    }
}

impl From<DetentionPhase> for ProcessPhase {
    fn from(phase: DetentionPhase) -> Self {
        ProcessPhase::Detention(phase)
    }
}

impl From<DetentionOutcome> for OutcomeTag {
    fn from(outcome: DetentionOutcome) -> Self {
        OutcomeTag::Detention(outcome)
    }
}

/// One official held for questioning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detention {
    pub core: ProcessCore<DetentionPhase, DetentionOutcome>,
    pub subject: ActorId,
    pub confessed: bool,
    /// Evidence no longer changes during interrogation
    pub evidence_locked: bool,
    pub implicated: Vec<ActorId>,
}

impl Detention {
    /// Take a free official into custody. Starting evidence comes from how
    /// corrupt the subject is.
    pub fn initiate(world: &mut World, subject: ActorId) -> Result<Self> {
        let turn = world.turn();
        let actor = world.actor_mut(subject).ok_or(EngineError::ActorNotFound(subject))?;
        let initial = actor.personality.corrupt / 4;
        actor.transition_to(ActorStatus::Detained, turn)?;

        let id = world.next_process_id();
        let mut core = ProcessCore::new(id, DetentionPhase::Detention, turn);
        core.add_score(initial);
        info!(process = %id, subject = %subject, "Detention ordered");

        Ok(Self {
            core,
            subject,
            confessed: false,
            evidence_locked: false,
            implicated: Vec::new(),
        })
    }

    /// Fix the evidence level for the rest of the process
    pub fn lock_evidence(&mut self, level: i32) {
        self.core.score = 0;
        self.core.add_score(level);
        self.evidence_locked = true;
    }

    pub fn evidence(&self) -> i32 {
        self.core.score
    }

    fn phase_turns(phase: DetentionPhase, config: &ProcessConfig) -> u32 {
        match phase {
            DetentionPhase::Detention => config.detention_turns,
            DetentionPhase::Interrogation => config.interrogation_turns,
            DetentionPhase::Review => config.review_turns,
            DetentionPhase::Completed => 0,
        }
    }

    /// Roll for a confession: a d200 under `evidence + (100 - loyalty)`
    fn roll_confession(&self, world: &World, dice: &mut dyn Dice) -> bool {
        let loyalty = world.actor(self.subject).map_or(50, |a| a.personality.loyal);
        let chance = self.evidence() + (100 - loyalty);
        dice.roll(0, 199) < chance
    }

    /// Free officials of the subject's faction at the subject's rank + 1 or lower
    fn accomplice_candidates(&self, world: &World) -> Vec<ActorId> {
        let subject = match world.actor(self.subject) {
            Some(a) => a,
            None => return Vec::new(),
        };
        let faction = match subject.faction {
            Some(f) => f,
            None => return Vec::new(),
        };
        world
            .members_of(faction)
            .into_iter()
            .filter(|id| *id != self.subject && *id != world.player_id())
            .filter(|id| {
                world
                    .actor(*id)
                    .map_or(false, |a| a.is_free() && a.position.rank <= subject.position.rank + 1)
            })
            .collect()
    }
}

impl PhaseMachine for Detention {
    type Phase = DetentionPhase;
    type Outcome = DetentionOutcome;

    fn kind(&self) -> ProcessKind {
        ProcessKind::Detention
    }

    fn core(&self) -> &ProcessCore<DetentionPhase, DetentionOutcome> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ProcessCore<DetentionPhase, DetentionOutcome> {
        &mut self.core
    }

    fn subject(&self) -> Option<ActorId> {
        Some(self.subject)
    }

    fn ready(&self, turn: Turn, config: &ProcessConfig) -> bool {
        self.core.turns_in_phase(turn) >= Self::phase_turns(self.core.phase(), config)
    }

    fn work(
        &mut self,
        world: &mut World,
        dice: &mut dyn Dice,
        config: &ProcessConfig,
        _result: &mut PhaseResult,
    ) -> Result<()> {
        if self.core.phase() == DetentionPhase::Interrogation && !self.evidence_locked {
            let corrupt = world.actor(self.subject).map_or(0, |a| a.personality.corrupt);
            let gain = dice.roll(config.evidence_gain_min, config.evidence_gain_max) + corrupt / 20;
            self.core.add_score(gain);
            debug!(process = %self.core.id, evidence = self.core.score, "Evidence gathered");
        }
        Ok(())
    }

    fn on_exit(
        &mut self,
        world: &mut World,
        dice: &mut dyn Dice,
        config: &ProcessConfig,
        result: &mut PhaseResult,
    ) -> Result<()> {
        if self.core.phase() != DetentionPhase::Interrogation {
            return Ok(());
        }

        self.confessed = self.roll_confession(world, dice);
        if !self.confessed || !dice.chance(config.implication_chance) {
            return Ok(());
        }

        let mut candidates = self.accomplice_candidates(world);
        while !candidates.is_empty() && self.implicated.len() < config.max_implicated {
            let pick = dice.roll(0, candidates.len() as i32 - 1) as usize;
            let accomplice = candidates.swap_remove(pick);
            if result.set_status(world, accomplice, ActorStatus::UnderInvestigation) {
                self.implicated.push(accomplice);
                result.implicated.push(accomplice);
            }
        }
        if !self.implicated.is_empty() {
            info!(process = %self.core.id, count = self.implicated.len(), "Confession implicated others");
        }
        Ok(())
    }

    fn resolve(&mut self, _world: &World, _dice: &mut dyn Dice, _config: &ProcessConfig) -> DetentionOutcome {
        let bands = if self.confessed {
            DETENTION_CONFESSED
        } else {
            DETENTION_UNCONFESSED
        };
        bands.resolve(self.evidence())
    }

    fn apply(&mut self, outcome: DetentionOutcome, world: &mut World, result: &mut PhaseResult) -> Result<()> {
        let turn = world.turn();
        let subject = self.subject;

        match outcome {
            DetentionOutcome::Cleared | DetentionOutcome::Warned | DetentionOutcome::Demoted => {
                result.set_status(world, subject, ActorStatus::Active);
                if let Some(actor) = world.actor_mut(subject) {
                    match outcome {
                        DetentionOutcome::Cleared => {
                            actor.relationship.adjust_grudge(15);
                            actor.relationship.adjust_disposition(-10);
                        }
                        DetentionOutcome::Warned => {
                            actor.relationship.adjust_fear(15);
                            actor.relationship.adjust_grudge(5);
                        }
                        _ => {
                            actor.position = actor.position.demoted();
                            actor.relationship.adjust_grudge(20);
                        }
                    }
                    actor.remember(Memory::new(MemoryKind::Trauma, 30, turn, None));
                }
                if outcome == DetentionOutcome::Cleared {
                    result.apply_stat(world, StatKind::EliteLoyalty, -2);
                }
            }
            // Stays in custody until the trial takes over
            DetentionOutcome::ReferredToTrial => {
                result.apply_stat(world, StatKind::EliteLoyalty, -1);
            }
            DetentionOutcome::Imprisoned => {
                result.set_status(world, subject, ActorStatus::Imprisoned);
                result.apply_stat(world, StatKind::EliteLoyalty, -3);
                result.apply_stat(world, StatKind::Stability, 1);
            }
        }

        info!(process = %self.core.id, subject = %subject, outcome = ?outcome, "Detention resolved");
        Ok(())
    }
}
