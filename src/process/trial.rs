//! Show trials: accusation, extracted confession, public proceedings, sentence

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::config::ProcessConfig;
use crate::core::dice::Dice;
use crate::core::error::{EngineError, Result};
use crate::core::types::{ActorId, Turn};
use crate::outcome::{TrialSentence, SENTENCE_BANDS};
use crate::process::{
    OutcomeTag, Phase, PhaseMachine, PhaseResult, ProcessCore, ProcessKind, ProcessPhase,
};
use crate::world::{ActorStatus, Memory, MemoryKind, Personality, StatKind, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialPhase {
    Accusation,
    ConfessionExtraction,
    PublicTrial,
    Sentencing,
    Completed,
}

impl Phase for TrialPhase {
    fn next(self) -> Option<Self> {
        match self {
            TrialPhase::Accusation => Some(TrialPhase::ConfessionExtraction),
            TrialPhase::ConfessionExtraction => Some(TrialPhase::PublicTrial),
            TrialPhase::PublicTrial => Some(TrialPhase::Sentencing),
            TrialPhase::Sentencing => Some(TrialPhase::Completed),
            TrialPhase::Completed => None,
        }
    }
}

impl From<TrialPhase> for ProcessPhase {
    fn from(phase: TrialPhase) -> Self {
        ProcessPhase::Trial(phase)
    }
}

impl From<TrialSentence> for OutcomeTag {
    fn from(sentence: TrialSentence) -> Self {
        OutcomeTag::Trial(sentence)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Charge {
    Corruption,
    AbuseOfPower,
    AntiPartyActivity,
    Sabotage,
    Espionage,
    Treason,
}

impl Charge {
    pub fn severity(&self) -> i32 {
        match self {
            Charge::Corruption => 15,
            Charge::AbuseOfPower => 20,
            Charge::AntiPartyActivity => 25,
            Charge::Sabotage => 30,
            Charge::Espionage => 35,
            Charge::Treason => 40,
        }
    }

    /// Charges a prosecutor can sustain from a detention's evidence
    pub fn from_evidence(evidence: i32) -> Vec<Charge> {
        match evidence {
            e if e >= 85 => vec![Charge::Treason, Charge::Espionage],
            e if e >= 70 => vec![Charge::Sabotage, Charge::AntiPartyActivity],
            e if e >= 50 => vec![Charge::AntiPartyActivity, Charge::Corruption],
            _ => vec![Charge::AbuseOfPower],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfessionType {
    Full,
    Partial,
    Refused,
}

impl ConfessionType {
    /// Adjustment to sentence severity
    pub fn modifier(&self) -> i32 {
        match self {
            ConfessionType::Full => -10,
            ConfessionType::Partial => 0,
            ConfessionType::Refused => 15,
        }
    }

    /// Classify by how far interrogation pressure exceeded resistance
    pub fn from_margin(margin: i32) -> Self {
        if margin >= 15 {
            ConfessionType::Full
        } else if margin >= -10 {
            ConfessionType::Partial
        } else {
            ConfessionType::Refused
        }
    }
}

/// How hard a defendant holds out under interrogation
pub fn confession_resistance(p: &Personality) -> i32 {
    p.loyal / 4 + p.paranoid / 5 + p.competent / 5 + p.ruthless / 4
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowTrial {
    pub core: ProcessCore<TrialPhase, TrialSentence>,
    pub defendant: ActorId,
    pub charges: Vec<Charge>,
    pub resistance: i32,
    pub confession: Option<ConfessionType>,
}

impl ShowTrial {
    /// Put an official on trial. A free or investigated defendant is taken
    /// into custody; one already detained stays there.
    pub fn initiate(world: &mut World, defendant: ActorId, charges: Vec<Charge>) -> Result<Self> {
        let turn = world.turn();
        let actor = world.actor_mut(defendant).ok_or(EngineError::ActorNotFound(defendant))?;
        if actor.status != ActorStatus::Detained {
            actor.transition_to(ActorStatus::Detained, turn)?;
        }
        let resistance = confession_resistance(&actor.personality);

        let charges = if charges.is_empty() {
            vec![Charge::AntiPartyActivity]
        } else {
            charges
        };
        let id = world.next_process_id();
        info!(process = %id, defendant = %defendant, charges = ?charges, "Show trial opened");

        Ok(Self {
            core: ProcessCore::new(id, TrialPhase::Accusation, turn),
            defendant,
            charges,
            resistance,
            confession: None,
        })
    }

    pub fn pressure(&self) -> i32 {
        self.core.score
    }

    /// Charge severities plus the confession modifier
    pub fn sentence_severity(&self) -> i32 {
        let charges: i32 = self.charges.iter().map(Charge::severity).sum();
        charges + self.confession.map_or(0, |c| c.modifier())
    }

    fn phase_turns(phase: TrialPhase, config: &ProcessConfig) -> u32 {
        match phase {
            TrialPhase::Accusation => config.accusation_turns,
            TrialPhase::ConfessionExtraction => config.extraction_turns,
            TrialPhase::PublicTrial => config.public_trial_turns,
            TrialPhase::Sentencing => config.sentencing_turns,
            TrialPhase::Completed => 0,
        }
    }
}

impl PhaseMachine for ShowTrial {
    type Phase = TrialPhase;
    type Outcome = TrialSentence;

    fn kind(&self) -> ProcessKind {
        ProcessKind::ShowTrial
    }

    fn core(&self) -> &ProcessCore<TrialPhase, TrialSentence> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ProcessCore<TrialPhase, TrialSentence> {
        &mut self.core
    }

    fn subject(&self) -> Option<ActorId> {
        Some(self.defendant)
    }

    fn ready(&self, turn: Turn, config: &ProcessConfig) -> bool {
        self.core.turns_in_phase(turn) >= Self::phase_turns(self.core.phase(), config)
    }

    fn work(
        &mut self,
        world: &mut World,
        dice: &mut dyn Dice,
        config: &ProcessConfig,
        result: &mut PhaseResult,
    ) -> Result<()> {
        match self.core.phase() {
            TrialPhase::ConfessionExtraction => {
                let gain = dice.roll(config.pressure_gain_min, config.pressure_gain_max);
                self.core.add_score(gain);
            }
            TrialPhase::PublicTrial => {
                result.apply_stat(world, StatKind::Stability, 1);
                result.apply_stat(world, StatKind::InternationalStanding, -1);
            }
            _ => {}
        }
        Ok(())
    }

    fn on_exit(
        &mut self,
        _world: &mut World,
        _dice: &mut dyn Dice,
        _config: &ProcessConfig,
        _result: &mut PhaseResult,
    ) -> Result<()> {
        if self.core.phase() == TrialPhase::ConfessionExtraction {
            let confession = ConfessionType::from_margin(self.pressure() - self.resistance);
            self.confession = Some(confession);
            info!(process = %self.core.id, confession = ?confession, "Confession extracted");
        }
        Ok(())
    }

    fn resolve(&mut self, _world: &World, _dice: &mut dyn Dice, _config: &ProcessConfig) -> TrialSentence {
        SENTENCE_BANDS.resolve(self.sentence_severity())
    }

    fn apply(&mut self, sentence: TrialSentence, world: &mut World, result: &mut PhaseResult) -> Result<()> {
        let turn = world.turn();
        let defendant = self.defendant;

        match sentence {
            TrialSentence::Demotion => {
                result.set_status(world, defendant, ActorStatus::Active);
                if let Some(actor) = world.actor_mut(defendant) {
                    actor.position = actor.position.demoted();
                    actor.relationship.adjust_grudge(25);
                    actor.remember(Memory::new(MemoryKind::Trauma, 50, turn, None));
                }
            }
            TrialSentence::Exile => {
                result.set_status(world, defendant, ActorStatus::Exiled);
                result.apply_stat(world, StatKind::InternationalStanding, -1);
            }
            TrialSentence::Imprisonment { .. } => {
                result.set_status(world, defendant, ActorStatus::Imprisoned);
                result.apply_stat(world, StatKind::EliteLoyalty, -2);
            }
            TrialSentence::Execution => {
                result.set_status(world, defendant, ActorStatus::Executed);
                result.apply_stat(world, StatKind::Stability, 2);
                result.apply_stat(world, StatKind::InternationalStanding, -5);
                result.apply_stat(world, StatKind::EliteLoyalty, -3);
            }
        }
        result.apply_stat(world, StatKind::PlayerStanding, 3);
        if self.confession == Some(ConfessionType::Refused) {
            result.apply_stat(world, StatKind::PopularSupport, -3);
        }

        // The defendant's faction takes note
        let faction = world.actor(defendant).and_then(|a| a.faction);
        if let Some(faction) = faction {
            for member in world.members_of(faction) {
                if member == defendant {
                    continue;
                }
                if let Some(actor) = world.actor_mut(member) {
                    actor.relationship.adjust_fear(10);
                    actor.relationship.adjust_disposition(-10);
                    actor.remember(Memory::new(MemoryKind::Trauma, 40, turn, Some(defendant)));
                }
            }
        }

        info!(process = %self.core.id, defendant = %defendant, sentence = ?sentence, "Sentence passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dice::ConstantDice;
    use crate::core::types::{Position, Track};
    use crate::process::advance;

    fn world_with(personality: Personality) -> (World, ActorId) {
        let mut world = World::new("Player", Position::new(Track::Security, 6));
        let defendant = world.spawn_actor("Defendant", Position::new(Track::Party, 5));
        world.actor_mut(defendant).unwrap().personality = personality;
        (world, defendant)
    }

    fn uniform(value: i32) -> Personality {
        Personality {
            ambitious: value,
            loyal: value,
            paranoid: value,
            ruthless: value,
            corrupt: value,
            competent: value,
        }
    }

    fn run(trial: &mut ShowTrial, world: &mut World) -> u32 {
        let config = ProcessConfig::default();
        let mut dice = ConstantDice::median();
        for turns in 1..=10 {
            world.advance_turn();
            advance(trial, world, &mut dice, &config).unwrap();
            if trial.core.is_finished() {
                return turns;
            }
        }
        panic!("trial did not finish");
    }

    #[test]
    fn test_resistance_formula() {
        assert_eq!(confession_resistance(&uniform(50)), 12 + 10 + 10 + 12);
        assert_eq!(confession_resistance(&uniform(0)), 0);
    }

    #[test]
    fn test_grave_charges_refused_confession_execution() {
        let (mut world, defendant) = world_with(uniform(100));
        let mut trial = ShowTrial::initiate(&mut world, defendant, vec![Charge::Treason, Charge::Espionage]).unwrap();
        assert_eq!(world.actor(defendant).unwrap().status, ActorStatus::Detained);

        let turns = run(&mut trial, &mut world);
        assert_eq!(turns, 6);
        assert_eq!(trial.confession, Some(ConfessionType::Refused));
        assert_eq!(trial.sentence_severity(), 90);
        assert_eq!(trial.core.outcome(), Some(TrialSentence::Execution));
        assert_eq!(world.actor(defendant).unwrap().status, ActorStatus::Executed);
    }

    #[test]
    fn test_minor_charge_full_confession_demotion() {
        let (mut world, defendant) = world_with(uniform(0));
        let mut trial = ShowTrial::initiate(&mut world, defendant, vec![Charge::Corruption]).unwrap();

        run(&mut trial, &mut world);
        assert_eq!(trial.confession, Some(ConfessionType::Full));
        assert_eq!(trial.core.outcome(), Some(TrialSentence::Demotion));
        let actor = world.actor(defendant).unwrap();
        assert_eq!(actor.status, ActorStatus::Active);
        assert_eq!(actor.position.rank, 4);
    }

    #[test]
    fn test_partial_confession_imprisonment() {
        let (mut world, defendant) = world_with(uniform(50));
        let mut trial = ShowTrial::initiate(&mut world, defendant, vec![Charge::AntiPartyActivity, Charge::Corruption]).unwrap();

        run(&mut trial, &mut world);
        // Pressure 36 against resistance 44
        assert_eq!(trial.confession, Some(ConfessionType::Partial));
        assert_eq!(trial.core.outcome(), Some(TrialSentence::Imprisonment { years: 10 }));
        assert_eq!(world.actor(defendant).unwrap().status, ActorStatus::Imprisoned);
    }

    #[test]
    fn test_empty_charges_default() {
        let (mut world, defendant) = world_with(uniform(50));
        let trial = ShowTrial::initiate(&mut world, defendant, Vec::new()).unwrap();
        assert_eq!(trial.charges, vec![Charge::AntiPartyActivity]);
    }

    #[test]
    fn test_cannot_try_the_dead() {
        let (mut world, defendant) = world_with(uniform(50));
        world.actor_mut(defendant).unwrap().transition_to(ActorStatus::Dead, 0).unwrap();
        assert!(ShowTrial::initiate(&mut world, defendant, vec![Charge::Treason]).is_err());
    }

    #[test]
    fn test_faction_members_fear_the_verdict() {
        let (mut world, defendant) = world_with(uniform(100));
        let faction = world.add_faction("Old Guard", 50);
        let ally = world.spawn_actor("Ally", Position::new(Track::Party, 3));
        world.actor_mut(defendant).unwrap().faction = Some(faction);
        world.actor_mut(ally).unwrap().faction = Some(faction);
        let fear = world.actor(ally).unwrap().relationship.fear;

        let mut trial = ShowTrial::initiate(&mut world, defendant, vec![Charge::Treason]).unwrap();
        run(&mut trial, &mut world);
        assert_eq!(world.actor(ally).unwrap().relationship.fear, fear + 10);
    }

    #[test]
    fn test_charges_from_evidence() {
        assert_eq!(Charge::from_evidence(90), vec![Charge::Treason, Charge::Espionage]);
        assert_eq!(Charge::from_evidence(10), vec![Charge::AbuseOfPower]);
    }
}
