//! Campaigns and projects with a fixed total duration
//!
//! Phases follow the share of the duration already spent rather than
//! per-phase turn counts. Success is one roll against a chance fixed when
//! the campaign is launched.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::config::ProcessConfig;
use crate::core::dice::Dice;
use crate::core::error::Result;
use crate::core::types::{ActorId, Turn};
use crate::outcome::purge_fate;
use crate::process::{
    apply_fate, OutcomeTag, Phase, PhaseMachine, PhaseResult, ProcessCore, ProcessKind, ProcessPhase,
};
use crate::world::{StatKind, World};

/// Corruption above which an official is fair game for an anti-corruption drive
pub const CORRUPTION_TARGET_THRESHOLD: i32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignKind {
    AntiCorruption,
    Economic,
    Party,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignPhase {
    Planning,
    Mobilization,
    Implementation,
    Consolidation,
    Completed,
}

impl Phase for CampaignPhase {
    fn next(self) -> Option<Self> {
        match self {
            CampaignPhase::Planning => Some(CampaignPhase::Mobilization),
            CampaignPhase::Mobilization => Some(CampaignPhase::Implementation),
            CampaignPhase::Implementation => Some(CampaignPhase::Consolidation),
            CampaignPhase::Consolidation => Some(CampaignPhase::Completed),
            CampaignPhase::Completed => None,
        }
    }
}

impl CampaignPhase {
    /// Phase for a progress fraction: quarters of the total duration
    pub fn for_progress(progress: u32, total: u32) -> Self {
        let percent = if total == 0 { 100 } else { progress * 100 / total };
        match percent {
            p if p < 25 => CampaignPhase::Planning,
            p if p < 50 => CampaignPhase::Mobilization,
            p if p < 75 => CampaignPhase::Implementation,
            p if p < 100 => CampaignPhase::Consolidation,
            _ => CampaignPhase::Completed,
        }
    }
}

impl From<CampaignPhase> for ProcessPhase {
    fn from(phase: CampaignPhase) -> Self {
        ProcessPhase::Campaign(phase)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignOutcome {
    Succeeded,
    Failed,
}

impl From<CampaignOutcome> for OutcomeTag {
    fn from(outcome: CampaignOutcome) -> Self {
        OutcomeTag::Campaign(outcome)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub core: ProcessCore<CampaignPhase, CampaignOutcome>,
    pub kind: CampaignKind,
    pub total_turns: u32,
    pub success_chance: f64,
    /// Officials caught up in the campaign so far
    pub targets: Vec<ActorId>,
}

impl Campaign {
    /// Launch a campaign. Duration and success chance are fixed here.
    pub fn initiate(world: &mut World, kind: CampaignKind, config: &ProcessConfig) -> Self {
        let turn = world.turn();
        let total_turns = match kind {
            CampaignKind::AntiCorruption => config.anti_corruption_turns,
            CampaignKind::Economic => config.economic_turns,
            CampaignKind::Party => config.party_turns,
        };
        let success_chance = success_chance(world, kind, config);

        let id = world.next_process_id();
        let mut core = ProcessCore::new(id, CampaignPhase::Planning, turn);
        core.completion_turn = Some(turn + total_turns);
        info!(process = %id, kind = ?kind, total_turns, success_chance, "Campaign launched");

        Self {
            core,
            kind,
            total_turns,
            success_chance,
            targets: Vec::new(),
        }
    }

    /// Catch one corrupt official and decide their fate
    fn ensnare(&mut self, world: &mut World, dice: &mut dyn Dice, result: &mut PhaseResult) {
        let candidates: Vec<ActorId> = world
            .free_npcs()
            .into_iter()
            .filter(|id| !self.targets.contains(id))
            .filter(|id| {
                world
                    .actor(*id)
                    .map_or(false, |a| a.personality.corrupt > CORRUPTION_TARGET_THRESHOLD)
            })
            .collect();
        if candidates.is_empty() {
            return;
        }

        let target = candidates[dice.roll(0, candidates.len() as i32 - 1) as usize];
        let fate = purge_fate(dice);
        if let Some(status) = apply_fate(world, target, fate) {
            result.status_changes.push((target, status));
        }
        self.targets.push(target);
        result.implicated.push(target);
        result.apply_stat(world, StatKind::Corruption, -2);
    }
}

/// Precomputed success chance from the state of the world at launch
pub fn success_chance(world: &World, kind: CampaignKind, config: &ProcessConfig) -> f64 {
    let stat = |k| world.stat(k) as f64;
    let raw = match kind {
        CampaignKind::AntiCorruption => {
            0.5 + (stat(StatKind::PlayerStanding) - 50.0) / 200.0 + (stat(StatKind::PartyUnity) - 50.0) / 200.0
                - (stat(StatKind::Corruption) - 50.0) / 200.0
        }
        CampaignKind::Economic => {
            let solvent = if world.stat(StatKind::Treasury) > 0 { 0.05 } else { -0.1 };
            0.5 + (stat(StatKind::Stability) - 50.0) / 150.0 + solvent
        }
        CampaignKind::Party => 0.5 + (stat(StatKind::PartyUnity) - 50.0) / 100.0,
    };
    raw.clamp(config.success_min, config.success_max)
}

impl PhaseMachine for Campaign {
    type Phase = CampaignPhase;
    type Outcome = CampaignOutcome;

    fn kind(&self) -> ProcessKind {
        ProcessKind::Campaign(self.kind)
    }

    fn core(&self) -> &ProcessCore<CampaignPhase, CampaignOutcome> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ProcessCore<CampaignPhase, CampaignOutcome> {
        &mut self.core
    }

    fn subject(&self) -> Option<ActorId> {
        None
    }

    fn ready(&self, _turn: Turn, _config: &ProcessConfig) -> bool {
        CampaignPhase::for_progress(self.core.progress, self.total_turns) > self.core.phase()
    }

    fn work(
        &mut self,
        world: &mut World,
        dice: &mut dyn Dice,
        _config: &ProcessConfig,
        result: &mut PhaseResult,
    ) -> Result<()> {
        self.core.progress = (self.core.progress + 1).min(self.total_turns);
        self.core.score = (self.core.progress * 100 / self.total_turns.max(1)) as i32;

        match (self.kind, self.core.phase()) {
            (CampaignKind::AntiCorruption, CampaignPhase::Implementation) => self.ensnare(world, dice, result),
            (CampaignKind::Economic, CampaignPhase::Implementation) => {
                result.apply_stat(world, StatKind::Treasury, -10);
            }
            (CampaignKind::Party, CampaignPhase::Mobilization) => {
                result.apply_stat(world, StatKind::PartyUnity, 1);
            }
            _ => {}
        }
        Ok(())
    }

    fn resolve(&mut self, _world: &World, dice: &mut dyn Dice, _config: &ProcessConfig) -> CampaignOutcome {
        if dice.chance(self.success_chance) {
            CampaignOutcome::Succeeded
        } else {
            CampaignOutcome::Failed
        }
    }

    fn apply(
        &mut self,
        outcome: CampaignOutcome,
        world: &mut World,
        result: &mut PhaseResult,
    ) -> Result<()> {
        let effects: &[(StatKind, i32)] = match (self.kind, outcome) {
            (CampaignKind::AntiCorruption, CampaignOutcome::Succeeded) => &[
                (StatKind::Corruption, -15),
                (StatKind::PopularSupport, 5),
                (StatKind::PlayerStanding, 5),
            ],
            (CampaignKind::AntiCorruption, CampaignOutcome::Failed) => {
                &[(StatKind::EliteLoyalty, -5), (StatKind::PlayerStanding, -5)]
            }
            (CampaignKind::Economic, CampaignOutcome::Succeeded) => &[
                (StatKind::Gdp, 100),
                (StatKind::Treasury, 50),
                (StatKind::PopularSupport, 3),
            ],
            (CampaignKind::Economic, CampaignOutcome::Failed) => {
                &[(StatKind::Treasury, -50), (StatKind::Stability, -3)]
            }
            (CampaignKind::Party, CampaignOutcome::Succeeded) => {
                &[(StatKind::PartyUnity, 10), (StatKind::PlayerStanding, 3)]
            }
            (CampaignKind::Party, CampaignOutcome::Failed) => &[(StatKind::PartyUnity, -5)],
        };
        for &(stat, delta) in effects {
            result.apply_stat(world, stat, delta);
        }
        info!(process = %self.core.id, kind = ?self.kind, outcome = ?outcome, "Campaign concluded");
        Ok(())
    }
}
