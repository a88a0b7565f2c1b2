//! Utility scoring for NPC decisions
//!
//! A scorer turns an actor, the world and a [`DecisionContext`] into a
//! [`UtilityScore`]: motivation, opportunity and risk in 0-100 plus a
//! personality-derived caution multiplier. Scoring never mutates anything, so
//! it is safe to call for previews.
//!
//! [`BaseScorer`] is the canonical implementation. [`GoalDrivenScorer`] and
//! [`MemoryInfluencedScorer`] wrap another scorer and adjust its result.

pub mod base;
pub mod layered;

pub use base::BaseScorer;
pub use layered::{GoalDrivenScorer, MemoryInfluencedScorer};

use serde::{Deserialize, Serialize};

use crate::core::config::ScoringConfig;
use crate::core::types::{ActorId, Position};
use crate::world::{Actor, GoalKind, Personality, World};

/// Something an NPC can decide to do on its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionType {
    SeekPromotion,
    PlotAgainstPlayer,
    SupportPlayer,
    DenounceRival,
    Sabotage,
    FormAlliance,
}

impl DecisionType {
    pub const ALL: [DecisionType; 6] = [
        DecisionType::SeekPromotion,
        DecisionType::PlotAgainstPlayer,
        DecisionType::SupportPlayer,
        DecisionType::DenounceRival,
        DecisionType::Sabotage,
        DecisionType::FormAlliance,
    ];

    /// Decisions that harm someone
    pub fn is_hostile(&self) -> bool {
        matches!(
            self,
            DecisionType::PlotAgainstPlayer | DecisionType::DenounceRival | DecisionType::Sabotage
        )
    }

    pub fn is_helpful(&self) -> bool {
        matches!(self, DecisionType::SupportPlayer)
    }

    /// Decisions that feed on instability
    pub fn is_disruptive(&self) -> bool {
        matches!(self, DecisionType::PlotAgainstPlayer | DecisionType::Sabotage)
    }

    pub fn opposes_player(&self) -> bool {
        matches!(self, DecisionType::PlotAgainstPlayer | DecisionType::Sabotage)
    }

    /// Whether a goal gives an actor reason to take this decision
    pub fn serves(&self, goal: GoalKind, target: Option<ActorId>, player: ActorId) -> bool {
        match (self, goal) {
            (DecisionType::SeekPromotion, GoalKind::SeekPromotion) => true,
            (DecisionType::PlotAgainstPlayer, GoalKind::RemovePlayer) => true,
            (DecisionType::PlotAgainstPlayer, GoalKind::Revenge { target: t }) => t == player,
            (DecisionType::Sabotage, GoalKind::RemovePlayer) => true,
            (DecisionType::SupportPlayer, GoalKind::SupportPlayer) => true,
            (DecisionType::DenounceRival, GoalKind::ProtectFaction) => true,
            (DecisionType::DenounceRival, GoalKind::Revenge { target: t }) => Some(t) == target,
            (DecisionType::FormAlliance, GoalKind::ProtectFaction) => true,
            _ => false,
        }
    }
}

/// Flat adjustments a caller can layer onto a single scoring call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreModifiers {
    pub motivation: i32,
    pub opportunity: i32,
    pub risk: i32,
}

/// Input to one scoring call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionContext {
    pub decision: DecisionType,
    pub target: Option<ActorId>,
    pub slot: Option<Position>,
    pub modifiers: ScoreModifiers,
}

impl DecisionContext {
    pub fn new(decision: DecisionType) -> Self {
        Self {
            decision,
            target: None,
            slot: None,
            modifiers: ScoreModifiers::default(),
        }
    }

    pub fn with_target(mut self, target: ActorId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_slot(mut self, slot: Position) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn with_modifiers(mut self, modifiers: ScoreModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Scored decision for one actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtilityScore {
    pub motivation: i32,
    pub opportunity: i32,
    pub risk: i32,
    pub caution: f32,
    pub threshold_multiplier: f32,
}

impl UtilityScore {
    pub fn new(motivation: i32, opportunity: i32, risk: i32, caution: f32, threshold_multiplier: f32) -> Self {
        Self {
            motivation: motivation.clamp(0, 100),
            opportunity: opportunity.clamp(0, 100),
            risk: risk.clamp(0, 100),
            caution,
            threshold_multiplier,
        }
    }

    /// Unclamped scores, for layers that still have adjustments to add
    pub fn raw(motivation: i32, opportunity: i32, risk: i32, caution: f32, threshold_multiplier: f32) -> Self {
        Self {
            motivation,
            opportunity,
            risk,
            caution,
            threshold_multiplier,
        }
    }

    /// Clamp raw scores into 0-100
    pub fn clamped(self) -> Self {
        Self::new(
            self.motivation,
            self.opportunity,
            self.risk,
            self.caution,
            self.threshold_multiplier,
        )
    }

    pub fn weighted_risk(&self) -> f32 {
        self.risk as f32 * self.caution * self.threshold_multiplier
    }

    /// `motivation + opportunity > risk * caution * threshold_multiplier`
    pub fn should_act(&self) -> bool {
        (self.motivation + self.opportunity) as f32 > self.weighted_risk()
    }

    /// How far the score clears the action threshold (negative if it doesn't)
    pub fn margin(&self) -> f32 {
        (self.motivation + self.opportunity) as f32 - self.weighted_risk()
    }
}

/// Caution multiplier from personality alone
///
/// Ambition and ruthlessness lower it, paranoia raises it. A neutral
/// personality (all 50) lands at 0.9.
pub fn caution(personality: &Personality, config: &ScoringConfig) -> f32 {
    let raw = 1.0 - personality.ambitious as f32 * 0.004 - personality.ruthless as f32 * 0.003
        + personality.paranoid as f32 * 0.005;
    raw.clamp(config.caution_min, config.caution_max)
}

/// Scores a decision for an actor
///
/// Layers work on [`DecisionScorer::raw_score`] and only the final
/// [`DecisionScorer::score`] is clamped, so a bonus can offset a deficit.
pub trait DecisionScorer {
    fn raw_score(&self, actor: &Actor, world: &World, context: &DecisionContext) -> UtilityScore;

    fn score(&self, actor: &Actor, world: &World, context: &DecisionContext) -> UtilityScore {
        self.raw_score(actor, world, context).clamped()
    }
}

/// Base scorer wrapped in memory and goal layers, as the NPC pass uses it
pub fn default_scorer(config: &ScoringConfig) -> GoalDrivenScorer<MemoryInfluencedScorer<BaseScorer>> {
    GoalDrivenScorer::new(
        MemoryInfluencedScorer::new(BaseScorer::new(config), config),
        config,
    )
}
