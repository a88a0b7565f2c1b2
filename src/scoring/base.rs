//! Canonical decision scorer

use crate::core::config::ScoringConfig;
use crate::scoring::{caution, DecisionContext, DecisionScorer, DecisionType, UtilityScore};
use crate::world::{Actor, StatKind, World};

/// Portion of a trait above the neutral midpoint
fn above_mid(value: i32) -> i32 {
    (value - 50).max(0)
}

/// Baseline + goals + traits + world signals
#[derive(Debug, Clone)]
pub struct BaseScorer {
    config: ScoringConfig,
}

impl BaseScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Motivation from the strongest goal this decision serves
    fn goal_motivation(&self, actor: &Actor, world: &World, context: &DecisionContext) -> i32 {
        let turn = world.turn();
        let player = world.player_id();
        actor
            .goals
            .iter()
            .filter(|g| context.decision.serves(g.kind, context.target, player))
            .map(|g| {
                let bonus = if g.is_overdue(turn) || g.is_frustrated() {
                    self.config.overdue_goal_bonus
                } else {
                    0
                };
                g.effective_priority() / 4 + bonus
            })
            .max()
            .unwrap_or(0)
    }

    fn trait_motivation(actor: &Actor, decision: DecisionType) -> i32 {
        let p = &actor.personality;
        let r = &actor.relationship;
        match decision {
            DecisionType::SeekPromotion => above_mid(p.ambitious) / 2,
            DecisionType::PlotAgainstPlayer => {
                above_mid(p.ambitious) / 4 + above_mid(p.ruthless) / 4 + r.grudge / 3 + (-r.disposition).max(0) / 3
            }
            DecisionType::SupportPlayer => above_mid(p.loyal) / 3 + r.gratitude / 3 + r.disposition.max(0) / 3,
            DecisionType::DenounceRival => above_mid(p.ruthless) / 3 + above_mid(p.paranoid) / 4,
            DecisionType::Sabotage => above_mid(p.corrupt) / 3 + r.grudge / 4,
            DecisionType::FormAlliance => above_mid(p.paranoid) / 3 + (-r.disposition).max(0) / 4,
        }
    }

    fn world_opportunity(actor: &Actor, world: &World, decision: DecisionType) -> i32 {
        let stability = world.stat(StatKind::Stability);
        let mut opportunity = 0;
        if decision.is_disruptive() {
            opportunity += (50 - stability).max(0) / 2 + world.stat(StatKind::Resistance) / 5;
        }
        opportunity += match decision {
            DecisionType::SeekPromotion => (actor.personality.competent - 50) / 5,
            DecisionType::SupportPlayer => (world.stat(StatKind::PlayerStanding) - 50) / 5,
            DecisionType::DenounceRival => (world.stat(StatKind::Corruption) - 30) / 5,
            DecisionType::Sabotage => above_mid(world.stat(StatKind::Corruption)) / 3,
            DecisionType::FormAlliance => (50 - world.stat(StatKind::PartyUnity)).max(0) / 3,
            DecisionType::PlotAgainstPlayer => 0,
        };
        opportunity
    }

    fn world_risk(actor: &Actor, world: &World, context: &DecisionContext) -> i32 {
        let standing = world.stat(StatKind::PlayerStanding);
        let mut risk = 0;
        if context.decision.opposes_player() {
            risk += actor.relationship.fear / 4;
        }
        risk += match context.decision {
            DecisionType::SeekPromotion => actor.position.rank as i32 * 2,
            DecisionType::PlotAgainstPlayer => standing / 3,
            DecisionType::Sabotage => standing / 4 + 5,
            DecisionType::DenounceRival => {
                let outranked = context
                    .target
                    .and_then(|t| world.actor(t))
                    .map_or(false, |t| t.position.outranks(&actor.position));
                if outranked {
                    15
                } else {
                    5
                }
            }
            DecisionType::SupportPlayer | DecisionType::FormAlliance => 0,
        };
        risk
    }
}

impl DecisionScorer for BaseScorer {
    fn raw_score(&self, actor: &Actor, world: &World, context: &DecisionContext) -> UtilityScore {
        let decision = context.decision;
        let motivation = self.config.base_motivation
            + self.goal_motivation(actor, world, context)
            + Self::trait_motivation(actor, decision)
            + context.modifiers.motivation;
        let opportunity =
            self.config.base_opportunity + Self::world_opportunity(actor, world, decision) + context.modifiers.opportunity;
        let risk = self.config.base_risk + Self::world_risk(actor, world, context) + context.modifiers.risk;

        UtilityScore::raw(
            motivation,
            opportunity,
            risk,
            caution(&actor.personality, &self.config),
            self.config.threshold_multiplier,
        )
    }
}
