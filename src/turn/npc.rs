//! Autonomous NPC decisions
//!
//! Each free NPC, in id order, scores every decision type and carries out
//! the one that clears its action threshold by the widest margin. Later
//! actors see the effects of earlier ones.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::NpcConfig;
use crate::core::dice::Dice;
use crate::core::types::{ActorId, MAX_RANK};
use crate::events::TurnEventKind;
use crate::outcome::FATE_BANDS;
use crate::process::apply_fate;
use crate::scoring::{DecisionContext, DecisionScorer, DecisionType, UtilityScore};
use crate::world::{Actor, Goal, GoalKind, Memory, MemoryKind, StatKind, World};

/// NPCs never climb into the top slot on their own
const NPC_RANK_CAP: u8 = MAX_RANK - 1;

/// Priority of the revenge goal a denounced official picks up
const REVENGE_PRIORITY: i32 = 60;

/// A decision an NPC carried out this turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcDecision {
    pub actor: ActorId,
    pub decision: DecisionType,
    pub target: Option<ActorId>,
    pub score: UtilityScore,
    /// Stat changes actually applied
    pub effects: Vec<(StatKind, i32)>,
}

/// Highest-ranked free official outside the actor's faction
fn pick_rival(actor: &Actor, world: &World) -> Option<ActorId> {
    world
        .free_npcs()
        .into_iter()
        .filter_map(|id| world.actor(id))
        .filter(|other| other.id != actor.id && (actor.faction.is_none() || other.faction != actor.faction))
        .max_by(|a, b| a.position.rank.cmp(&b.position.rank).then(b.id.cmp(&a.id)))
        .map(|other| other.id)
}

/// Context for a decision, or None when it makes no sense for this actor
fn context_for(actor: &Actor, world: &World, decision: DecisionType) -> Option<DecisionContext> {
    let context = DecisionContext::new(decision);
    match decision {
        DecisionType::SeekPromotion => {
            (actor.position.rank < NPC_RANK_CAP).then(|| context.with_slot(actor.position.promoted()))
        }
        DecisionType::PlotAgainstPlayer | DecisionType::SupportPlayer | DecisionType::Sabotage => {
            Some(context.with_target(world.player_id()))
        }
        DecisionType::DenounceRival => pick_rival(actor, world).map(|rival| context.with_target(rival)),
        DecisionType::FormAlliance => actor.faction.map(|_| context),
    }
}

/// Best acting decision for an actor. Ties keep the earlier decision type.
pub fn choose_decision(
    actor: &Actor,
    world: &World,
    scorer: &dyn DecisionScorer,
) -> Option<(DecisionContext, UtilityScore)> {
    let mut best: Option<(DecisionContext, UtilityScore)> = None;
    for decision in DecisionType::ALL {
        let Some(context) = context_for(actor, world, decision) else {
            continue;
        };
        let score = scorer.score(actor, world, &context);
        if !score.should_act() {
            continue;
        }
        if best.as_ref().map_or(true, |(_, b)| score.margin() > b.margin()) {
            best = Some((context, score));
        }
    }
    best
}

/// Score and act for every free NPC, stopping after `max_actions_per_turn`
/// actors have acted
pub fn run_npc_pass(
    world: &mut World,
    dice: &mut dyn Dice,
    scorer: &dyn DecisionScorer,
    config: &NpcConfig,
) -> (Vec<NpcDecision>, Vec<TurnEventKind>) {
    let mut decisions = Vec::new();
    let mut events = Vec::new();

    for id in world.free_npcs() {
        if decisions.len() >= config.max_actions_per_turn {
            break;
        }
        // Someone acting earlier this turn may have removed this actor
        let Some(actor) = world.actor(id).filter(|a| a.is_free()) else {
            continue;
        };
        let Some((context, score)) = choose_decision(actor, world, scorer) else {
            continue;
        };

        debug!(actor = %id, decision = ?context.decision, margin = score.margin(), "NPC acts");
        events.push(TurnEventKind::NpcActed {
            actor: id,
            decision: context.decision,
            target: context.target,
        });
        let effects = execute(world, id, &context, dice, config, &mut events);
        decisions.push(NpcDecision {
            actor: id,
            decision: context.decision,
            target: context.target,
            score,
            effects,
        });
    }

    (decisions, events)
}

fn execute(
    world: &mut World,
    id: ActorId,
    context: &DecisionContext,
    dice: &mut dyn Dice,
    config: &NpcConfig,
    events: &mut Vec<TurnEventKind>,
) -> Vec<(StatKind, i32)> {
    let mut effects = Vec::new();
    let mut apply = |world: &mut World, stat: StatKind, delta: i32| {
        let applied = world.apply_stat(stat, delta);
        if applied != 0 {
            effects.push((stat, applied));
        }
    };
    let turn = world.turn();

    match context.decision {
        DecisionType::SeekPromotion => {
            let competent = world.actor(id).map_or(0, |a| a.personality.competent);
            let chance = config.promotion_base_chance + competent as f64 / 200.0;
            if dice.chance(chance) {
                if let Some(actor) = world.actor_mut(id) {
                    actor.position = actor.position.promoted();
                    actor.goals.retain(|g| g.kind != GoalKind::SeekPromotion);
                    events.push(TurnEventKind::Promotion {
                        actor: id,
                        rank: actor.position.rank,
                    });
                }
            } else if let Some(goal) = world.actor_mut(id).and_then(|a| a.goal_mut(GoalKind::SeekPromotion)) {
                goal.frustration += 1;
            }
        }
        DecisionType::PlotAgainstPlayer => {
            apply(world, StatKind::PlayerStanding, -2);
            apply(world, StatKind::EliteLoyalty, -1);
        }
        DecisionType::SupportPlayer => {
            apply(world, StatKind::PlayerStanding, 2);
            if let Some(actor) = world.actor_mut(id) {
                actor.relationship.adjust_trust(5);
            }
        }
        DecisionType::DenounceRival => {
            if let Some(rival) = context.target {
                denounce(world, id, rival, dice, turn, events);
            }
            apply(world, StatKind::EliteLoyalty, -1);
        }
        DecisionType::Sabotage => {
            apply(world, StatKind::Stability, -2);
            apply(world, StatKind::Gdp, -20);
            apply(world, StatKind::Resistance, 1);
        }
        DecisionType::FormAlliance => {
            if let Some(faction) = world.actor(id).and_then(|a| a.faction) {
                if let Some(f) = world.faction_mut(faction) {
                    f.adjust_cohesion(5);
                    f.adjust_power(2);
                }
            }
            apply(world, StatKind::PartyUnity, -1);
        }
    }
    effects
}

/// Accuser's weight against the rival picks the rival's fate
fn denounce(
    world: &mut World,
    accuser: ActorId,
    rival: ActorId,
    dice: &mut dyn Dice,
    turn: u32,
    events: &mut Vec<TurnEventKind>,
) {
    let (Some(a), Some(r)) = (world.actor(accuser), world.actor(rival)) else {
        return;
    };
    let disfavour = a.personality.ruthless / 2 + a.position.rank as i32 * 5 - r.position.rank as i32 * 4
        + dice.roll(0, 30);
    let fate = FATE_BANDS.resolve(disfavour);
    debug!(accuser = %accuser, rival = %rival, disfavour, fate = ?fate, "Rival denounced");

    if let Some(status) = apply_fate(world, rival, fate) {
        events.push(TurnEventKind::StatusChanged { actor: rival, status });
    }
    if let Some(r) = world.actor_mut(rival) {
        r.remember(Memory::new(MemoryKind::Grudge, 40, turn, Some(accuser)));
        let revenge = GoalKind::Revenge { target: accuser };
        if r.goal_mut(revenge).is_none() {
            r.goals.push(Goal::new(revenge, REVENGE_PRIORITY, turn));
        }
    }
}
