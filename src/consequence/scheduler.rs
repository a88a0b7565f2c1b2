//! Scheduling, collecting and firing consequences

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::config::ConsequenceConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::ConsequenceId;
use crate::consequence::ScheduledConsequence;
use crate::world::{Memory, MemoryKind, StatKind, World};

/// Result of firing one consequence, handed on to renderers and the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiredConsequence {
    pub consequence: ScheduledConsequence,
    /// Deltas actually applied after clamping
    pub applied: Vec<(StatKind, i32)>,
    pub resistance_added: i32,
    pub narrative_key: String,
}

/// Attach a consequence to its originating law
pub fn schedule(world: &mut World, consequence: ScheduledConsequence) -> Result<ConsequenceId> {
    let id = consequence.id;
    let law = world
        .law_mut(consequence.law)
        .ok_or(EngineError::LawNotFound(consequence.law))?;

    debug!(
        consequence = %id,
        law = %law.id,
        category = ?consequence.category,
        trigger_turn = consequence.trigger_turn,
        magnitude = consequence.magnitude,
        "Consequence scheduled"
    );
    law.consequences.push(consequence);
    Ok(id)
}

/// Every unfired consequence whose trigger turn has arrived, ordered by
/// trigger turn and then creation order
pub fn collect_due(world: &World) -> Vec<&ScheduledConsequence> {
    let turn = world.turn();
    let mut due: Vec<&ScheduledConsequence> = world
        .laws
        .iter()
        .flat_map(|law| law.consequences.iter())
        .filter(|c| c.is_due(turn))
        .collect();
    due.sort_by_key(|c| (c.trigger_turn, c.id));
    due
}

/// Fire a consequence: apply its deltas, mark it fired on its law and add to
/// cumulative resistance.
///
/// Returns `None` if the consequence is unknown or has already fired. Firing
/// never schedules anything new.
pub fn fire(world: &mut World, id: ConsequenceId, config: &ConsequenceConfig) -> Option<FiredConsequence> {
    let turn = world.turn();
    let law = world.laws.iter_mut().find(|l| l.consequence(id).is_some())?;
    if !law.mark_fired(id) {
        warn!(consequence = %id, "Consequence already fired, ignoring");
        return None;
    }
    let consequence = law.consequence(id)?.clone();

    let applied: Vec<(StatKind, i32)> = consequence
        .deltas
        .iter()
        .map(|&(stat, delta)| (stat, world.apply_stat(stat, delta)))
        .collect();

    let resistance = (consequence.magnitude as f32 * config.resistance_rate).round() as i32;
    let resistance_added = world.apply_stat(StatKind::Resistance, resistance);

    // The dead hold no grudges
    if let Some(actor_id) = consequence.actor {
        if let Some(actor) = world.actor_mut(actor_id).filter(|a| a.is_alive()) {
            actor.relationship.adjust_grudge(consequence.magnitude / 2);
            actor.relationship.adjust_disposition(-consequence.magnitude / 4);
            actor.remember(Memory::new(MemoryKind::Grudge, consequence.magnitude, turn, None));
        }
    }

    debug!(
        consequence = %id,
        category = ?consequence.category,
        resistance_added,
        "Consequence fired"
    );

    Some(FiredConsequence {
        narrative_key: consequence.category.narrative_key().to_string(),
        consequence,
        applied,
        resistance_added,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consequence::ConsequenceCategory;
    use crate::core::types::{LawId, Position, Track};
    use crate::world::{ActorStatus, Law, LawCategory};

    fn world_with_law() -> (World, LawId) {
        let mut world = World::new("Player", Position::new(Track::Party, 5));
        let law = world.add_law(Law::new(LawId(0), "press_control", "Press Control", LawCategory::Political));
        (world, law)
    }

    fn add(world: &mut World, law: LawId, trigger: u32, category: ConsequenceCategory, magnitude: i32) -> ConsequenceId {
        let id = world.next_consequence_id();
        let turn = world.turn();
        schedule(world, ScheduledConsequence::new(id, law, turn, trigger, category, magnitude)).unwrap()
    }

    #[test]
    fn test_schedule_unknown_law_fails() {
        let (mut world, _) = world_with_law();
        let c = ScheduledConsequence::new(ConsequenceId(1), LawId(42), 0, 3, ConsequenceCategory::PublicUnrest, 10);
        assert!(matches!(schedule(&mut world, c), Err(EngineError::LawNotFound(LawId(42)))));
    }

    #[test]
    fn test_collect_due_orders_by_trigger_then_creation() {
        let (mut world, law) = world_with_law();
        let late = add(&mut world, law, 3, ConsequenceCategory::PublicUnrest, 10);
        let early_a = add(&mut world, law, 2, ConsequenceCategory::EliteBacklash, 10);
        let early_b = add(&mut world, law, 2, ConsequenceCategory::MarketReaction, 10);
        let future = add(&mut world, law, 9, ConsequenceCategory::CapitalFlight, 10);

        for _ in 0..3 {
            world.advance_turn();
        }
        let due: Vec<_> = collect_due(&world).iter().map(|c| c.id).collect();
        assert_eq!(due, vec![early_a, early_b, late]);
        assert!(!due.contains(&future));
    }

    #[test]
    fn test_fire_applies_deltas_and_resistance() {
        let (mut world, law) = world_with_law();
        let id = add(&mut world, law, 0, ConsequenceCategory::CoalitionForms, 60);
        let standing = world.stat(StatKind::PlayerStanding);

        let fired = fire(&mut world, id, &ConsequenceConfig::default()).unwrap();
        assert_eq!(fired.narrative_key, "consequence.coalition_forms");
        assert_eq!(fired.resistance_added, 15);
        assert_eq!(world.stat(StatKind::Resistance), 15);
        assert_eq!(world.stat(StatKind::PlayerStanding), standing - 15);
        assert!(world.law(law).unwrap().has_fired(id));
    }

    #[test]
    fn test_fire_twice_is_noop() {
        let (mut world, law) = world_with_law();
        let id = add(&mut world, law, 0, ConsequenceCategory::PublicUnrest, 40);
        let config = ConsequenceConfig::default();

        assert!(fire(&mut world, id, &config).is_some());
        let stability = world.stat(StatKind::Stability);
        let resistance = world.stat(StatKind::Resistance);

        assert!(fire(&mut world, id, &config).is_none());
        assert_eq!(world.stat(StatKind::Stability), stability);
        assert_eq!(world.stat(StatKind::Resistance), resistance);
        assert!(collect_due(&world).is_empty());
    }

    #[test]
    fn test_fire_unknown_is_none() {
        let (mut world, _) = world_with_law();
        assert!(fire(&mut world, ConsequenceId(99), &ConsequenceConfig::default()).is_none());
    }

    #[test]
    fn test_applied_deltas_are_clamped() {
        let (mut world, law) = world_with_law();
        world.stats.set(StatKind::Stability, 3);
        let id = add(&mut world, law, 0, ConsequenceCategory::PublicUnrest, 80);

        let fired = fire(&mut world, id, &ConsequenceConfig::default()).unwrap();
        assert!(fired.applied.contains(&(StatKind::Stability, -3)));
        assert_eq!(world.stat(StatKind::Stability), 0);
    }

    #[test]
    fn test_loser_reaction_builds_grudge() {
        let (mut world, law) = world_with_law();
        let loser = world.spawn_actor("Loser", Position::new(Track::State, 4));
        let id = world.next_consequence_id();
        let c = ScheduledConsequence::new(id, law, 0, 0, ConsequenceCategory::LoserReaction, 30).with_actor(loser);
        schedule(&mut world, c).unwrap();

        fire(&mut world, id, &ConsequenceConfig::default()).unwrap();
        let actor = world.actor(loser).unwrap();
        assert_eq!(actor.relationship.grudge, 15);
        assert_eq!(actor.memories.len(), 1);
        assert_eq!(actor.memories[0].kind, MemoryKind::Grudge);
    }

    #[test]
    fn test_loser_reaction_skips_the_dead() {
        let (mut world, law) = world_with_law();
        let loser = world.spawn_actor("Loser", Position::new(Track::State, 4));
        let id = world.next_consequence_id();
        let c = ScheduledConsequence::new(id, law, 0, 0, ConsequenceCategory::LoserReaction, 30).with_actor(loser);
        schedule(&mut world, c).unwrap();
        world.actor_mut(loser).unwrap().transition_to(ActorStatus::Executed, 0).unwrap();

        let fired = fire(&mut world, id, &ConsequenceConfig::default()).unwrap();
        assert!(fired.resistance_added > 0);
        let actor = world.actor(loser).unwrap();
        assert_eq!(actor.relationship.grudge, 0);
        assert!(actor.memories.is_empty());
        assert!(world.law(law).unwrap().pending().next().is_none());
    }
}
