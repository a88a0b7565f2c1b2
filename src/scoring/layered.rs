//! Scorers that wrap another scorer and adjust its result

use crate::core::config::ScoringConfig;
use crate::scoring::{DecisionContext, DecisionScorer, UtilityScore};
use crate::world::{Actor, MemoryKind, World};

/// Leans harder on goals: adds a share of the strongest relevant goal's
/// effective priority on top of the inner score
#[derive(Debug, Clone)]
pub struct GoalDrivenScorer<S> {
    inner: S,
    amplifier: f32,
}

impl<S: DecisionScorer> GoalDrivenScorer<S> {
    pub fn new(inner: S, config: &ScoringConfig) -> Self {
        Self {
            inner,
            amplifier: config.goal_amplifier,
        }
    }
}

impl<S: DecisionScorer> DecisionScorer for GoalDrivenScorer<S> {
    fn raw_score(&self, actor: &Actor, world: &World, context: &DecisionContext) -> UtilityScore {
        let mut score = self.inner.raw_score(actor, world, context);
        let player = world.player_id();
        let strongest = actor
            .goals
            .iter()
            .filter(|g| context.decision.serves(g.kind, context.target, player))
            .map(|g| g.effective_priority())
            .max();

        if let Some(priority) = strongest {
            score.motivation += (priority as f32 / 4.0 * self.amplifier).round() as i32;
        }
        score
    }
}

/// Lets fading memories colour the inner score
///
/// Grudges push hostile decisions, gratitude pushes helpful ones and trauma
/// raises perceived risk of anything that opposes the player.
#[derive(Debug, Clone)]
pub struct MemoryInfluencedScorer<S> {
    inner: S,
    horizon: u32,
}

impl<S: DecisionScorer> MemoryInfluencedScorer<S> {
    pub fn new(inner: S, config: &ScoringConfig) -> Self {
        Self {
            inner,
            horizon: config.memory_horizon_turns,
        }
    }
}

impl<S: DecisionScorer> DecisionScorer for MemoryInfluencedScorer<S> {
    fn raw_score(&self, actor: &Actor, world: &World, context: &DecisionContext) -> UtilityScore {
        let mut score = self.inner.raw_score(actor, world, context);
        let turn = world.turn();
        let decision = context.decision;

        for memory in &actor.memories {
            let weight = memory.weighted_intensity(turn, self.horizon) / 4;
            match memory.kind {
                MemoryKind::Grudge if decision.is_hostile() => score.motivation += weight,
                MemoryKind::Gratitude if decision.is_helpful() => score.motivation += weight,
                MemoryKind::Trauma if decision.opposes_player() => score.risk += weight,
                _ => {}
            }
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ActorId, Position, Track};
    use crate::scoring::{default_scorer, BaseScorer, DecisionType, ScoreModifiers};
    use crate::world::{Goal, GoalKind, Memory};

    fn setup() -> (World, ActorId) {
        let mut world = World::new("Player", Position::new(Track::Party, 5));
        let npc = world.spawn_actor("NPC", Position::new(Track::Security, 3));
        (world, npc)
    }

    #[test]
    fn test_goal_layer_amplifies_relevant_goal() {
        let (mut world, npc) = setup();
        world.actor_mut(npc).unwrap().goals.push(Goal::new(GoalKind::RemovePlayer, 80, 0));
        let config = ScoringConfig::default();
        let base = BaseScorer::new(&config);
        let layered = GoalDrivenScorer::new(BaseScorer::new(&config), &config);
        let actor = world.actor(npc).unwrap();

        let plot = DecisionContext::new(DecisionType::PlotAgainstPlayer);
        let diff = layered.score(actor, &world, &plot).motivation - base.score(actor, &world, &plot).motivation;
        assert_eq!(diff, 10);

        let support = DecisionContext::new(DecisionType::SupportPlayer);
        assert_eq!(
            layered.score(actor, &world, &support),
            base.score(actor, &world, &support)
        );
    }

    #[test]
    fn test_memory_layer_by_kind() {
        let (mut world, npc) = setup();
        let actor = world.actor_mut(npc).unwrap();
        actor.remember(Memory::new(MemoryKind::Grudge, 80, 0, None));
        actor.remember(Memory::new(MemoryKind::Trauma, 40, 0, None));

        let config = ScoringConfig::default();
        let base = BaseScorer::new(&config);
        let layered = MemoryInfluencedScorer::new(BaseScorer::new(&config), &config);
        let actor = world.actor(npc).unwrap();

        let plot = DecisionContext::new(DecisionType::PlotAgainstPlayer);
        let b = base.score(actor, &world, &plot);
        let l = layered.score(actor, &world, &plot);
        assert_eq!(l.motivation - b.motivation, 20);
        assert_eq!(l.risk - b.risk, 10);

        let promotion = DecisionContext::new(DecisionType::SeekPromotion);
        assert_eq!(layered.score(actor, &world, &promotion), base.score(actor, &world, &promotion));
    }

    #[test]
    fn test_memories_fade() {
        let (mut world, npc) = setup();
        world
            .actor_mut(npc)
            .unwrap()
            .remember(Memory::new(MemoryKind::Gratitude, 80, 0, None));
        let config = ScoringConfig::default();
        let layered = MemoryInfluencedScorer::new(BaseScorer::new(&config), &config);
        let support = DecisionContext::new(DecisionType::SupportPlayer);

        let fresh = layered.score(world.actor(npc).unwrap(), &world, &support).motivation;
        for _ in 0..config.memory_horizon_turns {
            world.advance_turn();
        }
        let faded = layered.score(world.actor(npc).unwrap(), &world, &support).motivation;
        assert_eq!(fresh - faded, 20);
    }

    #[test]
    fn test_layer_bonus_offsets_deficit_before_clamping() {
        let (mut world, npc) = setup();
        world
            .actor_mut(npc)
            .unwrap()
            .remember(Memory::new(MemoryKind::Grudge, 80, 0, None));
        let config = ScoringConfig::default();
        let base = BaseScorer::new(&config);
        let layered = MemoryInfluencedScorer::new(BaseScorer::new(&config), &config);
        let actor = world.actor(npc).unwrap();

        // Pushed far below zero, the grudge is not enough to lift it back
        let plot = DecisionContext::new(DecisionType::PlotAgainstPlayer).with_modifiers(ScoreModifiers {
            motivation: -200,
            ..ScoreModifiers::default()
        });
        let raw = base.raw_score(actor, &world, &plot).motivation;
        assert!(raw + 20 < 0);
        assert_eq!(layered.raw_score(actor, &world, &plot).motivation, raw + 20);
        assert_eq!(layered.score(actor, &world, &plot).motivation, 0);

        // Just below zero, the grudge counts in full from the raw value
        let nudge = -(raw + 200) - 5;
        let plot = DecisionContext::new(DecisionType::PlotAgainstPlayer).with_modifiers(ScoreModifiers {
            motivation: nudge,
            ..ScoreModifiers::default()
        });
        assert_eq!(base.score(actor, &world, &plot).motivation, 0);
        assert_eq!(layered.score(actor, &world, &plot).motivation, 15);
    }

    #[test]
    fn test_vengeful_actor_acts_through_full_stack() {
        let (mut world, npc) = setup();
        let actor = world.actor_mut(npc).unwrap();
        actor.relationship.grudge = 60;
        actor.relationship.disposition = -60;
        actor.goals.push(Goal::new(GoalKind::RemovePlayer, 90, 0));
        actor.remember(Memory::new(MemoryKind::Grudge, 100, 0, Some(ActorId(0))));

        let scorer = default_scorer(&ScoringConfig::default());
        let s = scorer.score(
            world.actor(npc).unwrap(),
            &world,
            &DecisionContext::new(DecisionType::PlotAgainstPlayer),
        );
        assert!(s.should_act());
        assert!(s.motivation <= 100);
    }
}
