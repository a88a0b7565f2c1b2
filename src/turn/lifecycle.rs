//! Mortality, returns from absence and goal frustration

use tracing::{debug, info};

use crate::core::config::NpcConfig;
use crate::core::dice::Dice;
use crate::events::TurnEventKind;
use crate::outcome::death_cause;
use crate::process::set_status;
use crate::world::{ActorStatus, Memory, MemoryKind, StatKind, World};

/// Grudge an official carries back from a reversible absence
const RETURN_GRUDGE: i32 = 20;

/// Mortality multiplier for actors held in prison or vanished
const HARSH_CONDITIONS: f64 = 3.0;

/// Roll deaths and returns for every living NPC, in id order. Actors tied up
/// in an active process are left to the process.
pub fn run_lifecycle(world: &mut World, dice: &mut dyn Dice, config: &NpcConfig) -> Vec<TurnEventKind> {
    let mut events = Vec::new();
    let stability = world.stat(StatKind::Stability);
    let turn = world.turn();

    for id in world.living_npcs() {
        if world.processes.involves(id) {
            continue;
        }
        let Some(status) = world.actor(id).map(|a| a.status) else {
            continue;
        };

        let mortality = match status {
            ActorStatus::Imprisoned | ActorStatus::Disappeared => config.base_mortality * HARSH_CONDITIONS,
            _ => config.base_mortality,
        };
        if dice.chance(mortality) {
            let cause = death_cause(stability, dice);
            if set_status(world, id, ActorStatus::Dead) {
                info!(actor = %id, cause = ?cause, "Official died");
                events.push(TurnEventKind::Death { actor: id, cause });
            }
            continue;
        }

        if status.can_return() && dice.chance(status.return_probability() * config.return_rate_scale) {
            if set_status(world, id, ActorStatus::Rehabilitated) {
                if let Some(actor) = world.actor_mut(id) {
                    actor.relationship.adjust_grudge(RETURN_GRUDGE);
                    actor.remember(Memory::new(MemoryKind::Grudge, RETURN_GRUDGE, turn, None));
                }
                debug!(actor = %id, from = ?status, "Official returned");
                events.push(TurnEventKind::StatusChanged {
                    actor: id,
                    status: ActorStatus::Rehabilitated,
                });
            }
        }
    }

    frustrate_overdue_goals(world);
    events
}

/// Every overdue goal of a free NPC gains one point of frustration
pub fn frustrate_overdue_goals(world: &mut World) {
    let turn = world.turn();
    for id in world.free_npcs() {
        if let Some(actor) = world.actor_mut(id) {
            for goal in actor.goals.iter_mut().filter(|g| g.is_overdue(turn)) {
                goal.frustration += 1;
            }
        }
    }
}
