//! The set of in-flight processes and the per-turn advancement pass

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::config::ProcessConfig;
use crate::core::dice::Dice;
use crate::core::types::{ActorId, ProcessId};
use crate::outcome::{DetentionOutcome, Fate};
use crate::process::{
    advance, apply_fate, Campaign, CampaignKind, Charge, Detention, PhaseMachine, PhaseResult, ShowTrial,
};
use crate::world::{ActorStatus, World};

/// Active processes of every kind, in initiation order within each kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessRegistry {
    pub detentions: Vec<Detention>,
    pub trials: Vec<ShowTrial>,
    pub campaigns: Vec<Campaign>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.detentions.len() + self.trials.len() + self.campaigns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an actor is the subject of any active detention or trial
    pub fn involves(&self, actor: ActorId) -> bool {
        self.detentions.iter().any(|d| d.subject == actor) || self.trials.iter().any(|t| t.defendant == actor)
    }

    /// Highest id among the active processes
    pub fn max_id(&self) -> Option<ProcessId> {
        let detentions = self.detentions.iter().map(|d| d.core.id);
        let trials = self.trials.iter().map(|t| t.core.id);
        let campaigns = self.campaigns.iter().map(|c| c.core.id);
        detentions.chain(trials).chain(campaigns).max()
    }

    pub fn campaigns_of(&self, kind: CampaignKind) -> impl Iterator<Item = &Campaign> {
        self.campaigns.iter().filter(move |c| c.kind == kind)
    }

    /// Drop processes that are terminal and applied
    pub fn retain_active(&mut self) {
        self.detentions.retain(|d| !d.core.is_finished());
        self.trials.retain(|t| !t.core.is_finished());
        self.campaigns.retain(|c| !c.core.is_finished());
    }
}

/// Result of one advancement pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvanceSummary {
    pub results: Vec<PhaseResult>,
    /// Trials opened for detainees referred this turn
    pub trials_opened: Vec<(ProcessId, ActorId)>,
    /// Status changes made outside any process, such as a referral with no trial
    pub status_changes: Vec<(ActorId, ActorStatus)>,
}

/// A referred detainee whose trial could not be opened is imprisoned rather
/// than left in custody with nothing to resolve it
fn hold_without_trial(world: &mut World, subject: ActorId) -> Option<ActorStatus> {
    let detained = world.actor(subject).map_or(false, |a| a.status == ActorStatus::Detained);
    if !detained {
        return None;
    }
    apply_fate(world, subject, Fate::Imprisoned)
}

fn step<M: PhaseMachine>(
    machine: &mut M,
    world: &mut World,
    dice: &mut dyn Dice,
    config: &ProcessConfig,
    results: &mut Vec<PhaseResult>,
) {
    match advance(machine, world, dice, config) {
        Ok(result) => results.push(result),
        // Leave the process where it is and carry on with the turn
        Err(e) => warn!(process = %machine.core().id, error = %e, "Process advance failed"),
    }
}

/// Advance every active process once, open trials for referred detainees and
/// drop finished processes.
///
/// Detentions run first, then trials, then campaigns. A trial opened this
/// turn starts advancing next turn.
pub fn advance_all(world: &mut World, dice: &mut dyn Dice, config: &ProcessConfig) -> AdvanceSummary {
    let mut registry = std::mem::take(&mut world.processes);
    let mut summary = AdvanceSummary::default();

    for detention in registry.detentions.iter_mut() {
        step(detention, world, dice, config, &mut summary.results);
    }
    for trial in registry.trials.iter_mut() {
        step(trial, world, dice, config, &mut summary.results);
    }
    for campaign in registry.campaigns.iter_mut() {
        step(campaign, world, dice, config, &mut summary.results);
    }

    let referred: Vec<(ActorId, i32)> = registry
        .detentions
        .iter()
        .filter(|d| d.core.is_finished() && d.core.outcome() == Some(DetentionOutcome::ReferredToTrial))
        .map(|d| (d.subject, d.evidence()))
        .collect();
    for (subject, evidence) in referred {
        match ShowTrial::initiate(world, subject, Charge::from_evidence(evidence)) {
            Ok(trial) => {
                summary.trials_opened.push((trial.core.id, subject));
                registry.trials.push(trial);
            }
            Err(e) => {
                warn!(subject = %subject, error = %e, "Could not open trial for referred detainee");
                if let Some(status) = hold_without_trial(world, subject) {
                    summary.status_changes.push((subject, status));
                }
            }
        }
    }

    let before = registry.len();
    registry.retain_active();
    if before != registry.len() {
        info!(closed = before - registry.len(), active = registry.len(), "Processes closed");
    }

    // Anything started on the world while the registry was out goes after it
    let started = std::mem::replace(&mut world.processes, registry);
    world.processes.detentions.extend(started.detentions);
    world.processes.trials.extend(started.trials);
    world.processes.campaigns.extend(started.campaigns);

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dice::ConstantDice;
    use crate::core::types::{Position, Track};
    use crate::world::Personality;

    #[test]
    fn test_referral_opens_trial_and_closes_detention() {
        let mut world = World::new("Player", Position::new(Track::Security, 6));
        let subject = world.spawn_actor("Subject", Position::new(Track::Party, 4));
        world.actor_mut(subject).unwrap().personality = Personality {
            loyal: 0,
            ..Personality::default()
        };
        let mut detention = Detention::initiate(&mut world, subject).unwrap();
        detention.lock_evidence(55);
        world.processes.detentions.push(detention);

        let config = ProcessConfig::default();
        let mut dice = ConstantDice::median();
        let mut opened = Vec::new();
        for _ in 0..4 {
            world.advance_turn();
            opened.extend(advance_all(&mut world, &mut dice, &config).trials_opened);
        }

        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].1, subject);
        assert!(world.processes.detentions.is_empty());
        assert_eq!(world.processes.trials.len(), 1);
        assert_eq!(world.processes.trials[0].charges, Charge::from_evidence(55));
        assert_eq!(world.actor(subject).unwrap().status, ActorStatus::Detained);
        assert!(world.processes.involves(subject));
    }

    #[test]
    fn test_untried_referral_goes_to_prison() {
        let mut world = World::new("Player", Position::new(Track::Security, 6));
        let detainee = world.spawn_actor("Detainee", Position::new(Track::Party, 4));
        let free = world.spawn_actor("Free", Position::new(Track::Party, 4));
        world.actor_mut(detainee).unwrap().transition_to(ActorStatus::Detained, 0).unwrap();

        assert_eq!(hold_without_trial(&mut world, detainee), Some(ActorStatus::Imprisoned));
        assert_eq!(world.actor(detainee).unwrap().status, ActorStatus::Imprisoned);
        assert_eq!(hold_without_trial(&mut world, free), None);
        assert_eq!(world.actor(free).unwrap().status, ActorStatus::Active);
        assert_eq!(hold_without_trial(&mut world, ActorId(99)), None);
    }

    #[test]
    fn test_finished_campaigns_removed() {
        let mut world = World::new("Player", Position::new(Track::Party, 6));
        let config = ProcessConfig::default();
        let campaign = Campaign::initiate(&mut world, CampaignKind::Party, &config);
        world.processes.campaigns.push(campaign);

        let mut dice = ConstantDice::median();
        let mut outcomes = 0;
        for _ in 0..config.party_turns {
            world.advance_turn();
            let summary = advance_all(&mut world, &mut dice, &config);
            outcomes += summary.results.iter().filter(|r| r.outcome.is_some()).count();
        }
        assert_eq!(outcomes, 1);
        assert!(world.processes.is_empty());
    }
}
