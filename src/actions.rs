//! Player actions: validation, cooldowns and execution
//!
//! Validation failures are ordinary results carried in [`ActionOutcome`],
//! never errors, so the caller can always show the player why an action was
//! refused.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::{ActionDefinition, Catalog};
use crate::consequence::{commit_law_change, LawAction, LawChange};
use crate::core::config::EngineConfig;
use crate::core::dice::Dice;
use crate::core::types::{ActorId, ConsequenceId, LawId, ProcessId, Rank, Turn};
use crate::process::{Campaign, CampaignKind, Charge, Detention, ShowTrial};
use crate::world::{ActorStatus, LawState, StatKind, World};

/// Rank from which an official's opposition makes them a loser of a law change
pub const LAW_LOSER_MIN_RANK: Rank = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    OrderDetention,
    StageShowTrial,
    LaunchAntiCorruption,
    LaunchEconomicProject,
    LaunchPartyCampaign,
    ModifyLaw,
    ForceLawChange,
    AbolishLaw,
}

/// Per-action cooldowns plus the set of actions already used this turn
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownTable {
    ready_at: BTreeMap<String, Turn>,
    used_this_turn: BTreeSet<String>,
}

impl CooldownTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// First turn the action can be used again, if it is cooling down
    pub fn ready_at(&self, action: &str) -> Option<Turn> {
        self.ready_at.get(action).copied()
    }

    pub fn is_ready(&self, action: &str, turn: Turn) -> bool {
        self.ready_at(action).map_or(true, |ready| turn >= ready)
    }

    pub fn was_used_this_turn(&self, action: &str) -> bool {
        self.used_this_turn.contains(action)
    }

    pub fn record(&mut self, action: &str, turn: Turn, cooldown: u32) {
        self.ready_at.insert(action.to_string(), turn + cooldown);
        self.used_this_turn.insert(action.to_string());
    }

    /// Forget which actions were used; called at the start of every turn
    pub fn clear_turn(&mut self) {
        self.used_this_turn.clear();
    }

    /// Drop entries whose cooldown has passed
    pub fn prune(&mut self, turn: Turn) {
        self.ready_at.retain(|_, ready| *ready > turn);
    }

    pub fn is_empty(&self) -> bool {
        self.ready_at.is_empty() && self.used_this_turn.is_empty()
    }
}

/// What the player asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    pub target: Option<ActorId>,
    /// Catalog key of the law, for law actions
    pub law: Option<String>,
}

impl ActionRequest {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            target: None,
            law: None,
        }
    }

    pub fn targeting(mut self, target: ActorId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn on_law(mut self, law: impl Into<String>) -> Self {
        self.law = Some(law.into());
        self
    }
}

/// Why an action was refused
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionFailure {
    #[error("Action not found: {0}")]
    UnknownAction(String),

    #[error("Action already used this turn")]
    AlreadyUsedThisTurn,

    #[error("Action on cooldown until turn {ready_at}")]
    OnCooldown { ready_at: Turn },

    #[error("Requires rank {required}, player holds rank {actual}")]
    RankTooLow { required: Rank, actual: Rank },

    #[error("Costs {cost}, treasury holds {available}")]
    InsufficientFunds { cost: i32, available: i32 },

    #[error("Action needs a target")]
    MissingTarget,

    #[error("Target unavailable: {0}")]
    TargetUnavailable(ActorId),

    #[error("Law unavailable: {0}")]
    LawUnavailable(String),

    #[error("Action failed: {0}")]
    Failed(String),

    #[error("The game is over")]
    GameOver,
}

/// Structured result of a player action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub action: String,
    pub success: bool,
    pub reason: Option<ActionFailure>,
    pub process: Option<ProcessId>,
    pub consequences: Vec<ConsequenceId>,
}

impl ActionOutcome {
    pub(crate) fn refused(action: &str, reason: ActionFailure) -> Self {
        debug!(action, reason = %reason, "Action refused");
        Self {
            action: action.to_string(),
            success: false,
            reason: Some(reason),
            process: None,
            consequences: Vec::new(),
        }
    }

    fn done(action: &str) -> Self {
        Self {
            action: action.to_string(),
            success: true,
            reason: None,
            process: None,
            consequences: Vec::new(),
        }
    }
}

/// Outcome of checking a request before anything is mutated
enum Target {
    None,
    Actor(ActorId),
    Law(LawId),
}

/// Check a request in order: known action, used this turn, cooldown, rank,
/// treasury, target
fn validate<'c>(
    world: &World,
    catalog: &'c Catalog,
    request: &ActionRequest,
) -> Result<(&'c ActionDefinition, Target), ActionFailure> {
    let def = catalog
        .action(&request.action)
        .ok_or_else(|| ActionFailure::UnknownAction(request.action.clone()))?;

    let turn = world.turn();
    if world.cooldowns.was_used_this_turn(&def.id) {
        return Err(ActionFailure::AlreadyUsedThisTurn);
    }
    if !world.cooldowns.is_ready(&def.id, turn) {
        return Err(ActionFailure::OnCooldown {
            ready_at: world.cooldowns.ready_at(&def.id).unwrap_or(turn),
        });
    }

    let rank = world.player().position.rank;
    if rank < def.min_rank {
        return Err(ActionFailure::RankTooLow {
            required: def.min_rank,
            actual: rank,
        });
    }

    let treasury = world.stat(StatKind::Treasury);
    if def.cost > treasury {
        return Err(ActionFailure::InsufficientFunds {
            cost: def.cost,
            available: treasury,
        });
    }

    let target = match def.kind {
        ActionKind::OrderDetention | ActionKind::StageShowTrial => {
            let id = request.target.ok_or(ActionFailure::MissingTarget)?;
            let actor = world.actor(id).ok_or(ActionFailure::TargetUnavailable(id))?;
            let available = match def.kind {
                ActionKind::OrderDetention => actor.is_free(),
                _ => matches!(
                    actor.status,
                    ActorStatus::Active | ActorStatus::Rehabilitated | ActorStatus::UnderInvestigation
                ),
            };
            if actor.is_player || !available || world.processes.involves(id) {
                return Err(ActionFailure::TargetUnavailable(id));
            }
            Target::Actor(id)
        }
        ActionKind::ModifyLaw | ActionKind::ForceLawChange | ActionKind::AbolishLaw => {
            let key = request.law.as_deref().ok_or(ActionFailure::MissingTarget)?;
            let law = world
                .law_by_key(key)
                .filter(|l| l.state != LawState::Abolished)
                .ok_or_else(|| ActionFailure::LawUnavailable(key.to_string()))?;
            Target::Law(law.id)
        }
        _ => {
            if def.needs_target && request.target.is_none() {
                return Err(ActionFailure::MissingTarget);
            }
            Target::None
        }
    };

    Ok((def, target))
}

/// Officials who lose out from a law change: senior, free and already
/// ill-disposed toward the player
pub fn law_change_losers(world: &World) -> Vec<ActorId> {
    world
        .free_npcs()
        .into_iter()
        .filter(|id| {
            world
                .actor(*id)
                .map_or(false, |a| a.position.rank >= LAW_LOSER_MIN_RANK && a.relationship.disposition < 0)
        })
        .collect()
}

/// Validate and carry out a player action
pub fn perform(
    world: &mut World,
    catalog: &Catalog,
    request: &ActionRequest,
    dice: &mut dyn Dice,
    config: &EngineConfig,
) -> ActionOutcome {
    let (def, target) = match validate(world, catalog, request) {
        Ok(ok) => ok,
        Err(reason) => return ActionOutcome::refused(&request.action, reason),
    };

    let mut outcome = ActionOutcome::done(&def.id);
    let executed = match (def.kind, target) {
        (ActionKind::OrderDetention, Target::Actor(id)) => Detention::initiate(world, id).map(|d| {
            outcome.process = Some(d.core.id);
            world.processes.detentions.push(d);
        }),
        (ActionKind::StageShowTrial, Target::Actor(id)) => {
            let corrupt = world.actor(id).map_or(0, |a| a.personality.corrupt);
            ShowTrial::initiate(world, id, Charge::from_evidence(corrupt)).map(|t| {
                outcome.process = Some(t.core.id);
                world.processes.trials.push(t);
            })
        }
        (ActionKind::LaunchAntiCorruption, _)
        | (ActionKind::LaunchEconomicProject, _)
        | (ActionKind::LaunchPartyCampaign, _) => {
            let kind = match def.kind {
                ActionKind::LaunchAntiCorruption => CampaignKind::AntiCorruption,
                ActionKind::LaunchEconomicProject => CampaignKind::Economic,
                _ => CampaignKind::Party,
            };
            let campaign = Campaign::initiate(world, kind, &config.processes);
            outcome.process = Some(campaign.core.id);
            world.processes.campaigns.push(campaign);
            Ok(())
        }
        (kind @ (ActionKind::ModifyLaw | ActionKind::ForceLawChange | ActionKind::AbolishLaw), Target::Law(law)) => {
            let change = match kind {
                ActionKind::ModifyLaw => LawChange::new(law, LawAction::Modify, false),
                ActionKind::ForceLawChange => LawChange::new(law, LawAction::Modify, true),
                _ => LawChange::new(law, LawAction::Abolish, true),
            }
            .with_losers(law_change_losers(world));
            commit_law_change(world, &change, dice, &config.consequences).map(|ids| outcome.consequences = ids)
        }
        _ => Ok(()),
    };

    if let Err(e) = executed {
        return ActionOutcome::refused(&def.id, ActionFailure::Failed(e.to_string()));
    }

    world.apply_stat(StatKind::Treasury, -def.cost);
    let turn = world.turn();
    world.cooldowns.record(&def.id, turn, def.cooldown);
    info!(action = %def.id, cost = def.cost, "Action performed");
    outcome
}
