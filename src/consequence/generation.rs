//! Consequence generation for law changes
//!
//! One dispatch over the law's domain tag yields a fixed list of templates.
//! Only the trigger offset of each template is random; magnitude is the
//! template's base scaled by the decision's severity.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::consequence::{schedule, ConsequenceCategory, ScheduledConsequence};
use crate::core::config::ConsequenceConfig;
use crate::core::dice::Dice;
use crate::core::error::{EngineError, Result};
use crate::core::types::{ActorId, ConsequenceId, LawId};
use crate::world::{LawCategory, LawState, World};

/// Base magnitude of a coalition forming against an abolition
pub const COALITION_BASE_MAGNITUDE: i32 = 40;

/// Base magnitude of each losing official's reaction
pub const LOSER_BASE_MAGNITUDE: i32 = 20;

/// Earliest trigger offset any template may use
pub const MIN_OFFSET: i32 = 1;

/// Latest trigger offset any template may use
pub const MAX_OFFSET: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LawAction {
    Modify,
    Abolish,
}

/// A committed decision to change a law
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LawChange {
    pub law: LawId,
    pub action: LawAction,
    /// Pushed through unilaterally rather than negotiated
    pub forced: bool,
    /// Officials who lose out from the change
    pub losers: Vec<ActorId>,
}

impl LawChange {
    pub fn new(law: LawId, action: LawAction, forced: bool) -> Self {
        Self {
            law,
            action,
            forced,
            losers: Vec::new(),
        }
    }

    pub fn with_losers(mut self, losers: Vec<ActorId>) -> Self {
        self.losers = losers;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct Template {
    category: ConsequenceCategory,
    base_magnitude: i32,
    /// Inclusive trigger offset range in turns
    offset: (i32, i32),
}

const fn template(category: ConsequenceCategory, base_magnitude: i32, min: i32, max: i32) -> Template {
    Template {
        category,
        base_magnitude,
        offset: (min, max),
    }
}

/// Removing a safeguard replaces the generic templates with this bundle
const SAFEGUARD_ABOLITION: [Template; 5] = [
    template(ConsequenceCategory::EliteBacklash, 40, 1, 3),
    template(ConsequenceCategory::CoalitionForms, 50, 2, 5),
    template(ConsequenceCategory::FactionalPushback, 35, 2, 6),
    template(ConsequenceCategory::InternationalCondemnation, 30, 3, 8),
    template(ConsequenceCategory::BureaucraticResistance, 25, 4, 8),
];

fn templates(category: LawCategory, safeguard: bool, action: LawAction, severity: f32) -> Vec<Template> {
    if safeguard && action == LawAction::Abolish {
        return SAFEGUARD_ABOLITION.to_vec();
    }

    let escalated = severity > 1.0;
    let mut list = Vec::with_capacity(3);
    match category {
        LawCategory::Institutional => {
            list.push(template(ConsequenceCategory::EliteBacklash, 25, 2, 5));
            list.push(template(ConsequenceCategory::BureaucraticResistance, 15, 3, 8));
            if escalated && action == LawAction::Abolish {
                list.push(template(ConsequenceCategory::CoalitionForms, COALITION_BASE_MAGNITUDE, 4, 8));
            }
        }
        LawCategory::Political => {
            list.push(template(ConsequenceCategory::FactionalPushback, 25, 1, 4));
            if escalated {
                list.push(template(ConsequenceCategory::EliteBacklash, 15, 3, 7));
            }
        }
        LawCategory::Economic => {
            list.push(template(ConsequenceCategory::MarketReaction, 20, 1, 3));
            if escalated {
                list.push(template(ConsequenceCategory::CapitalFlight, 30, 2, 6));
            }
        }
        LawCategory::Social => {
            list.push(template(ConsequenceCategory::PublicUnrest, 20, 1, 5));
            if escalated {
                list.push(template(ConsequenceCategory::InternationalCondemnation, 25, 3, 8));
            }
        }
    }
    list
}

fn severity(forced: bool, config: &ConsequenceConfig) -> f32 {
    if forced {
        config.forced_severity
    } else {
        config.negotiated_severity
    }
}

fn scaled(base: i32, severity: f32, config: &ConsequenceConfig) -> i32 {
    ((base as f32 * severity).round() as i32).clamp(0, config.max_magnitude)
}

/// Build (but do not schedule) the consequences of a law change made this turn
pub fn generate(
    world: &mut World,
    change: &LawChange,
    dice: &mut dyn Dice,
    config: &ConsequenceConfig,
) -> Result<Vec<ScheduledConsequence>> {
    let law = world.law(change.law).ok_or(EngineError::LawNotFound(change.law))?;
    let severity = severity(change.forced, config);
    let list = templates(law.category, law.is_safeguard, change.action, severity);
    let turn = world.turn();

    let mut out = Vec::with_capacity(list.len() + change.losers.len());
    for t in list {
        let offset = dice.roll(t.offset.0.max(MIN_OFFSET), t.offset.1.min(MAX_OFFSET));
        let id = world.next_consequence_id();
        out.push(ScheduledConsequence::new(
            id,
            change.law,
            turn,
            turn + offset as u32,
            t.category,
            scaled(t.base_magnitude, severity, config),
        ));
    }

    for &loser in &change.losers {
        let offset = dice.roll(MIN_OFFSET, MAX_OFFSET);
        let id = world.next_consequence_id();
        out.push(
            ScheduledConsequence::new(
                id,
                change.law,
                turn,
                turn + offset as u32,
                ConsequenceCategory::LoserReaction,
                scaled(LOSER_BASE_MAGNITUDE, severity, config),
            )
            .with_actor(loser),
        );
    }

    Ok(out)
}

/// Apply a law change to its law and schedule everything it sets in motion
pub fn commit_law_change(
    world: &mut World,
    change: &LawChange,
    dice: &mut dyn Dice,
    config: &ConsequenceConfig,
) -> Result<Vec<ConsequenceId>> {
    let turn = world.turn();
    let consequences = generate(world, change, dice, config)?;

    let law = world.law_mut(change.law).ok_or(EngineError::LawNotFound(change.law))?;
    law.state = match change.action {
        LawAction::Modify => LawState::Modified,
        LawAction::Abolish => LawState::Abolished,
    };
    law.last_changed = Some(turn);
    info!(
        law = %law.key,
        action = ?change.action,
        forced = change.forced,
        consequences = consequences.len(),
        "Law changed"
    );

    consequences
        .into_iter()
        .map(|c| schedule(world, c))
        .collect()
}
