//! Delayed consequences of decisions
//!
//! A decision (so far: a law change) schedules a bundle of consequences a
//! few turns into the future. Each one is owned by the law that produced it
//! and fires at most once, when the world turn reaches its trigger turn.

pub mod generation;
pub mod scheduler;

pub use generation::{commit_law_change, generate, LawAction, LawChange};
pub use scheduler::{collect_due, fire, schedule, FiredConsequence};

use serde::{Deserialize, Serialize};

use crate::core::types::{ActorId, ConsequenceId, LawId, Turn};
use crate::world::StatKind;

/// What kind of fallout a consequence represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsequenceCategory {
    EliteBacklash,
    CoalitionForms,
    BureaucraticResistance,
    FactionalPushback,
    MarketReaction,
    CapitalFlight,
    PublicUnrest,
    InternationalCondemnation,
    /// An individual official who lost out from the decision reacts
    LoserReaction,
}

impl ConsequenceCategory {
    /// Opaque key handed to narrative renderers
    pub fn narrative_key(&self) -> &'static str {
        match self {
            ConsequenceCategory::EliteBacklash => "consequence.elite_backlash",
            ConsequenceCategory::CoalitionForms => "consequence.coalition_forms",
            ConsequenceCategory::BureaucraticResistance => "consequence.bureaucratic_resistance",
            ConsequenceCategory::FactionalPushback => "consequence.factional_pushback",
            ConsequenceCategory::MarketReaction => "consequence.market_reaction",
            ConsequenceCategory::CapitalFlight => "consequence.capital_flight",
            ConsequenceCategory::PublicUnrest => "consequence.public_unrest",
            ConsequenceCategory::InternationalCondemnation => "consequence.international_condemnation",
            ConsequenceCategory::LoserReaction => "consequence.loser_reaction",
        }
    }

    /// Stat deltas for a consequence of this category at the given magnitude
    pub fn stat_deltas(&self, magnitude: i32) -> Vec<(StatKind, i32)> {
        let share = |divisor: i32| -(magnitude / divisor);
        match self {
            ConsequenceCategory::EliteBacklash => vec![
                (StatKind::EliteLoyalty, share(4)),
                (StatKind::PlayerStanding, share(5)),
            ],
            ConsequenceCategory::CoalitionForms => vec![
                (StatKind::PlayerStanding, share(4)),
                (StatKind::PartyUnity, share(5)),
                (StatKind::EliteLoyalty, share(5)),
            ],
            ConsequenceCategory::BureaucraticResistance => vec![
                (StatKind::Stability, share(5)),
                (StatKind::Corruption, magnitude / 10),
            ],
            ConsequenceCategory::FactionalPushback => vec![
                (StatKind::PartyUnity, share(4)),
                (StatKind::PlayerStanding, share(10)),
            ],
            ConsequenceCategory::MarketReaction => vec![
                (StatKind::Gdp, -magnitude * 2),
                (StatKind::Treasury, -magnitude),
            ],
            ConsequenceCategory::CapitalFlight => vec![
                (StatKind::Treasury, -magnitude * 2),
                (StatKind::InternationalStanding, share(10)),
            ],
            ConsequenceCategory::PublicUnrest => vec![
                (StatKind::Stability, share(4)),
                (StatKind::PopularSupport, share(5)),
            ],
            ConsequenceCategory::InternationalCondemnation => {
                vec![(StatKind::InternationalStanding, share(4))]
            }
            ConsequenceCategory::LoserReaction => vec![
                (StatKind::PlayerStanding, share(5)),
                (StatKind::EliteLoyalty, share(10)),
            ],
        }
    }
}

/// A deferred effect attached to the law whose change produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledConsequence {
    pub id: ConsequenceId,
    pub law: LawId,
    pub created_turn: Turn,
    /// Absolute turn on which the consequence becomes due
    pub trigger_turn: Turn,
    pub category: ConsequenceCategory,
    pub magnitude: i32,
    pub deltas: Vec<(StatKind, i32)>,
    /// Official whose reaction this is, for loser reactions
    pub actor: Option<ActorId>,
    pub fired: bool,
}

impl ScheduledConsequence {
    /// Build an unfired consequence. The trigger turn is never earlier than
    /// the creation turn.
    pub fn new(
        id: ConsequenceId,
        law: LawId,
        created_turn: Turn,
        trigger_turn: Turn,
        category: ConsequenceCategory,
        magnitude: i32,
    ) -> Self {
        Self {
            id,
            law,
            created_turn,
            trigger_turn: trigger_turn.max(created_turn),
            category,
            magnitude,
            deltas: category.stat_deltas(magnitude),
            actor: None,
            fired: false,
        }
    }

    pub fn with_actor(mut self, actor: ActorId) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn is_due(&self, turn: Turn) -> bool {
        !self.fired && self.trigger_turn <= turn
    }
}
