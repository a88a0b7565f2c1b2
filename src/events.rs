//! Per-turn event records and the running event log

use serde::{Deserialize, Serialize};

use crate::core::types::{ActorId, ConsequenceId, LawId, ProcessId, Rank, Turn};
use crate::outcome::DeathCause;
use crate::process::{OutcomeTag, ProcessKind};
use crate::scoring::DecisionType;
use crate::turn::GameStatus;
use crate::world::{ActorStatus, StatKind};

/// Something that happened during a turn
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnEvent {
    pub id: u32,
    pub turn: Turn,
    pub kind: TurnEventKind,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum TurnEventKind {
    // Consequences
    ConsequenceFired { consequence: ConsequenceId, law: LawId, narrative_key: String },

    // Officials
    NpcActed { actor: ActorId, decision: DecisionType, target: Option<ActorId> },
    Promotion { actor: ActorId, rank: Rank },
    StatusChanged { actor: ActorId, status: ActorStatus },
    Death { actor: ActorId, cause: DeathCause },
    Implicated { actor: ActorId, process: ProcessId },

    // Processes
    ProcessStarted { process: ProcessId, kind: ProcessKind, subject: Option<ActorId> },
    ProcessAdvanced { process: ProcessId, kind: ProcessKind },
    ProcessResolved { process: ProcessId, outcome: OutcomeTag },

    // Player and world
    ActionPerformed { action: String },
    StatDrift { stat: StatKind, delta: i32 },
    GameOver { status: GameStatus },
}

impl TurnEventKind {
    /// Actors the event is about
    pub fn actors(&self) -> Vec<ActorId> {
        match self {
            TurnEventKind::NpcActed { actor, target, .. } => {
                let mut actors = vec![*actor];
                actors.extend(target);
                actors
            }
            TurnEventKind::Promotion { actor, .. }
            | TurnEventKind::StatusChanged { actor, .. }
            | TurnEventKind::Death { actor, .. }
            | TurnEventKind::Implicated { actor, .. } => vec![*actor],
            TurnEventKind::ProcessStarted { subject, .. } => subject.iter().copied().collect(),
            _ => Vec::new(),
        }
    }
}

/// Every event recorded so far, in order
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    pub events: Vec<TurnEvent>,
    next_event_id: u32,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, turn: Turn, kind: TurnEventKind) -> u32 {
        let id = self.next_event_id;
        self.next_event_id += 1;
        self.events.push(TurnEvent { id, turn, kind });
        id
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events_for_turn(&self, turn: Turn) -> impl Iterator<Item = &TurnEvent> {
        self.events.iter().filter(move |e| e.turn == turn)
    }

    pub fn events_for_actor(&self, actor: ActorId) -> impl Iterator<Item = &TurnEvent> {
        self.events.iter().filter(move |e| e.kind.actors().contains(&actor))
    }

    /// Events recorded since `from` (an index into the log)
    pub fn since(&self, from: usize) -> &[TurnEvent] {
        self.events.get(from..).unwrap_or(&[])
    }
}
