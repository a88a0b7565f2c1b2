//! Turn orchestration
//!
//! [`TurnEngine::run_turn`] is the only place with a fixed call order:
//! consequences, NPCs and lifecycle, processes, drift, end state.

pub mod drift;
pub mod end_state;
pub mod lifecycle;
pub mod npc;

pub use drift::apply_drift;
pub use end_state::{check_end_state, DefeatCause, GameStatus};
pub use lifecycle::run_lifecycle;
pub use npc::{choose_decision, run_npc_pass, NpcDecision};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::actions::{self, ActionFailure, ActionOutcome, ActionRequest};
use crate::catalog::Catalog;
use crate::consequence::{collect_due, fire, FiredConsequence};
use crate::core::config::EngineConfig;
use crate::core::dice::{Dice, SeededDice};
use crate::core::error::Result;
use crate::core::types::{ActorId, ProcessId, Turn};
use crate::events::{EventLog, TurnEvent, TurnEventKind};
use crate::process::{advance_all, PhaseResult, ProcessKind};
use crate::scoring::{default_scorer, DecisionScorer};
use crate::world::{StatKind, World};

/// Everything one turn did, as tags and numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub turn: Turn,
    pub fired: Vec<FiredConsequence>,
    pub decisions: Vec<NpcDecision>,
    pub phases: Vec<PhaseResult>,
    pub drift: Vec<(StatKind, i32)>,
    pub events: Vec<TurnEvent>,
    pub status: GameStatus,
}

/// Owns the random source and configuration, and drives turns over a world
pub struct TurnEngine {
    config: EngineConfig,
    dice: Box<dyn Dice>,
    scorer: Box<dyn DecisionScorer>,
    log: EventLog,
    /// Log length when the last report was cut
    reported: usize,
    status: GameStatus,
}

impl TurnEngine {
    /// Engine with seeded dice from `config.seed`
    pub fn new(config: EngineConfig) -> Result<Self> {
        let dice = Box::new(SeededDice::new(config.seed));
        Self::with_dice(config, dice)
    }

    /// Engine over any dice. Fails if the config is inconsistent.
    pub fn with_dice(config: EngineConfig, dice: Box<dyn Dice>) -> Result<Self> {
        config.validate()?;
        let scorer = Box::new(default_scorer(&config.scoring));
        Ok(Self {
            config,
            dice,
            scorer,
            log: EventLog::new(),
            reported: 0,
            status: GameStatus::Ongoing,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Events logged since the last report, player actions included
    fn take_events(&mut self) -> Vec<TurnEvent> {
        let events = self.log.since(self.reported).to_vec();
        self.reported = self.log.len();
        events
    }

    /// Mutable access to the dice, for world setup before the first turn
    pub fn dice_mut(&mut self) -> &mut dyn Dice {
        self.dice.as_mut()
    }

    /// Carry out a player action between turns. Successful actions are
    /// logged and show up in the next turn's report. Nothing is accepted
    /// once the game is over.
    pub fn perform_action(&mut self, world: &mut World, catalog: &Catalog, request: &ActionRequest) -> ActionOutcome {
        if self.status.is_over() || check_end_state(world, &self.config.end_state).is_over() {
            return ActionOutcome::refused(&request.action, ActionFailure::GameOver);
        }
        let outcome = actions::perform(world, catalog, request, self.dice.as_mut(), &self.config);
        if outcome.success {
            let turn = world.turn();
            self.log.record(turn, TurnEventKind::ActionPerformed {
                action: outcome.action.clone(),
            });
            if let Some(process) = outcome.process {
                if let Some((kind, subject)) = world_process_kind(world, process) {
                    self.log.record(turn, TurnEventKind::ProcessStarted { process, kind, subject });
                }
            }
        }
        outcome
    }

    /// Run one turn. Once the game is over this is a no-op that reports the
    /// final status.
    pub fn run_turn(&mut self, world: &mut World) -> TurnReport {
        if self.status.is_over() {
            warn!(status = ?self.status, "Turn requested after the game ended");
            return TurnReport {
                turn: world.turn(),
                fired: Vec::new(),
                decisions: Vec::new(),
                phases: Vec::new(),
                drift: Vec::new(),
                events: Vec::new(),
                status: self.status,
            };
        }

        // 1. New turn
        let turn = world.advance_turn();
        world.cooldowns.clear_turn();
        world.cooldowns.prune(turn);

        // 2. Fire due consequences
        let due: Vec<_> = collect_due(world).iter().map(|c| c.id).collect();
        let mut fired = Vec::new();
        for id in due {
            if let Some(result) = fire(world, id, &self.config.consequences) {
                self.log.record(turn, TurnEventKind::ConsequenceFired {
                    consequence: id,
                    law: result.consequence.law,
                    narrative_key: result.narrative_key.clone(),
                });
                fired.push(result);
            }
        }

        // 3. NPC decisions, then deaths and returns
        let (decisions, npc_events) =
            run_npc_pass(world, self.dice.as_mut(), self.scorer.as_ref(), &self.config.npc);
        let lifecycle_events = run_lifecycle(world, self.dice.as_mut(), &self.config.npc);
        for kind in npc_events.into_iter().chain(lifecycle_events) {
            self.log.record(turn, kind);
        }

        // 4. Processes
        let summary = advance_all(world, self.dice.as_mut(), &self.config.processes);
        for result in &summary.results {
            for actor in &result.implicated {
                self.log.record(turn, TurnEventKind::Implicated {
                    actor: *actor,
                    process: result.process,
                });
            }
            for (actor, status) in &result.status_changes {
                self.log.record(turn, TurnEventKind::StatusChanged {
                    actor: *actor,
                    status: *status,
                });
            }
            if let Some(outcome) = result.outcome {
                self.log.record(turn, TurnEventKind::ProcessResolved {
                    process: result.process,
                    outcome,
                });
            } else if result.advanced {
                self.log.record(turn, TurnEventKind::ProcessAdvanced {
                    process: result.process,
                    kind: result.kind,
                });
            }
        }
        for (actor, status) in &summary.status_changes {
            self.log.record(turn, TurnEventKind::StatusChanged {
                actor: *actor,
                status: *status,
            });
        }
        for (process, subject) in &summary.trials_opened {
            self.log.record(turn, TurnEventKind::ProcessStarted {
                process: *process,
                kind: ProcessKind::ShowTrial,
                subject: Some(*subject),
            });
        }

        // 5. Drift
        let drift = apply_drift(world, &self.config.drift);
        for (stat, delta) in &drift {
            self.log.record(turn, TurnEventKind::StatDrift { stat: *stat, delta: *delta });
        }

        // 6. End state
        self.status = check_end_state(world, &self.config.end_state);
        if self.status.is_over() {
            info!(turn, status = ?self.status, "Game over");
            self.log.record(turn, TurnEventKind::GameOver { status: self.status });
        }

        info!(
            turn,
            fired = fired.len(),
            npc_actions = decisions.len(),
            processes = world.processes.len(),
            "Turn complete"
        );

        TurnReport {
            turn,
            fired,
            decisions,
            phases: summary.results,
            drift,
            events: self.take_events(),
            status: self.status,
        }
    }
}

fn world_process_kind(world: &World, process: ProcessId) -> Option<(ProcessKind, Option<ActorId>)> {
    let registry = &world.processes;
    if let Some(d) = registry.detentions.iter().find(|d| d.core.id == process) {
        return Some((ProcessKind::Detention, Some(d.subject)));
    }
    if let Some(t) = registry.trials.iter().find(|t| t.core.id == process) {
        return Some((ProcessKind::ShowTrial, Some(t.defendant)));
    }
    registry
        .campaigns
        .iter()
        .find(|c| c.core.id == process)
        .map(|c| (ProcessKind::Campaign(c.kind), None))
}
