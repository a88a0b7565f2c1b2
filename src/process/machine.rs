//! The generic phase-machine driver

use tracing::{debug, warn};

use crate::core::config::ProcessConfig;
use crate::core::dice::Dice;
use crate::core::error::Result;
use crate::core::types::{ActorId, Turn};
use crate::process::{OutcomeTag, Phase, PhaseResult, ProcessCore, ProcessKind, ProcessPhase};
use crate::world::World;

/// One process kind: its phases, its per-phase work and its outcome
pub trait PhaseMachine {
    type Phase: Phase + Into<ProcessPhase>;
    type Outcome: Copy + Into<OutcomeTag>;

    fn kind(&self) -> ProcessKind;

    fn core(&self) -> &ProcessCore<Self::Phase, Self::Outcome>;

    fn core_mut(&mut self) -> &mut ProcessCore<Self::Phase, Self::Outcome>;

    fn subject(&self) -> Option<ActorId>;

    /// Whether the current phase is over as of `turn` (after this turn's work)
    fn ready(&self, turn: Turn, config: &ProcessConfig) -> bool;

    /// Work done every turn spent in the current phase
    fn work(
        &mut self,
        _world: &mut World,
        _dice: &mut dyn Dice,
        _config: &ProcessConfig,
        _result: &mut PhaseResult,
    ) -> Result<()> {
        Ok(())
    }

    /// Work done once when leaving the current phase
    fn on_exit(
        &mut self,
        _world: &mut World,
        _dice: &mut dyn Dice,
        _config: &ProcessConfig,
        _result: &mut PhaseResult,
    ) -> Result<()> {
        Ok(())
    }

    /// Pick the terminal outcome. Called once, on entering the terminal phase.
    fn resolve(&mut self, world: &World, dice: &mut dyn Dice, config: &ProcessConfig) -> Self::Outcome;

    /// Apply the outcome to the subject and the world
    fn apply(&mut self, outcome: Self::Outcome, world: &mut World, result: &mut PhaseResult) -> Result<()>;
}

fn result_for<M: PhaseMachine>(machine: &M) -> PhaseResult {
    let core = machine.core();
    PhaseResult::new(core.id, machine.kind(), machine.subject(), core.phase().into())
}

/// Advance a process by one turn.
///
/// Performs the current phase's work, moves to the next phase when the
/// current one is over and, on reaching the terminal phase, resolves and
/// applies the outcome in the same call. A terminal process is left alone.
pub fn advance<M: PhaseMachine>(
    machine: &mut M,
    world: &mut World,
    dice: &mut dyn Dice,
    config: &ProcessConfig,
) -> Result<PhaseResult> {
    let turn = world.turn();
    let mut result = result_for(machine);
    if machine.core().phase().is_terminal() {
        return Ok(result);
    }

    machine.work(world, dice, config, &mut result)?;

    if machine.ready(turn, config) {
        if let Some(next) = machine.core().phase().next() {
            machine.on_exit(world, dice, config, &mut result)?;
            machine.core_mut().enter(next, turn)?;
            result.advanced = true;
            debug!(process = %machine.core().id, phase = ?next, "Process advanced");

            if next.is_terminal() {
                let outcome = machine.resolve(world, dice, config);
                machine.core_mut().set_outcome(outcome)?;
                apply_outcome(machine, world, &mut result)?;
            }
        }
    }

    result.phase = machine.core().phase().into();
    Ok(result)
}

/// Apply a resolved outcome. Runs at most once per process; later calls and
/// calls before an outcome exists return `false` and change nothing.
pub fn apply_outcome<M: PhaseMachine>(machine: &mut M, world: &mut World, result: &mut PhaseResult) -> Result<bool> {
    let core = machine.core();
    if core.is_applied() {
        warn!(process = %core.id, "Outcome already applied, ignoring");
        return Ok(false);
    }
    let outcome = match core.outcome() {
        Some(outcome) => outcome,
        None => return Ok(false),
    };

    machine.apply(outcome, world, result)?;
    machine.core_mut().mark_applied();
    result.outcome = Some(outcome.into());
    Ok(true)
}
