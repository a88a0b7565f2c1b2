//! Whole-turn tests driving the engine the way a front end would

use apparatchik::actions::{ActionFailure, ActionRequest};
use apparatchik::catalog::Catalog;
use apparatchik::core::config::{EngineConfig, NpcConfig};
use apparatchik::core::dice::ConstantDice;
use apparatchik::core::error::EngineError;
use apparatchik::core::types::{Position, Track};
use apparatchik::events::TurnEventKind;
use apparatchik::turn::{DefeatCause, GameStatus, TurnEngine};
use apparatchik::world::{new_game, ActorStatus, LawState, SetupOptions, StatKind, World};

fn quiet_config(seed: u64) -> EngineConfig {
    EngineConfig {
        seed,
        npc: NpcConfig {
            max_actions_per_turn: 0,
            base_mortality: 0.0,
            ..NpcConfig::default()
        },
        ..EngineConfig::default()
    }
}

fn senior_options() -> SetupOptions {
    SetupOptions {
        player_rank: 7,
        ..SetupOptions::default()
    }
}

#[test]
fn same_seed_same_history() {
    let catalog = Catalog::builtin().unwrap();
    let run = |seed: u64| {
        let mut engine = TurnEngine::new(EngineConfig {
            seed,
            ..EngineConfig::default()
        })
        .unwrap();
        let mut world = new_game(&catalog, &SetupOptions::default(), engine.dice_mut());
        let reports: Vec<String> = (0..15)
            .map(|_| serde_json::to_string(&engine.run_turn(&mut world)).unwrap())
            .collect();
        (reports, serde_json::to_string(&world).unwrap())
    };

    assert_eq!(run(7), run(7));
    assert_ne!(run(7).1, run(8).1);
}

#[test]
fn turn_counter_advances_once_per_turn() {
    let catalog = Catalog::builtin().unwrap();
    let mut engine = TurnEngine::new(quiet_config(11)).unwrap();
    let mut world = new_game(&catalog, &SetupOptions::default(), engine.dice_mut());
    for expected in 1..=5 {
        let report = engine.run_turn(&mut world);
        assert_eq!(report.turn, expected);
        assert_eq!(world.turn(), expected);
    }
}

#[test]
fn law_change_consequences_fire_exactly_once() {
    let catalog = Catalog::builtin().unwrap();
    let mut engine = TurnEngine::new(quiet_config(5)).unwrap();
    let mut world = new_game(&catalog, &senior_options(), engine.dice_mut());

    let outcome = engine.perform_action(&mut world, &catalog, &ActionRequest::new("modify_law").on_law("state_planning"));
    assert!(outcome.success, "{:?}", outcome.reason);
    let scheduled = outcome.consequences.len();
    assert!(scheduled >= 1);

    let mut fired = Vec::new();
    for _ in 0..12 {
        let report = engine.run_turn(&mut world);
        fired.extend(report.fired.iter().map(|f| f.consequence.id));
    }

    let law = world.law_by_key("state_planning").unwrap();
    assert_eq!(law.state, LawState::Modified);
    assert_eq!(law.pending().count(), 0);
    assert_eq!(fired.len(), scheduled);
    let mut unique = fired.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), fired.len());
}

#[test]
fn player_action_reported_with_next_turn() {
    let catalog = Catalog::builtin().unwrap();
    let mut engine = TurnEngine::new(quiet_config(3)).unwrap();
    let mut world = new_game(&catalog, &SetupOptions::default(), engine.dice_mut());

    let outcome = engine.perform_action(&mut world, &catalog, &ActionRequest::new("party_campaign"));
    assert!(outcome.success);
    let report = engine.run_turn(&mut world);

    assert!(report
        .events
        .iter()
        .any(|e| matches!(&e.kind, TurnEventKind::ActionPerformed { action } if action == "party_campaign")));
    assert!(report
        .events
        .iter()
        .any(|e| matches!(e.kind, TurnEventKind::ProcessStarted { process, .. } if Some(process) == outcome.process)));

    // Not repeated a turn later
    let next = engine.run_turn(&mut world);
    assert!(!next
        .events
        .iter()
        .any(|e| matches!(e.kind, TurnEventKind::ActionPerformed { .. })));
}

#[test]
fn detention_runs_to_resolution() {
    let catalog = Catalog::builtin().unwrap();
    let mut world = World::new("Player", Position::new(Track::Security, 5));
    let suspect = world.spawn_actor("Suspect", Position::new(Track::State, 3));
    let mut engine = TurnEngine::with_dice(quiet_config(0), Box::new(ConstantDice::median())).unwrap();

    let outcome = engine.perform_action(&mut world, &catalog, &ActionRequest::new("order_detention").targeting(suspect));
    assert!(outcome.success, "{:?}", outcome.reason);
    let process = outcome.process.unwrap();

    let mut resolved = false;
    for _ in 0..6 {
        let report = engine.run_turn(&mut world);
        resolved |= report
            .events
            .iter()
            .any(|e| matches!(e.kind, TurnEventKind::ProcessResolved { process: p, .. } if p == process));
    }

    assert!(resolved);
    assert!(world.processes.detentions.iter().all(|d| d.core.id != process));
    // Either released or handed on to a trial, never left in limbo
    let status = world.actor(suspect).unwrap().status;
    assert!(status != ActorStatus::Detained || world.processes.involves(suspect));
}

#[test]
fn game_over_stops_the_clock() {
    let mut world = World::new("Player", Position::new(Track::Party, 4));
    world.stats.set(StatKind::PlayerStanding, 0);
    let mut engine = TurnEngine::with_dice(quiet_config(0), Box::new(ConstantDice::median())).unwrap();

    let report = engine.run_turn(&mut world);
    assert_eq!(report.status, GameStatus::Defeat(DefeatCause::Ousted));
    assert!(report
        .events
        .iter()
        .any(|e| matches!(e.kind, TurnEventKind::GameOver { .. })));

    let after = engine.run_turn(&mut world);
    assert_eq!(after.turn, 1);
    assert_eq!(world.turn(), 1);
    assert_eq!(after.status, report.status);
}

#[test]
fn refused_action_changes_nothing() {
    let catalog = Catalog::builtin().unwrap();
    let mut engine = TurnEngine::new(quiet_config(1)).unwrap();
    let mut world = new_game(&catalog, &SetupOptions::default(), engine.dice_mut());
    let treasury = world.stat(StatKind::Treasury);

    // Rank 4 cannot abolish laws
    let outcome = engine.perform_action(&mut world, &catalog, &ActionRequest::new("abolish_law").on_law("term_limits"));
    assert!(!outcome.success);
    assert_eq!(world.stat(StatKind::Treasury), treasury);
    assert_eq!(world.law_by_key("term_limits").unwrap().state, LawState::InForce);
    assert!(engine.log().is_empty());
}

#[test]
fn inconsistent_config_is_rejected_up_front() {
    let mut config = quiet_config(0);
    config.scoring.caution_min = 1.5;
    config.scoring.caution_max = 0.5;
    assert!(matches!(TurnEngine::new(config.clone()), Err(EngineError::InvalidConfig(_))));
    assert!(matches!(
        TurnEngine::with_dice(config, Box::new(ConstantDice::median())),
        Err(EngineError::InvalidConfig(_))
    ));
}

#[test]
fn no_actions_once_the_game_is_over() {
    let catalog = Catalog::builtin().unwrap();
    let mut world = World::new("Player", Position::new(Track::Party, 4));
    world.stats.set(StatKind::PlayerStanding, 0);
    let mut engine = TurnEngine::with_dice(quiet_config(0), Box::new(ConstantDice::median())).unwrap();
    let treasury = world.stat(StatKind::Treasury);

    // Already lost, even before the turn that reports it
    let outcome = engine.perform_action(&mut world, &catalog, &ActionRequest::new("party_campaign"));
    assert_eq!(outcome.reason, Some(ActionFailure::GameOver));

    engine.run_turn(&mut world);
    assert!(engine.status().is_over());
    let outcome = engine.perform_action(&mut world, &catalog, &ActionRequest::new("party_campaign"));
    assert!(!outcome.success);
    assert_eq!(outcome.reason, Some(ActionFailure::GameOver));
    assert_eq!(world.stat(StatKind::Treasury), treasury);
    assert!(world.processes.is_empty());
}
