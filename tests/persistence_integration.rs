//! Transient engine state saved mid-game and restored into a copy

use apparatchik::actions::ActionRequest;
use apparatchik::catalog::Catalog;
use apparatchik::core::config::EngineConfig;
use apparatchik::core::dice::ConstantDice;
use apparatchik::core::types::{Position, Track};
use apparatchik::persistence::{
    load_processes, restore_world_state, save_world_state, KeyValueStore, MemoryStore, COOLDOWNS_KEY,
    PROCESSES_KEY,
};
use apparatchik::process::{advance_all, CampaignKind};
use apparatchik::turn::TurnEngine;
use apparatchik::world::World;

fn busy_world() -> (World, Catalog) {
    let catalog = Catalog::builtin().unwrap();
    let mut world = World::new("Player", Position::new(Track::Security, 6));
    let suspect = world.spawn_actor("Suspect", Position::new(Track::State, 3));
    let mut engine = TurnEngine::with_dice(EngineConfig::default(), Box::new(ConstantDice::median())).unwrap();
    for request in [
        ActionRequest::new("order_detention").targeting(suspect),
        ActionRequest::new("economic_project"),
    ] {
        assert!(engine.perform_action(&mut world, &catalog, &request).success);
    }
    engine.run_turn(&mut world);
    (world, catalog)
}

#[test]
fn processes_and_cooldowns_survive_a_round_trip() {
    let (world, _) = busy_world();
    let mut store = MemoryStore::new();
    save_world_state(&mut store, &world).unwrap();
    assert!(store.get(COOLDOWNS_KEY).is_some());
    assert!(store.get(PROCESSES_KEY).is_some());

    let mut restored = world.clone();
    restored.processes = Default::default();
    restored.cooldowns = Default::default();
    restore_world_state(&store, &mut restored);

    assert_eq!(restored.processes, world.processes);
    assert_eq!(restored.cooldowns, world.cooldowns);
    assert_eq!(restored.processes.campaigns_of(CampaignKind::Economic).count(), 1);
}

#[test]
fn restored_processes_continue_identically() {
    let (mut original, _) = busy_world();
    let mut store = MemoryStore::new();
    save_world_state(&mut store, &original).unwrap();
    let mut restored = original.clone();
    restored.processes = load_processes(&store);

    let config = EngineConfig::default();
    for _ in 0..5 {
        original.advance_turn();
        restored.advance_turn();
        let a = advance_all(&mut original, &mut ConstantDice::median(), &config.processes);
        let b = advance_all(&mut restored, &mut ConstantDice::median(), &config.processes);
        assert_eq!(a, b);
    }
    assert_eq!(original, restored);
}

#[test]
fn corrupt_store_degrades_to_empty_tables() {
    let (mut world, _) = busy_world();
    let mut store = MemoryStore::new();
    store.set(PROCESSES_KEY, "[]".to_string());
    store.set(COOLDOWNS_KEY, r#"{"version":99}"#.to_string());

    restore_world_state(&store, &mut world);
    assert!(world.processes.is_empty());
    assert!(world.cooldowns.is_empty());
}
