//! Saving and restoring transient engine state through a key/value store
//!
//! Each subsystem persists its own versioned envelope as JSON under a fixed
//! key. Loading never fails: a missing key, a malformed blob or an unknown
//! version all fall back to an empty table.

use ahash::AHashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::actions::CooldownTable;
use crate::core::error::Result;
use crate::process::ProcessRegistry;
use crate::world::World;

pub const COOLDOWNS_KEY: &str = "apparatchik.cooldowns";
pub const PROCESSES_KEY: &str = "apparatchik.processes";

/// Envelope version written by this build
pub const CURRENT_VERSION: u32 = 1;

/// Opaque string store the host provides
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

/// In-process store, for tests and single-session hosts
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: AHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedCooldowns {
    pub version: u32,
    pub table: CooldownTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedProcesses {
    pub version: u32,
    pub registry: ProcessRegistry,
}

/// A persisted envelope: a version plus one subsystem's table
trait Envelope: Serialize + DeserializeOwned {
    type Table: Default;

    fn version(&self) -> u32;
    fn into_table(self) -> Self::Table;
}

impl Envelope for PersistedCooldowns {
    type Table = CooldownTable;

    fn version(&self) -> u32 {
        self.version
    }

    fn into_table(self) -> CooldownTable {
        self.table
    }
}

impl Envelope for PersistedProcesses {
    type Table = ProcessRegistry;

    fn version(&self) -> u32 {
        self.version
    }

    fn into_table(self) -> ProcessRegistry {
        self.registry
    }
}

fn load<E: Envelope>(store: &dyn KeyValueStore, key: &str) -> E::Table {
    let Some(raw) = store.get(key) else {
        debug!(key, "Nothing persisted, starting empty");
        return E::Table::default();
    };
    match serde_json::from_str::<E>(&raw) {
        Ok(envelope) if envelope.version() == CURRENT_VERSION => envelope.into_table(),
        Ok(envelope) => {
            warn!(key, version = envelope.version(), "Unsupported persisted version, starting empty");
            E::Table::default()
        }
        Err(e) => {
            warn!(key, error = %e, "Malformed persisted state, starting empty");
            E::Table::default()
        }
    }
}

pub fn save_cooldowns(store: &mut dyn KeyValueStore, table: &CooldownTable) -> Result<()> {
    let envelope = PersistedCooldowns {
        version: CURRENT_VERSION,
        table: table.clone(),
    };
    store.set(COOLDOWNS_KEY, serde_json::to_string(&envelope)?);
    Ok(())
}

pub fn load_cooldowns(store: &dyn KeyValueStore) -> CooldownTable {
    load::<PersistedCooldowns>(store, COOLDOWNS_KEY)
}

pub fn save_processes(store: &mut dyn KeyValueStore, registry: &ProcessRegistry) -> Result<()> {
    let envelope = PersistedProcesses {
        version: CURRENT_VERSION,
        registry: registry.clone(),
    };
    store.set(PROCESSES_KEY, serde_json::to_string(&envelope)?);
    Ok(())
}

pub fn load_processes(store: &dyn KeyValueStore) -> ProcessRegistry {
    load::<PersistedProcesses>(store, PROCESSES_KEY)
}

/// Write every transient table of a world
pub fn save_world_state(store: &mut dyn KeyValueStore, world: &World) -> Result<()> {
    save_cooldowns(store, &world.cooldowns)?;
    save_processes(store, &world.processes)
}

/// Replace a world's transient tables with whatever the store holds.
/// New processes are numbered after every restored one.
pub fn restore_world_state(store: &dyn KeyValueStore, world: &mut World) {
    world.cooldowns = load_cooldowns(store);
    world.processes = load_processes(store);
    if let Some(max) = world.processes.max_id() {
        world.reserve_process_ids_past(max);
    }
}
