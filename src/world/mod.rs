//! World - the aggregate game state
//!
//! Actors live in a single arena indexed by [`ActorId`]. Every grouping the
//! game talks about (rivals, the standing committee, a faction's members) is
//! a filtered view recomputed on demand, never a second list of handles.

pub mod actor;
pub mod faction;
pub mod law;
pub mod setup;
pub mod stats;

pub use actor::{Actor, ActorStatus, Goal, GoalKind, Memory, MemoryKind, Personality, Relationship};
pub use faction::Faction;
pub use law::{Law, LawCategory, LawState};
pub use setup::{new_game, SetupOptions};
pub use stats::{StatKind, Stats};

use serde::{Deserialize, Serialize};

use crate::actions::CooldownTable;
use crate::core::types::{ActorId, ConsequenceId, FactionId, LawId, Position, ProcessId, Rank, Turn};
use crate::process::ProcessRegistry;

/// Rank from which an official sits on the standing committee
pub const STANDING_COMMITTEE_RANK: Rank = 7;

/// Disposition below which an NPC counts as a rival of the player
pub const RIVAL_DISPOSITION: i32 = -20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    turn: Turn,
    pub stats: Stats,
    actors: Vec<Actor>,
    pub factions: Vec<Faction>,
    pub laws: Vec<Law>,
    pub processes: ProcessRegistry,
    pub cooldowns: CooldownTable,
    player: ActorId,
    next_consequence_id: u64,
    next_process_id: u32,
}

impl World {
    /// Create a world containing only the player persona
    pub fn new(player_name: impl Into<String>, player_position: Position) -> Self {
        let player_id = ActorId(0);
        let mut player = Actor::new(player_id, player_name, player_position);
        player.is_player = true;

        Self {
            turn: 0,
            stats: Stats::default(),
            actors: vec![player],
            factions: Vec::new(),
            laws: Vec::new(),
            processes: ProcessRegistry::default(),
            cooldowns: CooldownTable::default(),
            player: player_id,
            next_consequence_id: 1,
            next_process_id: 1,
        }
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    /// Move to the next turn. The counter never goes backwards.
    pub fn advance_turn(&mut self) -> Turn {
        self.turn = self.turn.saturating_add(1);
        self.turn
    }

    pub fn stat(&self, kind: StatKind) -> i32 {
        self.stats.get(kind)
    }

    /// Apply a clamped delta to a stat, returning the change actually applied
    pub fn apply_stat(&mut self, kind: StatKind, delta: i32) -> i32 {
        self.stats.apply(kind, delta)
    }

    // === ACTORS ===

    pub fn spawn_actor(&mut self, name: impl Into<String>, position: Position) -> ActorId {
        let id = ActorId(self.actors.len() as u32);
        self.actors.push(Actor::new(id, name, position));
        id
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.index())
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id.index())
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn player_id(&self) -> ActorId {
        self.player
    }

    pub fn player(&self) -> &Actor {
        &self.actors[self.player.index()]
    }

    pub fn player_mut(&mut self) -> &mut Actor {
        let idx = self.player.index();
        &mut self.actors[idx]
    }

    /// Free NPCs, in id order
    pub fn free_npcs(&self) -> Vec<ActorId> {
        self.actors
            .iter()
            .filter(|a| !a.is_player && a.is_free())
            .map(|a| a.id)
            .collect()
    }

    /// Living NPCs, in id order
    pub fn living_npcs(&self) -> Vec<ActorId> {
        self.actors
            .iter()
            .filter(|a| !a.is_player && a.is_alive())
            .map(|a| a.id)
            .collect()
    }

    pub fn members_of(&self, faction: FactionId) -> Vec<ActorId> {
        self.actors
            .iter()
            .filter(|a| a.faction == Some(faction) && a.is_alive())
            .map(|a| a.id)
            .collect()
    }

    /// Free NPCs hostile to the player
    pub fn rivals(&self) -> Vec<ActorId> {
        self.actors
            .iter()
            .filter(|a| !a.is_player && a.is_free())
            .filter(|a| a.relationship.disposition < RIVAL_DISPOSITION || a.relationship.grudge > 50)
            .map(|a| a.id)
            .collect()
    }

    /// Free actors at the top of the ladder, the player included
    pub fn standing_committee(&self) -> Vec<ActorId> {
        self.actors
            .iter()
            .filter(|a| a.is_free() && a.position.rank >= STANDING_COMMITTEE_RANK)
            .map(|a| a.id)
            .collect()
    }

    // === FACTIONS ===

    pub fn add_faction(&mut self, name: impl Into<String>, power: i32) -> FactionId {
        let id = FactionId(self.factions.len() as u32);
        self.factions.push(Faction::new(id, name, power));
        id
    }

    pub fn faction(&self, id: FactionId) -> Option<&Faction> {
        self.factions.iter().find(|f| f.id == id)
    }

    pub fn faction_mut(&mut self, id: FactionId) -> Option<&mut Faction> {
        self.factions.iter_mut().find(|f| f.id == id)
    }

    // === LAWS ===

    pub fn add_law(&mut self, law: Law) -> LawId {
        let id = LawId(self.laws.len() as u32);
        self.laws.push(Law { id, ..law });
        id
    }

    pub fn law(&self, id: LawId) -> Option<&Law> {
        self.laws.iter().find(|l| l.id == id)
    }

    pub fn law_mut(&mut self, id: LawId) -> Option<&mut Law> {
        self.laws.iter_mut().find(|l| l.id == id)
    }

    pub fn law_by_key(&self, key: &str) -> Option<&Law> {
        self.laws.iter().find(|l| l.key == key)
    }

    // === ID ALLOCATION ===

    pub fn next_consequence_id(&mut self) -> ConsequenceId {
        let id = ConsequenceId(self.next_consequence_id);
        self.next_consequence_id += 1;
        id
    }

    pub fn next_process_id(&mut self) -> ProcessId {
        let id = ProcessId(self.next_process_id);
        self.next_process_id += 1;
        id
    }

    /// Make sure later process ids come after `id`. Never moves the counter back.
    pub fn reserve_process_ids_past(&mut self, id: ProcessId) {
        self.next_process_id = self.next_process_id.max(id.0.saturating_add(1));
    }
}
