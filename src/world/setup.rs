//! New-game world generation

use tracing::info;

use crate::catalog::Catalog;
use crate::core::dice::Dice;
use crate::core::types::{LawId, Position, Rank, Track};
use crate::world::actor::{Goal, GoalKind, Personality};
use crate::world::law::Law;
use crate::world::World;

const SURNAMES: &[&str] = &[
    "Volkov", "Petrenko", "Kovacs", "Lindqvist", "Orlov", "Baranov", "Horvath", "Zhukov",
    "Novak", "Sokolov", "Dvorak", "Kuznetsov", "Marek", "Tarasov", "Lebedev", "Szabo",
    "Gromov", "Yakovlev", "Popescu", "Belov", "Kaminski", "Morozov", "Varga", "Fedorov",
];

const TRACKS: [Track; 5] = [Track::Party, Track::State, Track::Security, Track::Military, Track::Economic];

#[derive(Debug, Clone)]
pub struct SetupOptions {
    pub player_name: String,
    pub player_track: Track,
    pub player_rank: Rank,
    pub npc_count: usize,
    pub factions: Vec<String>,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            player_name: "Comrade Secretary".to_string(),
            player_track: Track::Party,
            player_rank: 4,
            npc_count: 16,
            factions: vec![
                "Old Guard".to_string(),
                "Reformists".to_string(),
                "Security Clique".to_string(),
            ],
        }
    }
}

/// Build a fresh world: player, factions, NPC officials and the catalog's laws
pub fn new_game(catalog: &Catalog, options: &SetupOptions, dice: &mut dyn Dice) -> World {
    let mut world = World::new(
        options.player_name.clone(),
        Position::new(options.player_track, options.player_rank),
    );

    let faction_ids: Vec<_> = options
        .factions
        .iter()
        .map(|name| {
            let power = dice.roll(30, 70);
            world.add_faction(name.clone(), power)
        })
        .collect();

    for i in 0..options.npc_count {
        let surname = SURNAMES[i % SURNAMES.len()];
        let name = if i < SURNAMES.len() {
            format!("Comrade {}", surname)
        } else {
            format!("Comrade {} {}", surname, i / SURNAMES.len() + 1)
        };
        let track = TRACKS[dice.roll(0, TRACKS.len() as i32 - 1) as usize];
        // Bottom-heavy ladder: two rolls, keep the lower
        let rank = dice.roll(1, 8).min(dice.roll(1, 8)) as Rank;
        let id = world.spawn_actor(name, Position::new(track, rank));

        let personality = Personality {
            ambitious: dice.roll(10, 90),
            loyal: dice.roll(10, 90),
            paranoid: dice.roll(10, 90),
            ruthless: dice.roll(10, 90),
            corrupt: dice.roll(10, 90),
            competent: dice.roll(10, 90),
        };
        let disposition = dice.roll(-30, 30);
        let faction = if faction_ids.is_empty() {
            None
        } else {
            Some(faction_ids[dice.roll(0, faction_ids.len() as i32 - 1) as usize])
        };

        if let Some(actor) = world.actor_mut(id) {
            actor.personality = personality;
            actor.faction = faction;
            actor.relationship.disposition = disposition;
            seed_goals(&mut actor.goals, &personality, disposition, dice);
        }
    }

    for def in &catalog.laws {
        let mut law = Law::new(LawId(0), def.id.clone(), def.name.clone(), def.category);
        law.is_safeguard = def.safeguard;
        world.add_law(law);
    }

    info!(
        npcs = options.npc_count,
        factions = faction_ids.len(),
        laws = world.laws.len(),
        "New game world generated"
    );

    world
}

fn seed_goals(goals: &mut Vec<Goal>, personality: &Personality, disposition: i32, dice: &mut dyn Dice) {
    if personality.ambitious > 60 {
        let deadline = dice.roll(6, 15) as u32;
        goals.push(Goal::new(GoalKind::SeekPromotion, personality.ambitious, 0).with_deadline(deadline));
    }
    if disposition < -15 {
        goals.push(Goal::new(GoalKind::RemovePlayer, 40 - disposition, 0));
    }
    if personality.loyal > 65 && disposition > 0 {
        goals.push(Goal::new(GoalKind::SupportPlayer, personality.loyal, 0));
    }
    if personality.paranoid > 70 {
        goals.push(Goal::new(GoalKind::ProtectFaction, personality.paranoid - 20, 0));
    }
}
