//! Named world stats with declared bounds
//!
//! Stats are a typed map over a closed key enum: every mutation goes through
//! [`Stats::apply`] or [`Stats::set`], which clamp to the stat's own bounds.

use serde::{Deserialize, Serialize};

/// Every numeric stat the engine tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Stability,
    PopularSupport,
    EliteLoyalty,
    MilitaryLoyalty,
    PartyUnity,
    InternationalStanding,
    Corruption,
    /// Cumulative institutional resistance built up by fired consequences
    Resistance,
    /// How secure the player's own position is
    PlayerStanding,
    Treasury,
    Gdp,
}

impl StatKind {
    pub const COUNT: usize = 11;

    pub const ALL: [StatKind; StatKind::COUNT] = [
        StatKind::Stability,
        StatKind::PopularSupport,
        StatKind::EliteLoyalty,
        StatKind::MilitaryLoyalty,
        StatKind::PartyUnity,
        StatKind::InternationalStanding,
        StatKind::Corruption,
        StatKind::Resistance,
        StatKind::PlayerStanding,
        StatKind::Treasury,
        StatKind::Gdp,
    ];

    /// Inclusive (min, max) bound for this stat
    pub fn bounds(&self) -> (i32, i32) {
        match self {
            StatKind::Treasury | StatKind::Gdp => (i32::MIN, i32::MAX),
            _ => (0, 100),
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.bounds() != (i32::MIN, i32::MAX)
    }

    fn slot(&self) -> usize {
        *self as usize
    }
}

/// Current values of every stat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    values: [i32; StatKind::COUNT],
}

impl Default for Stats {
    fn default() -> Self {
        let mut stats = Self {
            values: [50; StatKind::COUNT],
        };
        stats.set(StatKind::InternationalStanding, 40);
        stats.set(StatKind::Corruption, 45);
        stats.set(StatKind::Resistance, 0);
        stats.set(StatKind::PlayerStanding, 40);
        stats.set(StatKind::Treasury, 500);
        stats.set(StatKind::Gdp, 1000);
        stats
    }
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: StatKind) -> i32 {
        self.values[kind.slot()]
    }

    /// Set a stat, clamped to its bounds
    pub fn set(&mut self, kind: StatKind, value: i32) {
        let (min, max) = kind.bounds();
        self.values[kind.slot()] = value.clamp(min, max);
    }

    /// Add a delta, clamped to bounds. Returns the change actually applied.
    pub fn apply(&mut self, kind: StatKind, delta: i32) -> i32 {
        let (min, max) = kind.bounds();
        let before = self.get(kind);
        let after = (before as i64 + delta as i64).clamp(min as i64, max as i64) as i32;
        self.values[kind.slot()] = after;
        after - before
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, i32)> + '_ {
        StatKind::ALL.iter().map(move |k| (*k, self.get(*k)))
    }
}
