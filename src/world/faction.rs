use serde::{Deserialize, Serialize};

use crate::core::types::FactionId;

/// A patronage network or ideological bloc inside the apparatus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faction {
    pub id: FactionId,
    pub name: String,
    /// 0-100
    pub power: i32,
    /// 0-100, how tightly members stick together
    pub cohesion: i32,
}

impl Faction {
    pub fn new(id: FactionId, name: impl Into<String>, power: i32) -> Self {
        Self {
            id,
            name: name.into(),
            power: power.clamp(0, 100),
            cohesion: 50,
        }
    }

    pub fn adjust_power(&mut self, delta: i32) {
        self.power = (self.power + delta).clamp(0, 100);
    }

    pub fn adjust_cohesion(&mut self, delta: i32) {
        self.cohesion = (self.cohesion + delta).clamp(0, 100);
    }
}
