//! Laws in force and the consequences their changes have set in motion
//!
//! Scheduled consequences are owned by the law whose change produced them.
//! The fired flag lives here too, so "already triggered" can always be
//! checked without a separate global ledger.

use serde::{Deserialize, Serialize};

use crate::consequence::ScheduledConsequence;
use crate::core::types::{ConsequenceId, LawId, Turn};

/// Domain tag driving which consequences a change produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LawCategory {
    Institutional,
    Political,
    Economic,
    Social,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LawState {
    InForce,
    Modified,
    Abolished,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Law {
    pub id: LawId,
    /// Catalog identifier this law was instantiated from
    pub key: String,
    pub name: String,
    pub category: LawCategory,
    /// Term limits, collective leadership and similar checks on power
    pub is_safeguard: bool,
    pub state: LawState,
    pub last_changed: Option<Turn>,
    pub consequences: Vec<ScheduledConsequence>,
}

impl Law {
    pub fn new(id: LawId, key: impl Into<String>, name: impl Into<String>, category: LawCategory) -> Self {
        Self {
            id,
            key: key.into(),
            name: name.into(),
            category,
            is_safeguard: false,
            state: LawState::InForce,
            last_changed: None,
            consequences: Vec::new(),
        }
    }

    pub fn safeguard(mut self) -> Self {
        self.is_safeguard = true;
        self
    }

    pub fn consequence(&self, id: ConsequenceId) -> Option<&ScheduledConsequence> {
        self.consequences.iter().find(|c| c.id == id)
    }

    pub fn has_fired(&self, id: ConsequenceId) -> bool {
        self.consequence(id).map_or(false, |c| c.fired)
    }

    /// Mark a consequence fired. Returns false if it was unknown or already fired.
    pub fn mark_fired(&mut self, id: ConsequenceId) -> bool {
        match self.consequences.iter_mut().find(|c| c.id == id) {
            Some(c) if !c.fired => {
                c.fired = true;
                true
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> impl Iterator<Item = &ScheduledConsequence> {
        self.consequences.iter().filter(|c| !c.fired)
    }
}
