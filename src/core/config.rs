//! Engine configuration with documented constants
//!
//! All tunable numbers are collected here with explanations of their purpose
//! and how they interact. Every field has a default, so a TOML file only needs
//! to name what it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};
use crate::world::stats::StatKind;

/// Top-level configuration for one engine instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the orchestrator's dice. Same seed, same playthrough.
    pub seed: u64,
    pub scoring: ScoringConfig,
    pub consequences: ConsequenceConfig,
    pub processes: ProcessConfig,
    pub npc: NpcConfig,
    pub drift: DriftConfig,
    pub end_state: EndStateConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 1917,
            scoring: ScoringConfig::default(),
            consequences: ConsequenceConfig::default(),
            processes: ProcessConfig::default(),
            npc: NpcConfig::default(),
            drift: DriftConfig::default(),
            end_state: EndStateConfig::default(),
        }
    }
}

// === UTILITY SCORING ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Starting motivation before goals, memories and traits are applied
    pub base_motivation: i32,

    /// Starting opportunity before world signals are applied
    pub base_opportunity: i32,

    /// Starting perceived risk before world signals are applied
    ///
    /// With the defaults (15 + 20 against 40), an actor with no goals,
    /// memories or relevant traits stays passive at caution 1.0.
    pub base_risk: i32,

    /// Lower bound for the caution multiplier (reckless actors)
    pub caution_min: f32,

    /// Upper bound for the caution multiplier (paranoid actors)
    pub caution_max: f32,

    /// Global scale on the risk side of the act/don't-act comparison
    ///
    /// 1.0 means `motivation + opportunity > risk * caution`.
    pub threshold_multiplier: f32,

    /// Motivation bonus for a goal that is past its deadline or frustrated
    pub overdue_goal_bonus: i32,

    /// Extra weight the goal-driven scorer layers on top of the base goal term
    ///
    /// At 0.5 the decorator adds half of the goal's effective priority / 4
    /// again, so driven actors act on goals noticeably earlier.
    pub goal_amplifier: f32,

    /// Number of turns after which a memory has lost all salience
    pub memory_horizon_turns: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_motivation: 15,
            base_opportunity: 20,
            base_risk: 40,
            caution_min: 0.5,
            caution_max: 1.5,
            threshold_multiplier: 1.0,
            overdue_goal_bonus: 10,
            goal_amplifier: 0.5,
            memory_horizon_turns: 20,
        }
    }
}

// === CONSEQUENCES ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsequenceConfig {
    /// Magnitude multiplier for decisions pushed through unilaterally
    pub forced_severity: f32,

    /// Magnitude multiplier for negotiated decisions
    pub negotiated_severity: f32,

    /// Share of a fired consequence's magnitude added to cumulative resistance
    ///
    /// At 0.25, a magnitude-40 coalition adds 10 resistance.
    pub resistance_rate: f32,

    /// Upper bound on any single consequence magnitude
    pub max_magnitude: i32,
}

impl Default for ConsequenceConfig {
    fn default() -> Self {
        Self {
            forced_severity: 1.5,
            negotiated_severity: 1.0,
            resistance_rate: 0.25,
            max_magnitude: 100,
        }
    }
}

// === PHASE MACHINES ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// Turns spent in initial custody before interrogation starts
    pub detention_turns: u32,
    /// Turns of interrogation (evidence accrues each turn)
    pub interrogation_turns: u32,
    /// Turns the case file sits in review
    pub review_turns: u32,
    /// Evidence gained per interrogation turn, lower bound
    pub evidence_gain_min: i32,
    /// Evidence gained per interrogation turn, upper bound
    pub evidence_gain_max: i32,
    /// Chance that a confession names accomplices
    pub implication_chance: f64,
    /// Most accomplices a single confession can name
    pub max_implicated: usize,

    /// Turns from accusation to the start of confession extraction
    pub accusation_turns: u32,
    /// Turns of confession extraction (pressure accrues each turn)
    pub extraction_turns: u32,
    /// Turns of public proceedings
    pub public_trial_turns: u32,
    /// Turns before the sentence is read
    pub sentencing_turns: u32,
    /// Interrogation pressure gained per extraction turn, lower bound
    pub pressure_gain_min: i32,
    /// Interrogation pressure gained per extraction turn, upper bound
    pub pressure_gain_max: i32,

    /// Total length of an anti-corruption campaign in turns
    pub anti_corruption_turns: u32,
    /// Total length of an economic project in turns
    pub economic_turns: u32,
    /// Total length of a party campaign in turns
    pub party_turns: u32,
    /// Floor for any precomputed campaign success chance
    pub success_min: f64,
    /// Ceiling for any precomputed campaign success chance
    pub success_max: f64,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            detention_turns: 1,
            interrogation_turns: 2,
            review_turns: 1,
            evidence_gain_min: 3,
            evidence_gain_max: 8,
            implication_chance: 0.3,
            max_implicated: 2,

            accusation_turns: 1,
            extraction_turns: 2,
            public_trial_turns: 2,
            sentencing_turns: 1,
            pressure_gain_min: 10,
            pressure_gain_max: 25,

            anti_corruption_turns: 8,
            economic_turns: 10,
            party_turns: 6,
            success_min: 0.1,
            success_max: 0.9,
        }
    }
}

// === NPC BEHAVIOR ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcConfig {
    /// Cap on how many NPCs may act in a single turn
    pub max_actions_per_turn: usize,

    /// Per-turn chance a living NPC dies of any cause
    pub base_mortality: f64,

    /// Base chance a promotion attempt succeeds (competence adds to it)
    pub promotion_base_chance: f64,

    /// Scale applied to a status's return probability each turn
    ///
    /// Return probabilities describe the whole absence; at 0.1 an exile with
    /// a 0.15 return probability comes back with 1.5% chance per turn.
    pub return_rate_scale: f64,
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            max_actions_per_turn: 5,
            base_mortality: 0.004,
            promotion_base_chance: 0.3,
            return_rate_scale: 0.1,
        }
    }
}

// === STAT DRIFT ===

/// One stat's pull toward its resting value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftRule {
    pub stat: StatKind,
    pub equilibrium: i32,
    pub step: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    pub rules: Vec<DriftRule>,

    /// Treasury income per turn is `gdp / income_divisor`
    pub income_divisor: i32,

    /// Fixed treasury upkeep per turn
    pub upkeep: i32,
}

impl Default for DriftConfig {
    fn default() -> Self {
        let rule = |stat, equilibrium, step| DriftRule {
            stat,
            equilibrium,
            step,
        };
        Self {
            rules: vec![
                rule(StatKind::Stability, 50, 1),
                rule(StatKind::PopularSupport, 50, 1),
                rule(StatKind::EliteLoyalty, 50, 1),
                rule(StatKind::MilitaryLoyalty, 55, 1),
                rule(StatKind::PartyUnity, 50, 1),
                rule(StatKind::InternationalStanding, 40, 1),
                rule(StatKind::Resistance, 0, 1),
                rule(StatKind::Corruption, 45, 1),
            ],
            income_divisor: 20,
            upkeep: 5,
        }
    }
}

// === END STATE ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndStateConfig {
    /// Military and elite loyalty both below this means a coup
    pub coup_threshold: i32,

    /// Player standing needed at the top rank to win
    pub victory_standing: i32,
}

impl Default for EndStateConfig {
    fn default() -> Self {
        Self {
            coup_threshold: 10,
            victory_standing: 80,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing fields keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let s = &self.scoring;
        if s.caution_min <= 0.0 || s.caution_min > s.caution_max {
            return Err(EngineError::InvalidConfig(format!(
                "caution range [{}, {}] must be positive and ordered",
                s.caution_min, s.caution_max
            )));
        }
        if s.threshold_multiplier <= 0.0 {
            return Err(EngineError::InvalidConfig(
                "threshold_multiplier must be positive".into(),
            ));
        }

        let c = &self.consequences;
        if c.forced_severity < c.negotiated_severity {
            return Err(EngineError::InvalidConfig(format!(
                "forced_severity ({}) should be >= negotiated_severity ({})",
                c.forced_severity, c.negotiated_severity
            )));
        }

        let p = &self.processes;
        if p.evidence_gain_min > p.evidence_gain_max || p.pressure_gain_min > p.pressure_gain_max {
            return Err(EngineError::InvalidConfig(
                "per-turn gain ranges must be ordered".into(),
            ));
        }
        // Four quarter phases need at least one turn each
        for (name, turns) in [
            ("anti_corruption_turns", p.anti_corruption_turns),
            ("economic_turns", p.economic_turns),
            ("party_turns", p.party_turns),
        ] {
            if turns < 4 {
                return Err(EngineError::InvalidConfig(format!(
                    "{} ({}) must be at least 4",
                    name, turns
                )));
            }
        }
        if !(0.0..=1.0).contains(&p.success_min)
            || !(0.0..=1.0).contains(&p.success_max)
            || p.success_min > p.success_max
        {
            return Err(EngineError::InvalidConfig(
                "campaign success bounds must be ordered probabilities".into(),
            ));
        }
        if !(0.0..=1.0).contains(&p.implication_chance)
            || !(0.0..=1.0).contains(&self.npc.base_mortality)
        {
            return Err(EngineError::InvalidConfig(
                "probabilities must lie in [0, 1]".into(),
            ));
        }

        if self.drift.income_divisor <= 0 {
            return Err(EngineError::InvalidConfig(
                "income_divisor must be positive".into(),
            ));
        }

        Ok(())
    }
}
