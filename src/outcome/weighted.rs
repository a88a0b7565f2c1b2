//! Weighted random selection

use serde::{Deserialize, Serialize};

use crate::core::dice::Dice;
use crate::core::error::{EngineError, Result};
use crate::outcome::Fate;

/// Pick one item by weight.
///
/// An empty list is an error. If every weight is zero the first item wins.
pub fn weighted_choice<'a, T>(items: &'a [(T, u32)], dice: &mut dyn Dice) -> Result<&'a T> {
    let first = items.first().ok_or(EngineError::EmptyCandidates)?;
    let total: u64 = items.iter().map(|(_, w)| *w as u64).sum();
    if total == 0 {
        return Ok(&first.0);
    }

    let mut cursor = (dice.unit() * total as f64) as u64;
    for (item, weight) in items {
        let weight = *weight as u64;
        if weight == 0 {
            continue;
        }
        if cursor < weight {
            return Ok(item);
        }
        cursor -= weight;
    }
    // unit() < 1.0 keeps the cursor in range; land on the last weighted item if not
    Ok(items
        .iter()
        .rev()
        .find(|(_, w)| *w > 0)
        .map_or(&first.0, |(item, _)| item))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    NaturalCauses,
    Illness,
    Accident,
    Suicide,
    Assassination,
}

/// Cause of death, with violent causes more likely when the state is unstable
pub fn death_cause(stability: i32, dice: &mut dyn Dice) -> DeathCause {
    let unrest = stability < 30;
    let weights = [
        (DeathCause::NaturalCauses, 60),
        (DeathCause::Illness, 25),
        (DeathCause::Accident, if unrest { 15 } else { 10 }),
        (DeathCause::Suicide, 3),
        (DeathCause::Assassination, if unrest { 8 } else { 2 }),
    ];
    weighted_choice(&weights, dice).map_or(DeathCause::NaturalCauses, |c| *c)
}

/// Random fate for an official swept up in a purge
pub fn purge_fate(dice: &mut dyn Dice) -> Fate {
    const WEIGHTS: [(Fate, u32); 5] = [
        (Fate::Demoted, 40),
        (Fate::Retired, 20),
        (Fate::Exiled, 15),
        (Fate::Imprisoned, 20),
        (Fate::Disappeared, 5),
    ];
    weighted_choice(&WEIGHTS, dice).map_or(Fate::Demoted, |f| *f)
}
