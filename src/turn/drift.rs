//! End-of-turn stat drift and treasury income

use tracing::debug;

use crate::core::config::DriftConfig;
use crate::world::{StatKind, World};

/// Move every ruled stat one step toward its equilibrium, then book treasury
/// income. Returns the deltas actually applied, zero changes omitted.
pub fn apply_drift(world: &mut World, config: &DriftConfig) -> Vec<(StatKind, i32)> {
    let mut applied = Vec::new();

    for rule in &config.rules {
        let gap = rule.equilibrium - world.stat(rule.stat);
        let delta = gap.signum() * rule.step.abs().min(gap.abs());
        let change = world.apply_stat(rule.stat, delta);
        if change != 0 {
            applied.push((rule.stat, change));
        }
    }

    let income = if config.income_divisor > 0 {
        world.stat(StatKind::Gdp) / config.income_divisor
    } else {
        0
    };
    let net = world.apply_stat(StatKind::Treasury, income - config.upkeep);
    if net != 0 {
        applied.push((StatKind::Treasury, net));
    }

    debug!(changes = applied.len(), "Stat drift applied");
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DriftRule;
    use crate::core::types::{Position, Track};
    use proptest::prelude::*;

    fn world() -> World {
        World::new("Player", Position::new(Track::Party, 4))
    }

    #[test]
    fn test_moves_toward_equilibrium() {
        let mut world = world();
        world.stats.set(StatKind::Stability, 30);
        world.stats.set(StatKind::Resistance, 10);
        let config = DriftConfig::default();

        let applied = apply_drift(&mut world, &config);
        assert_eq!(world.stat(StatKind::Stability), 31);
        assert_eq!(world.stat(StatKind::Resistance), 9);
        assert!(applied.contains(&(StatKind::Stability, 1)));
        assert!(applied.contains(&(StatKind::Resistance, -1)));
    }

    #[test]
    fn test_step_never_overshoots() {
        let mut world = world();
        world.stats.set(StatKind::Stability, 49);
        let config = DriftConfig {
            rules: vec![DriftRule {
                stat: StatKind::Stability,
                equilibrium: 50,
                step: 5,
            }],
            income_divisor: 0,
            upkeep: 0,
        };
        let applied = apply_drift(&mut world, &config);
        assert_eq!(world.stat(StatKind::Stability), 50);
        assert_eq!(applied, vec![(StatKind::Stability, 1)]);

        assert!(apply_drift(&mut world, &config).is_empty());
    }

    #[test]
    fn test_treasury_income() {
        let mut world = world();
        let before = world.stat(StatKind::Treasury);
        apply_drift(&mut world, &DriftConfig::default());
        // 1000 gdp / 20 - 5 upkeep
        assert_eq!(world.stat(StatKind::Treasury), before + 45);
    }

    proptest! {
        #[test]
        fn prop_drift_stays_in_bounds(start in 0i32..=100, equilibrium in 0i32..=100, step in 0i32..20) {
            let mut world = world();
            world.stats.set(StatKind::Stability, start);
            let config = DriftConfig {
                rules: vec![DriftRule { stat: StatKind::Stability, equilibrium, step }],
                income_divisor: 20,
                upkeep: 5,
            };
            apply_drift(&mut world, &config);
            let after = world.stat(StatKind::Stability);
            prop_assert!((start.min(equilibrium)..=start.max(equilibrium)).contains(&after));
        }
    }
}
