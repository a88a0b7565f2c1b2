//! Band tables for detentions, trial sentences and fates

use serde::{Deserialize, Serialize};

use crate::outcome::OutcomeBands;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetentionOutcome {
    Cleared,
    Warned,
    Demoted,
    ReferredToTrial,
    Imprisoned,
}

/// Detention resolved on evidence alone
pub const DETENTION_UNCONFESSED: OutcomeBands<DetentionOutcome> = OutcomeBands::new(
    &[
        (30, DetentionOutcome::Cleared),
        (50, DetentionOutcome::Warned),
        (70, DetentionOutcome::Demoted),
    ],
    DetentionOutcome::ReferredToTrial,
);

/// Detention resolved after the subject confessed
pub const DETENTION_CONFESSED: OutcomeBands<DetentionOutcome> = OutcomeBands::new(
    &[
        (30, DetentionOutcome::Cleared),
        (50, DetentionOutcome::Warned),
        (70, DetentionOutcome::ReferredToTrial),
    ],
    DetentionOutcome::Imprisoned,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialSentence {
    Demotion,
    Exile,
    Imprisonment { years: u8 },
    Execution,
}

pub const SENTENCE_BANDS: OutcomeBands<TrialSentence> = OutcomeBands::new(
    &[
        (20, TrialSentence::Demotion),
        (35, TrialSentence::Exile),
        (50, TrialSentence::Imprisonment { years: 10 }),
        (65, TrialSentence::Imprisonment { years: 15 }),
        (80, TrialSentence::Imprisonment { years: 25 }),
    ],
    TrialSentence::Execution,
);

/// What becomes of an official who has fallen from favour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fate {
    Untouched,
    Demoted,
    Retired,
    Exiled,
    Imprisoned,
    Disappeared,
}

/// Fate by disfavour score
pub const FATE_BANDS: OutcomeBands<Fate> = OutcomeBands::new(
    &[
        (25, Fate::Untouched),
        (45, Fate::Demoted),
        (60, Fate::Retired),
        (75, Fate::Exiled),
        (90, Fate::Imprisoned),
    ],
    Fate::Disappeared,
);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_detention_tables() {
        assert_eq!(DETENTION_UNCONFESSED.resolve(25), DetentionOutcome::Cleared);
        assert_eq!(DETENTION_UNCONFESSED.resolve(55), DetentionOutcome::Demoted);
        assert_eq!(DETENTION_CONFESSED.resolve(55), DetentionOutcome::ReferredToTrial);
        assert_eq!(DETENTION_CONFESSED.resolve(85), DetentionOutcome::Imprisoned);
        assert_eq!(DETENTION_UNCONFESSED.resolve(85), DetentionOutcome::ReferredToTrial);
    }

    #[test]
    fn test_sentence_table() {
        assert_eq!(SENTENCE_BANDS.resolve(15), TrialSentence::Demotion);
        assert_eq!(SENTENCE_BANDS.resolve(40), TrialSentence::Imprisonment { years: 10 });
        assert_eq!(SENTENCE_BANDS.resolve(79), TrialSentence::Imprisonment { years: 25 });
        assert_eq!(SENTENCE_BANDS.resolve(80), TrialSentence::Execution);
    }

    #[test]
    fn test_tables_well_formed() {
        assert!(DETENTION_UNCONFESSED.is_well_formed());
        assert!(DETENTION_CONFESSED.is_well_formed());
        assert!(SENTENCE_BANDS.is_well_formed());
        assert!(FATE_BANDS.is_well_formed());
    }

    /// Outcome changes exactly at each threshold and nowhere else
    fn assert_changes_only_at_thresholds<T: Copy + PartialEq + std::fmt::Debug>(bands: &OutcomeBands<T>) {
        let thresholds: Vec<i32> = bands.thresholds().collect();
        for score in 1..=100 {
            let changed = bands.resolve(score - 1) != bands.resolve(score);
            assert_eq!(
                changed,
                thresholds.contains(&score),
                "score {score}: {:?} -> {:?}",
                bands.resolve(score - 1),
                bands.resolve(score)
            );
        }
    }

    #[test]
    fn test_every_table_partitions_the_scale() {
        assert_changes_only_at_thresholds(&DETENTION_UNCONFESSED);
        assert_changes_only_at_thresholds(&DETENTION_CONFESSED);
        assert_changes_only_at_thresholds(&SENTENCE_BANDS);
        assert_changes_only_at_thresholds(&FATE_BANDS);
    }

    proptest! {
        #[test]
        fn out_of_range_scores_take_the_edge_bands(low in i32::MIN..0, high in 101i32..) {
            prop_assert_eq!(DETENTION_UNCONFESSED.resolve(low), DetentionOutcome::Cleared);
            prop_assert_eq!(DETENTION_CONFESSED.resolve(high), DetentionOutcome::Imprisoned);
            prop_assert_eq!(SENTENCE_BANDS.resolve(low), TrialSentence::Demotion);
            prop_assert_eq!(SENTENCE_BANDS.resolve(high), TrialSentence::Execution);
            prop_assert_eq!(FATE_BANDS.resolve(low), Fate::Untouched);
            prop_assert_eq!(FATE_BANDS.resolve(high), Fate::Disappeared);
        }

        #[test]
        fn resolution_is_monotonic(a in 0i32..=100, b in 0i32..=100) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            for (l, h) in [
                (DETENTION_UNCONFESSED.band_index(lo), DETENTION_UNCONFESSED.band_index(hi)),
                (DETENTION_CONFESSED.band_index(lo), DETENTION_CONFESSED.band_index(hi)),
                (SENTENCE_BANDS.band_index(lo), SENTENCE_BANDS.band_index(hi)),
                (FATE_BANDS.band_index(lo), FATE_BANDS.band_index(hi)),
            ] {
                prop_assert!(l <= h);
            }
        }
    }
}
