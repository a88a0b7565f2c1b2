//! Terminal outcome resolution shared by every phase machine
//!
//! Two modes: ordered threshold bands over a 0-100 score, and weighted random
//! choice over a small set.

pub mod bands;
pub mod weighted;

pub use bands::{
    DetentionOutcome, Fate, TrialSentence, DETENTION_CONFESSED, DETENTION_UNCONFESSED, FATE_BANDS,
    SENTENCE_BANDS,
};
pub use weighted::{death_cause, purge_fate, weighted_choice, DeathCause};

/// Ordered, non-overlapping threshold bands covering 0-100
///
/// Each `(upper, outcome)` pair claims scores below `upper` not claimed by an
/// earlier pair; `top` takes everything from the last threshold up. Scores
/// outside 0-100 are clamped first, so every input resolves.
#[derive(Debug, Clone, Copy)]
pub struct OutcomeBands<T: 'static> {
    thresholds: &'static [(i32, T)],
    top: T,
}

impl<T: Copy + 'static> OutcomeBands<T> {
    pub const fn new(thresholds: &'static [(i32, T)], top: T) -> Self {
        Self { thresholds, top }
    }

    pub fn resolve(&self, score: i32) -> T {
        let score = score.clamp(0, 100);
        self.thresholds
            .iter()
            .find(|(upper, _)| score < *upper)
            .map_or(self.top, |(_, outcome)| *outcome)
    }

    /// Thresholds strictly increasing inside 1..=100
    pub fn is_well_formed(&self) -> bool {
        let mut previous = 0;
        for (upper, _) in self.thresholds {
            if *upper <= previous || *upper > 100 {
                return false;
            }
            previous = *upper;
        }
        true
    }

    /// Index of the band a score falls in (`thresholds.len()` for the top band)
    pub fn band_index(&self, score: i32) -> usize {
        let score = score.clamp(0, 100);
        self.thresholds
            .iter()
            .position(|(upper, _)| score < *upper)
            .unwrap_or(self.thresholds.len())
    }

    /// Upper bounds of the threshold bands, in order
    pub fn thresholds(&self) -> impl Iterator<Item = i32> + '_ {
        self.thresholds.iter().map(|(upper, _)| *upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: OutcomeBands<char> = OutcomeBands::new(&[(30, 'a'), (50, 'b'), (70, 'c')], 'd');

    #[test]
    fn test_band_edges() {
        assert_eq!(SAMPLE.resolve(0), 'a');
        assert_eq!(SAMPLE.resolve(29), 'a');
        assert_eq!(SAMPLE.resolve(30), 'b');
        assert_eq!(SAMPLE.resolve(69), 'c');
        assert_eq!(SAMPLE.resolve(70), 'd');
        assert_eq!(SAMPLE.resolve(100), 'd');
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(SAMPLE.resolve(-40), 'a');
        assert_eq!(SAMPLE.resolve(400), 'd');
    }

    #[test]
    fn test_malformed_bands_detected() {
        const OVERLAP: OutcomeBands<u8> = OutcomeBands::new(&[(50, 0), (40, 1)], 2);
        const BEYOND: OutcomeBands<u8> = OutcomeBands::new(&[(120, 0)], 1);
        assert!(SAMPLE.is_well_formed());
        assert!(!OVERLAP.is_well_formed());
        assert!(!BEYOND.is_well_formed());
    }
}
