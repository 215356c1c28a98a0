//! Linear blending of ANN and keyword scores.

/// Default weight given to the keyword score.
pub const DEFAULT_RHO: f64 = 0.5;

/// Strategy combining an ANN similarity and a keyword score.
pub trait ScoreMerger {
    /// Merge both signals into one ranking score.
    fn merge(&self, ann_similarity: f64, keyword_score: f64) -> f64;
}

impl<F> ScoreMerger for F
where
    F: Fn(f64, f64) -> f64,
{
    fn merge(&self, ann_similarity: f64, keyword_score: f64) -> f64 {
        self(ann_similarity, keyword_score)
    }
}

/// `(1 - rho) * ann + rho * keyword`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedSumMerger {
    /// Keyword weight. Not range checked.
    pub rho: f64,
}

impl WeightedSumMerger {
    /// Create a merger with keyword weight `rho`.
    #[must_use]
    pub const fn new(rho: f64) -> Self {
        Self { rho }
    }
}

impl Default for WeightedSumMerger {
    fn default() -> Self {
        Self::new(DEFAULT_RHO)
    }
}

impl ScoreMerger for WeightedSumMerger {
    fn merge(&self, ann_similarity: f64, keyword_score: f64) -> f64 {
        sum_score_merger(ann_similarity, keyword_score, self.rho)
    }
}

/// Blend `ann_similarity` and `keyword_score` with keyword weight `rho`.
///
/// `rho` outside `[0, 1]` extrapolates the blend.
#[must_use]
pub fn sum_score_merger(ann_similarity: f64, keyword_score: f64, rho: f64) -> f64 {
    rho.mul_add(keyword_score, (1.0 - rho) * ann_similarity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rho_zero_keeps_ann() {
        assert!((sum_score_merger(0.73, 0.1, 0.0) - 0.73).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rho_one_keeps_keyword() {
        assert!((sum_score_merger(0.73, 0.1, 1.0) - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_is_even_blend() {
        let merger = WeightedSumMerger::default();
        assert!((merger.merge(0.9, 1.0) - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_rho_outside_range_extrapolates() {
        assert!((sum_score_merger(1.0, 0.0, 2.0) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_closure_merger() {
        let max = |a: f64, b: f64| a.max(b);
        assert!((max.merge(0.2, 0.7) - 0.7).abs() < f64::EPSILON);
    }
}
