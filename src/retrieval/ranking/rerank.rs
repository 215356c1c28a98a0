//! Keyword-aware re-ranking of ANN candidates.

use tracing::debug;

use crate::retrieval::core::candidate::{Candidate, KeywordSet, Ranking, ScoredCandidate};
use crate::retrieval::ranking::keyword::KeywordScorer;
use crate::retrieval::ranking::merger::ScoreMerger;

/// Score every candidate and sort best first.
///
/// The sort is stable, so equal scores keep the store's ANN order. Nothing is
/// dropped here; truncation is [`truncate_ranking`]'s job.
#[must_use]
pub fn combine_ann_with_kw_similarity<S, M>(
    candidates: Vec<Candidate>,
    keywords: &KeywordSet,
    scorer: &S,
    merger: &M,
) -> Ranking
where
    S: KeywordScorer + ?Sized,
    M: ScoreMerger + ?Sized,
{
    let mut ranked: Ranking = candidates
        .into_iter()
        .map(|candidate| {
            let keyword_score = scorer.score(&candidate.text, keywords);
            ScoredCandidate {
                score: merger.merge(candidate.similarity, keyword_score),
                text: candidate.text,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    debug!(count = ranked.len(), keywords = keywords.len(), "Re-ranked candidates");
    ranked
}

/// Candidates to fetch before re-ranking.
///
/// Keyword re-ranking reshuffles the pool, so with keywords the window grows to
/// `prefetch_factor * top_k`; without keywords exactly `top_k` are fetched.
#[must_use]
pub const fn prefetch_window(top_k: usize, prefetch_factor: usize, has_keywords: bool) -> usize {
    if has_keywords {
        top_k.saturating_mul(prefetch_factor)
    } else {
        top_k
    }
}

/// Keep the best `top_k` entries.
#[must_use]
pub fn truncate_ranking(mut ranking: Ranking, top_k: usize) -> Ranking {
    ranking.truncate(top_k);
    ranking
}
