//! Quote selection for emitted insights.
//!
//! The pool arrives already ordered by contribution weight (descending,
//! document id ascending on ties); the store maintains that order on
//! admission. Selection prefers quotes pointing the same direction as the
//! insight and falls back to the heaviest remaining ones.

use brandsight_common::{InsightCategory, Quote, SentimentLabel};

use crate::store::QuoteCandidate;

/// The sentiment direction that corroborates each category. Battlegrounds
/// accept either side.
fn preferred_label(category: InsightCategory) -> Option<SentimentLabel> {
    match category {
        InsightCategory::OpportunityGap => Some(SentimentLabel::Negative),
        InsightCategory::Stronghold => Some(SentimentLabel::Positive),
        InsightCategory::Battleground => None,
    }
}

/// Pick at most `max_quotes` from the pool, matching quotes first, then
/// highest-weight fillers. Never returns the same pool entry twice.
pub fn select_evidence(
    pool: &[QuoteCandidate],
    category: InsightCategory,
    max_quotes: usize,
) -> Vec<Quote> {
    let mut picked: Vec<usize> = Vec::with_capacity(max_quotes);

    if let Some(label) = preferred_label(category) {
        for (i, candidate) in pool.iter().enumerate() {
            if picked.len() >= max_quotes {
                break;
            }
            if candidate.quote.sentiment == label {
                picked.push(i);
            }
        }
    }

    for (i, _) in pool.iter().enumerate() {
        if picked.len() >= max_quotes {
            break;
        }
        if !picked.contains(&i) {
            picked.push(i);
        }
    }

    picked.into_iter().map(|i| pool[i].quote.clone()).collect()
}
