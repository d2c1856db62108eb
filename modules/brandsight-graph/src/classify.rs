//! Ranking rules over finalized aggregates.
//!
//! Three categories per competitor. Stronghold and opportunity gap are
//! mutually exclusive by precedence (first match wins); battleground is
//! evaluated independently and can coexist with either. Every qualifying
//! pair is computed; the per-category cap is presentation only.

use std::cmp::Ordering;
use std::collections::HashMap;

use brandsight_common::{EngineConfig, Insight, InsightCategory, SENTIMENT_MIDPOINT};

use crate::aggregate::TopicRollup;
use crate::evidence::select_evidence;
use crate::store::{EntityId, InsightGraph};

/// Inputs to the classification rules for one (topic, competitor) pair.
#[derive(Debug, Clone, Copy)]
pub struct PairStats {
    pub brand_weight: f64,
    pub competitor_weight: f64,
    pub mean_sentiment: f64,
    pub occurrence_count: u32,
}

impl PairStats {
    fn brand_is_weak(&self, config: &EngineConfig) -> bool {
        self.brand_weight < self.competitor_weight * config.weak_ratio
    }
}

/// First-match-wins between stronghold and opportunity gap. Returns None
/// when the pair is below the occurrence floor or neither rule fires.
pub fn dominance_category(stats: &PairStats, config: &EngineConfig) -> Option<InsightCategory> {
    if stats.occurrence_count < config.min_occurrences {
        return None;
    }
    if stats.mean_sentiment >= config.pos_threshold
        && stats.competitor_weight >= config.strong_weight
        && stats.brand_is_weak(config)
    {
        return Some(InsightCategory::Stronghold);
    }
    if stats.mean_sentiment <= config.neg_threshold
        && stats.competitor_weight >= config.min_weight
        && stats.brand_is_weak(config)
    {
        return Some(InsightCategory::OpportunityGap);
    }
    None
}

/// Contested on both sides, independent of sentiment sign.
pub fn is_battleground(stats: &PairStats, config: &EngineConfig) -> bool {
    stats.occurrence_count >= config.min_occurrences
        && stats.brand_weight > config.contested_weight
        && stats.competitor_weight > config.contested_weight
}

/// Ranking score: the driving (competitor) edge weight scaled by how far
/// sentiment sits from neutral.
pub fn insight_score(driving_weight: f64, mean_sentiment: f64) -> f64 {
    driving_weight * (mean_sentiment - SENTIMENT_MIDPOINT).abs() / SENTIMENT_MIDPOINT
}

fn context_line(stats: &PairStats) -> String {
    format!(
        "competitor weight {:.1}, brand weight {:.1}, mean sentiment {:.0}",
        stats.competitor_weight, stats.brand_weight, stats.mean_sentiment
    )
}

/// One run's insights, grouped by category, ranked and capped.
#[derive(Debug, Default)]
pub struct ClassifiedInsights {
    pub opportunity_gaps: Vec<Insight>,
    pub battlegrounds: Vec<Insight>,
    pub strongholds: Vec<Insight>,
}

/// Apply the rules to every (topic, competitor) pair with a defined
/// sentiment mean, attach evidence from the driving edge, rank, and cap.
pub fn classify(
    rollups: &[TopicRollup],
    graph: &InsightGraph,
    config: &EngineConfig,
) -> ClassifiedInsights {
    let mut gaps: Vec<(EntityId, Insight)> = Vec::new();
    let mut battlegrounds: Vec<(EntityId, Insight)> = Vec::new();
    let mut strongholds: Vec<(EntityId, Insight)> = Vec::new();

    for rollup in rollups {
        for (entity_id, competitor) in &rollup.competitors {
            let Some(mean_sentiment) = competitor.mean_sentiment else {
                continue;
            };
            let stats = PairStats {
                brand_weight: rollup.brand.weight,
                competitor_weight: competitor.weight,
                mean_sentiment,
                occurrence_count: competitor.occurrence_count,
            };

            let emit = |category: InsightCategory, sink: &mut Vec<(EntityId, Insight)>| {
                let pool = graph
                    .edge(rollup.topic_id, *entity_id)
                    .map(|edge| edge.evidence.as_slice())
                    .unwrap_or(&[]);
                sink.push((
                    *entity_id,
                    Insight {
                        category,
                        topic: rollup.topic.clone(),
                        counterpart_entity: graph.roster().name(*entity_id).to_string(),
                        score: insight_score(stats.competitor_weight, mean_sentiment),
                        context: context_line(&stats),
                        evidence: select_evidence(pool, category, config.max_evidence_quotes),
                    },
                ));
            };

            match dominance_category(&stats, config) {
                Some(InsightCategory::Stronghold) => {
                    emit(InsightCategory::Stronghold, &mut strongholds)
                }
                Some(InsightCategory::OpportunityGap) => {
                    emit(InsightCategory::OpportunityGap, &mut gaps)
                }
                _ => {}
            }
            if is_battleground(&stats, config) {
                emit(InsightCategory::Battleground, &mut battlegrounds);
            }
        }
    }

    ClassifiedInsights {
        opportunity_gaps: rank_and_cap(gaps, config.max_per_category),
        battlegrounds: rank_and_cap(battlegrounds, config.max_per_category),
        strongholds: rank_and_cap(strongholds, config.max_per_category),
    }
}

/// Sort by score descending (ties: topic, then counterpart, ascending) and
/// keep the top `cap` per competitor.
fn rank_and_cap(mut candidates: Vec<(EntityId, Insight)>, cap: usize) -> Vec<Insight> {
    candidates.sort_by(|(_, a), (_, b)| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.topic.cmp(&b.topic))
            .then_with(|| a.counterpart_entity.cmp(&b.counterpart_entity))
    });

    let mut kept_per_entity: HashMap<EntityId, usize> = HashMap::new();
    candidates
        .into_iter()
        .filter(|(entity_id, _)| {
            let kept = kept_per_entity.entry(*entity_id).or_insert(0);
            *kept += 1;
            *kept <= cap
        })
        .map(|(_, insight)| insight)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    fn stats(
        brand_weight: f64,
        competitor_weight: f64,
        mean_sentiment: f64,
        occurrence_count: u32,
    ) -> PairStats {
        PairStats {
            brand_weight,
            competitor_weight,
            mean_sentiment,
            occurrence_count,
        }
    }

    // --- dominance rules ---

    #[test]
    fn stronghold_fires_on_strong_positive_uncontested() {
        let s = stats(0.1, 1.5, 80.0, 3);
        assert_eq!(dominance_category(&s, &config()), Some(InsightCategory::Stronghold));
    }

    #[test]
    fn gap_fires_on_weak_negative_uncontested() {
        let s = stats(0.05, 0.5, 20.0, 2);
        assert_eq!(
            dominance_category(&s, &config()),
            Some(InsightCategory::OpportunityGap)
        );
    }

    #[test]
    fn contesting_brand_blocks_both_dominance_rules() {
        // Brand weight at parity with the competitor: neither rule fires.
        let positive = stats(1.5, 1.5, 80.0, 3);
        let negative = stats(0.5, 0.5, 20.0, 3);
        assert_eq!(dominance_category(&positive, &config()), None);
        assert_eq!(dominance_category(&negative, &config()), None);
    }

    #[test]
    fn occurrence_floor_gates_all_rules() {
        let s = stats(0.0, 1.5, 80.0, 1);
        assert_eq!(dominance_category(&s, &config()), None);
        let b = stats(0.8, 0.8, 55.0, 1);
        assert!(!is_battleground(&b, &config()));
    }

    #[test]
    fn middling_sentiment_fires_neither_dominance_rule() {
        let s = stats(0.0, 2.0, 50.0, 5);
        assert_eq!(dominance_category(&s, &config()), None);
    }

    #[test]
    fn stronghold_and_gap_are_mutually_exclusive() {
        // pos_threshold > neg_threshold makes the preconditions disjoint:
        // sweep sentiment across the scale and check no value fires both.
        let cfg = config();
        for tenth in 0..=1000 {
            let mean = f64::from(tenth) / 10.0;
            let strong_side = mean >= cfg.pos_threshold;
            let gap_side = mean <= cfg.neg_threshold;
            assert!(
                !(strong_side && gap_side),
                "sentiment {mean} satisfies both thresholds"
            );
        }
    }

    // --- battleground ---

    #[test]
    fn battleground_fires_when_both_sides_contest() {
        let s = stats(0.8, 0.9, 55.0, 2);
        assert!(is_battleground(&s, &config()));
        assert_eq!(dominance_category(&s, &config()), None);
    }

    #[test]
    fn battleground_requires_both_sides() {
        assert!(!is_battleground(&stats(0.8, 0.3, 55.0, 2), &config()));
        assert!(!is_battleground(&stats(0.3, 0.8, 55.0, 2), &config()));
    }

    #[test]
    fn battleground_can_coexist_with_stronghold() {
        // Competitor dominates (2.0 vs 0.8, brand below the weak ratio) but
        // both sides clear the contested floor.
        let s = stats(0.8, 2.0, 80.0, 3);
        assert_eq!(dominance_category(&s, &config()), Some(InsightCategory::Stronghold));
        assert!(is_battleground(&s, &config()));
    }

    // --- scoring ---

    #[test]
    fn score_scales_with_weight_and_sentiment_distance() {
        assert_eq!(insight_score(2.0, 50.0), 0.0);
        assert!((insight_score(2.0, 100.0) - 2.0).abs() < 1e-12);
        assert!((insight_score(2.0, 0.0) - 2.0).abs() < 1e-12);
        assert!((insight_score(1.0, 25.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn context_line_carries_the_numbers() {
        let line = context_line(&stats(1.1, 12.4, 28.0, 4));
        assert_eq!(line, "competitor weight 12.4, brand weight 1.1, mean sentiment 28");
    }

    // --- ranking and caps ---

    fn insight(topic: &str, counterpart: &str, score: f64) -> Insight {
        Insight {
            category: InsightCategory::OpportunityGap,
            topic: topic.to_string(),
            counterpart_entity: counterpart.to_string(),
            score,
            context: String::new(),
            evidence: Vec::new(),
        }
    }

    #[test]
    fn ranking_is_score_desc_then_topic_asc() {
        let ranked = rank_and_cap(
            vec![
                (1, insight("zebra", "Rival", 0.5)),
                (1, insight("alpha", "Rival", 0.5)),
                (1, insight("mid", "Rival", 0.9)),
            ],
            10,
        );
        let topics: Vec<&str> = ranked.iter().map(|i| i.topic.as_str()).collect();
        assert_eq!(topics, vec!["mid", "alpha", "zebra"]);
    }

    #[test]
    fn cap_applies_per_competitor_not_globally() {
        let ranked = rank_and_cap(
            vec![
                (1, insight("t1", "Rival", 0.9)),
                (1, insight("t2", "Rival", 0.8)),
                (1, insight("t3", "Rival", 0.7)),
                (2, insight("t4", "Nemesis", 0.6)),
            ],
            2,
        );
        assert_eq!(ranked.len(), 3, "two for Rival, one for Nemesis");
        assert!(ranked.iter().all(|i| i.topic != "t3"));
    }
}
