//! Finalization of ingested edges into per-topic rollups.
//!
//! Aggregation itself is incremental (the store folds contributions as
//! documents arrive); this pass derives the fields classification and
//! projection read, validates the graph's invariants, and fixes the
//! traversal order to topic text ascending so downstream output never
//! depends on interning order.

use brandsight_common::InsightError;

use crate::store::{EntityId, GraphEdge, InsightGraph, TopicId, BRAND_ENTITY};

/// Derived view of one edge. `weight` and counts default to zero for
/// absent edges; `mean_sentiment` stays undefined rather than zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeStats {
    pub weight: f64,
    pub occurrence_count: u32,
    pub mean_sentiment: Option<f64>,
}

impl EdgeStats {
    fn from_edge(edge: Option<&GraphEdge>) -> Self {
        match edge {
            Some(edge) => Self {
                weight: edge.cumulative_weight,
                occurrence_count: edge.occurrence_count,
                mean_sentiment: edge.mean_sentiment(),
            },
            None => Self::default(),
        }
    }
}

/// Stable per-topic aggregate: the brand's stats plus every declared
/// competitor's, in declared order.
#[derive(Debug, Clone)]
pub struct TopicRollup {
    pub topic_id: TopicId,
    pub topic: String,
    pub brand: EdgeStats,
    pub competitors: Vec<(EntityId, EdgeStats)>,
    pub total_weight: f64,
}

/// Derive rollups for every interned topic, sorted by topic text.
///
/// Fails with `InvariantViolation` if any edge carries a negative weight
/// or references an entity outside the roster. Either signals a bug in
/// ingestion, and a corrupted snapshot must not be emitted.
pub fn finalize(graph: &InsightGraph) -> Result<Vec<TopicRollup>, InsightError> {
    let roster = graph.roster();

    for ((topic_id, entity_id), edge) in graph.edges() {
        if edge.cumulative_weight < 0.0 {
            return Err(InsightError::InvariantViolation(format!(
                "edge ({}, {}) has negative cumulative weight {}",
                graph.topics().name(*topic_id),
                entity_id,
                edge.cumulative_weight
            )));
        }
        if *entity_id as usize >= roster.len() {
            return Err(InsightError::InvariantViolation(format!(
                "edge references undeclared entity id {entity_id}"
            )));
        }
    }

    let mut rollups = Vec::with_capacity(graph.topic_count());
    for topic_id in 0..graph.topic_count() as TopicId {
        let brand = EdgeStats::from_edge(graph.edge(topic_id, BRAND_ENTITY));
        let competitors: Vec<(EntityId, EdgeStats)> = roster
            .competitor_ids()
            .map(|entity_id| (entity_id, EdgeStats::from_edge(graph.edge(topic_id, entity_id))))
            .collect();
        let total_weight =
            brand.weight + competitors.iter().map(|(_, stats)| stats.weight).sum::<f64>();

        rollups.push(TopicRollup {
            topic_id,
            topic: graph.topics().name(topic_id).to_string(),
            brand,
            competitors,
            total_weight,
        });
    }

    rollups.sort_by(|a, b| a.topic.cmp(&b.topic));
    Ok(rollups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{NormalizedDocument, NormalizedTopic};
    use crate::store::EntityRoster;
    use brandsight_common::{EntitySentiment, RunParams, SentimentLabel};

    fn graph() -> InsightGraph {
        let roster = EntityRoster::from_params(&RunParams {
            brand_name: "Acme".to_string(),
            competitor_names: vec!["Rival".to_string()],
            analysis_window: None,
            generation_id: None,
        })
        .unwrap();
        InsightGraph::new(roster, 8)
    }

    fn doc(id: &str, topics: Vec<(&str, f64)>, sentiment: Vec<(u32, f64)>) -> NormalizedDocument {
        NormalizedDocument {
            document_id: id.to_string(),
            topics: topics
                .into_iter()
                .map(|(text, relevance)| NormalizedTopic {
                    text: text.to_string(),
                    relevance,
                })
                .collect(),
            sentiment: sentiment
                .into_iter()
                .map(|(entity, score)| {
                    (
                        entity,
                        EntitySentiment {
                            label: SentimentLabel::Neutral,
                            score,
                        },
                    )
                })
                .collect(),
            quotes: Vec::new(),
        }
    }

    #[test]
    fn rollups_are_sorted_by_topic_text() {
        let mut g = graph();
        g.ingest(&doc("d1", vec![("zebra stripes", 0.5), ("api limits", 0.5)], vec![(1, 20.0)]))
            .unwrap();

        let rollups = finalize(&g).unwrap();
        let topics: Vec<&str> = rollups.iter().map(|r| r.topic.as_str()).collect();
        assert_eq!(topics, vec!["api limits", "zebra stripes"]);
    }

    #[test]
    fn absent_brand_edge_reads_as_zero_weight_undefined_mean() {
        let mut g = graph();
        g.ingest(&doc("d1", vec![("pricing", 0.9)], vec![(1, 20.0)])).unwrap();

        let rollups = finalize(&g).unwrap();
        let rollup = &rollups[0];
        assert_eq!(rollup.brand.weight, 0.0);
        assert_eq!(rollup.brand.occurrence_count, 0);
        assert_eq!(rollup.brand.mean_sentiment, None);
        assert!(rollup.competitors[0].1.weight > 0.0);
    }

    #[test]
    fn total_weight_sums_brand_and_competitors() {
        let mut g = graph();
        g.ingest(&doc("d1", vec![("pricing", 1.0)], vec![(0, 80.0), (1, 20.0)]))
            .unwrap();

        let rollups = finalize(&g).unwrap();
        let rollup = &rollups[0];
        let expected = rollup.brand.weight + rollup.competitors[0].1.weight;
        assert!((rollup.total_weight - expected).abs() < 1e-12);
    }

    #[test]
    fn mean_sentiment_is_running_mean_of_raw_scores() {
        let mut g = graph();
        g.ingest(&doc("d1", vec![("durability", 0.8)], vec![(1, 80.0)])).unwrap();
        g.ingest(&doc("d2", vec![("durability", 0.8)], vec![(1, 85.0)])).unwrap();

        let rollups = finalize(&g).unwrap();
        let stats = rollups[0].competitors[0].1;
        assert_eq!(stats.occurrence_count, 2);
        assert_eq!(stats.mean_sentiment, Some(82.5));
    }

    #[test]
    fn every_declared_competitor_appears_in_rollup() {
        let roster = EntityRoster::from_params(&RunParams {
            brand_name: "Acme".to_string(),
            competitor_names: vec!["Rival".to_string(), "Nemesis".to_string()],
            analysis_window: None,
            generation_id: None,
        })
        .unwrap();
        let mut g = InsightGraph::new(roster, 8);
        g.ingest(&doc("d1", vec![("pricing", 0.9)], vec![(1, 20.0)])).unwrap();

        let rollups = finalize(&g).unwrap();
        assert_eq!(rollups[0].competitors.len(), 2);
        // Nemesis never occurred: zero weight, undefined mean.
        let nemesis = rollups[0].competitors[1].1;
        assert_eq!(nemesis.weight, 0.0);
        assert_eq!(nemesis.mean_sentiment, None);
    }

    #[test]
    fn empty_graph_finalizes_to_no_rollups() {
        let g = graph();
        assert!(finalize(&g).unwrap().is_empty());
    }
}
