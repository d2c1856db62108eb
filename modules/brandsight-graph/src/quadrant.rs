//! Visibility/strength projection of every topic.
//!
//! x is the topic's total cross-entity weight; y is the brand's mean
//! sentiment minus the best competitor's, with zero-occurrence entities
//! read as neutral (50) for the differential only; classification never
//! sees that substitution. Quadrant labels ("Defend", "Attack") belong to
//! the presentation layer, not here.

use brandsight_common::{EntityBreakdown, QuadrantPoint, SENTIMENT_MIDPOINT};

use crate::aggregate::TopicRollup;
use crate::store::{EntityRoster, BRAND_ENTITY};

/// Project every topic with nonzero total weight onto the map. Rollups
/// arrive sorted by topic text, so the points are too.
pub fn project(rollups: &[TopicRollup], roster: &EntityRoster) -> Vec<QuadrantPoint> {
    rollups
        .iter()
        .filter(|rollup| rollup.total_weight > 0.0)
        .map(|rollup| {
            let brand_mean = rollup.brand.mean_sentiment.unwrap_or(SENTIMENT_MIDPOINT);
            let best_competitor = rollup
                .competitors
                .iter()
                .map(|(_, stats)| stats.mean_sentiment.unwrap_or(SENTIMENT_MIDPOINT))
                .fold(None::<f64>, |best, mean| {
                    Some(best.map_or(mean, |b| b.max(mean)))
                })
                .unwrap_or(SENTIMENT_MIDPOINT);

            let mut breakdown = Vec::with_capacity(1 + rollup.competitors.len());
            breakdown.push(EntityBreakdown {
                entity: roster.name(BRAND_ENTITY).to_string(),
                weight: rollup.brand.weight,
                mean_sentiment: rollup.brand.mean_sentiment,
            });
            for (entity_id, stats) in &rollup.competitors {
                breakdown.push(EntityBreakdown {
                    entity: roster.name(*entity_id).to_string(),
                    weight: stats.weight,
                    mean_sentiment: stats.mean_sentiment,
                });
            }

            QuadrantPoint {
                topic: rollup.topic.clone(),
                x: rollup.total_weight,
                y: brand_mean - best_competitor,
                breakdown,
            }
        })
        .collect()
}
