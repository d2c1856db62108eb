use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Sentiment ---

/// Midpoint of the 0–100 sentiment scale. Scores above it read as praise,
/// below it as criticism.
pub const SENTIMENT_MIDPOINT: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Negative => write!(f, "negative"),
            SentimentLabel::Neutral => write!(f, "neutral"),
        }
    }
}

/// How an answer talks about one entity: a label plus a 0–100 score
/// (0 hostile, 50 neutral, 100 glowing).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EntitySentiment {
    pub label: SentimentLabel,
    pub score: f64,
}

// --- Extracted signals ---

/// One topic keyword extracted from an answer, with the extractor's
/// relevance estimate (0.0–1.0) and a short rationale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TopicSignal {
    pub text: String,
    pub relevance: f64,
    pub rationale: String,
}

/// A verbatim quote from an answer, attributed to one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Quote {
    pub text: String,
    pub sentiment: SentimentLabel,
    pub entity: String,
}

/// One analyzed answer, as handed over by the extraction pipeline.
///
/// Immutable from the engine's point of view. `entity_sentiment` is a
/// BTreeMap so iteration order never depends on hash state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Document {
    pub document_id: String,
    pub subject_entity: String,
    pub competitor_entities: Vec<String>,
    pub topics: Vec<TopicSignal>,
    pub entity_sentiment: BTreeMap<String, EntitySentiment>,
    pub quotes: Vec<Quote>,
}

// --- Run parameters ---

/// Caller-owned provenance label: the sampling window this batch covers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Parameters for one engine run over one document batch.
///
/// The declared entity set (brand + competitors) is the contract: documents
/// mentioning names outside it contribute nothing for those names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunParams {
    pub brand_name: String,
    /// Ordered and unique; order is preserved in per-entity breakdowns.
    pub competitor_names: Vec<String>,
    pub analysis_window: Option<AnalysisWindow>,
    /// Opaque correlation id linking this run to a downstream
    /// recommendation pass.
    pub generation_id: Option<Uuid>,
}
