use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{AnalysisWindow, Quote};

/// Bumped whenever the snapshot shape changes incompatibly.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

// --- Insights ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    /// A competitor performs poorly on the topic and the brand does not yet
    /// contest it.
    OpportunityGap,
    /// Both brand and competitor carry real weight on the topic.
    Battleground,
    /// A competitor dominates the topic with strong positive sentiment.
    Stronghold,
}

impl std::fmt::Display for InsightCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsightCategory::OpportunityGap => write!(f, "opportunity_gap"),
            InsightCategory::Battleground => write!(f, "battleground"),
            InsightCategory::Stronghold => write!(f, "stronghold"),
        }
    }
}

/// One ranked, evidence-backed competitive finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Insight {
    pub category: InsightCategory,
    pub topic: String,
    pub counterpart_entity: String,
    pub score: f64,
    /// Short numeric rationale, e.g.
    /// "competitor weight 12.4, brand weight 1.1, mean sentiment 28".
    pub context: String,
    /// At most two verbatim quotes backing the finding.
    pub evidence: Vec<Quote>,
}

// --- Quadrant map ---

/// Per-entity slice of a topic's aggregate, carried for drill-down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EntityBreakdown {
    pub entity: String,
    pub weight: f64,
    /// Undefined (not 50.0) when the entity never occurred on the topic.
    pub mean_sentiment: Option<f64>,
}

/// A topic's position on the visibility/strength map.
///
/// x is total cross-entity weight (visibility); y is the brand's mean
/// sentiment minus the best competitor's (strength differential). Quadrant
/// labels are presentation-layer concerns and deliberately absent here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuadrantPoint {
    pub topic: String,
    pub x: f64,
    pub y: f64,
    pub breakdown: Vec<EntityBreakdown>,
}

// --- Snapshot ---

/// Who produced a snapshot. The persistence schema also stores snapshots
/// hand-built by analysts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotSource {
    InsightEngine,
    ManualAnalysis,
}

impl std::fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotSource::InsightEngine => write!(f, "insight_engine"),
            SnapshotSource::ManualAnalysis => write!(f, "manual_analysis"),
        }
    }
}

/// Batch accounting for one run. `documents_ingested + documents_skipped`
/// always equals the number of documents supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RunStats {
    pub documents_supplied: u32,
    pub documents_ingested: u32,
    pub documents_skipped: u32,
    pub dropped_quotes: u32,
    pub topic_count: u32,
    pub edge_count: u32,
}

/// One versioned, immutable record of a full engine run.
///
/// Deliberately carries no wall-clock timestamp: identical inputs must
/// serialize byte-identically. The persistence collaborator stamps
/// `created_at` when it stores the record keyed by (brand, created_at).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InsightSnapshot {
    pub schema_version: u32,
    pub source: SnapshotSource,
    pub brand_name: String,
    pub analysis_window: Option<AnalysisWindow>,
    pub generation_id: Option<Uuid>,
    pub quadrant_data: Vec<QuadrantPoint>,
    pub opportunity_gaps: Vec<Insight>,
    pub battlegrounds: Vec<Insight>,
    pub strongholds: Vec<Insight>,
    pub stats: RunStats,
}
