//! Run orchestration: normalize → ingest → finalize → classify → project →
//! emit. One call, one batch, one snapshot; no state survives the run.

use tracing::{debug, info, warn};

use brandsight_common::{
    Document, EngineConfig, InsightError, InsightSnapshot, RunParams, RunStats, SnapshotSource,
    SNAPSHOT_SCHEMA_VERSION,
};

use crate::aggregate::finalize;
use crate::classify::classify;
use crate::normalize::normalize_document;
use crate::quadrant::project;
use crate::store::{EntityRoster, InsightGraph};

/// Skip ratios above this get a run-level warning. Alerting on it is the
/// caller's job; the engine only records the fact.
const SKIP_WARN_RATIO: f64 = 0.2;

/// The competitive insight engine. Construct once with a config, run any
/// number of independent batches; each run allocates and discards its own
/// graph, so concurrent runs for different brands never share state.
pub struct InsightEngine {
    config: EngineConfig,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl InsightEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Execute one full run over one document batch.
    ///
    /// Fails fast with `InvalidRunParameters` before touching any document.
    /// Malformed documents are skipped and counted, never fatal. The
    /// returned snapshot is deterministic: the same batch and parameters
    /// serialize byte-identically, independent of document order.
    pub fn run(
        &self,
        params: &RunParams,
        documents: &[Document],
    ) -> Result<InsightSnapshot, InsightError> {
        let roster = EntityRoster::from_params(params)?;
        info!(
            brand = %roster.brand_name(),
            competitors = params.competitor_names.len(),
            documents = documents.len(),
            "Starting insight run"
        );

        let mut graph = InsightGraph::new(roster, self.config.evidence_pool_size);
        let mut skipped = 0u32;
        let mut dropped_quotes = 0u32;

        for document in documents {
            match normalize_document(document, graph.roster()) {
                Ok((normalized, dropped)) => {
                    dropped_quotes += dropped;
                    graph.ingest(&normalized)?;
                }
                Err(InsightError::MalformedSignal(reason)) => {
                    warn!(document_id = %document.document_id, %reason, "Skipping malformed document");
                    skipped += 1;
                }
                Err(other) => return Err(other),
            }
        }

        let supplied = documents.len() as u32;
        let ingested = supplied - skipped;
        if supplied > 0 {
            let skip_ratio = f64::from(skipped) / f64::from(supplied);
            if skip_ratio > SKIP_WARN_RATIO {
                warn!(skipped, supplied, skip_ratio, "High malformed-document ratio in batch");
            }
        }
        debug!(
            topics = graph.topic_count(),
            edges = graph.edge_count(),
            "Ingestion complete"
        );

        let rollups = finalize(&graph)?;
        let insights = classify(&rollups, &graph, &self.config);
        let quadrant_data = project(&rollups, graph.roster());

        info!(
            topics = rollups.len(),
            quadrant_points = quadrant_data.len(),
            opportunity_gaps = insights.opportunity_gaps.len(),
            battlegrounds = insights.battlegrounds.len(),
            strongholds = insights.strongholds.len(),
            "Insight run complete"
        );

        Ok(InsightSnapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            source: SnapshotSource::InsightEngine,
            brand_name: graph.roster().brand_name().to_string(),
            analysis_window: params.analysis_window,
            generation_id: params.generation_id,
            quadrant_data,
            opportunity_gaps: insights.opportunity_gaps,
            battlegrounds: insights.battlegrounds,
            strongholds: insights.strongholds,
            stats: RunStats {
                documents_supplied: supplied,
                documents_ingested: ingested,
                documents_skipped: skipped,
                dropped_quotes,
                topic_count: graph.topic_count() as u32,
                edge_count: graph.edge_count() as u32,
            },
        })
    }
}
