//! Run-scoped weighted bipartite graph linking entities to topics.
//!
//! Per-answer signals never say which entity a topic "belongs to," so
//! ingestion fans every topic out to every entity the document carries
//! sentiment for, scaled by relevance and sentiment intensity and divided
//! by the document's entity count. A documented heuristic standing in for
//! fine-grained attribution the extractor cannot provide yet.
//!
//! All state here lives for exactly one run and is discarded once the
//! snapshot is emitted.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use brandsight_common::{InsightError, Quote, RunParams, SENTIMENT_MIDPOINT};

use crate::normalize::NormalizedDocument;

pub type EntityId = u32;
pub type TopicId = u32;

/// The brand always interns first.
pub const BRAND_ENTITY: EntityId = 0;

// ---------------------------------------------------------------------------
// EntityRoster
// ---------------------------------------------------------------------------

/// Dense index of the declared entity set for one run. Names are trimmed;
/// the trimmed form is the canonical entity reference.
#[derive(Debug, Clone)]
pub struct EntityRoster {
    names: Vec<String>,
    index: HashMap<String, EntityId>,
}

impl EntityRoster {
    /// Build the roster from run parameters, validating the contract:
    /// non-empty brand, non-empty competitor list, no duplicates.
    pub fn from_params(params: &RunParams) -> Result<Self, InsightError> {
        let brand = params.brand_name.trim();
        if brand.is_empty() {
            return Err(InsightError::InvalidRunParameters(
                "brand name is empty".to_string(),
            ));
        }
        if params.competitor_names.is_empty() {
            return Err(InsightError::InvalidRunParameters(
                "competitor list is empty".to_string(),
            ));
        }

        let mut names = Vec::with_capacity(1 + params.competitor_names.len());
        let mut index = HashMap::new();
        names.push(brand.to_string());
        index.insert(brand.to_string(), BRAND_ENTITY);

        for competitor in &params.competitor_names {
            let name = competitor.trim();
            if name.is_empty() {
                return Err(InsightError::InvalidRunParameters(
                    "competitor name is empty".to_string(),
                ));
            }
            if index.contains_key(name) {
                return Err(InsightError::InvalidRunParameters(format!(
                    "duplicate entity name: {name}"
                )));
            }
            let id = names.len() as EntityId;
            names.push(name.to_string());
            index.insert(name.to_string(), id);
        }

        Ok(Self { names, index })
    }

    /// Resolve a raw entity reference against the declared set.
    pub fn lookup(&self, raw: &str) -> Option<EntityId> {
        self.index.get(raw.trim()).copied()
    }

    pub fn name(&self, id: EntityId) -> &str {
        &self.names[id as usize]
    }

    pub fn brand_name(&self) -> &str {
        &self.names[BRAND_ENTITY as usize]
    }

    /// Brand plus competitors.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Competitor ids in declared order.
    pub fn competitor_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        1..self.names.len() as EntityId
    }
}

// ---------------------------------------------------------------------------
// TopicTable
// ---------------------------------------------------------------------------

/// Interner mapping canonical topic text to dense ids, created lazily on
/// first occurrence and living for the run.
#[derive(Debug, Default)]
pub struct TopicTable {
    names: Vec<String>,
    index: HashMap<String, TopicId>,
}

impl TopicTable {
    pub fn intern(&mut self, canonical: &str) -> TopicId {
        if let Some(id) = self.index.get(canonical) {
            return *id;
        }
        let id = self.names.len() as TopicId;
        self.names.push(canonical.to_string());
        self.index.insert(canonical.to_string(), id);
        id
    }

    pub fn name(&self, id: TopicId) -> &str {
        &self.names[id as usize]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ---------------------------------------------------------------------------
// GraphEdge
// ---------------------------------------------------------------------------

/// A quote competing for an edge's evidence pool, ranked by the weight of
/// the contribution that offered it.
#[derive(Debug, Clone)]
pub struct QuoteCandidate {
    pub quote: Quote,
    pub weight: f64,
    pub document_id: String,
}

/// The core mutable aggregate for one (entity, topic) pair.
#[derive(Debug, Clone, Default)]
pub struct GraphEdge {
    pub cumulative_weight: f64,
    pub sentiment_sum: f64,
    pub sentiment_count: u32,
    pub occurrence_count: u32,
    pub evidence: Vec<QuoteCandidate>,
}

impl GraphEdge {
    /// Running mean of raw sentiment scores. Undefined until the first
    /// occurrence, never reported as zero.
    pub fn mean_sentiment(&self) -> Option<f64> {
        if self.sentiment_count == 0 {
            return None;
        }
        Some(self.sentiment_sum / f64::from(self.sentiment_count))
    }

    /// Weight-ordered reservoir admission: keep the top `pool_size`
    /// candidates by weight, ties broken by document id ascending.
    fn offer_evidence(&mut self, candidate: QuoteCandidate, pool_size: usize) {
        self.evidence.push(candidate);
        self.evidence.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.document_id.cmp(&b.document_id))
        });
        self.evidence.truncate(pool_size);
    }
}

// ---------------------------------------------------------------------------
// InsightGraph
// ---------------------------------------------------------------------------

/// In-memory weighted bipartite structure built incrementally during
/// ingestion. Edges are keyed in a BTreeMap so every traversal is
/// deterministic without a sort pass.
pub struct InsightGraph {
    roster: EntityRoster,
    topics: TopicTable,
    edges: BTreeMap<(TopicId, EntityId), GraphEdge>,
    evidence_pool_size: usize,
}

impl InsightGraph {
    pub fn new(roster: EntityRoster, evidence_pool_size: usize) -> Self {
        Self {
            roster,
            topics: TopicTable::default(),
            edges: BTreeMap::new(),
            evidence_pool_size,
        }
    }

    pub fn roster(&self) -> &EntityRoster {
        &self.roster
    }

    pub fn topics(&self) -> &TopicTable {
        &self.topics
    }

    pub fn edge(&self, topic: TopicId, entity: EntityId) -> Option<&GraphEdge> {
        self.edges.get(&(topic, entity))
    }

    pub fn edges(&self) -> impl Iterator<Item = (&(TopicId, EntityId), &GraphEdge)> {
        self.edges.iter()
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Fold one normalized document into the graph.
    ///
    /// Contribution per (topic, entity):
    /// `relevance × |score − 50| / 50 / entity_count`. The raw score also
    /// feeds the edge's running sentiment mean, independent of the weight
    /// heuristic, and the document's quotes for that entity are offered to
    /// the edge's evidence pool at the contribution's weight.
    pub fn ingest(&mut self, document: &NormalizedDocument) -> Result<(), InsightError> {
        let entity_count = document.sentiment.len();
        if entity_count == 0 || document.topics.is_empty() {
            return Ok(());
        }
        let share = 1.0 / entity_count as f64;

        for topic in &document.topics {
            let topic_id = self.topics.intern(&topic.text);

            for (entity_id, sentiment) in &document.sentiment {
                let intensity = (sentiment.score - SENTIMENT_MIDPOINT).abs() / SENTIMENT_MIDPOINT;
                let weight = topic.relevance * intensity * share;

                let edge = self.edges.entry((topic_id, *entity_id)).or_default();
                edge.cumulative_weight += weight;
                if edge.cumulative_weight < 0.0 {
                    return Err(InsightError::InvariantViolation(format!(
                        "negative cumulative weight on edge ({}, {})",
                        topic.text, entity_id
                    )));
                }
                edge.occurrence_count += 1;
                edge.sentiment_sum += sentiment.score;
                edge.sentiment_count += 1;

                for (quote_entity, quote) in &document.quotes {
                    if quote_entity == entity_id {
                        edge.offer_evidence(
                            QuoteCandidate {
                                quote: quote.clone(),
                                weight,
                                document_id: document.document_id.clone(),
                            },
                            self.evidence_pool_size,
                        );
                    }
                }
            }
        }

        Ok(())
    }
}
