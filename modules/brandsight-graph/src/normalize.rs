//! Signal normalization: raw extractor output → validated, canonical form.
//!
//! Pure functions. A document that fails validation is rejected whole with
//! `MalformedSignal`; a quote attributed outside the declared entity set is
//! dropped individually and counted, never fatal.

use brandsight_common::{Document, EntitySentiment, InsightError, Quote};

use crate::store::{EntityId, EntityRoster};

/// A topic after canonicalization, keeping only what ingestion needs.
#[derive(Debug, Clone)]
pub struct NormalizedTopic {
    pub text: String,
    pub relevance: f64,
}

/// A document with canonical topics and entity references resolved against
/// the declared roster. Sentiment entries and quotes for undeclared
/// entities are already gone.
#[derive(Debug, Clone)]
pub struct NormalizedDocument {
    pub document_id: String,
    pub topics: Vec<NormalizedTopic>,
    pub sentiment: Vec<(EntityId, EntitySentiment)>,
    pub quotes: Vec<(EntityId, Quote)>,
}

/// Canonical topic identity: lowercased, trimmed, internal whitespace
/// collapsed to single spaces.
pub fn canonicalize_topic(raw: &str) -> String {
    raw.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Validate and canonicalize one raw document.
///
/// Returns the normalized document plus the number of quotes dropped for
/// undeclared attribution. Sentiment entries for undeclared entities are
/// discarded silently: the declared set is the contract, not an error.
pub fn normalize_document(
    document: &Document,
    roster: &EntityRoster,
) -> Result<(NormalizedDocument, u32), InsightError> {
    if document.document_id.trim().is_empty() {
        return Err(InsightError::MalformedSignal(
            "empty document_id".to_string(),
        ));
    }

    let mut topics = Vec::with_capacity(document.topics.len());
    for topic in &document.topics {
        if !topic.relevance.is_finite() || !(0.0..=1.0).contains(&topic.relevance) {
            return Err(InsightError::MalformedSignal(format!(
                "topic '{}': relevance {} outside [0, 1]",
                topic.text, topic.relevance
            )));
        }
        let text = canonicalize_topic(&topic.text);
        if text.is_empty() {
            return Err(InsightError::MalformedSignal(
                "topic text empty after canonicalization".to_string(),
            ));
        }
        topics.push(NormalizedTopic {
            text,
            relevance: topic.relevance,
        });
    }

    let mut sentiment = Vec::new();
    for (entity, entry) in &document.entity_sentiment {
        if !entry.score.is_finite() || !(0.0..=100.0).contains(&entry.score) {
            return Err(InsightError::MalformedSignal(format!(
                "entity '{}': sentiment score {} outside [0, 100]",
                entity, entry.score
            )));
        }
        if let Some(id) = roster.lookup(entity) {
            sentiment.push((id, *entry));
        }
    }

    let mut quotes = Vec::new();
    let mut dropped_quotes = 0u32;
    for quote in &document.quotes {
        if quote.text.trim().is_empty() {
            return Err(InsightError::MalformedSignal(
                "quote with empty text".to_string(),
            ));
        }
        match roster.lookup(&quote.entity) {
            Some(id) => quotes.push((id, quote.clone())),
            None => dropped_quotes += 1,
        }
    }

    Ok((
        NormalizedDocument {
            document_id: document.document_id.clone(),
            topics,
            sentiment,
            quotes,
        },
        dropped_quotes,
    ))
}
