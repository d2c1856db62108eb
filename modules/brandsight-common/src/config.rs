use std::env;
use std::str::FromStr;

/// Classification thresholds and output caps.
///
/// Every field has a working default; `from_env` lets deployments retune
/// without a rebuild. Weights are in contribution units (relevance ×
/// sentiment intensity, both ≤ 1.0, divided by per-document entity count).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// An edge needs at least this many occurrences before it can drive an
    /// insight. Keeps one-off mentions out of the rankings.
    pub min_occurrences: u32,
    /// Mean sentiment at or above this reads as praise (stronghold side).
    pub pos_threshold: f64,
    /// Mean sentiment at or below this reads as criticism (gap side).
    pub neg_threshold: f64,
    /// Minimum competitor weight for a stronghold.
    pub strong_weight: f64,
    /// Minimum competitor weight for an opportunity gap.
    pub min_weight: f64,
    /// Both sides must exceed this for a battleground. Lower than
    /// `strong_weight` so contested topics surface before dominated ones.
    pub contested_weight: f64,
    /// The brand is "not contesting" a topic when its weight is below this
    /// fraction of the competitor's.
    pub weak_ratio: f64,
    /// Presentation cap: top K insights per category per competitor.
    pub max_per_category: usize,
    /// Quotes attached to one insight.
    pub max_evidence_quotes: usize,
    /// Candidate quotes retained per edge during ingestion.
    pub evidence_pool_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_occurrences: 2,
            pos_threshold: 60.0,
            neg_threshold: 40.0,
            strong_weight: 1.0,
            min_weight: 0.25,
            contested_weight: 0.5,
            weak_ratio: 0.5,
            max_per_category: 10,
            max_evidence_quotes: 2,
            evidence_pool_size: 8,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults above. Panics with a clear message on unparseable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_occurrences: parsed_env("BRANDSIGHT_MIN_OCCURRENCES", defaults.min_occurrences),
            pos_threshold: parsed_env("BRANDSIGHT_POS_THRESHOLD", defaults.pos_threshold),
            neg_threshold: parsed_env("BRANDSIGHT_NEG_THRESHOLD", defaults.neg_threshold),
            strong_weight: parsed_env("BRANDSIGHT_STRONG_WEIGHT", defaults.strong_weight),
            min_weight: parsed_env("BRANDSIGHT_MIN_WEIGHT", defaults.min_weight),
            contested_weight: parsed_env("BRANDSIGHT_CONTESTED_WEIGHT", defaults.contested_weight),
            weak_ratio: parsed_env("BRANDSIGHT_WEAK_RATIO", defaults.weak_ratio),
            max_per_category: parsed_env("BRANDSIGHT_MAX_PER_CATEGORY", defaults.max_per_category),
            max_evidence_quotes: parsed_env(
                "BRANDSIGHT_MAX_EVIDENCE_QUOTES",
                defaults.max_evidence_quotes,
            ),
            evidence_pool_size: parsed_env(
                "BRANDSIGHT_EVIDENCE_POOL_SIZE",
                defaults.evidence_pool_size,
            ),
        }
    }
}

fn parsed_env<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a number")),
        Err(_) => default,
    }
}
