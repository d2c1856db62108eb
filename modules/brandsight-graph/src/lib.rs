pub mod aggregate;
pub mod classify;
pub mod engine;
pub mod evidence;
pub mod normalize;
pub mod quadrant;
pub mod store;

pub use aggregate::{finalize, EdgeStats, TopicRollup};
pub use classify::ClassifiedInsights;
pub use engine::InsightEngine;
pub use normalize::{canonicalize_topic, normalize_document, NormalizedDocument};
pub use store::{EntityRoster, GraphEdge, InsightGraph, QuoteCandidate};
