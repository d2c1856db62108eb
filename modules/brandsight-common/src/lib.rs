pub mod config;
pub mod error;
pub mod snapshot;
pub mod types;

pub use config::EngineConfig;
pub use error::InsightError;
pub use snapshot::*;
pub use types::*;
