use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    /// Per-document and non-fatal: the engine skips the document and counts
    /// it, the batch continues.
    #[error("Malformed signal: {0}")]
    MalformedSignal(String),

    /// Fatal, raised before ingestion begins. No snapshot is produced.
    #[error("Invalid run parameters: {0}")]
    InvalidRunParameters(String),

    /// Fatal and defensive: signals a bug in the engine, not bad input.
    /// Aborts the run rather than emitting a corrupted snapshot.
    #[error("Internal invariant violation: {0}")]
    InvariantViolation(String),
}
