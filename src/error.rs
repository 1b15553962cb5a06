//! Error taxonomy for the stats engine.
//!
//! Registration and lookup failures are recoverable and surfaced to the
//! caller before or after a run. A hook fault is fatal to the run in
//! progress: partial aggregation must not be mistaken for a result.

use crate::client::ClientError;
use crate::models::Position;
use thiserror::Error;

/// Errors produced by the core engine and its analyzers.
#[derive(Debug, Error)]
pub enum StatsError {
    /// An analyzer with the same identity is already registered.
    #[error("analyzer `{0}` is already registered")]
    DuplicateAnalyzer(String),

    /// Lookup of an identity that was never registered.
    #[error("no analyzer registered under `{0}`")]
    UnknownAnalyzer(String),

    /// A loosely-typed option value could not be coerced to an integer.
    #[error("expected an integer-like value, got `{0}`")]
    TypeMismatch(String),

    /// A subcategory outside an analyzer's declared whitelist.
    #[error("`{0}` is not a valid subcategory")]
    InvalidSubcategory(String),

    /// An analyzer hook failed mid-run. The run is aborted and the
    /// hierarchy position at the time of the fault is attached.
    #[error("analyzer `{analyzer}` failed while processing {position}")]
    HookFault {
        analyzer: String,
        position: Position,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A platform client failure, propagated as-is. Retry and re-auth
    /// policy belongs to the client, not the engine.
    #[error(transparent)]
    Client(#[from] ClientError),
}
