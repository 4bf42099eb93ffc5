//! Backend port
//!
//! The seam between abstract operations and the call graph of the analyzed
//! program. Evaluators only ever talk to a `dyn OrderBackend`:
//! - `resolve`: every call to an operation's target, signature ignored
//! - `resolve_matching`: calls that additionally satisfy the signature
//! - `reachable`: execution-flow reachability between two occurrences
//! - `trace_for`: ordered occurrences of the bound operations on one base
//!
//! Implementations return occurrence ids from their own
//! [`OccurrenceArena`]. Sets are `BTreeSet` so every caller iterates them in
//! a stable order.

use crate::features::ordering::domain::Trace;
use crate::shared::models::{Base, OccurrenceArena, OccurrenceId, Operation, OperationTable};
use std::collections::BTreeSet;
use thiserror::Error;

/// Failure raised by a backend query
#[derive(Debug, Error)]
pub enum BackendError {
    /// The query could not be answered
    #[error("Backend query failed: {0}")]
    Query(String),

    /// An occurrence id does not belong to this backend's arena
    #[error("Unknown occurrence {0}")]
    UnknownOccurrence(OccurrenceId),

    /// Any other error raised by the implementation
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl BackendError {
    pub fn query(msg: impl Into<String>) -> Self {
        BackendError::Query(msg.into())
    }
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Capability-bearing collaborator the evaluators depend on
pub trait OrderBackend: Send + Sync {
    /// Arena holding every occurrence this backend hands out
    fn arena(&self) -> &OccurrenceArena;

    /// All occurrences calling the operation's target, irrespective of signature
    fn resolve(&self, operation: &Operation) -> BackendResult<BTreeSet<OccurrenceId>>;

    /// Occurrences additionally satisfying the operation's signature
    fn resolve_matching(&self, operation: &Operation) -> BackendResult<BTreeSet<OccurrenceId>>;

    /// Whether execution can flow from `from` to `to`
    fn reachable(&self, from: OccurrenceId, to: OccurrenceId) -> BackendResult<bool>;

    /// Ordered occurrences of the bound operations on `base`
    fn trace_for(&self, base: &Base, operations: &OperationTable) -> BackendResult<Trace>;
}
