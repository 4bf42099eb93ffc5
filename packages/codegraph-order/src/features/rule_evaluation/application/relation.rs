//! Helpers shared by the relation evaluators

use crate::errors::OrderResult;
use crate::shared::models::{OccurrenceId, Operation};
use crate::shared::ports::OrderBackend;
use std::collections::BTreeSet;

/// Signature-matching occurrences of any of `ops`
pub(crate) fn matching_nodes(
    backend: &dyn OrderBackend,
    ops: &[Operation],
) -> OrderResult<BTreeSet<OccurrenceId>> {
    let mut nodes = BTreeSet::new();
    for op in ops {
        nodes.extend(backend.resolve_matching(op)?);
    }
    Ok(nodes)
}

/// Target-only occurrences of the distinct operations in `ops`
pub(crate) fn all_nodes(
    backend: &dyn OrderBackend,
    ops: &[Operation],
) -> OrderResult<BTreeSet<OccurrenceId>> {
    let distinct: BTreeSet<&Operation> = ops.iter().collect();
    let mut nodes = BTreeSet::new();
    for op in distinct {
        nodes.extend(backend.resolve(op)?);
    }
    Ok(nodes)
}

/// First occurrence of `candidates` satisfying `hit`, propagating backend errors
pub(crate) fn find_reachable(
    candidates: &BTreeSet<OccurrenceId>,
    mut hit: impl FnMut(OccurrenceId) -> OrderResult<bool>,
) -> OrderResult<Option<OccurrenceId>> {
    for &candidate in candidates {
        if hit(candidate)? {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

/// `a(..), b(..)` for messages
pub(crate) fn describe(ops: &[Operation]) -> String {
    ops.iter()
        .map(|op| op.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
