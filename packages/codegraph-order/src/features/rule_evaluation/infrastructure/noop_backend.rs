//! Backend that knows no occurrences

use crate::features::ordering::domain::Trace;
use crate::shared::models::{Base, OccurrenceArena, OccurrenceId, Operation, OperationTable};
use crate::shared::ports::{BackendResult, OrderBackend};
use std::collections::BTreeSet;

/// Resolves nothing, reaches nothing, yields empty traces
#[derive(Debug, Default)]
pub struct NoopBackend {
    arena: OccurrenceArena,
}

impl NoopBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderBackend for NoopBackend {
    fn arena(&self) -> &OccurrenceArena {
        &self.arena
    }

    fn resolve(&self, _operation: &Operation) -> BackendResult<BTreeSet<OccurrenceId>> {
        Ok(BTreeSet::new())
    }

    fn resolve_matching(&self, _operation: &Operation) -> BackendResult<BTreeSet<OccurrenceId>> {
        Ok(BTreeSet::new())
    }

    fn reachable(&self, _from: OccurrenceId, _to: OccurrenceId) -> BackendResult<bool> {
        Ok(false)
    }

    fn trace_for(&self, base: &Base, _operations: &OperationTable) -> BackendResult<Trace> {
        Ok(Trace::new(base.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_backend_is_empty() {
        let backend = NoopBackend::new();
        let op = Operation::any("X.f");
        assert!(backend.resolve(&op).unwrap().is_empty());
        assert!(backend.resolve_matching(&op).unwrap().is_empty());
        assert!(!backend.reachable(OccurrenceId(0), OccurrenceId(1)).unwrap());
        assert!(backend
            .trace_for(&Base::new("b"), &OperationTable::new())
            .unwrap()
            .is_empty());
        assert!(backend.arena().is_empty());
    }
}
