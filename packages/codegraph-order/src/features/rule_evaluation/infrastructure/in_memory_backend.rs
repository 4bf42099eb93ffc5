/*
 * In-Memory Backend
 *
 * Occurrence arena plus an execution-flow graph. Used by tests and by
 * callers that extract calls themselves and only need the checks.
 *
 * # Matching
 * - `resolve`: target equality
 * - `resolve_matching`: target equality and, when the operation has a
 *   signature, one pattern per argument
 *
 * # Reachability
 * Path of length >= 1 in the flow graph: an occurrence only reaches itself
 * through a cycle.
 */

use crate::features::ordering::domain::{OrderToken, Trace};
use crate::shared::models::{
    Argument, ArgumentPattern, Base, Occurrence, OccurrenceArena, OccurrenceId, Operation,
    OperationTable,
};
use crate::shared::ports::{BackendError, BackendResult, OrderBackend};
use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::BTreeSet;

/// Graph-backed backend holding everything in memory
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    arena: OccurrenceArena,

    /// Execution flow between occurrences
    flow: DiGraph<OccurrenceId, ()>,

    /// Occurrence index → graph node
    nodes: Vec<NodeIndex>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_occurrence(&mut self, occurrence: Occurrence) -> OccurrenceId {
        let id = self.arena.alloc(occurrence);
        let node = self.flow.add_node(id);
        self.nodes.push(node);
        id
    }

    /// Record that execution can flow directly from `from` to `to`
    pub fn add_flow(&mut self, from: OccurrenceId, to: OccurrenceId) -> BackendResult<()> {
        let from = self.node(from)?;
        let to = self.node(to)?;
        self.flow.update_edge(from, to, ());
        Ok(())
    }

    /// `add_flow` between consecutive ids
    pub fn add_flow_chain(&mut self, chain: &[OccurrenceId]) -> BackendResult<()> {
        for pair in chain.windows(2) {
            self.add_flow(pair[0], pair[1])?;
        }
        Ok(())
    }

    pub fn flow_edge_count(&self) -> usize {
        self.flow.edge_count()
    }

    fn node(&self, id: OccurrenceId) -> BackendResult<NodeIndex> {
        self.nodes
            .get(id.index())
            .copied()
            .ok_or(BackendError::UnknownOccurrence(id))
    }

    fn occurrence(&self, id: OccurrenceId) -> BackendResult<&Occurrence> {
        self.arena.get(id).ok_or(BackendError::UnknownOccurrence(id))
    }
}

/// Whether `occurrence` satisfies `operation`'s target and signature
pub fn matches_operation(operation: &Operation, occurrence: &Occurrence) -> bool {
    if occurrence.target != operation.target {
        return false;
    }
    match &operation.signature {
        None => true,
        Some(patterns) => {
            patterns.len() == occurrence.arguments.len()
                && patterns
                    .iter()
                    .zip(&occurrence.arguments)
                    .all(|(pattern, argument)| matches_argument(pattern, argument))
        }
    }
}

fn matches_argument(pattern: &ArgumentPattern, argument: &Argument) -> bool {
    match pattern {
        ArgumentPattern::Wildcard => true,
        ArgumentPattern::Value(expected) => argument.value.as_deref() == Some(expected.as_str()),
        ArgumentPattern::Type(expected) => {
            argument.type_name.as_deref() == Some(expected.as_str())
        }
        ArgumentPattern::OneOf(values) => argument
            .value
            .as_ref()
            .map(|value| values.contains(value))
            .unwrap_or(false),
    }
}

impl OrderBackend for InMemoryBackend {
    fn arena(&self) -> &OccurrenceArena {
        &self.arena
    }

    fn resolve(&self, operation: &Operation) -> BackendResult<BTreeSet<OccurrenceId>> {
        Ok(self
            .arena
            .by_target(&operation.target)
            .iter()
            .copied()
            .collect())
    }

    fn resolve_matching(&self, operation: &Operation) -> BackendResult<BTreeSet<OccurrenceId>> {
        let mut matching = BTreeSet::new();
        for &id in self.arena.by_target(&operation.target) {
            if matches_operation(operation, self.occurrence(id)?) {
                matching.insert(id);
            }
        }
        Ok(matching)
    }

    fn reachable(&self, from: OccurrenceId, to: OccurrenceId) -> BackendResult<bool> {
        let from = self.node(from)?;
        let to = self.node(to)?;
        Ok(self
            .flow
            .neighbors_directed(from, Direction::Outgoing)
            .any(|next| has_path_connecting(&self.flow, next, to, None)))
    }

    fn trace_for(&self, base: &Base, operations: &OperationTable) -> BackendResult<Trace> {
        let mut steps: Vec<(u32, OccurrenceId, &OrderToken)> = Vec::new();
        for (id, occurrence) in self.arena.iter() {
            if occurrence.base.as_ref() != Some(base) {
                continue;
            }
            // first token in table order wins when several operations match
            if let Some((token, _)) = operations
                .iter()
                .find(|(_, op)| matches_operation(op, occurrence))
            {
                steps.push((occurrence.position, id, token));
            }
        }
        steps.sort_by_key(|&(position, id, _)| (position, id));

        let mut trace = Trace::new(base.clone());
        for (position, id, token) in steps {
            trace.push(id, token.clone(), position);
        }
        Ok(trace)
    }
}
