//! Per-base traces of resolved operation occurrences

use super::order_node::OrderToken;
use crate::shared::models::{Base, OccurrenceId};
use serde::{Deserialize, Serialize};

/// One observed operation occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    pub occurrence: OccurrenceId,
    pub token: OrderToken,
    pub position: u32,
}

/// Ordered occurrences on one base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub base: Base,
    pub steps: Vec<TraceStep>,
}

impl Trace {
    pub fn new(base: Base) -> Self {
        Self {
            base,
            steps: Vec::new(),
        }
    }

    pub fn push(&mut self, occurrence: OccurrenceId, token: impl Into<OrderToken>, position: u32) {
        self.steps.push(TraceStep {
            occurrence,
            token: token.into(),
            position,
        });
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &OrderToken> {
        self.steps.iter().map(|step| &step.token)
    }

    pub fn occurrences(&self) -> impl Iterator<Item = OccurrenceId> + '_ {
        self.steps.iter().map(|step| step.occurrence)
    }
}
