//! Evaluation context
//!
//! Binds a rule's declared parameters to concrete instances providing
//! operations. Tokens are resolved through the explicit
//! [`OperationTable`] of each instance.

use super::finding::RuleMetadata;
use crate::features::ordering::domain::OrderToken;
use crate::shared::models::{Operation, OperationTable};
use std::collections::BTreeMap;

/// A concrete instance bound to a rule parameter (e.g. a `Cipher` model)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelInstance {
    pub name: String,
    pub operations: OperationTable,
}

impl ModelInstance {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: OperationTable::new(),
        }
    }

    pub fn with_operation(mut self, token: impl Into<OrderToken>, operation: Operation) -> Self {
        self.operations.insert(token.into(), operation);
        self
    }

    pub fn operation(&self, token: &OrderToken) -> Option<&Operation> {
        self.operations.get(token)
    }
}

/// Per-evaluation binding of a rule to concrete instances
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    pub rule: RuleMetadata,

    /// parameter name → bound instance
    pub parameters: BTreeMap<String, ModelInstance>,
}

impl EvaluationContext {
    pub fn new(rule: RuleMetadata) -> Self {
        Self {
            rule,
            parameters: BTreeMap::new(),
        }
    }

    /// Bind `instance` to `parameter`, replacing any previous binding
    pub fn bind(mut self, parameter: impl Into<String>, instance: ModelInstance) -> Self {
        self.parameters.insert(parameter.into(), instance);
        self
    }

    pub fn instance(&self, parameter: &str) -> Option<&ModelInstance> {
        self.parameters.get(parameter)
    }

    /// Union of all bound tables
    ///
    /// Parameters are merged in name order; a token bound by several
    /// instances keeps the binding of the last parameter.
    pub fn operation_table(&self) -> OperationTable {
        let mut table = OperationTable::new();
        for instance in self.parameters.values() {
            table.extend(
                instance
                    .operations
                    .iter()
                    .map(|(token, op)| (token.clone(), op.clone())),
            );
        }
        table
    }
}
