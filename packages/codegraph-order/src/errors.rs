//! Error types for codegraph-order
//!
//! Construction and compilation errors are fatal to the rule being
//! evaluated. Order violations are never errors: they are reported as
//! findings inside an [`EvaluationResult`](crate::features::rule_evaluation::EvaluationResult).

use crate::config::ConfigError;
use crate::features::ordering::domain::QuantifierKind;
use crate::features::ordering::infrastructure::RuleSpecError;
use crate::shared::ports::BackendError;
use thiserror::Error;

/// Malformed expression tree detected while building it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// A group or set was closed without any element
    #[error("Groups and sets must have at least one element")]
    EmptyGroup,

    /// `exactly`, `between` and `atLeast` need a numeric bound
    #[error("Quantifier '{kind}' requires a bound")]
    MissingQuantifierBound { kind: QuantifierKind },
}

/// Main error type for codegraph-order operations
#[derive(Debug, Error)]
pub enum OrderError {
    /// Expression tree could not be built
    #[error("Construction error: {0}")]
    Construction(#[from] ConstructionError),

    /// Expression tree is internally inconsistent (e.g. `min > max`)
    #[error("Invalid specification: {0}")]
    InvalidSpecification(String),

    /// Automaton grew beyond the configured size guard
    #[error("Automaton limit exceeded: {reached} states (limit {limit})")]
    AutomatonLimit { limit: usize, reached: usize },

    /// Rule document could not be loaded
    #[error(transparent)]
    RuleSpec(#[from] RuleSpecError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failure raised by the backend, passed through untouched
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl OrderError {
    /// Create an invalid specification error
    pub fn invalid(msg: impl Into<String>) -> Self {
        OrderError::InvalidSpecification(msg.into())
    }

    /// Whether the error means the rule itself is malformed
    pub fn is_specification_error(&self) -> bool {
        matches!(
            self,
            OrderError::Construction(_)
                | OrderError::InvalidSpecification(_)
                | OrderError::AutomatonLimit { .. }
                | OrderError::RuleSpec(_)
        )
    }
}

/// Result type alias for order operations
pub type OrderResult<T> = std::result::Result<T, OrderError>;
