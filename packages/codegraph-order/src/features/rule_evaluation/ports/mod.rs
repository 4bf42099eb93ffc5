/*
 * Rule Evaluation Ports
 *
 * Interfaces for plugging evaluators into a rule runner.
 */

use crate::errors::OrderResult;
use crate::features::rule_evaluation::domain::{EvaluationContext, EvaluationResult};
use crate::shared::ports::OrderBackend;

/// One kind of rule check
///
/// Evaluations are pure functions of the evaluator's configuration, the
/// context and what the backend answers. Backend failures are returned
/// unchanged.
pub trait Evaluator: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    fn evaluate(
        &self,
        context: &EvaluationContext,
        backend: &dyn OrderBackend,
    ) -> OrderResult<EvaluationResult>;
}
