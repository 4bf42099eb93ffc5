/*
 * Rule Evaluation Domain Models
 */

mod context;
mod finding;
mod result;

pub use context::{EvaluationContext, ModelInstance};
pub use finding::{Finding, FindingKind, RuleMetadata, Severity, ViolationKind};
pub use result::EvaluationResult;
