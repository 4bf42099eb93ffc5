/*
 * Rule Evaluation Application Layer
 *
 * Evaluators:
 * - OrderEvaluator: call order per base instance (DFA walk)
 * - FollowsEvaluator / PrecedesEvaluator: execution-flow relations
 * - OnlyEvaluator / NeverEvaluator: allowed and forbidden calls
 */

mod follows_evaluator;
mod never_evaluator;
mod only_evaluator;
mod order_evaluator;
mod precedes_evaluator;
mod relation;

pub use follows_evaluator::FollowsEvaluator;
pub use never_evaluator::NeverEvaluator;
pub use only_evaluator::OnlyEvaluator;
pub use order_evaluator::{BaseSelection, OrderEvaluator};
pub use precedes_evaluator::PrecedesEvaluator;
