pub mod ordering;
pub mod rule_evaluation;
