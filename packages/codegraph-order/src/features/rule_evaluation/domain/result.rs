//! Evaluation result

use super::finding::{Finding, FindingKind};
use serde::{Deserialize, Serialize};

/// Outcome of one rule evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// `true` iff no `Fail` finding was produced
    pub outcome: bool,
    pub findings: Vec<Finding>,
}

impl EvaluationResult {
    /// Derive the outcome from the findings
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        let outcome = !findings.iter().any(Finding::is_failure);
        Self { outcome, findings }
    }

    /// Satisfied with no findings
    pub fn satisfied() -> Self {
        Self {
            outcome: true,
            findings: Vec::new(),
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.kind == FindingKind::Fail)
    }

    pub fn passes(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.kind == FindingKind::Pass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::rule_evaluation::domain::{RuleMetadata, ViolationKind};

    #[test]
    fn test_outcome_follows_failures() {
        let rule = RuleMetadata::new("r");
        let result = EvaluationResult::from_findings(vec![Finding::pass(&rule, "ok")]);
        assert!(result.outcome);
        assert_eq!(result.passes().count(), 1);

        let result = EvaluationResult::from_findings(vec![
            Finding::pass(&rule, "ok"),
            Finding::fail(ViolationKind::ForbiddenCall, &rule, "bad"),
        ]);
        assert!(!result.outcome);
        assert_eq!(result.failures().count(), 1);
    }

    #[test]
    fn test_empty_is_satisfied() {
        assert_eq!(EvaluationResult::from_findings(vec![]), EvaluationResult::satisfied());
    }
}
