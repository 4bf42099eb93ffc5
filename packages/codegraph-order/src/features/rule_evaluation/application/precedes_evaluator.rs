/*
 * Precedes Evaluator
 *
 * Every signature-matching occurrence of `this` must be reachable from
 * at least one occurrence of `prev`.
 */

use super::relation::{describe, find_reachable, matching_nodes};
use crate::errors::OrderResult;
use crate::features::rule_evaluation::domain::{
    EvaluationContext, EvaluationResult, Finding, ViolationKind,
};
use crate::features::rule_evaluation::ports::Evaluator;
use crate::shared::models::Operation;
use crate::shared::ports::OrderBackend;

pub struct PrecedesEvaluator {
    prev_ops: Vec<Operation>,
    this_ops: Vec<Operation>,
    report_passing: bool,
}

impl PrecedesEvaluator {
    pub fn new(prev_ops: Vec<Operation>, this_ops: Vec<Operation>) -> Self {
        Self {
            prev_ops,
            this_ops,
            report_passing: false,
        }
    }

    pub fn report_passing(mut self, enabled: bool) -> Self {
        self.report_passing = enabled;
        self
    }
}

impl Evaluator for PrecedesEvaluator {
    fn name(&self) -> &'static str {
        "precedes"
    }

    fn evaluate(
        &self,
        context: &EvaluationContext,
        backend: &dyn OrderBackend,
    ) -> OrderResult<EvaluationResult> {
        let rule = &context.rule;
        let targets = matching_nodes(backend, &self.this_ops)?;
        let predecessors = matching_nodes(backend, &self.prev_ops)?;
        let arena = backend.arena();

        let mut findings = Vec::new();
        for &target in &targets {
            let preceded = find_reachable(&predecessors, |prev| {
                Ok(backend.reachable(prev, target)?)
            })?;

            match preceded {
                Some(prev) => {
                    if self.report_passing {
                        let message = rule.pass_text(|| {
                            format!(
                                "Complies with rule: \"{}\" precedes {}.",
                                arena.code_of(prev),
                                arena.code_of(target)
                            )
                        });
                        findings.push(
                            Finding::pass(rule, message)
                                .at(target)
                                .with_related(vec![prev]),
                        );
                    }
                }
                None => {
                    let message = rule.fail_text(|| {
                        format!(
                            "Violation against rule in execution path to \"{}\". It is not preceded by any of these calls: {}.",
                            arena.code_of(target),
                            describe(&self.prev_ops)
                        )
                    });
                    findings.push(
                        Finding::fail(ViolationKind::UnprecededOccurrence, rule, message)
                            .at(target),
                    );
                }
            }
        }

        Ok(EvaluationResult::from_findings(findings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::rule_evaluation::domain::RuleMetadata;
    use crate::features::rule_evaluation::infrastructure::InMemoryBackend;
    use crate::shared::models::Occurrence;

    #[test]
    fn test_precedes() {
        let mut backend = InMemoryBackend::new();
        let init = backend.add_occurrence(Occurrence::new("Cipher.init", "c.init()"));
        let ok = backend.add_occurrence(Occurrence::new("Cipher.update", "c.update(a)"));
        let orphan = backend.add_occurrence(Occurrence::new("Cipher.update", "c.update(b)"));
        backend.add_flow(init, ok).unwrap();
        backend.add_flow(orphan, init).unwrap();

        let evaluator = PrecedesEvaluator::new(
            vec![Operation::any("Cipher.init")],
            vec![Operation::any("Cipher.update")],
        );
        let result = evaluator
            .evaluate(&EvaluationContext::new(RuleMetadata::new("InitFirst")), &backend)
            .unwrap();

        assert!(!result.outcome);
        let failures: Vec<_> = result.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].location, Some(orphan));
        assert_eq!(
            failures[0].message,
            "Violation against rule in execution path to \"c.update(b)\". It is not preceded by any of these calls: Cipher.init(..)."
        );
    }

    #[test]
    fn test_no_targets_is_satisfied() {
        let backend = InMemoryBackend::new();
        let evaluator = PrecedesEvaluator::new(vec![Operation::any("A")], vec![Operation::any("B")])
            .report_passing(true);
        let result = evaluator
            .evaluate(&EvaluationContext::default(), &backend)
            .unwrap();
        assert!(result.outcome);
        assert!(result.findings.is_empty());
    }
}
