/*
 * Never Evaluator
 *
 * Signature-matching calls to a forbidden operation are violations. Calls
 * to the same targets with a different signature comply.
 */

use super::relation::{all_nodes, describe, matching_nodes};
use crate::errors::OrderResult;
use crate::features::rule_evaluation::domain::{
    EvaluationContext, EvaluationResult, Finding, ViolationKind,
};
use crate::features::rule_evaluation::ports::Evaluator;
use crate::shared::models::Operation;
use crate::shared::ports::OrderBackend;

pub struct NeverEvaluator {
    forbidden: Vec<Operation>,
    report_passing: bool,
}

impl NeverEvaluator {
    pub fn new(forbidden: Vec<Operation>) -> Self {
        Self {
            forbidden,
            report_passing: false,
        }
    }

    pub fn report_passing(mut self, enabled: bool) -> Self {
        self.report_passing = enabled;
        self
    }
}

impl Evaluator for NeverEvaluator {
    fn name(&self) -> &'static str {
        "never"
    }

    fn evaluate(
        &self,
        context: &EvaluationContext,
        backend: &dyn OrderBackend,
    ) -> OrderResult<EvaluationResult> {
        let rule = &context.rule;
        let violating = matching_nodes(backend, &self.forbidden)?;
        let all = all_nodes(backend, &self.forbidden)?;
        let arena = backend.arena();

        let mut findings = Vec::new();
        for &node in &violating {
            let message = format!(
                "Violation against rule: \"{}\". {}",
                arena.code_of(node),
                rule.fail_text(|| format!(
                    "Calls to {} are not allowed.",
                    describe(&self.forbidden)
                ))
            );
            findings.push(Finding::fail(ViolationKind::ForbiddenCall, rule, message).at(node));
        }

        if self.report_passing {
            for &node in all.difference(&violating) {
                let message = format!(
                    "Complies with rule: \"{}\". {}",
                    arena.code_of(node),
                    rule.pass_text(|| {
                        format!(
                            "No calls to {} found which is in compliance with rule.",
                            describe(&self.forbidden)
                        )
                    })
                );
                findings.push(Finding::pass(rule, message).at(node));
            }
        }

        Ok(EvaluationResult::from_findings(findings))
    }
}
