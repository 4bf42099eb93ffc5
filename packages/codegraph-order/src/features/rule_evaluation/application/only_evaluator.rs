/*
 * Only Evaluator
 *
 * Every call to one of the listed targets must also satisfy one of the
 * listed signatures.
 *
 * - correct: union of `resolve_matching` over all operations
 * - all:     union of `resolve` over the distinct operations
 *
 * The rule holds iff both sets are equal; every occurrence in
 * `all \ correct` is reported.
 */

use super::relation::{all_nodes, describe, matching_nodes};
use crate::errors::OrderResult;
use crate::features::rule_evaluation::domain::{
    EvaluationContext, EvaluationResult, Finding, ViolationKind,
};
use crate::features::rule_evaluation::ports::Evaluator;
use crate::shared::models::Operation;
use crate::shared::ports::OrderBackend;
use tracing::debug;

pub struct OnlyEvaluator {
    ops: Vec<Operation>,
    report_passing: bool,
}

impl OnlyEvaluator {
    pub fn new(ops: Vec<Operation>) -> Self {
        Self {
            ops,
            report_passing: false,
        }
    }

    pub fn report_passing(mut self, enabled: bool) -> Self {
        self.report_passing = enabled;
        self
    }
}

impl Evaluator for OnlyEvaluator {
    fn name(&self) -> &'static str {
        "only"
    }

    fn evaluate(
        &self,
        context: &EvaluationContext,
        backend: &dyn OrderBackend,
    ) -> OrderResult<EvaluationResult> {
        let rule = &context.rule;
        let correct = matching_nodes(backend, &self.ops)?;
        let all = all_nodes(backend, &self.ops)?;
        let arena = backend.arena();

        let mut findings = Vec::new();
        for &node in all.difference(&correct) {
            let message = format!(
                "Violation against rule: \"{}\". {}",
                arena.code_of(node),
                rule.fail_text(|| format!("Only calls to {} allowed.", describe(&self.ops)))
            );
            findings.push(
                Finding::fail(ViolationKind::DisallowedSignature, rule, message).at(node),
            );
        }

        if self.report_passing {
            for &node in &correct {
                let message = format!(
                    "Complies with rule: \"{}\". {}",
                    arena.code_of(node),
                    rule.pass_text(|| "Call is in compliance with rule".to_string())
                );
                findings.push(Finding::pass(rule, message).at(node));
            }
        }

        let outcome = correct == all;
        debug!(
            rule = %rule.name,
            correct = correct.len(),
            all = all.len(),
            outcome,
            "Evaluated only rule"
        );

        Ok(EvaluationResult { outcome, findings })
    }
}
