/*
 * Follows Evaluator
 *
 * Every signature-matching occurrence of an `if` operation must reach at
 * least one occurrence of a `then` operation along execution flow.
 * No `if` occurrence means the rule holds.
 */

use super::relation::{describe, find_reachable, matching_nodes};
use crate::errors::OrderResult;
use crate::features::rule_evaluation::domain::{
    EvaluationContext, EvaluationResult, Finding, ViolationKind,
};
use crate::features::rule_evaluation::ports::Evaluator;
use crate::shared::models::Operation;
use crate::shared::ports::OrderBackend;
use tracing::debug;

pub struct FollowsEvaluator {
    if_ops: Vec<Operation>,
    then_ops: Vec<Operation>,
    report_passing: bool,
}

impl FollowsEvaluator {
    pub fn new(if_ops: Vec<Operation>, then_ops: Vec<Operation>) -> Self {
        Self {
            if_ops,
            then_ops,
            report_passing: false,
        }
    }

    pub fn report_passing(mut self, enabled: bool) -> Self {
        self.report_passing = enabled;
        self
    }
}

impl Evaluator for FollowsEvaluator {
    fn name(&self) -> &'static str {
        "follows"
    }

    fn evaluate(
        &self,
        context: &EvaluationContext,
        backend: &dyn OrderBackend,
    ) -> OrderResult<EvaluationResult> {
        let rule = &context.rule;
        let sources = matching_nodes(backend, &self.if_ops)?;
        let targets = matching_nodes(backend, &self.then_ops)?;
        debug!(
            rule = %rule.name,
            sources = sources.len(),
            targets = targets.len(),
            "Evaluating follows rule"
        );

        let arena = backend.arena();
        let mut findings = Vec::new();
        for &source in &sources {
            let followed = find_reachable(&targets, |target| {
                Ok(backend.reachable(source, target)?)
            })?;

            match followed {
                Some(target) => {
                    if self.report_passing {
                        let message = rule.pass_text(|| {
                            format!(
                                "Complies with rule: \"{}\" is followed by \"{}\".",
                                arena.code_of(source),
                                arena.code_of(target)
                            )
                        });
                        findings.push(
                            Finding::pass(rule, message)
                                .at(source)
                                .with_related(vec![target]),
                        );
                    }
                }
                None => {
                    let message = rule.fail_text(|| {
                        format!(
                            "Violation against rule in execution path from \"{}\". It is not followed by any of these calls: {}.",
                            arena.code_of(source),
                            describe(&self.then_ops)
                        )
                    });
                    findings.push(
                        Finding::fail(ViolationKind::UnfollowedOccurrence, rule, message)
                            .at(source),
                    );
                }
            }
        }

        Ok(EvaluationResult::from_findings(findings))
    }
}
