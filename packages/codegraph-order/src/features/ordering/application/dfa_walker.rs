/*
 * DFA Order Walker
 *
 * Replays one base's trace against a compiled DFA.
 *
 * # State Machine
 * ```text
 * NotStarted ──tok──▶ At(q) ──tok──▶ At(q') ...
 *      │                 │
 *      └─────no δ────────┴──no δ──▶ Rejected (absorbing)
 * ```
 * - A token without a transition yields one `MissingTransition` finding;
 *   the walk moves to `Rejected` and keeps consuming the remaining tokens
 *   without reporting them.
 * - At the end of a non-empty trace, a non-accepting `At(q)` yields one
 *   `NonAcceptingTermination` finding. An empty trace yields nothing.
 *
 * The walker never fails: violations are data.
 */

use crate::features::ordering::domain::{Dfa, DfaStateId, Trace, TraceStep, END_TOKEN};
use crate::features::rule_evaluation::domain::{Finding, RuleMetadata, ViolationKind};
use crate::shared::models::{Base, OccurrenceArena, OccurrenceId};
use tracing::debug;

/// Walk position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    /// No token consumed yet
    NotStarted,

    /// Current DFA state
    At(DfaStateId),

    /// An invalid transition happened while in state `at`
    Rejected { at: DfaStateId },
}

/// Outcome of one base walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseWalk {
    pub base: Base,
    pub state: WalkState,

    /// Tokens consumed, including those after rejection
    pub consumed: usize,

    /// Trace ended in an accepting state without rejection
    pub accepted: bool,

    pub findings: Vec<Finding>,
}

impl BaseWalk {
    pub fn is_rejected(&self) -> bool {
        matches!(self.state, WalkState::Rejected { .. })
    }

    pub fn has_failures(&self) -> bool {
        self.findings.iter().any(Finding::is_failure)
    }
}

/// Trace evaluator for one compiled rule
pub struct DfaOrderWalker<'a> {
    dfa: &'a Dfa,
    rule: &'a RuleMetadata,
    report_passing: bool,
}

impl<'a> DfaOrderWalker<'a> {
    pub fn new(dfa: &'a Dfa, rule: &'a RuleMetadata) -> Self {
        Self {
            dfa,
            rule,
            report_passing: false,
        }
    }

    /// Also emit a `Pass` finding for every correctly used base
    pub fn report_passing(mut self, enabled: bool) -> Self {
        self.report_passing = enabled;
        self
    }

    pub fn walk(&self, trace: &Trace, arena: &OccurrenceArena) -> BaseWalk {
        let mut state = WalkState::NotStarted;
        let mut findings = Vec::new();

        for step in &trace.steps {
            let current = match state {
                WalkState::NotStarted => self.dfa.start(),
                WalkState::At(q) => q,
                WalkState::Rejected { .. } => continue,
            };
            state = match self.dfa.next(current, &step.token) {
                Some(next) => WalkState::At(next),
                None => {
                    findings.push(self.missing_transition(trace, step, current, arena));
                    WalkState::Rejected { at: current }
                }
            };
        }

        let accepted = matches!(state, WalkState::At(q) if self.dfa.is_accepting(q));
        if let (WalkState::At(q), Some(last)) = (state, trace.steps.last()) {
            if accepted {
                if self.report_passing {
                    findings.push(self.passed(trace, last));
                }
            } else {
                findings.push(self.not_terminated(trace, last, q));
            }
        }

        debug!(
            base = %trace.base,
            tokens = trace.len(),
            accepted,
            findings = findings.len(),
            "Walked base trace"
        );

        BaseWalk {
            base: trace.base.clone(),
            state,
            consumed: trace.len(),
            accepted,
            findings,
        }
    }

    fn missing_transition(
        &self,
        trace: &Trace,
        step: &TraceStep,
        at: DfaStateId,
        arena: &OccurrenceArena,
    ) -> Finding {
        let expected = self.dfa.expected_next(at);
        let message = self.rule.fail_text(|| {
            let code = arena.code_of(step.occurrence);
            if expected.len() == 1 && expected[0] == END_TOKEN {
                format!(
                    "Violation against Order: \"{}\". Op \"{}\" is not allowed. No other calls are allowed on this base.",
                    code, step.token
                )
            } else {
                format!(
                    "Violation against Order: \"{}\". Op \"{}\" is not allowed. Expected one of: {}",
                    code,
                    step.token,
                    expected.join(", ")
                )
            }
        });

        Finding::fail(ViolationKind::MissingTransition, self.rule, message)
            .at(step.occurrence)
            .on_base(trace.base.clone())
            .expecting(expected)
            .with_related(related(trace, step.occurrence))
    }

    fn not_terminated(&self, trace: &Trace, last: &TraceStep, at: DfaStateId) -> Finding {
        let expected = self.dfa.expected_next(at);
        let message = self.rule.fail_text(|| {
            format!(
                "Violation against Order: Base {} is not correctly terminated. Expected one of [{}] to follow the correct last call on this base.",
                trace.base,
                expected.join(", ")
            )
        });

        Finding::fail(ViolationKind::NonAcceptingTermination, self.rule, message)
            .at(last.occurrence)
            .on_base(trace.base.clone())
            .expecting(expected)
            .with_related(related(trace, last.occurrence))
    }

    fn passed(&self, trace: &Trace, last: &TraceStep) -> Finding {
        let message = self
            .rule
            .pass_text(|| format!("Order validated: {} is used correctly.", trace.base));

        Finding::pass(self.rule, message)
            .at(last.occurrence)
            .on_base(trace.base.clone())
            .with_related(related(trace, last.occurrence))
    }
}

/// Occurrences of `trace` other than `location`, in trace order
fn related(trace: &Trace, location: OccurrenceId) -> Vec<OccurrenceId> {
    trace.occurrences().filter(|&occ| occ != location).collect()
}
