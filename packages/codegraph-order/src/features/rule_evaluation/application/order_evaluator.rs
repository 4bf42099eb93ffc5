/*
 * Order Evaluator
 *
 * Checks that calls on each base instance follow an order rule.
 *
 * # Flow
 * 1. Compile the rule (or fetch it from a shared `DfaCache`)
 * 2. Merge the context's bound operations with the rule's own bindings
 *    (the rule's bindings win)
 * 3. Select bases: explicit list, bases of a base operation's
 *    occurrences, or every base known to the backend
 * 4. Per base: `trace_for` → `DfaOrderWalker::walk`
 * 5. Concatenate findings in base order
 *
 * Bases are independent; with `parallel_bases` they are walked on the
 * rayon pool and collected back in base order.
 */

use crate::config::EvaluationConfig;
use crate::errors::{OrderError, OrderResult};
use crate::features::ordering::application::{BaseWalk, DfaCache, DfaOrderWalker, OrderCompiler};
use crate::features::ordering::domain::{Dfa, Order, OrderNode, OrderToken};
use crate::features::rule_evaluation::domain::{
    EvaluationContext, EvaluationResult, Finding, RuleMetadata,
};
use crate::features::rule_evaluation::ports::Evaluator;
use crate::shared::models::{Base, OperationTable};
use crate::shared::ports::OrderBackend;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Which receiver instances an order rule is checked on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseSelection {
    /// Exactly these bases
    Explicit(Vec<Base>),

    /// Bases of the signature-matching occurrences of this token
    /// (typically the constructor)
    FromOperation(OrderToken),

    /// Every base present in the backend's arena
    AllInstances,
}

/// Order rule check
pub struct OrderEvaluator {
    order: Order,
    bases: BaseSelection,
    config: EvaluationConfig,
    cache: Option<Arc<DfaCache>>,
}

impl OrderEvaluator {
    pub fn new(order: Order) -> Self {
        Self {
            order,
            bases: BaseSelection::AllInstances,
            config: EvaluationConfig::default(),
            cache: None,
        }
    }

    pub fn with_bases(mut self, bases: BaseSelection) -> Self {
        self.bases = bases;
        self
    }

    pub fn with_config(mut self, config: EvaluationConfig) -> Self {
        self.config = config;
        self
    }

    /// Share compiled automata with other evaluators
    pub fn with_cache(mut self, cache: Arc<DfaCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    fn dfa(&self) -> OrderResult<Arc<Dfa>> {
        match &self.cache {
            Some(cache) => cache.get_or_compile(self.order.root()),
            None => {
                let compiler = OrderCompiler::new(self.config.compiler_limits());
                Ok(Arc::new(compiler.compile(self.order.root())?))
            }
        }
    }

    fn operation_table(&self, context: &EvaluationContext) -> OperationTable {
        let mut table = context.operation_table();
        table.extend(
            self.order
                .operations()
                .iter()
                .map(|(token, op)| (token.clone(), op.clone())),
        );
        table
    }

    /// Every token of the rule must resolve to an operation
    fn check_bound(root: &OrderNode, table: &OperationTable) -> OrderResult<()> {
        match root.tokens().into_iter().find(|token| !table.contains_key(*token)) {
            Some(token) => Err(OrderError::invalid(format!(
                "Token '{}' is not bound to an operation",
                token
            ))),
            None => Ok(()),
        }
    }

    fn select_bases(
        &self,
        table: &OperationTable,
        backend: &dyn OrderBackend,
    ) -> OrderResult<Vec<Base>> {
        let bases: BTreeSet<Base> = match &self.bases {
            BaseSelection::Explicit(bases) => return Ok(bases.clone()),
            BaseSelection::FromOperation(token) => {
                let operation = table.get(token).ok_or_else(|| {
                    OrderError::invalid(format!("Base operation '{}' is not bound", token))
                })?;
                backend
                    .resolve_matching(operation)?
                    .into_iter()
                    .filter_map(|id| backend.arena().get(id).and_then(|occ| occ.base.clone()))
                    .collect()
            }
            BaseSelection::AllInstances => backend.arena().bases(),
        };
        Ok(bases.into_iter().collect())
    }

    fn walk_base(
        walker: &DfaOrderWalker<'_>,
        base: &Base,
        table: &OperationTable,
        backend: &dyn OrderBackend,
    ) -> OrderResult<BaseWalk> {
        let trace = backend.trace_for(base, table)?;
        Ok(walker.walk(&trace, backend.arena()))
    }
}

impl Evaluator for OrderEvaluator {
    fn name(&self) -> &'static str {
        "order"
    }

    fn evaluate(
        &self,
        context: &EvaluationContext,
        backend: &dyn OrderBackend,
    ) -> OrderResult<EvaluationResult> {
        let rule: &RuleMetadata = &context.rule;
        let used_bases = self.order.root().bases();
        if used_bases.len() > 1 {
            warn!(
                rule = %rule.name,
                bases = ?used_bases,
                "Order rule uses more than one base; all terminals are matched on the same instance"
            );
        }

        let dfa = self.dfa()?;
        let table = self.operation_table(context);
        Self::check_bound(self.order.root(), &table)?;
        let bases = self.select_bases(&table, backend)?;

        if bases.is_empty() {
            debug!(rule = %rule.name, "No base instances for order rule");
            return Ok(EvaluationResult::from_findings(vec![Finding::not_applicable(
                rule,
                "No instances found to check the order rule on.",
            )]));
        }

        let walker = DfaOrderWalker::new(&dfa, rule).report_passing(self.config.report_passing);
        let walks: Vec<BaseWalk> = if self.config.parallel_bases {
            bases
                .par_iter()
                .map(|base| Self::walk_base(&walker, base, &table, backend))
                .collect::<OrderResult<Vec<_>>>()?
        } else {
            bases
                .iter()
                .map(|base| Self::walk_base(&walker, base, &table, backend))
                .collect::<OrderResult<Vec<_>>>()?
        };

        let rejected = walks.iter().filter(|w| w.has_failures()).count();
        let findings: Vec<Finding> = walks.into_iter().flat_map(|w| w.findings).collect();
        info!(
            rule = %rule.name,
            bases = bases.len(),
            rejected,
            findings = findings.len(),
            "Evaluated order rule"
        );

        Ok(EvaluationResult::from_findings(findings))
    }
}
