/*
 * Ordering Module
 *
 * Regex-like order rules over operation tokens, compiled to automata.
 *
 * # Architecture
 * - Domain: OrderNode, OrderBuilder, Nfa, Dfa, Trace
 * - Application: OrderCompiler, DfaOrderWalker, DfaCache
 * - Infrastructure: RuleSpecParser (YAML/JSON rules)
 *
 * # Usage
 * ```rust,ignore
 * use codegraph_order::features::ordering::*;
 *
 * let order = Order::build("cipher", |o| {
 *     o.token("init").token("start").token("finish");
 * })?;
 * let dfa = OrderCompiler::default().compile(order.root())?;
 * let walk = DfaOrderWalker::new(&dfa, &rule).walk(&trace, backend.arena());
 * ```
 */

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{BaseWalk, DfaCache, DfaCacheStats, DfaOrderWalker, OrderCompiler, WalkState};
pub use domain::{
    Dfa, DfaState, DfaStateId, FragmentKind, Nfa, NfaEdge, NfaStateId, Order, OrderBuilder,
    OrderNode, OrderToken, QuantifierBound, QuantifierKind, Trace, TraceStep, END_TOKEN,
};
pub use infrastructure::{ParsedRule, RuleSpecConfig, RuleSpecError, RuleSpecParser};
