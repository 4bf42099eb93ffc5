//! Property-based tests for order compilation and trace walking
//!
//! Random expression trees over a small alphabet; the DFA must agree with
//! the NFA it was built from, compile deterministically, and walk traces
//! without hidden state.

use codegraph_order::{
    Base, DfaOrderWalker, Occurrence, OccurrenceArena, OrderCompiler, OrderNode, OrderToken,
    QuantifierBound, QuantifierKind, RuleMetadata, Trace,
};
use proptest::prelude::*;

const ALPHABET: &[&str] = &["a", "b", "c"];

fn token() -> impl Strategy<Value = OrderToken> {
    prop::sample::select(ALPHABET).prop_map(|name| OrderToken::new(name))
}

fn quantified(child: OrderNode, choice: u8, n: u32, extra: u32) -> OrderNode {
    let (kind, bound) = match choice % 4 {
        0 => (QuantifierKind::Exactly, Some(QuantifierBound::Count(n))),
        1 => (QuantifierKind::AtLeast, Some(QuantifierBound::Count(n))),
        2 => (
            QuantifierKind::Between,
            Some(QuantifierBound::Range { min: n, max: n + extra }),
        ),
        _ => (QuantifierKind::Maybe, None),
    };
    OrderNode::quantify(child, kind, bound).expect("bound supplied where required")
}

// Strategy for small order expressions
fn order_node() -> impl Strategy<Value = OrderNode> {
    let leaf = token().prop_map(|t| OrderNode::terminal("x", t));
    leaf.prop_recursive(4, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| OrderNode::sequence(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| OrderNode::alternative(l, r)),
            (inner, any::<u8>(), 0..3u32, 0..2u32)
                .prop_map(|(child, choice, n, extra)| quantified(child, choice, n, extra)),
        ]
    })
}

fn trace_of(tokens: &[OrderToken]) -> (Trace, OccurrenceArena) {
    let mut arena = OccurrenceArena::new();
    let mut trace = Trace::new(Base::new("x"));
    for (i, t) in tokens.iter().enumerate() {
        let id = arena.alloc(
            Occurrence::new(format!("X.{}", t), format!("x.{}()", t))
                .with_base(Base::new("x"))
                .with_position(i as u32),
        );
        trace.push(id, t.clone(), i as u32);
    }
    (trace, arena)
}

proptest! {
    /// Property: DFA and NFA accept exactly the same token sequences
    #[test]
    fn prop_dfa_agrees_with_nfa(
        node in order_node(),
        input in prop::collection::vec(token(), 0..8),
    ) {
        let compiler = OrderCompiler::default();
        let nfa = compiler.to_nfa(&node).unwrap();
        let dfa = compiler.compile(&node).unwrap();
        prop_assert_eq!(dfa.accepts(input.iter()), nfa.accepts(input.iter()));
    }

    /// Property: compiling the same tree twice yields the same automaton
    #[test]
    fn prop_compilation_is_deterministic(node in order_node()) {
        let compiler = OrderCompiler::default();
        let first = compiler.compile(&node).unwrap();
        let second = compiler.compile(&node).unwrap();
        prop_assert_eq!(first.to_dot(), second.to_dot());
        prop_assert_eq!(first, second);
    }

    /// Property: every transition targets an existing state
    #[test]
    fn prop_transitions_are_closed(node in order_node()) {
        let dfa = OrderCompiler::default().compile(&node).unwrap();
        for state in dfa.states() {
            for target in state.transitions.values() {
                prop_assert!(dfa.state(*target).is_some());
            }
        }
        prop_assert!(dfa.state(dfa.start()).is_some());
    }

    /// Property: walking a trace is repeatable and matches DFA acceptance
    #[test]
    fn prop_walk_is_idempotent(
        node in order_node(),
        input in prop::collection::vec(token(), 1..8),
    ) {
        let dfa = OrderCompiler::default().compile(&node).unwrap();
        let rule = RuleMetadata::new("Prop");
        let walker = DfaOrderWalker::new(&dfa, &rule);
        let (trace, arena) = trace_of(&input);

        let first = walker.walk(&trace, &arena);
        let second = walker.walk(&trace, &arena);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.accepted, dfa.accepts(input.iter()));
        prop_assert_eq!(first.has_failures(), !first.accepted);
    }
}
