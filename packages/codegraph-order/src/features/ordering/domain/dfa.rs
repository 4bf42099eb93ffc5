/*
 * Deterministic Finite Automaton
 *
 * Result of subset construction over a Thompson NFA. Each state is
 * identified by the set of NFA states it stands for. The transition
 * function is partial: a missing entry means "no valid continuation".
 *
 * A DFA is immutable after construction and shared read-only between
 * evaluations (it is `Send + Sync`).
 *
 * # Time Complexity
 * - next: O(log |alphabet|)
 * - expected_next: O(outgoing transitions)
 */

use super::nfa::NfaStateId;
use super::order_node::OrderToken;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

/// Synthetic token reported when ending the trace is a valid continuation
pub const END_TOKEN: &str = "END";

/// Index of a DFA state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DfaStateId(pub usize);

impl std::fmt::Display for DfaStateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// DFA state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfaState {
    pub id: DfaStateId,

    /// NFA states this state stands for
    pub nfa_states: BTreeSet<NfaStateId>,

    pub accepting: bool,

    /// token → successor
    pub transitions: BTreeMap<OrderToken, DfaStateId>,
}

/// Deterministic automaton compiled from an order rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dfa {
    states: Vec<DfaState>,
    start: DfaStateId,

    /// Base names used by the rule the DFA was compiled from
    bases: BTreeSet<String>,
}

impl Dfa {
    pub(crate) fn new(states: Vec<DfaState>, start: DfaStateId, bases: BTreeSet<String>) -> Self {
        Self {
            states,
            start,
            bases,
        }
    }

    pub fn start(&self) -> DfaStateId {
        self.start
    }

    pub fn state(&self, id: DfaStateId) -> Option<&DfaState> {
        self.states.get(id.0)
    }

    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn bases(&self) -> &BTreeSet<String> {
        &self.bases
    }

    /// δ(state, token)
    pub fn next(&self, state: DfaStateId, token: &OrderToken) -> Option<DfaStateId> {
        self.state(state)
            .and_then(|s| s.transitions.get(token))
            .copied()
    }

    pub fn is_accepting(&self, state: DfaStateId) -> bool {
        self.state(state).map(|s| s.accepting).unwrap_or(false)
    }

    pub fn accepting_states(&self) -> impl Iterator<Item = DfaStateId> + '_ {
        self.states.iter().filter(|s| s.accepting).map(|s| s.id)
    }

    /// All tokens appearing on any transition, sorted
    pub fn alphabet(&self) -> BTreeSet<&OrderToken> {
        self.states
            .iter()
            .flat_map(|s| s.transitions.keys())
            .collect()
    }

    /// Whether the whole token sequence is accepted
    pub fn accepts<'a>(&self, tokens: impl IntoIterator<Item = &'a OrderToken>) -> bool {
        let mut current = self.start;
        for token in tokens {
            match self.next(current, token) {
                Some(next) => current = next,
                None => return false,
            }
        }
        self.is_accepting(current)
    }

    /// Tokens valid after `state`, sorted; `END` is included when accepting
    pub fn expected_next(&self, state: DfaStateId) -> Vec<String> {
        let Some(s) = self.state(state) else {
            return Vec::new();
        };
        let mut expected: Vec<String> = s.transitions.keys().map(|t| t.0.clone()).collect();
        if s.accepting {
            expected.push(END_TOKEN.to_string());
        }
        expected.sort();
        expected
    }

    /// Graphviz rendering
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph dfa {\n    rankdir=LR;\n    __start [shape=point];\n");
        for state in &self.states {
            let shape = if state.accepting {
                "doublecircle"
            } else {
                "circle"
            };
            let _ = writeln!(out, "    {} [shape={}];", state.id, shape);
        }
        let _ = writeln!(out, "    __start -> {};", self.start);
        for state in &self.states {
            for (token, target) in &state.transitions {
                let _ = writeln!(out, "    {} -> {} [label=\"{}\"];", state.id, target, token);
            }
        }
        out.push_str("}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state_dfa() -> Dfa {
        let a = OrderToken::new("a");
        let b = OrderToken::new("b");
        let q0 = DfaState {
            id: DfaStateId(0),
            nfa_states: BTreeSet::from([0]),
            accepting: false,
            transitions: BTreeMap::from([(b.clone(), DfaStateId(1)), (a, DfaStateId(1))]),
        };
        let q1 = DfaState {
            id: DfaStateId(1),
            nfa_states: BTreeSet::from([1]),
            accepting: true,
            transitions: BTreeMap::from([(b, DfaStateId(1))]),
        };
        Dfa::new(vec![q0, q1], DfaStateId(0), BTreeSet::from(["X".to_string()]))
    }

    #[test]
    fn test_next_and_accepts() {
        let dfa = two_state_dfa();
        let a = OrderToken::new("a");
        let b = OrderToken::new("b");

        assert_eq!(dfa.next(DfaStateId(0), &a), Some(DfaStateId(1)));
        assert_eq!(dfa.next(DfaStateId(1), &a), None);
        assert!(dfa.accepts([&a, &b, &b]));
        assert!(!dfa.accepts([&a, &a]));
        assert_eq!(dfa.accepting_states().collect::<Vec<_>>(), vec![DfaStateId(1)]);
        assert_eq!(dfa.alphabet().len(), 2);
    }

    #[test]
    fn test_expected_next_sorted_with_end() {
        let dfa = two_state_dfa();
        assert_eq!(dfa.expected_next(DfaStateId(0)), vec!["a", "b"]);
        assert_eq!(dfa.expected_next(DfaStateId(1)), vec!["END", "b"]);
        assert!(dfa.expected_next(DfaStateId(9)).is_empty());
    }

    #[test]
    fn test_to_dot() {
        let dot = two_state_dfa().to_dot();
        assert!(dot.starts_with("digraph dfa {"));
        assert!(dot.contains("q1 [shape=doublecircle];"));
        assert!(dot.contains("q0 -> q1 [label=\"a\"];"));
        assert!(dot.contains("__start -> q0;"));
    }
}
