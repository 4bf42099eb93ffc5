/*
 * Nondeterministic Finite Automaton
 *
 * States are dense indices; edges carry an optional token (`None` is an
 * epsilon edge). The automaton has exactly one start and one accepting
 * state, which is what Thompson fragments compose into.
 *
 * # Time Complexity
 * - add_state / add_edge: O(1)
 * - epsilon_closure: O(states + edges)
 */

use super::order_node::OrderToken;
use std::collections::BTreeSet;

pub type NfaStateId = usize;

/// Edge of the NFA
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfaEdge {
    /// `None` for epsilon
    pub label: Option<OrderToken>,
    pub target: NfaStateId,
}

/// Thompson NFA
#[derive(Debug, Clone, Default)]
pub struct Nfa {
    edges: Vec<Vec<NfaEdge>>,
    start: NfaStateId,
    accept: NfaStateId,
}

impl Nfa {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self) -> NfaStateId {
        self.edges.push(Vec::new());
        self.edges.len() - 1
    }

    pub fn add_edge(&mut self, from: NfaStateId, token: OrderToken, to: NfaStateId) {
        self.edges[from].push(NfaEdge {
            label: Some(token),
            target: to,
        });
    }

    pub fn add_epsilon(&mut self, from: NfaStateId, to: NfaStateId) {
        self.edges[from].push(NfaEdge {
            label: None,
            target: to,
        });
    }

    pub fn set_start(&mut self, state: NfaStateId) {
        self.start = state;
    }

    pub fn set_accept(&mut self, state: NfaStateId) {
        self.accept = state;
    }

    pub fn start(&self) -> NfaStateId {
        self.start
    }

    pub fn accept(&self) -> NfaStateId {
        self.accept
    }

    pub fn state_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self, state: NfaStateId) -> &[NfaEdge] {
        self.edges.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// States reachable from `states` through epsilon edges only
    pub fn epsilon_closure(&self, states: &BTreeSet<NfaStateId>) -> BTreeSet<NfaStateId> {
        let mut closure = states.clone();
        let mut stack: Vec<NfaStateId> = states.iter().copied().collect();
        while let Some(state) = stack.pop() {
            for edge in self.edges(state) {
                if edge.label.is_none() && closure.insert(edge.target) {
                    stack.push(edge.target);
                }
            }
        }
        closure
    }

    /// Targets of `token` edges leaving `states` (no closure applied)
    pub fn step(&self, states: &BTreeSet<NfaStateId>, token: &OrderToken) -> BTreeSet<NfaStateId> {
        states
            .iter()
            .flat_map(|&state| self.edges(state))
            .filter(|edge| edge.label.as_ref() == Some(token))
            .map(|edge| edge.target)
            .collect()
    }

    /// Tokens on edges leaving `states`, sorted
    pub fn outgoing_tokens(&self, states: &BTreeSet<NfaStateId>) -> BTreeSet<OrderToken> {
        states
            .iter()
            .flat_map(|&state| self.edges(state))
            .filter_map(|edge| edge.label.clone())
            .collect()
    }

    /// Direct simulation, used to cross-check determinization in tests
    pub fn accepts<'a>(&self, tokens: impl IntoIterator<Item = &'a OrderToken>) -> bool {
        let mut current = self.epsilon_closure(&BTreeSet::from([self.start]));
        for token in tokens {
            current = self.epsilon_closure(&self.step(&current, token));
            if current.is_empty() {
                return false;
            }
        }
        current.contains(&self.accept)
    }
}
