/*
 * Order Compiler
 *
 * OrderNode → NFA → DFA.
 *
 * # Algorithm
 * - Thompson construction: every node becomes a fragment with exactly one
 *   entry and one exit state
 *   - terminal:     s -tok-> a
 *   - sequence:     l.a -ε-> r.s
 *   - alternative:  s -ε-> l.s | r.s,  l.a | r.a -ε-> a
 *   - maybe/option: s -ε-> f.s, s -ε-> a, f.a -ε-> a
 *   - atLeast(n):   n copies followed by a starred copy
 *   - exactly(n):   n copies (n = 0 is an ε fragment)
 *   - between:      min copies followed by (max - min) optional copies
 * - Subset construction with a FIFO worklist. Outgoing tokens are visited
 *   in sorted order, so state numbering only depends on the input tree.
 *
 * # Time Complexity
 * - NFA: O(tree size × quantifier bound)
 * - DFA: O(2^NFA states) worst case, bounded by `max_dfa_states`
 *
 * # Example
 * ```rust,ignore
 * let compiler = OrderCompiler::new(CompilerLimits::default());
 * let dfa = compiler.compile(order.root())?;
 * assert!(dfa.accepts(&[init, start, finish]));
 * ```
 */

use crate::config::CompilerLimits;
use crate::errors::{ConstructionError, OrderError, OrderResult};
use crate::features::ordering::domain::{
    Dfa, DfaState, DfaStateId, Nfa, NfaStateId, OrderNode, OrderToken, QuantifierBound,
    QuantifierKind,
};
use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::debug;

/// Partial automaton with one entry and one exit
#[derive(Debug, Clone, Copy)]
struct Fragment {
    start: NfaStateId,
    accept: NfaStateId,
}

/// Compiles order trees into deterministic automata
#[derive(Debug, Clone, Default)]
pub struct OrderCompiler {
    limits: CompilerLimits,
}

impl OrderCompiler {
    pub fn new(limits: CompilerLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &CompilerLimits {
        &self.limits
    }

    /// Compile `root` into a DFA
    pub fn compile(&self, root: &OrderNode) -> OrderResult<Dfa> {
        let nfa = self.to_nfa(root)?;
        let dfa = self.determinize(&nfa, root)?;
        debug!(
            rule = %root,
            nfa_states = nfa.state_count(),
            dfa_states = dfa.state_count(),
            "Compiled order rule"
        );
        Ok(dfa)
    }

    /// Thompson construction
    pub fn to_nfa(&self, root: &OrderNode) -> OrderResult<Nfa> {
        let mut builder = ThompsonBuilder {
            nfa: Nfa::new(),
            limits: &self.limits,
            depth: 0,
        };
        let fragment = builder.build(root)?;
        builder.nfa.set_start(fragment.start);
        builder.nfa.set_accept(fragment.accept);
        Ok(builder.nfa)
    }

    /// Subset construction
    fn determinize(&self, nfa: &Nfa, root: &OrderNode) -> OrderResult<Dfa> {
        let mut states: Vec<DfaState> = Vec::new();
        let mut ids: FxHashMap<BTreeSet<NfaStateId>, DfaStateId> = FxHashMap::default();
        let mut worklist: VecDeque<DfaStateId> = VecDeque::new();

        let start_set = nfa.epsilon_closure(&BTreeSet::from([nfa.start()]));
        let start = self.intern(nfa, start_set, &mut states, &mut ids, &mut worklist)?;

        while let Some(current) = worklist.pop_front() {
            let current_set = states[current.0].nfa_states.clone();
            let mut transitions = BTreeMap::new();

            for token in nfa.outgoing_tokens(&current_set) {
                let target_set = nfa.epsilon_closure(&nfa.step(&current_set, &token));
                if target_set.is_empty() {
                    continue;
                }
                let target = self.intern(nfa, target_set, &mut states, &mut ids, &mut worklist)?;
                transitions.insert(token, target);
            }

            states[current.0].transitions = transitions;
        }

        let bases = root.bases().into_iter().map(str::to_string).collect();
        Ok(Dfa::new(states, start, bases))
    }

    /// Id of the DFA state for `set`, allocating it on first sight
    fn intern(
        &self,
        nfa: &Nfa,
        set: BTreeSet<NfaStateId>,
        states: &mut Vec<DfaState>,
        ids: &mut FxHashMap<BTreeSet<NfaStateId>, DfaStateId>,
        worklist: &mut VecDeque<DfaStateId>,
    ) -> OrderResult<DfaStateId> {
        if let Some(&id) = ids.get(&set) {
            return Ok(id);
        }
        if states.len() >= self.limits.max_dfa_states {
            return Err(OrderError::AutomatonLimit {
                limit: self.limits.max_dfa_states,
                reached: states.len() + 1,
            });
        }

        let id = DfaStateId(states.len());
        states.push(DfaState {
            id,
            accepting: set.contains(&nfa.accept()),
            nfa_states: set.clone(),
            transitions: BTreeMap::new(),
        });
        ids.insert(set, id);
        worklist.push_back(id);
        Ok(id)
    }
}

struct ThompsonBuilder<'a> {
    nfa: Nfa,
    limits: &'a CompilerLimits,

    /// Current recursion depth of `build`
    depth: usize,
}

impl ThompsonBuilder<'_> {
    fn state(&mut self) -> OrderResult<NfaStateId> {
        if self.nfa.state_count() >= self.limits.max_nfa_states {
            return Err(OrderError::AutomatonLimit {
                limit: self.limits.max_nfa_states,
                reached: self.nfa.state_count() + 1,
            });
        }
        Ok(self.nfa.add_state())
    }

    fn build(&mut self, node: &OrderNode) -> OrderResult<Fragment> {
        if self.depth >= self.limits.max_depth {
            return Err(OrderError::invalid(format!(
                "Order rule nests deeper than {} levels",
                self.limits.max_depth
            )));
        }
        self.depth += 1;
        let fragment = self.build_node(node);
        self.depth -= 1;
        fragment
    }

    fn build_node(&mut self, node: &OrderNode) -> OrderResult<Fragment> {
        match node {
            OrderNode::Terminal { op, .. } => self.terminal(op),
            OrderNode::Sequence(..) => {
                let mut result: Option<Fragment> = None;
                for operand in chain_operands(node) {
                    let next = self.build(operand)?;
                    result = Some(self.append(result, next));
                }
                result.ok_or_else(|| ConstructionError::EmptyGroup.into())
            }
            OrderNode::Alternative(..) => {
                let mut result: Option<Fragment> = None;
                for operand in chain_operands(node) {
                    let next = self.build(operand)?;
                    result = Some(match result {
                        Some(acc) => self.union(acc, next)?,
                        None => next,
                    });
                }
                result.ok_or_else(|| ConstructionError::EmptyGroup.into())
            }
            OrderNode::Quantified { child, kind, bound } => self.quantified(child, *kind, *bound),
        }
    }

    fn terminal(&mut self, op: &OrderToken) -> OrderResult<Fragment> {
        let start = self.state()?;
        let accept = self.state()?;
        self.nfa.add_edge(start, op.clone(), accept);
        Ok(Fragment { start, accept })
    }

    fn epsilon(&mut self) -> OrderResult<Fragment> {
        let start = self.state()?;
        let accept = self.state()?;
        self.nfa.add_epsilon(start, accept);
        Ok(Fragment { start, accept })
    }

    fn concat(&mut self, left: Fragment, right: Fragment) -> Fragment {
        self.nfa.add_epsilon(left.accept, right.start);
        Fragment {
            start: left.start,
            accept: right.accept,
        }
    }

    fn union(&mut self, left: Fragment, right: Fragment) -> OrderResult<Fragment> {
        let start = self.state()?;
        let accept = self.state()?;
        self.nfa.add_epsilon(start, left.start);
        self.nfa.add_epsilon(start, right.start);
        self.nfa.add_epsilon(left.accept, accept);
        self.nfa.add_epsilon(right.accept, accept);
        Ok(Fragment { start, accept })
    }

    fn optional(&mut self, inner: Fragment) -> OrderResult<Fragment> {
        let start = self.state()?;
        let accept = self.state()?;
        self.nfa.add_epsilon(start, inner.start);
        self.nfa.add_epsilon(start, accept);
        self.nfa.add_epsilon(inner.accept, accept);
        Ok(Fragment { start, accept })
    }

    fn star(&mut self, inner: Fragment) -> OrderResult<Fragment> {
        let fragment = self.optional(inner)?;
        self.nfa.add_epsilon(inner.accept, inner.start);
        Ok(fragment)
    }

    /// `count` copies of `child` in sequence, or `None` when `count == 0`
    fn copies(&mut self, child: &OrderNode, count: u32) -> OrderResult<Option<Fragment>> {
        let mut result: Option<Fragment> = None;
        for _ in 0..count {
            let copy = self.build(child)?;
            result = Some(match result {
                Some(acc) => self.concat(acc, copy),
                None => copy,
            });
        }
        Ok(result)
    }

    fn append(&mut self, head: Option<Fragment>, tail: Fragment) -> Fragment {
        match head {
            Some(head) => self.concat(head, tail),
            None => tail,
        }
    }

    fn quantified(
        &mut self,
        child: &OrderNode,
        kind: QuantifierKind,
        bound: Option<QuantifierBound>,
    ) -> OrderResult<Fragment> {
        let max_bound = self.limits.max_quantifier_bound;
        let check = |n: u32| -> OrderResult<()> {
            if n > max_bound {
                return Err(OrderError::invalid(format!(
                    "Quantifier '{}' bound {} exceeds the maximum of {}",
                    kind, n, max_bound
                )));
            }
            Ok(())
        };

        match (kind, bound) {
            (QuantifierKind::Maybe | QuantifierKind::Option, None) => {
                let inner = self.build(child)?;
                self.optional(inner)
            }
            (QuantifierKind::Maybe | QuantifierKind::Option, Some(_)) => Err(OrderError::invalid(
                format!("Quantifier '{}' does not take a bound", kind),
            )),
            (QuantifierKind::Exactly, Some(QuantifierBound::Count(n))) => {
                check(n)?;
                match self.copies(child, n)? {
                    Some(fragment) => Ok(fragment),
                    None => self.epsilon(),
                }
            }
            (QuantifierKind::AtLeast, Some(QuantifierBound::Count(n))) => {
                check(n)?;
                let head = self.copies(child, n)?;
                let inner = self.build(child)?;
                let tail = self.star(inner)?;
                Ok(self.append(head, tail))
            }
            (QuantifierKind::Between, Some(QuantifierBound::Range { min, max })) => {
                if min > max {
                    return Err(OrderError::invalid(format!(
                        "Quantifier 'between' has min {} greater than max {}",
                        min, max
                    )));
                }
                check(max)?;
                let mut result = self.copies(child, min)?;
                for _ in min..max {
                    let inner = self.build(child)?;
                    let tail = self.optional(inner)?;
                    result = Some(self.append(result, tail));
                }
                match result {
                    Some(fragment) => Ok(fragment),
                    None => self.epsilon(),
                }
            }
            (_, None) => Err(ConstructionError::MissingQuantifierBound { kind }.into()),
            (_, Some(bound)) => Err(OrderError::invalid(format!(
                "Quantifier '{}' does not accept bound {:?}",
                kind, bound
            ))),
        }
    }
}

/// Left-to-right operands of a chain of same-kind binary nodes
///
/// Groups and sets fold into left-leaning chains as long as the rule, so the
/// spine is walked with an explicit stack.
fn chain_operands(node: &OrderNode) -> Vec<&OrderNode> {
    let mut operands = Vec::new();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        match (node, current) {
            (OrderNode::Sequence(..), OrderNode::Sequence(left, right))
            | (OrderNode::Alternative(..), OrderNode::Alternative(left, right)) => {
                stack.push(right);
                stack.push(left);
            }
            _ => operands.push(current),
        }
    }
    operands
}
