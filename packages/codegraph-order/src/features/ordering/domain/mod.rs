/*
 * Ordering Domain Models
 *
 * Expression tree, builder, automata and traces.
 */

mod builder;
mod dfa;
mod nfa;
mod order_node;
mod trace;

pub use builder::{FragmentKind, Order, OrderBuilder};
pub use dfa::{Dfa, DfaState, DfaStateId, END_TOKEN};
pub use nfa::{Nfa, NfaEdge, NfaStateId};
pub use order_node::{OrderNode, OrderToken, QuantifierBound, QuantifierKind};
pub use trace::{Trace, TraceStep};
