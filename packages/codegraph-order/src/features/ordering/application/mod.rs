/*
 * Ordering Application Layer
 *
 * Compilation of order trees and trace walking.
 */

mod compiler;
mod dfa_cache;
mod dfa_walker;

pub use compiler::OrderCompiler;
pub use dfa_cache::{DfaCache, DfaCacheStats};
pub use dfa_walker::{BaseWalk, DfaOrderWalker, WalkState};
