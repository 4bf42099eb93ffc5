//! Compiled DFA cache
//!
//! One DFA validates many bases and many evaluations. The cache memoises
//! compilation per expression tree and hands out `Arc<Dfa>` shared
//! read-only between threads.

use super::compiler::OrderCompiler;
use crate::errors::OrderResult;
use crate::features::ordering::domain::{Dfa, OrderNode};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DfaCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Thread-safe memo of compiled automata, keyed by expression tree
pub struct DfaCache {
    compiler: OrderCompiler,
    store: RwLock<FxHashMap<OrderNode, Arc<Dfa>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl DfaCache {
    pub fn new(compiler: OrderCompiler) -> Self {
        Self {
            compiler,
            store: RwLock::new(FxHashMap::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn compiler(&self) -> &OrderCompiler {
        &self.compiler
    }

    /// Cached DFA for `root`, compiling it on first request
    ///
    /// Compilation errors are not cached.
    pub fn get_or_compile(&self, root: &OrderNode) -> OrderResult<Arc<Dfa>> {
        if let Some(dfa) = self.store.read().get(root) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(rule = %root, "DFA cache hit");
            return Ok(Arc::clone(dfa));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let compiled = Arc::new(self.compiler.compile(root)?);

        // Another thread may have compiled the same tree meanwhile; keep the first
        let mut store = self.store.write();
        let dfa = store
            .entry(root.clone())
            .or_insert_with(|| Arc::clone(&compiled));
        Ok(Arc::clone(dfa))
    }

    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    pub fn clear(&self) {
        self.store.write().clear();
    }

    pub fn stats(&self) -> DfaCacheStats {
        DfaCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

impl Default for DfaCache {
    fn default() -> Self {
        Self::new(OrderCompiler::default())
    }
}
