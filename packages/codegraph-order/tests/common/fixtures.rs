//! Test fixture generators
//!
//! Cipher-style rules, contexts and in-memory programs.

use codegraph_order::shared::models::OperationTable;
use codegraph_order::shared::ports::BackendResult;
use codegraph_order::{
    BackendError, Base, EvaluationContext, InMemoryBackend, ModelInstance, Occurrence,
    OccurrenceArena, OccurrenceId, Operation, Order, OrderBackend, OrderToken, RuleMetadata,
    Trace,
};
use std::collections::BTreeSet;

/// Operation names of the cipher model
pub const CIPHER_OPS: &[&str] = &["init", "start", "update", "finish", "reset"];

/// "init then start then finish" on base `Cipher`
pub fn fixture_init_start_finish() -> Order {
    Order::build("Cipher", |o| {
        o.token("init").token("start").token("finish");
    })
    .expect("valid order")
}

/// `init (update)* (finish | reset)` on base `Cipher`
pub fn fixture_init_updates_end() -> Order {
    Order::build("Cipher", |o| {
        o.token("init");
        o.zero_or_more(|g| {
            g.token("update");
        });
        o.set_of(|s| {
            s.token("finish").token("reset");
        });
    })
    .expect("valid order")
}

/// Context binding every cipher token to `Cipher.<token>`
pub fn fixture_cipher_context(rule: &str) -> EvaluationContext {
    let instance = CIPHER_OPS.iter().fold(ModelInstance::new("Cipher"), |inst, op| {
        inst.with_operation(*op, Operation::any(format!("Cipher.{}", op)))
    });
    EvaluationContext::new(RuleMetadata::new(rule)).bind("cipher", instance)
}

/// Record calls `ops` on `base`, in order, chained by execution flow
pub fn fixture_calls(backend: &mut InMemoryBackend, base: &str, ops: &[&str]) -> Vec<OccurrenceId> {
    let ids: Vec<OccurrenceId> = ops
        .iter()
        .enumerate()
        .map(|(i, op)| {
            backend.add_occurrence(
                Occurrence::new(format!("Cipher.{}", op), format!("{}.{}()", base, op))
                    .with_base(Base::new(base))
                    .with_position(i as u32),
            )
        })
        .collect();
    backend.add_flow_chain(&ids).expect("ids belong to backend");
    ids
}

/// Backend holding one program per `(base, calls)` pair
pub fn fixture_program(bases: &[(&str, &[&str])]) -> InMemoryBackend {
    let mut backend = InMemoryBackend::new();
    for (base, ops) in bases {
        fixture_calls(&mut backend, base, ops);
    }
    backend
}

pub fn tokens(names: &[&str]) -> Vec<OrderToken> {
    names.iter().map(|n| OrderToken::new(*n)).collect()
}

/// Backend over an in-memory program whose flow queries fail
///
/// `reachable` and `trace_for` always fail; `resolve` fails only when
/// `failing_resolve` is set.
pub struct FailingBackend {
    inner: InMemoryBackend,
    fail_resolve: bool,
}

impl FailingBackend {
    pub fn new(inner: InMemoryBackend) -> Self {
        Self {
            inner,
            fail_resolve: false,
        }
    }

    pub fn failing_resolve(mut self) -> Self {
        self.fail_resolve = true;
        self
    }
}

impl OrderBackend for FailingBackend {
    fn arena(&self) -> &OccurrenceArena {
        self.inner.arena()
    }

    fn resolve(&self, operation: &Operation) -> BackendResult<BTreeSet<OccurrenceId>> {
        if self.fail_resolve {
            return Err(BackendError::query("call graph unavailable"));
        }
        self.inner.resolve(operation)
    }

    fn resolve_matching(&self, operation: &Operation) -> BackendResult<BTreeSet<OccurrenceId>> {
        self.inner.resolve_matching(operation)
    }

    fn reachable(&self, _from: OccurrenceId, _to: OccurrenceId) -> BackendResult<bool> {
        Err(BackendError::query("flow graph unavailable"))
    }

    fn trace_for(&self, base: &Base, _operations: &OperationTable) -> BackendResult<Trace> {
        Err(BackendError::query(format!("no trace for {}", base)))
    }
}
