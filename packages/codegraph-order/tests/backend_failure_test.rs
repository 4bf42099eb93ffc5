//! Backend query failures surface as evaluation errors

mod common;

use codegraph_order::{
    BackendError, Base, BaseSelection, EvaluationConfig, EvaluationContext, Evaluator,
    FollowsEvaluator, InMemoryBackend, Occurrence, OnlyEvaluator, Operation, OrderError,
    OrderEvaluator, RuleMetadata,
};
use common::*;

fn assert_query_error(err: OrderError) {
    assert!(
        matches!(err, OrderError::Backend(BackendError::Query(_))),
        "unexpected error: {:?}",
        err
    );
}

#[test]
fn test_trace_failure_aborts_order_walk() {
    let backend = FailingBackend::new(fixture_program(&[
        ("c1", &["init", "start", "finish"]),
        ("c2", &["init", "finish"]),
    ]));
    let context = fixture_cipher_context("CipherOrder");

    for parallel in [false, true] {
        let err = OrderEvaluator::new(fixture_init_start_finish())
            .with_config(EvaluationConfig::default().parallel_bases(parallel))
            .evaluate(&context, &backend)
            .unwrap_err();
        assert_query_error(err);
    }
}

#[test]
fn test_trace_failure_on_explicit_bases() {
    let backend = FailingBackend::new(InMemoryBackend::new());
    let bases = BaseSelection::Explicit(vec![Base::new("a"), Base::new("b"), Base::new("c")]);

    for parallel in [false, true] {
        let err = OrderEvaluator::new(fixture_init_start_finish())
            .with_bases(bases.clone())
            .with_config(EvaluationConfig::default().parallel_bases(parallel))
            .evaluate(&fixture_cipher_context("CipherOrder"), &backend)
            .unwrap_err();
        assert_query_error(err);
    }
}

#[test]
fn test_reachability_failure_aborts_follows() {
    let mut inner = InMemoryBackend::new();
    let init = inner.add_occurrence(Occurrence::new("KeyGen.init", "kg.init(128)"));
    let generate = inner.add_occurrence(Occurrence::new("KeyGen.generateKey", "kg.generateKey()"));
    inner.add_flow(init, generate).unwrap();

    let err = FollowsEvaluator::new(
        vec![Operation::any("KeyGen.init")],
        vec![Operation::any("KeyGen.generateKey")],
    )
    .evaluate(
        &EvaluationContext::new(RuleMetadata::new("InitThenUse")),
        &FailingBackend::new(inner),
    )
    .unwrap_err();
    assert_query_error(err);
}

#[test]
fn test_resolve_failure_aborts_only() {
    let mut inner = InMemoryBackend::new();
    inner.add_occurrence(Occurrence::new("Cipher.getInstance", "Cipher.getInstance(\"AES\")"));

    let err = OnlyEvaluator::new(vec![Operation::any("Cipher.getInstance")])
        .evaluate(
            &EvaluationContext::new(RuleMetadata::new("OnlyAes")),
            &FailingBackend::new(inner).failing_resolve(),
        )
        .unwrap_err();
    assert_query_error(err);
}
