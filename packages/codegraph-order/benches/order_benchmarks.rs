/// Benchmarks for order rule compilation and evaluation
///
/// Measures:
/// - Thompson + subset construction for growing quantifier bounds
/// - Cached vs uncached compilation
/// - Trace walking throughput
/// - Sequential vs parallel multi-base evaluation
use codegraph_order::{
    Base, DfaCache, DfaOrderWalker, EvaluationConfig, EvaluationContext, Evaluator,
    InMemoryBackend, ModelInstance, Occurrence, OccurrenceArena, Operation, Order, OrderCompiler,
    OrderEvaluator, RuleMetadata, Trace,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

// ============================================================================
// Fixtures
// ============================================================================

fn bounded_order(max: u32) -> Order {
    Order::build("Cipher", |o| {
        o.token("init");
        o.between(1, max, |g| {
            g.token("update");
        });
        o.set_of(|s| {
            s.token("finish").token("reset");
        });
    })
    .unwrap()
}

fn context() -> EvaluationContext {
    let instance = ["init", "update", "finish", "reset"]
        .iter()
        .fold(ModelInstance::new("Cipher"), |inst, op| {
            inst.with_operation(*op, Operation::any(format!("Cipher.{}", op)))
        });
    EvaluationContext::new(RuleMetadata::new("CipherOrder")).bind("cipher", instance)
}

fn program(bases: usize, updates: usize) -> InMemoryBackend {
    let mut backend = InMemoryBackend::new();
    for b in 0..bases {
        let base = format!("c{}", b);
        let ops = std::iter::once("init")
            .chain(std::iter::repeat("update").take(updates))
            .chain(std::iter::once("finish"));
        let ids: Vec<_> = ops
            .enumerate()
            .map(|(i, op)| {
                backend.add_occurrence(
                    Occurrence::new(format!("Cipher.{}", op), format!("{}.{}()", base, op))
                        .with_base(Base::new(base.as_str()))
                        .with_position(i as u32),
                )
            })
            .collect();
        backend.add_flow_chain(&ids).unwrap();
    }
    backend
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    let compiler = OrderCompiler::default();

    for max in [4u32, 16, 64] {
        let order = bounded_order(max);
        group.bench_with_input(BenchmarkId::new("between", max), &order, |b, order| {
            b.iter(|| compiler.compile(black_box(order.root())).unwrap())
        });
    }

    let order = bounded_order(64);
    let cache = DfaCache::default();
    group.bench_function("cached_between_64", |b| {
        b.iter(|| cache.get_or_compile(black_box(order.root())).unwrap())
    });

    group.finish();
}

fn bench_walk(c: &mut Criterion) {
    let order = bounded_order(200);
    let compiler = OrderCompiler::default();
    let dfa = compiler.compile(order.root()).unwrap();
    let rule = RuleMetadata::new("CipherOrder");
    let walker = DfaOrderWalker::new(&dfa, &rule);

    let mut group = c.benchmark_group("walk");
    for len in [10usize, 100, 1_000] {
        let mut arena = OccurrenceArena::new();
        let mut trace = Trace::new(Base::new("c"));
        for i in 0..len {
            let op = if i == 0 { "init" } else { "update" };
            let id = arena.alloc(Occurrence::new(format!("Cipher.{}", op), op));
            trace.push(id, op, i as u32);
        }
        group.bench_with_input(BenchmarkId::new("trace", len), &trace, |b, trace| {
            b.iter(|| walker.walk(black_box(trace), &arena))
        });
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let backend = program(256, 8);
    let context = context();
    let cache = Arc::new(DfaCache::default());

    let mut group = c.benchmark_group("evaluate_256_bases");
    for parallel in [false, true] {
        let evaluator = OrderEvaluator::new(bounded_order(16))
            .with_config(EvaluationConfig::default().parallel_bases(parallel))
            .with_cache(Arc::clone(&cache));
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_function(label, |b| {
            b.iter(|| evaluator.evaluate(black_box(&context), &backend).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compile, bench_walk, bench_evaluate);
criterion_main!(benches);
