/*
 * Rule Evaluation Module
 *
 * Runs rules against a backend and turns the answers into findings.
 *
 * # Architecture
 * - Domain: Finding, EvaluationResult, EvaluationContext
 * - Ports: Evaluator
 * - Application: order / follows / only / never / precedes evaluators
 * - Infrastructure: InMemoryBackend, NoopBackend
 */

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{
    BaseSelection, FollowsEvaluator, NeverEvaluator, OnlyEvaluator, OrderEvaluator,
    PrecedesEvaluator,
};
pub use domain::{
    EvaluationContext, EvaluationResult, Finding, FindingKind, ModelInstance, RuleMetadata,
    Severity, ViolationKind,
};
pub use infrastructure::{InMemoryBackend, NoopBackend};
pub use ports::Evaluator;
