/*
 * Codegraph Order - Call-Order Rule Engine
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Occurrence arena, operations, backend port
 * - features/    : ordering (expression → NFA → DFA → trace walk),
 *                  rule_evaluation (findings, evaluators, backends)
 * - config/      : Presets, YAML v1, validation
 * - errors       : Error taxonomy
 *
 * Performance:
 * - Compiled DFAs shared read-only (Arc) and memoised per rule
 * - Rayon work-stealing across independent bases
 */

#![allow(clippy::should_implement_trait)] // from_str naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and ports
pub mod shared;

/// Feature modules
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{CompilerLimits, EvaluationConfig, Preset, Validatable};
pub use errors::{ConstructionError, OrderError, OrderResult};
pub use features::ordering::{
    Dfa, DfaCache, DfaOrderWalker, Order, OrderBuilder, OrderCompiler, OrderNode, OrderToken,
    QuantifierBound, QuantifierKind, RuleSpecParser, Trace, END_TOKEN,
};
pub use features::rule_evaluation::{
    BaseSelection, EvaluationContext, EvaluationResult, Evaluator, Finding, FindingKind,
    FollowsEvaluator, InMemoryBackend, ModelInstance, NeverEvaluator, NoopBackend, OnlyEvaluator,
    OrderEvaluator, PrecedesEvaluator, RuleMetadata, Severity, ViolationKind,
};
pub use shared::models::{Base, Occurrence, OccurrenceArena, OccurrenceId, Operation};
pub use shared::ports::{BackendError, OrderBackend};
