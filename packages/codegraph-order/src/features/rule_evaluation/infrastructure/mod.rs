/*
 * Rule Evaluation Infrastructure
 *
 * Backend implementations.
 */

mod in_memory_backend;
mod noop_backend;

pub use in_memory_backend::{matches_operation, InMemoryBackend};
pub use noop_backend::NoopBackend;
