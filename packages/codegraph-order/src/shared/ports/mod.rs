//! Ports shared across features

mod backend;

pub use backend::{BackendError, BackendResult, OrderBackend};
