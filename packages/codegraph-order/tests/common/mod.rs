//! Common test utilities for codegraph-order
//!
//! Shared fixtures for integration and property tests.

#![allow(dead_code)]

mod fixtures;

pub use fixtures::*;
