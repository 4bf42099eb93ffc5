//! Shared kernel: occurrence models and the backend port

pub mod models;
pub mod ports;
