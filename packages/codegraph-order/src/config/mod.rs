//! Evaluation configuration
//!
//! Two tiers:
//! - Preset: `EvaluationConfig::from_preset(Preset::Fast)`
//! - YAML v1: `EvaluationConfig::from_yaml_file("order.yaml")`
//!
//! ```rust,ignore
//! use codegraph_order::config::{EvaluationConfig, Preset, Validatable};
//!
//! let config = EvaluationConfig::from_preset(Preset::Thorough).parallel_bases(true);
//! config.validate()?;
//! ```

pub mod error;
pub mod evaluation_config;
pub mod preset;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use evaluation_config::{CompilerLimits, EvaluationConfig};
pub use preset::Preset;
pub use validation::Validatable;
