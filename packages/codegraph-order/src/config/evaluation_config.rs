//! Evaluation configuration
//!
//! Controls how order rules are compiled and evaluated: automaton size
//! guards, parallel base walks and whether passing findings are reported.

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::validation::{check_range, Validatable};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported YAML schema versions
const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Automaton construction limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerLimits {
    pub max_nfa_states: usize,
    pub max_dfa_states: usize,
    pub max_quantifier_bound: u32,

    /// Nesting of quantifiers and mixed groups/sets; flat chains do not count
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for CompilerLimits {
    fn default() -> Self {
        Self {
            max_nfa_states: 10_000,
            max_dfa_states: 4_096,
            max_quantifier_bound: 256,
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> usize {
    128
}

/// Evaluation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Walk independent bases on the rayon pool
    pub parallel_bases: bool,

    /// Emit `Pass` findings for correctly used bases
    pub report_passing: bool,

    pub max_nfa_states: usize,
    pub max_dfa_states: usize,
    pub max_quantifier_bound: u32,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

/// YAML schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct EvaluationConfigV1 {
    version: Option<u32>,

    #[serde(default)]
    preset: Option<String>,

    #[serde(default)]
    parallel_bases: Option<bool>,
    #[serde(default)]
    report_passing: Option<bool>,
    #[serde(default)]
    max_nfa_states: Option<usize>,
    #[serde(default)]
    max_dfa_states: Option<usize>,
    #[serde(default)]
    max_quantifier_bound: Option<u32>,
}

impl EvaluationConfig {
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                parallel_bases: true,
                report_passing: false,
                max_nfa_states: 2_000,
                max_dfa_states: 512,
                max_quantifier_bound: 32,
            },
            Preset::Balanced => {
                let limits = CompilerLimits::default();
                Self {
                    parallel_bases: true,
                    report_passing: false,
                    max_nfa_states: limits.max_nfa_states,
                    max_dfa_states: limits.max_dfa_states,
                    max_quantifier_bound: limits.max_quantifier_bound,
                }
            }
            Preset::Thorough => Self {
                parallel_bases: false,
                report_passing: true,
                max_nfa_states: 100_000,
                max_dfa_states: 65_536,
                max_quantifier_bound: 1_024,
            },
        }
    }

    pub fn parallel_bases(mut self, enabled: bool) -> Self {
        self.parallel_bases = enabled;
        self
    }

    pub fn report_passing(mut self, enabled: bool) -> Self {
        self.report_passing = enabled;
        self
    }

    pub fn compiler_limits(&self) -> CompilerLimits {
        CompilerLimits {
            max_nfa_states: self.max_nfa_states,
            max_dfa_states: self.max_dfa_states,
            max_quantifier_bound: self.max_quantifier_bound,
            ..CompilerLimits::default()
        }
    }

    /// Parse a v1 YAML document and validate the result
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let export: EvaluationConfigV1 = serde_yaml::from_str(content)?;

        let version = export.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = match export.preset.as_deref() {
            Some(name) => Preset::from_str(name)?,
            None => Preset::default(),
        };

        let mut config = Self::from_preset(preset);
        if let Some(v) = export.parallel_bases {
            config.parallel_bases = v;
        }
        if let Some(v) = export.report_passing {
            config.report_passing = v;
        }
        if let Some(v) = export.max_nfa_states {
            config.max_nfa_states = v;
        }
        if let Some(v) = export.max_dfa_states {
            config.max_dfa_states = v;
        }
        if let Some(v) = export.max_quantifier_bound {
            config.max_quantifier_bound = v;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = EvaluationConfigV1 {
            version: Some(1),
            preset: None,
            parallel_bases: Some(self.parallel_bases),
            report_passing: Some(self.report_passing),
            max_nfa_states: Some(self.max_nfa_states),
            max_dfa_states: Some(self.max_dfa_states),
            max_quantifier_bound: Some(self.max_quantifier_bound),
        };
        Ok(serde_yaml::to_string(&export)?)
    }
}

impl Validatable for EvaluationConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_range(
            "max_nfa_states",
            self.max_nfa_states,
            2,
            10_000_000,
            "An NFA needs at least a start and an accepting state",
        )?;
        check_range(
            "max_dfa_states",
            self.max_dfa_states,
            1,
            1_000_000,
            "Use at least 1",
        )?;
        check_range(
            "max_quantifier_bound",
            self.max_quantifier_bound,
            1,
            65_536,
            "Large counted repetitions blow up the automaton",
        )?;
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "EvaluationConfig"
    }
}
