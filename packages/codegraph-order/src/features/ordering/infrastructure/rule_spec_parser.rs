/*
 * Order Rule Definition Parser
 *
 * Load order rules from YAML/JSON and build them through the order builder.
 *
 * # Schema
 * ```yaml
 * rule: CipherOrder
 * base: cipher
 * severity: error
 * fail_message: "Cipher must be initialised before use"   # optional
 * operations:
 *   init:   { target: javax.crypto.Cipher.init }
 *   update: { target: javax.crypto.Cipher.update }
 *   final:  { target: javax.crypto.Cipher.doFinal }
 *   reset:  { target: javax.crypto.Cipher.reset }
 * order:
 *   - init
 *   - zero_or_more: [update]
 *   - set: [final, reset]
 * ```
 *
 * Order entries are either a token name or a single-key map:
 * `group`, `set`, `maybe`, `option`, `some`, `zero_or_more` take a list;
 * `exactly` / `at_least` take `{ count, order }`; `between` takes
 * `{ min, max, order }`.
 *
 * # Validation
 * - Every token used in `order` must be declared in `operations`
 * - Groups and sets must not be empty
 */

use crate::errors::OrderResult;
use crate::features::ordering::domain::{Order, OrderBuilder};
use crate::features::rule_evaluation::domain::{RuleMetadata, Severity};
use crate::shared::models::Operation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Rule document error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleSpecError {
    /// YAML/JSON syntax or schema error
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// `order` uses a token not declared in `operations`
    #[error("Unknown token '{0}': declare it under 'operations'")]
    UnknownToken(String),
}

/// Rule document (YAML/JSON schema)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpecConfig {
    /// Rule name
    pub rule: String,

    /// Receiver name the order applies to
    pub base: String,

    #[serde(default)]
    pub fail_message: Option<String>,

    #[serde(default)]
    pub pass_message: Option<String>,

    #[serde(default)]
    pub severity: Severity,

    /// token → operation
    #[serde(default)]
    pub operations: BTreeMap<String, Operation>,

    /// Top-level sequence
    pub order: Vec<OrderExprConfig>,
}

/// One entry of an order list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderExprConfig {
    Token(String),
    Compound(CompoundConfig),
}

/// Nested order entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundConfig {
    Group(Vec<OrderExprConfig>),
    Set(Vec<OrderExprConfig>),
    Maybe(Vec<OrderExprConfig>),
    #[serde(rename = "option")]
    Optional(Vec<OrderExprConfig>),
    #[serde(rename = "some")]
    OneOrMore(Vec<OrderExprConfig>),
    ZeroOrMore(Vec<OrderExprConfig>),
    Exactly(CountedConfig),
    AtLeast(CountedConfig),
    Between(RangeConfig),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountedConfig {
    pub count: u32,
    pub order: Vec<OrderExprConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeConfig {
    pub min: u32,
    pub max: u32,
    pub order: Vec<OrderExprConfig>,
}

/// Loaded rule
#[derive(Debug, Clone)]
pub struct ParsedRule {
    pub metadata: RuleMetadata,
    pub order: Order,
}

/// Rule document parser
pub struct RuleSpecParser;

impl RuleSpecParser {
    /// Parse a rule from YAML
    pub fn from_yaml(yaml: &str) -> OrderResult<ParsedRule> {
        let config: RuleSpecConfig =
            serde_yaml::from_str(yaml).map_err(|e| RuleSpecError::Syntax(e.to_string()))?;
        Self::from_config(config)
    }

    /// Parse a rule from JSON
    pub fn from_json(json: &str) -> OrderResult<ParsedRule> {
        let config: RuleSpecConfig =
            serde_json::from_str(json).map_err(|e| RuleSpecError::Syntax(e.to_string()))?;
        Self::from_config(config)
    }

    /// Build a rule from an already deserialized document
    pub fn from_config(config: RuleSpecConfig) -> OrderResult<ParsedRule> {
        Self::check_tokens(&config.order, &config.operations)?;

        let operations = &config.operations;
        let order = Order::build(config.base.as_str(), |b| emit_all(b, &config.order, operations))?;
        debug!(rule = %config.rule, order = %order.root(), "Loaded order rule");

        let metadata = RuleMetadata {
            name: config.rule,
            fail_message: config.fail_message,
            pass_message: config.pass_message,
            severity: config.severity,
        };
        Ok(ParsedRule { metadata, order })
    }

    fn check_tokens(
        exprs: &[OrderExprConfig],
        operations: &BTreeMap<String, Operation>,
    ) -> Result<(), RuleSpecError> {
        for expr in exprs {
            match expr {
                OrderExprConfig::Token(name) => {
                    if !operations.contains_key(name) {
                        return Err(RuleSpecError::UnknownToken(name.clone()));
                    }
                }
                OrderExprConfig::Compound(compound) => {
                    Self::check_tokens(compound.children(), operations)?;
                }
            }
        }
        Ok(())
    }
}

impl CompoundConfig {
    fn children(&self) -> &[OrderExprConfig] {
        match self {
            CompoundConfig::Group(items)
            | CompoundConfig::Set(items)
            | CompoundConfig::Maybe(items)
            | CompoundConfig::Optional(items)
            | CompoundConfig::OneOrMore(items)
            | CompoundConfig::ZeroOrMore(items) => items,
            CompoundConfig::Exactly(counted) | CompoundConfig::AtLeast(counted) => &counted.order,
            CompoundConfig::Between(range) => &range.order,
        }
    }
}

fn emit_all(
    builder: &mut OrderBuilder,
    exprs: &[OrderExprConfig],
    operations: &BTreeMap<String, Operation>,
) {
    for expr in exprs {
        emit(builder, expr, operations);
    }
}

fn emit(
    builder: &mut OrderBuilder,
    expr: &OrderExprConfig,
    operations: &BTreeMap<String, Operation>,
) {
    let compound = match expr {
        OrderExprConfig::Token(name) => {
            // presence checked by `check_tokens`
            if let Some(operation) = operations.get(name) {
                builder.op(name.as_str(), operation.clone());
            }
            return;
        }
        OrderExprConfig::Compound(compound) => compound,
    };

    let items = compound.children();
    let block = |b: &mut OrderBuilder| emit_all(b, items, operations);
    match compound {
        CompoundConfig::Group(_) => builder.group_of(block),
        CompoundConfig::Set(_) => builder.set_of(block),
        CompoundConfig::Maybe(_) => builder.maybe(block),
        CompoundConfig::Optional(_) => builder.option(block),
        CompoundConfig::OneOrMore(_) => builder.some(block),
        CompoundConfig::ZeroOrMore(_) => builder.zero_or_more(block),
        CompoundConfig::Exactly(c) => builder.exactly(c.count, block),
        CompoundConfig::AtLeast(c) => builder.at_least(c.count, block),
        CompoundConfig::Between(r) => builder.between(r.min, r.max, block),
    };
}
