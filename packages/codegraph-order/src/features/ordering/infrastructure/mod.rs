/*
 * Ordering Infrastructure
 *
 * Rule document loading.
 */

mod rule_spec_parser;

pub use rule_spec_parser::{
    CompoundConfig, CountedConfig, OrderExprConfig, ParsedRule, RangeConfig, RuleSpecConfig,
    RuleSpecError, RuleSpecParser,
};
