//! Operations: the concrete meaning of an abstract order token
//!
//! An [`Operation`] names a call target and, optionally, the signature an
//! occurrence must satisfy. Backends resolve operations to occurrences;
//! the core never inspects call sites itself.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::features::ordering::domain::OrderToken;

/// Constraint on a single call argument
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentPattern {
    /// Any argument
    Wildcard,

    /// Argument must have this literal value
    Value(String),

    /// Argument must have this static type
    Type(String),

    /// Argument must have one of these literal values
    OneOf(Vec<String>),
}

impl std::fmt::Display for ArgumentPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgumentPattern::Wildcard => write!(f, "_"),
            ArgumentPattern::Value(v) => write!(f, "{:?}", v),
            ArgumentPattern::Type(t) => write!(f, "{}", t),
            ArgumentPattern::OneOf(values) => write!(f, "{{{}}}", values.join(", ")),
        }
    }
}

/// Abstract operation bound to a call target
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Operation {
    /// Fully qualified call target (e.g. "javax.crypto.Cipher.init")
    pub target: String,

    /// Required argument shape. `None` accepts any arguments.
    #[serde(default)]
    pub signature: Option<Vec<ArgumentPattern>>,
}

impl Operation {
    /// Operation matching every call to `target`
    pub fn any(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            signature: None,
        }
    }

    /// Operation matching calls to `target` whose arguments fit `signature`
    pub fn with_signature(target: impl Into<String>, signature: Vec<ArgumentPattern>) -> Self {
        Self {
            target: target.into(),
            signature: Some(signature),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.signature {
            None => write!(f, "{}(..)", self.target),
            Some(args) => {
                let rendered: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", self.target, rendered.join(", "))
            }
        }
    }
}

/// Explicit token → operation mapping
///
/// Replaces runtime lookup of operation providers: every token an order
/// rule mentions is bound here before evaluation.
pub type OperationTable = BTreeMap<OrderToken, Operation>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::any("Cipher.init").to_string(), "Cipher.init(..)");

        let op = Operation::with_signature(
            "Cipher.init",
            vec![
                ArgumentPattern::OneOf(vec!["ENCRYPT".into(), "DECRYPT".into()]),
                ArgumentPattern::Wildcard,
            ],
        );
        assert_eq!(op.to_string(), "Cipher.init({ENCRYPT, DECRYPT}, _)");
    }

    #[test]
    fn test_operation_deserialize_without_signature() {
        let op: Operation = serde_json::from_str(r#"{"target": "File.open"}"#).unwrap();
        assert_eq!(op, Operation::any("File.open"));
    }
}
