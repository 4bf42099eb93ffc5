/*
 * Order Expression Model
 *
 * Binary syntax tree of a regex-like order rule over operation tokens.
 *
 * # Example
 * ```text
 * init  update{1,}  (finalize|reset)
 *
 * Sequence
 * ├── Sequence
 * │   ├── Terminal(init)
 * │   └── Quantified(Terminal(update), atLeast, 1)
 * └── Alternative(Terminal(finalize), Terminal(reset))
 * ```
 *
 * Trees are immutable once built. They are `Hash + Eq` so a compiled
 * automaton can be memoised per tree.
 */

use crate::errors::ConstructionError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Abstract operation name used in order rules
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderToken(pub String);

impl OrderToken {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OrderToken {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for OrderToken {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for OrderToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Repetition kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantifierKind {
    /// Exactly `n` repetitions (`{n}`)
    Exactly,

    /// Between `min` and `max` repetitions (`{min,max}`)
    Between,

    /// At least `n` repetitions (`{n,}`)
    AtLeast,

    /// Zero or one (`?`)
    Maybe,

    /// Synonym of [`QuantifierKind::Maybe`]
    Option,
}

impl QuantifierKind {
    /// Whether this kind needs a numeric bound
    pub fn requires_bound(self) -> bool {
        matches!(
            self,
            QuantifierKind::Exactly | QuantifierKind::Between | QuantifierKind::AtLeast
        )
    }
}

impl std::fmt::Display for QuantifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QuantifierKind::Exactly => "exactly",
            QuantifierKind::Between => "between",
            QuantifierKind::AtLeast => "atLeast",
            QuantifierKind::Maybe => "maybe",
            QuantifierKind::Option => "option",
        };
        write!(f, "{}", name)
    }
}

/// Numeric bound of a quantifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantifierBound {
    /// Single count (`exactly`, `atLeast`)
    Count(u32),

    /// Inclusive range (`between`)
    Range { min: u32, max: u32 },
}

/// Node of the order syntax tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderNode {
    /// One occurrence of `op` on the receiver named `base`
    Terminal { base: String, op: OrderToken },

    /// `left` immediately followed by `right`
    Sequence(Box<OrderNode>, Box<OrderNode>),

    /// Either `left` or `right`
    Alternative(Box<OrderNode>, Box<OrderNode>),

    /// Repetition of `child`
    Quantified {
        child: Box<OrderNode>,
        kind: QuantifierKind,
        bound: Option<QuantifierBound>,
    },
}

impl OrderNode {
    pub fn terminal(base: impl Into<String>, op: impl Into<OrderToken>) -> Self {
        OrderNode::Terminal {
            base: base.into(),
            op: op.into(),
        }
    }

    pub fn sequence(left: OrderNode, right: OrderNode) -> Self {
        OrderNode::Sequence(Box::new(left), Box::new(right))
    }

    pub fn alternative(left: OrderNode, right: OrderNode) -> Self {
        OrderNode::Alternative(Box::new(left), Box::new(right))
    }

    /// Wrap `child` in a quantifier
    ///
    /// Fails with `MissingQuantifierBound` when `kind` needs a bound and none
    /// is given. Bound consistency (`min <= max`, bound shape) is checked by
    /// the compiler.
    pub fn quantify(
        child: OrderNode,
        kind: QuantifierKind,
        bound: Option<QuantifierBound>,
    ) -> Result<Self, ConstructionError> {
        if kind.requires_bound() && bound.is_none() {
            return Err(ConstructionError::MissingQuantifierBound { kind });
        }
        Ok(OrderNode::Quantified {
            child: Box::new(child),
            kind,
            bound,
        })
    }

    /// Fold set members into a left-associative chain of alternatives
    pub fn fold_set(nodes: Vec<OrderNode>) -> Result<Self, ConstructionError> {
        Self::fold(nodes, OrderNode::alternative)
    }

    /// Fold group members into a left-associative chain of sequences
    pub fn fold_group(nodes: Vec<OrderNode>) -> Result<Self, ConstructionError> {
        Self::fold(nodes, OrderNode::sequence)
    }

    fn fold(
        nodes: Vec<OrderNode>,
        combine: fn(OrderNode, OrderNode) -> OrderNode,
    ) -> Result<Self, ConstructionError> {
        let mut iter = nodes.into_iter();
        let first = iter.next().ok_or(ConstructionError::EmptyGroup)?;
        Ok(iter.fold(first, combine))
    }

    /// Terminals in left-to-right order (iterative DFS)
    pub fn terminals(&self) -> Vec<&OrderNode> {
        let mut result = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                OrderNode::Terminal { .. } => result.push(node),
                OrderNode::Sequence(left, right) | OrderNode::Alternative(left, right) => {
                    stack.push(right);
                    stack.push(left);
                }
                OrderNode::Quantified { child, .. } => stack.push(child),
            }
        }
        result
    }

    /// Distinct operation tokens used by this tree
    pub fn tokens(&self) -> BTreeSet<&OrderToken> {
        self.terminals()
            .into_iter()
            .filter_map(|node| match node {
                OrderNode::Terminal { op, .. } => Some(op),
                _ => None,
            })
            .collect()
    }

    /// Distinct base names used by this tree
    pub fn bases(&self) -> BTreeSet<&str> {
        self.terminals()
            .into_iter()
            .filter_map(|node| match node {
                OrderNode::Terminal { base, .. } => Some(base.as_str()),
                _ => None,
            })
            .collect()
    }

    fn is_atomic(&self) -> bool {
        matches!(
            self,
            OrderNode::Terminal { .. } | OrderNode::Alternative(..) | OrderNode::Quantified { .. }
        )
    }
}

impl std::fmt::Display for OrderNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderNode::Terminal { op, .. } => write!(f, "{}", op),
            OrderNode::Sequence(left, right) => write!(f, "{} {}", left, right),
            OrderNode::Alternative(left, right) => write!(f, "({}|{})", left, right),
            OrderNode::Quantified { child, kind, bound } => {
                if child.is_atomic() {
                    write!(f, "{}", child)?;
                } else {
                    write!(f, "({})", child)?;
                }
                match (kind, bound) {
                    (QuantifierKind::Maybe | QuantifierKind::Option, _) => write!(f, "?"),
                    (_, Some(QuantifierBound::Count(n))) if *kind == QuantifierKind::AtLeast => {
                        write!(f, "{{{},}}", n)
                    }
                    (_, Some(QuantifierBound::Count(n))) => write!(f, "{{{}}}", n),
                    (_, Some(QuantifierBound::Range { min, max })) => {
                        write!(f, "{{{},{}}}", min, max)
                    }
                    (_, None) => write!(f, "{{?}}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(op: &str) -> OrderNode {
        OrderNode::terminal("Cipher", op)
    }

    #[test]
    fn test_fold_set_is_left_associative() {
        let node = OrderNode::fold_set(vec![t("a"), t("b"), t("c")]).unwrap();
        assert_eq!(
            node,
            OrderNode::alternative(OrderNode::alternative(t("a"), t("b")), t("c"))
        );
    }

    #[test]
    fn test_fold_group_is_left_associative() {
        let node = OrderNode::fold_group(vec![t("a"), t("b"), t("c")]).unwrap();
        assert_eq!(
            node,
            OrderNode::sequence(OrderNode::sequence(t("a"), t("b")), t("c"))
        );
    }

    #[test]
    fn test_fold_single_returns_node_unchanged() {
        assert_eq!(OrderNode::fold_set(vec![t("a")]).unwrap(), t("a"));
        assert_eq!(OrderNode::fold_group(vec![t("a")]).unwrap(), t("a"));
    }

    #[test]
    fn test_fold_empty_fails() {
        assert_eq!(
            OrderNode::fold_set(vec![]),
            Err(ConstructionError::EmptyGroup)
        );
        assert_eq!(
            OrderNode::fold_group(vec![]),
            Err(ConstructionError::EmptyGroup)
        );
    }

    #[test]
    fn test_quantify_requires_bound() {
        for kind in [
            QuantifierKind::Exactly,
            QuantifierKind::Between,
            QuantifierKind::AtLeast,
        ] {
            assert_eq!(
                OrderNode::quantify(t("a"), kind, None),
                Err(ConstructionError::MissingQuantifierBound { kind })
            );
        }
        assert!(OrderNode::quantify(t("a"), QuantifierKind::Maybe, None).is_ok());
        assert!(OrderNode::quantify(t("a"), QuantifierKind::Option, None).is_ok());
    }

    #[test]
    fn test_terminals_in_order() {
        let node = OrderNode::fold_group(vec![
            t("init"),
            OrderNode::quantify(t("update"), QuantifierKind::Maybe, None).unwrap(),
            OrderNode::alternative(t("final"), t("reset")),
        ])
        .unwrap();

        let names: Vec<String> = node
            .terminals()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["init", "update", "final", "reset"]);
        assert_eq!(node.bases().into_iter().collect::<Vec<_>>(), vec!["Cipher"]);
        assert_eq!(node.tokens().len(), 4);
    }

    #[test]
    fn test_display() {
        let node = OrderNode::fold_group(vec![
            t("a"),
            OrderNode::quantify(t("b"), QuantifierKind::AtLeast, Some(QuantifierBound::Count(1)))
                .unwrap(),
            OrderNode::quantify(
                OrderNode::sequence(t("c"), t("d")),
                QuantifierKind::Between,
                Some(QuantifierBound::Range { min: 2, max: 3 }),
            )
            .unwrap(),
            OrderNode::quantify(OrderNode::alternative(t("e"), t("f")), QuantifierKind::Maybe, None)
                .unwrap(),
            OrderNode::quantify(t("g"), QuantifierKind::Exactly, Some(QuantifierBound::Count(2)))
                .unwrap(),
        ])
        .unwrap();

        assert_eq!(node.to_string(), "a b{1,} (c d){2,3} (e|f)? g{2}");
    }
}
