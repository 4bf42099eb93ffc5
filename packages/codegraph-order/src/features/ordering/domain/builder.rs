/*
 * Order Builder
 *
 * Fluent construction of order syntax trees.
 *
 * A builder accumulates sibling fragments; closing it folds them into a
 * single node:
 * - group: left-associative sequence
 * - set:   left-associative alternative
 *
 * Nested fragments are opened with closures. The first construction error
 * (empty group, missing bound) is kept and returned when the outermost
 * builder is closed.
 *
 * # Example
 * ```rust,ignore
 * let order = Order::build("Cipher", |o| {
 *     o.op("init", Operation::any("Cipher.init"));
 *     o.some(|g| {
 *         g.op("update", Operation::any("Cipher.update"));
 *     });
 *     o.set_of(|s| {
 *         s.op("doFinal", Operation::any("Cipher.doFinal"));
 *         s.op("reset", Operation::any("Cipher.reset"));
 *     });
 * })?;
 * assert_eq!(order.root().to_string(), "init update{1,} (doFinal|reset)");
 * ```
 */

use super::order_node::{OrderNode, OrderToken, QuantifierBound, QuantifierKind};
use crate::errors::{ConstructionError, OrderResult};
use crate::shared::models::{Operation, OperationTable};

/// How accumulated siblings are folded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Group,
    Set,
}

/// Mutable accumulator of sibling order nodes
#[derive(Debug)]
pub struct OrderBuilder {
    kind: FragmentKind,
    base: String,
    nodes: Vec<OrderNode>,
    operations: OperationTable,
    error: Option<ConstructionError>,
}

impl OrderBuilder {
    /// Builder whose siblings form a sequence
    pub fn group(base: impl Into<String>) -> Self {
        Self::with_kind(FragmentKind::Group, base.into())
    }

    /// Builder whose siblings form an alternation
    pub fn set(base: impl Into<String>) -> Self {
        Self::with_kind(FragmentKind::Set, base.into())
    }

    fn with_kind(kind: FragmentKind, base: String) -> Self {
        Self {
            kind,
            base,
            nodes: Vec::new(),
            operations: OperationTable::new(),
            error: None,
        }
    }

    pub fn kind(&self) -> FragmentKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ------------------------------------------------------------------
    // Leaves
    // ------------------------------------------------------------------

    /// Terminal on the builder's base
    pub fn token(&mut self, op: impl Into<OrderToken>) -> &mut Self {
        let node = OrderNode::terminal(self.base.clone(), op);
        self.nodes.push(node);
        self
    }

    /// Terminal on an explicit base
    pub fn terminal(&mut self, base: impl Into<String>, op: impl Into<OrderToken>) -> &mut Self {
        self.nodes.push(OrderNode::terminal(base, op));
        self
    }

    /// Terminal bound to a concrete operation
    ///
    /// The binding is recorded in the resulting order's operation table.
    pub fn op(&mut self, token: impl Into<OrderToken>, operation: Operation) -> &mut Self {
        let token = token.into();
        self.operations.insert(token.clone(), operation);
        self.token(token)
    }

    /// Prebuilt fragment
    pub fn node(&mut self, node: OrderNode) -> &mut Self {
        self.nodes.push(node);
        self
    }

    // ------------------------------------------------------------------
    // Nested fragments
    // ------------------------------------------------------------------

    /// Ordered group (`(a b c)`)
    pub fn group_of(&mut self, block: impl FnOnce(&mut OrderBuilder)) -> &mut Self {
        if let Some(node) = self.nested(FragmentKind::Group, block) {
            self.nodes.push(node);
        }
        self
    }

    /// Set (`(a|b|c)`)
    pub fn set_of(&mut self, block: impl FnOnce(&mut OrderBuilder)) -> &mut Self {
        if let Some(node) = self.nested(FragmentKind::Set, block) {
            self.nodes.push(node);
        }
        self
    }

    /// Binary alternation between two groups
    pub fn alternative(
        &mut self,
        left: impl FnOnce(&mut OrderBuilder),
        right: impl FnOnce(&mut OrderBuilder),
    ) -> &mut Self {
        let left = self.nested(FragmentKind::Group, left);
        let right = self.nested(FragmentKind::Group, right);
        if let (Some(left), Some(right)) = (left, right) {
            self.nodes.push(OrderNode::alternative(left, right));
        }
        self
    }

    /// Group repeated zero or one time (`?`)
    pub fn maybe(&mut self, block: impl FnOnce(&mut OrderBuilder)) -> &mut Self {
        self.quantified(QuantifierKind::Maybe, None, block)
    }

    /// Synonym of [`maybe`](Self::maybe)
    pub fn option(&mut self, block: impl FnOnce(&mut OrderBuilder)) -> &mut Self {
        self.quantified(QuantifierKind::Option, None, block)
    }

    /// Group repeated one or more times (`atLeast(1)`)
    pub fn some(&mut self, block: impl FnOnce(&mut OrderBuilder)) -> &mut Self {
        self.at_least(1, block)
    }

    /// Group repeated any number of times (`atLeast(0)`)
    pub fn zero_or_more(&mut self, block: impl FnOnce(&mut OrderBuilder)) -> &mut Self {
        self.at_least(0, block)
    }

    /// Group repeated exactly `count` times
    pub fn exactly(&mut self, count: u32, block: impl FnOnce(&mut OrderBuilder)) -> &mut Self {
        self.quantified(
            QuantifierKind::Exactly,
            Some(QuantifierBound::Count(count)),
            block,
        )
    }

    /// Group repeated between `min` and `max` times
    pub fn between(
        &mut self,
        min: u32,
        max: u32,
        block: impl FnOnce(&mut OrderBuilder),
    ) -> &mut Self {
        self.quantified(
            QuantifierKind::Between,
            Some(QuantifierBound::Range { min, max }),
            block,
        )
    }

    /// Group repeated at least `count` times
    pub fn at_least(&mut self, count: u32, block: impl FnOnce(&mut OrderBuilder)) -> &mut Self {
        self.quantified(
            QuantifierKind::AtLeast,
            Some(QuantifierBound::Count(count)),
            block,
        )
    }

    /// Group wrapped in an arbitrary quantifier
    pub fn quantified(
        &mut self,
        kind: QuantifierKind,
        bound: Option<QuantifierBound>,
        block: impl FnOnce(&mut OrderBuilder),
    ) -> &mut Self {
        let Some(child) = self.nested(FragmentKind::Group, block) else {
            return self;
        };
        match OrderNode::quantify(child, kind, bound) {
            Ok(node) => self.nodes.push(node),
            Err(err) => self.record(err),
        }
        self
    }

    fn nested(
        &mut self,
        kind: FragmentKind,
        block: impl FnOnce(&mut OrderBuilder),
    ) -> Option<OrderNode> {
        let mut child = OrderBuilder::with_kind(kind, self.base.clone());
        block(&mut child);
        self.operations.append(&mut child.operations);
        match child.close() {
            Ok(node) => Some(node),
            Err(err) => {
                self.record(err);
                None
            }
        }
    }

    fn record(&mut self, err: ConstructionError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    // ------------------------------------------------------------------
    // Closing
    // ------------------------------------------------------------------

    /// Fold the accumulated siblings into one node
    pub fn close(mut self) -> Result<OrderNode, ConstructionError> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        let nodes = std::mem::take(&mut self.nodes);
        match self.kind {
            FragmentKind::Group => OrderNode::fold_group(nodes),
            FragmentKind::Set => OrderNode::fold_set(nodes),
        }
    }

    /// Close into an [`Order`], keeping the recorded operation bindings
    pub fn finish(mut self) -> OrderResult<Order> {
        let operations = std::mem::take(&mut self.operations);
        let root = self.close()?;
        Ok(Order { root, operations })
    }
}

/// A complete order rule: syntax tree plus its own token bindings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    root: OrderNode,
    operations: OperationTable,
}

impl Order {
    /// Build an order whose top level is a sequence
    pub fn build(
        base: impl Into<String>,
        block: impl FnOnce(&mut OrderBuilder),
    ) -> OrderResult<Self> {
        let mut builder = OrderBuilder::group(base);
        block(&mut builder);
        builder.finish()
    }

    /// Order from a prebuilt tree with no bindings of its own
    pub fn from_node(root: OrderNode) -> Self {
        Self {
            root,
            operations: OperationTable::new(),
        }
    }

    pub fn with_operations(mut self, operations: OperationTable) -> Self {
        self.operations.extend(operations);
        self
    }

    pub fn root(&self) -> &OrderNode {
        &self.root
    }

    pub fn operations(&self) -> &OperationTable {
        &self.operations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::OrderError;

    #[test]
    fn test_build_sequence() {
        let order = Order::build("File", |o| {
            o.token("open").token("read").token("close");
        })
        .unwrap();

        assert_eq!(order.root().to_string(), "open read close");
        assert!(order.operations().is_empty());
    }

    #[test]
    fn test_op_records_binding() {
        let order = Order::build("Cipher", |o| {
            o.op("init", Operation::any("Cipher.init"));
            o.some(|g| {
                g.op("update", Operation::any("Cipher.update"));
            });
            o.set_of(|s| {
                s.op("doFinal", Operation::any("Cipher.doFinal"));
                s.op("reset", Operation::any("Cipher.reset"));
            });
        })
        .unwrap();

        assert_eq!(order.root().to_string(), "init update{1,} (doFinal|reset)");
        assert_eq!(order.operations().len(), 4);
        assert_eq!(
            order.operations().get(&OrderToken::new("update")),
            Some(&Operation::any("Cipher.update"))
        );
    }

    #[test]
    fn test_single_element_set_is_unwrapped() {
        let order = Order::build("X", |o| {
            o.set_of(|s| {
                s.token("only");
            });
        })
        .unwrap();
        assert_eq!(order.root(), &OrderNode::terminal("X", "only"));
    }

    #[test]
    fn test_empty_set_is_error() {
        let result = Order::build("X", |o| {
            o.token("a");
            o.set_of(|_| {});
        });
        assert!(matches!(
            result,
            Err(OrderError::Construction(ConstructionError::EmptyGroup))
        ));
    }

    #[test]
    fn test_empty_order_is_error() {
        let result = Order::build("X", |_| {});
        assert!(matches!(
            result,
            Err(OrderError::Construction(ConstructionError::EmptyGroup))
        ));
    }

    #[test]
    fn test_nested_error_propagates_to_root() {
        let result = Order::build("X", |o| {
            o.maybe(|g| {
                g.token("a");
                g.group_of(|_| {});
            });
            o.token("b");
        });
        assert!(matches!(
            result,
            Err(OrderError::Construction(ConstructionError::EmptyGroup))
        ));
    }

    #[test]
    fn test_missing_bound_is_error() {
        let result = Order::build("X", |o| {
            o.quantified(QuantifierKind::Between, None, |g| {
                g.token("a");
            });
        });
        assert!(matches!(
            result,
            Err(OrderError::Construction(
                ConstructionError::MissingQuantifierBound {
                    kind: QuantifierKind::Between
                }
            ))
        ));
    }

    #[test]
    fn test_alternative_and_explicit_base() {
        let order = Order::build("A", |o| {
            o.alternative(
                |l| {
                    l.token("x");
                },
                |r| {
                    r.terminal("B", "y");
                },
            );
        })
        .unwrap();

        assert_eq!(order.root().to_string(), "(x|y)");
        assert_eq!(order.root().bases().len(), 2);
    }

    #[test]
    fn test_close_set_builder_directly() {
        let mut builder = OrderBuilder::set("S");
        builder.token("a").token("b");
        assert_eq!(builder.kind(), FragmentKind::Set);
        assert_eq!(builder.len(), 2);
        let node = builder.close().unwrap();
        assert_eq!(
            node,
            OrderNode::alternative(OrderNode::terminal("S", "a"), OrderNode::terminal("S", "b"))
        );
    }
}
