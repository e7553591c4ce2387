use serde::{Deserialize, Serialize};
use std::fmt;

use super::product::{ProductCache, ProductState, ZeroFlag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Constant,
    Variable,
    Sum,
    Product,
}

impl NodeKind {
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeKind::Constant | NodeKind::Variable)
    }

    /// Leading token of the declaration line for this kind.
    pub fn token(&self) -> char {
        match self {
            NodeKind::Constant => 'n',
            NodeKind::Variable => 'v',
            NodeKind::Sum => '+',
            NodeKind::Product => '*',
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Constant => "constant",
            NodeKind::Variable => "variable",
            NodeKind::Sum => "sum",
            NodeKind::Product => "product",
        };
        write!(f, "{}", name)
    }
}

/// # Node
/// One element of an arithmetic circuit. Gates refer to their children by
/// index into the owning circuit; the same index may appear more than once.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) value: f64,
    pub(crate) derivative: f64,
    pub(crate) variable_id: Option<usize>,
    pub(crate) children: Vec<usize>,
    pub(crate) product: ProductState,
}

impl Node {
    pub fn new_constant(value: f64) -> Node {
        Node {
            kind: NodeKind::Constant,
            value,
            derivative: 0.0,
            variable_id: None,
            children: Vec::new(),
            product: ProductState::Pending,
        }
    }

    pub fn new_variable(variable_id: usize, value: f64) -> Node {
        Node {
            variable_id: Some(variable_id),
            kind: NodeKind::Variable,
            ..Node::new_constant(value)
        }
    }

    pub fn new_sum(children: Vec<usize>) -> Node {
        Node {
            kind: NodeKind::Sum,
            children,
            ..Node::new_constant(0.0)
        }
    }

    pub fn new_product(children: Vec<usize>) -> Node {
        Node {
            kind: NodeKind::Product,
            children,
            ..Node::new_constant(0.0)
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn derivative(&self) -> f64 {
        self.derivative
    }

    pub fn variable_id(&self) -> Option<usize> {
        self.variable_id
    }

    pub fn children(&self) -> &[usize] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.kind.is_leaf()
    }

    pub fn product_state(&self) -> &ProductState {
        &self.product
    }

    pub fn product_cache(&self) -> Option<&ProductCache> {
        self.product.cache()
    }

    pub fn zero_flag(&self) -> Option<&ZeroFlag> {
        self.product.flag()
    }

    /// Clears everything the forward and backward passes wrote. Leaf values
    /// come from the input and are kept.
    pub(crate) fn reset(&mut self) {
        self.derivative = 0.0;
        if !self.is_leaf() {
            self.value = 0.0;
            self.product = ProductState::Pending;
        }
    }
}
