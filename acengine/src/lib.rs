//! Evaluation and reverse-mode differentiation of arithmetic circuits.
//!
//! A circuit is a DAG of sum and product gates over constant and variable
//! leaves, read from a line-oriented text format. One forward pass computes
//! every node's value; one backward pass computes the derivative of the root
//! with respect to every node. Product gates with zero-valued operands are
//! handled by a pluggable [`rules::ProductRule`].

pub mod config;
pub mod engine;
pub mod nodes;
pub mod parsing;
pub mod prelude;
pub mod report;
pub mod rules;
pub mod utils;
pub mod visitors;
