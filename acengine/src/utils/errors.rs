use thiserror::Error;

use crate::nodes::circuit::Phase;
use crate::rules::Strategy;

#[derive(Debug, Error)]
pub enum CircuitError {
    #[error("Source unavailable: {0}")]
    SourceUnavailable(#[source] std::io::Error),
    #[error("Malformed declaration at line {line}: {reason}")]
    MalformedDeclaration { line: usize, reason: String },
    #[error("Dangling reference at line {line}: node {node} references child {child}")]
    DanglingReference {
        line: usize,
        node: usize,
        child: usize,
    },
    #[error("Unterminated circuit: stream ended at line {line} without an end sentinel")]
    UnterminatedCircuit { line: usize },
    #[error("Degenerate output: root node {root} evaluated to zero")]
    DegenerateOutput { root: usize },
    #[error("Phase violation: expected {expected:?}, found {found:?}")]
    PhaseViolation { expected: Phase, found: Phase },
    #[error("Strategy mismatch: node {node} was not evaluated with the {expected} rule")]
    StrategyMismatch { node: usize, expected: Strategy },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
    #[error("Report failed: {0}")]
    ReportFailed(String),
}

impl CircuitError {
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        CircuitError::MalformedDeclaration {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CircuitError>;

impl From<CircuitError> for String {
    fn from(e: CircuitError) -> Self {
        e.to_string()
    }
}
