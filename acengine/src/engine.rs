use log::{info, warn};
use serde::Serialize;
use std::{io::BufRead, path::Path};

use crate::config::EngineConfig;
use crate::nodes::circuit::Circuit;
use crate::parsing::builder::CircuitBuilder;
use crate::rules::Strategy;
use crate::utils::errors::{CircuitError, Result};
use crate::visitors::{
    differentiator::BackwardDifferentiator, evaluator::ForwardEvaluator, traits::CircuitVisitor,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub strategy: Strategy,
    pub nodes: usize,
    pub root: usize,
    pub output: f64,
    pub log10_output: f64,
}

/// # Engine
/// Builds circuits and runs the forward and backward passes with one
/// configuration.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Engine { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn builder(&self) -> CircuitBuilder {
        CircuitBuilder::new().with_size_hint(self.config.size_hint)
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Circuit> {
        self.builder().build_path(path)
    }

    pub fn load_reader<R: BufRead>(&self, reader: R) -> Result<Circuit> {
        self.builder().build_reader(reader)
    }

    /// Resets the circuit, evaluates it, checks the output and computes the
    /// derivative of the output with respect to every node. Safe to call
    /// repeatedly on the same circuit.
    pub fn run(&self, circuit: &mut Circuit) -> Result<RunSummary> {
        let strategy = self.config.strategy;
        circuit.reset();
        ForwardEvaluator::new()
            .with_strategy(strategy)
            .visit(circuit)?;

        let output = circuit.output();
        if output == 0.0 {
            if !self.config.tolerate_zero_output {
                return Err(CircuitError::DegenerateOutput {
                    root: circuit.root(),
                });
            }
            warn!("circuit output is zero, continuing with backward pass");
        }

        BackwardDifferentiator::new()
            .with_strategy(strategy)
            .visit(circuit)?;

        let summary = RunSummary {
            strategy,
            nodes: circuit.len(),
            root: circuit.root(),
            output,
            log10_output: output.log10(),
        };
        info!(
            "output {} (log10 {}) for {} nodes",
            summary.output, summary.log10_output, summary.nodes
        );
        Ok(summary)
    }

    /// Loads and runs a circuit file in one go.
    pub fn run_path<P: AsRef<Path>>(&self, path: P) -> Result<(Circuit, RunSummary)> {
        let mut circuit = self.load(path)?;
        let summary = self.run(&mut circuit)?;
        Ok((circuit, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::circuit::Phase;

    #[test]
    fn test_run_reports_output_and_log() {
        let mut circuit = Circuit::try_from("(\nn 10.0\nn 10.0\n* 0 1\nE").unwrap();
        let summary = Engine::default().run(&mut circuit).unwrap();
        assert_eq!(summary.output, 100.0);
        assert!((summary.log10_output - 2.0).abs() < 1e-12);
        assert_eq!(summary.nodes, 3);
        assert_eq!(circuit.phase(), Phase::Differentiated);
    }

    #[test]
    fn test_zero_output_is_degenerate() {
        let mut circuit = Circuit::try_from("(\nv 0 3.0\nv 1 0.0\n* 0 1\nE").unwrap();
        let err = Engine::default().run(&mut circuit).unwrap_err();
        assert!(matches!(err, CircuitError::DegenerateOutput { root: 2 }));
        assert_eq!(circuit.phase(), Phase::Evaluated);
    }

    #[test]
    fn test_tolerated_zero_output() {
        let mut circuit = Circuit::try_from("(\nv 0 3.0\nv 1 0.0\n* 0 1\nE").unwrap();
        let engine = Engine::new(EngineConfig::new().with_tolerate_zero_output(true));
        let summary = engine.run(&mut circuit).unwrap();
        assert_eq!(summary.output, 0.0);
        assert_eq!(summary.log10_output, f64::NEG_INFINITY);
    }

    #[test]
    fn test_repeated_runs_do_not_accumulate() {
        let mut circuit = Circuit::try_from("(\nv 0 2.0\nv 1 5.0\n* 0 1 1\nE").unwrap();
        let engine = Engine::default();
        for _ in 0..3 {
            engine.run(&mut circuit).unwrap();
            assert_eq!(circuit.nodes()[0].derivative(), 25.0);
            assert_eq!(circuit.nodes()[1].derivative(), 20.0);
        }
    }

    #[test]
    fn test_run_after_assignment() {
        let mut circuit = Circuit::try_from("(\nv 0 2.0\nv 1 5.0\n+ 0 1\nE").unwrap();
        let engine = Engine::default();
        assert_eq!(engine.run(&mut circuit).unwrap().output, 7.0);
        circuit.assign(1, -1.0);
        assert_eq!(engine.run(&mut circuit).unwrap().output, 1.0);
    }
}
