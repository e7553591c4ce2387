use log::{debug, trace};

use super::traits::{expect_phase, CircuitVisitor};
use crate::nodes::{circuit::Circuit, circuit::Phase, node::NodeKind};
use crate::rules::Strategy;
use crate::utils::errors::Result;

/// # ForwardEvaluator
/// Computes every gate's value in increasing index order. Children always
/// precede their parents, so each gate only reads values that are already
/// final. Product gates also record the state their [`Strategy`] needs for
/// the backward pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardEvaluator {
    strategy: Strategy,
}

impl ForwardEvaluator {
    pub fn new() -> Self {
        ForwardEvaluator::default()
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
}

impl CircuitVisitor for ForwardEvaluator {
    type Output = Result<()>;

    fn visit(&self, circuit: &mut Circuit) -> Self::Output {
        expect_phase(circuit, Phase::Built)?;
        let rule = self.strategy.rule();
        debug!(
            "forward pass over {} nodes with {} rule",
            circuit.len(),
            self.strategy
        );

        let nodes = circuit.nodes_mut();
        let mut values = Vec::new();
        for i in 0..nodes.len() {
            let (lower, upper) = nodes.split_at_mut(i);
            let node = &mut upper[0];
            match node.kind {
                NodeKind::Constant | NodeKind::Variable => continue,
                NodeKind::Sum => {
                    node.value = node.children.iter().map(|&c| lower[c].value).sum();
                }
                NodeKind::Product => {
                    values.clear();
                    values.extend(node.children.iter().map(|&c| lower[c].value));
                    let (value, state) = rule.forward(&values);
                    node.value = value;
                    node.product = state;
                }
            }
            trace!("n{} {} = {}", i, node.kind, node.value);
        }

        circuit.set_strategy(Some(self.strategy));
        circuit.set_phase(Phase::Evaluated);
        Ok(())
    }
}
