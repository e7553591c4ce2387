use log::{debug, trace};

use super::traits::{expect_phase, CircuitVisitor};
use crate::nodes::{circuit::Circuit, circuit::Phase, node::NodeKind};
use crate::rules::Strategy;
use crate::utils::errors::Result;

/// # BackwardDifferentiator
/// Reverse-mode sweep. Visits nodes from the root down to index 0 and adds
/// each gate's derivative into its children: unchanged for sums, scaled by
/// the product of the siblings for products (as computed by the configured
/// [`Strategy`]). Derivatives accumulate, so a node reachable through several
/// parents ends up with the sum of all contributions.
///
/// The circuit must come straight from a forward pass: the root derivative
/// seeded to one and every other derivative zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackwardDifferentiator {
    strategy: Strategy,
}

impl BackwardDifferentiator {
    pub fn new() -> Self {
        BackwardDifferentiator::default()
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
}

impl CircuitVisitor for BackwardDifferentiator {
    type Output = Result<()>;

    fn visit(&self, circuit: &mut Circuit) -> Self::Output {
        expect_phase(circuit, Phase::Evaluated)?;
        let rule = self.strategy.rule();
        let root = circuit.root();
        debug!("backward pass from root {} with {} rule", root, self.strategy);

        let nodes = circuit.nodes_mut();
        for i in (0..=root).rev() {
            let (lower, upper) = nodes.split_at_mut(i);
            let gate = &upper[0];
            match gate.kind {
                NodeKind::Constant | NodeKind::Variable => continue,
                NodeKind::Sum => {
                    let d = gate.derivative;
                    for &child in &gate.children {
                        lower[child].derivative += d;
                    }
                }
                NodeKind::Product => rule.backward(i, gate, lower)?,
            }
            trace!("n{} {} propagated {}", i, gate.kind, gate.derivative);
        }

        circuit.set_phase(Phase::Differentiated);
        Ok(())
    }
}
