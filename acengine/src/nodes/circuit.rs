use serde::Serialize;
use std::collections::BTreeMap;

use super::node::{Node, NodeKind};
use super::product::ProductState;
use crate::rules::Strategy;

/// Lifecycle of a circuit. Each pass only runs from the phase before it;
/// `Circuit::reset` goes back to `Built`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Built,
    Evaluated,
    Differentiated,
}

/// # Circuit
/// Index-addressed node table. Every gate's children have smaller indices
/// than the gate itself, so index order is a topological order and reverse
/// index order is a reverse topological order.
#[derive(Debug, Clone)]
pub struct Circuit {
    nodes: Vec<Node>,
    root: usize,
    phase: Phase,
    strategy: Option<Strategy>,
}

impl Circuit {
    /// Callers guarantee `root < nodes.len()` and the child ordering invariant.
    pub(crate) fn new(nodes: Vec<Node>, root: usize) -> Self {
        let mut circuit = Circuit {
            nodes,
            root,
            phase: Phase::Built,
            strategy: None,
        };
        circuit.nodes[root].derivative = 1.0;
        circuit
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn root_node(&self) -> &Node {
        &self.nodes[self.root]
    }

    /// Scalar output of the circuit, the root's value.
    pub fn output(&self) -> f64 {
        self.root_node().value
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Product rule used by the last forward pass, if any.
    pub fn strategy(&self) -> Option<Strategy> {
        self.strategy
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn set_strategy(&mut self, strategy: Option<Strategy>) {
        self.strategy = strategy;
    }

    /// Drops all computed values, caches and derivatives and re-seeds the
    /// root derivative, leaving the circuit ready for another forward pass.
    pub fn reset(&mut self) {
        self.nodes.iter_mut().for_each(Node::reset);
        self.nodes[self.root].derivative = 1.0;
        self.phase = Phase::Built;
        self.strategy = None;
    }

    /// Sets the value of every variable leaf with the given external id and
    /// resets the circuit. Returns the number of leaves updated.
    pub fn assign(&mut self, variable_id: usize, value: f64) -> usize {
        let mut updated = 0;
        for node in self
            .nodes
            .iter_mut()
            .filter(|n| n.variable_id == Some(variable_id))
        {
            node.value = value;
            updated += 1;
        }
        self.reset();
        updated
    }

    /// Frees the per-gate product caches once derivatives have been read.
    pub fn release_caches(&mut self) {
        self.nodes
            .iter_mut()
            .filter(|n| n.kind == NodeKind::Product)
            .for_each(|n| n.product = ProductState::Pending);
    }

    /// Derivative of the output with respect to each external variable id,
    /// summed over all leaves sharing that id.
    pub fn variable_sensitivities(&self) -> BTreeMap<usize, f64> {
        let mut sensitivities = BTreeMap::new();
        for node in &self.nodes {
            if let Some(id) = node.variable_id {
                *sensitivities.entry(id).or_insert(0.0) += node.derivative;
            }
        }
        sensitivities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Circuit {
        Circuit::new(
            vec![
                Node::new_variable(0, 2.0),
                Node::new_variable(0, 5.0),
                Node::new_sum(vec![0, 1]),
            ],
            2,
        )
    }

    #[test]
    fn test_root_is_seeded() {
        let circuit = small();
        assert_eq!(circuit.root(), 2);
        assert_eq!(circuit.root_node().derivative(), 1.0);
        assert_eq!(circuit.phase(), Phase::Built);
    }

    #[test]
    fn test_assign_updates_shared_ids() {
        let mut circuit = small();
        assert_eq!(circuit.assign(0, 9.0), 2);
        assert_eq!(circuit.assign(4, 1.0), 0);
        assert_eq!(circuit.nodes()[0].value(), 9.0);
        assert_eq!(circuit.nodes()[1].value(), 9.0);
        assert_eq!(circuit.root_node().derivative(), 1.0);
    }

    #[test]
    fn test_sensitivities_aggregate_by_id() {
        let mut circuit = small();
        circuit.nodes_mut()[0].derivative = 1.5;
        circuit.nodes_mut()[1].derivative = 2.0;
        let sens = circuit.variable_sensitivities();
        assert_eq!(sens.len(), 1);
        assert_eq!(sens[&0], 3.5);
    }
}
