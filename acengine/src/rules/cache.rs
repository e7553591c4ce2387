use super::{ProductRule, Strategy};
use crate::nodes::{
    node::Node,
    product::{ProductCache, ProductState},
};
use crate::utils::errors::{CircuitError, Result};

/// # PrefixSuffixRule
/// Stores left and right running products of the children. The derivative
/// of the child at position `p` is the product of its siblings,
/// `prefix[p] * suffix[k - 1 - p]`, so zero operands need no special case.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixSuffixRule;

impl ProductRule for PrefixSuffixRule {
    fn strategy(&self) -> Strategy {
        Strategy::Cache
    }

    fn forward(&self, values: &[f64]) -> (f64, ProductState) {
        let cache = ProductCache::new(values);
        (cache.product(), ProductState::Cache(cache))
    }

    fn backward(&self, index: usize, gate: &Node, lower: &mut [Node]) -> Result<()> {
        let cache = gate
            .product_cache()
            .ok_or(CircuitError::StrategyMismatch {
                node: index,
                expected: Strategy::Cache,
            })?;
        debug_assert_eq!(cache.arity(), gate.children.len());

        let d = gate.derivative;
        for (position, &child) in gate.children.iter().enumerate() {
            lower[child].derivative += d * cache.except(position);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate_over(values: &[f64]) -> (Node, Vec<Node>) {
        let lower: Vec<Node> = values.iter().map(|&v| Node::new_constant(v)).collect();
        let mut gate = Node::new_product((0..values.len()).collect());
        let (value, state) = PrefixSuffixRule.forward(values);
        gate.value = value;
        gate.product = state;
        gate.derivative = 1.0;
        (gate, lower)
    }

    fn derivatives(values: &[f64]) -> Vec<f64> {
        let (gate, mut lower) = gate_over(values);
        PrefixSuffixRule.backward(values.len(), &gate, &mut lower).unwrap();
        lower.iter().map(|n| n.derivative()).collect()
    }

    #[test]
    fn test_no_zero() {
        assert_eq!(derivatives(&[2.0, 3.0, 4.0]), vec![12.0, 8.0, 6.0]);
    }

    #[test]
    fn test_single_zero() {
        assert_eq!(derivatives(&[2.0, 0.0, 4.0]), vec![0.0, 8.0, 0.0]);
    }

    #[test]
    fn test_all_zero() {
        let d = derivatives(&[0.0, 0.0, 0.0]);
        assert!(d.iter().all(|x| x.is_finite() && *x == 0.0));
        assert_eq!(derivatives(&[0.0, 0.0]), vec![0.0, 0.0]);
        assert_eq!(derivatives(&[0.0]), vec![1.0]);
    }

    #[test]
    fn test_rejects_foreign_state() {
        let (mut gate, mut lower) = gate_over(&[1.0, 2.0]);
        gate.product = ProductState::Pending;
        let err = PrefixSuffixRule.backward(2, &gate, &mut lower).unwrap_err();
        assert!(matches!(
            err,
            CircuitError::StrategyMismatch { node: 2, expected: Strategy::Cache }
        ));
    }
}
