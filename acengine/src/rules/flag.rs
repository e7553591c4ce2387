use super::{ProductRule, Strategy};
use crate::nodes::{
    node::Node,
    product::{ProductState, ZeroFlag},
};
use crate::utils::errors::{CircuitError, Result};

/// # ZeroFlagRule
/// Counts zero children during the forward pass. With no zero the backward
/// pass divides the gate value by the child value; with exactly one zero only
/// that child receives the product of the others; with two or more zeros the
/// gate is locally flat and every child receives zero, even though a zero
/// child's true derivative may not be zero. Kept for comparison with
/// [`PrefixSuffixRule`](super::PrefixSuffixRule).
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroFlagRule;

impl ProductRule for ZeroFlagRule {
    fn strategy(&self) -> Strategy {
        Strategy::Flag
    }

    fn forward(&self, values: &[f64]) -> (f64, ProductState) {
        let zeros = values.iter().filter(|v| **v == 0.0).count();
        let nonzero_product: f64 = values.iter().filter(|v| **v != 0.0).product();
        let value = if zeros == 0 { nonzero_product } else { 0.0 };
        let flag = ZeroFlag {
            single_zero: zeros == 1,
            nonzero_product,
        };
        (value, ProductState::Flag(flag))
    }

    fn backward(&self, index: usize, gate: &Node, lower: &mut [Node]) -> Result<()> {
        let flag = gate.zero_flag().ok_or(CircuitError::StrategyMismatch {
            node: index,
            expected: Strategy::Flag,
        })?;

        let d = gate.derivative;
        if d == 0.0 {
            return Ok(());
        }
        if flag.single_zero {
            for &child in &gate.children {
                if lower[child].value == 0.0 {
                    lower[child].derivative += d * flag.nonzero_product;
                }
            }
        } else if gate.value != 0.0 {
            for &child in &gate.children {
                lower[child].derivative += d * gate.value / lower[child].value;
            }
        }
        Ok(())
    }
}
