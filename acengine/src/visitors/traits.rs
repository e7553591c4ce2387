use crate::nodes::circuit::{Circuit, Phase};
use crate::utils::errors::{CircuitError, Result};

/// A single pass over the node table of a circuit.
pub trait CircuitVisitor {
    type Output;
    fn visit(&self, circuit: &mut Circuit) -> Self::Output;
}

pub(crate) fn expect_phase(circuit: &Circuit, expected: Phase) -> Result<()> {
    let found = circuit.phase();
    if found != expected {
        return Err(CircuitError::PhaseViolation { expected, found });
    }
    Ok(())
}
