use serde::Serialize;
use std::io::Write;

use crate::nodes::{circuit::Circuit, node::NodeKind};
use crate::utils::errors::{CircuitError, Result};

/// One row of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeReport {
    pub index: usize,
    pub kind: NodeKind,
    pub value: f64,
    pub derivative: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_id: Option<usize>,
}

/// Receives report rows in increasing index order.
pub trait ReportSink {
    fn accept(&mut self, row: NodeReport) -> Result<()>;
}

impl ReportSink for Vec<NodeReport> {
    fn accept(&mut self, row: NodeReport) -> Result<()> {
        self.push(row);
        Ok(())
    }
}

/// Plain text, one node per line: `n<index> <token> vr: <value> dr: <derivative>`.
pub struct TextSink<W: Write> {
    writer: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        TextSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for TextSink<W> {
    fn accept(&mut self, row: NodeReport) -> Result<()> {
        writeln!(
            self.writer,
            "n{} {} vr: {:.6} dr: {:.6}",
            row.index,
            row.kind.token(),
            row.value,
            row.derivative
        )
        .map_err(|e| CircuitError::ReportFailed(e.to_string()))
    }
}

/// One JSON object per line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        JsonLinesSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for JsonLinesSink<W> {
    fn accept(&mut self, row: NodeReport) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &row)
            .map_err(|e| CircuitError::ReportFailed(e.to_string()))?;
        writeln!(self.writer).map_err(|e| CircuitError::ReportFailed(e.to_string()))
    }
}

impl Circuit {
    /// Sends `(index, kind, value, derivative)` for every node up to the root.
    pub fn report<S: ReportSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        self.nodes()[..=self.root()]
            .iter()
            .enumerate()
            .try_for_each(|(index, node)| {
                sink.accept(NodeReport {
                    index,
                    kind: node.kind(),
                    value: node.value(),
                    derivative: node.derivative(),
                    variable_id: node.variable_id(),
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circuit() -> Circuit {
        Circuit::try_from("(\nv 2 1.5\nn 2.0\n+ 0 1\nE").unwrap()
    }

    #[test]
    fn test_collects_every_node() {
        let mut rows: Vec<NodeReport> = Vec::new();
        circuit().report(&mut rows).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].variable_id, Some(2));
        assert_eq!(rows[2].kind, NodeKind::Sum);
        assert_eq!(rows[2].derivative, 1.0);
    }

    #[test]
    fn test_text_sink() {
        let mut sink = TextSink::new(Vec::new());
        circuit().report(&mut sink).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "n0 v vr: 1.500000 dr: 0.000000");
        assert_eq!(lines[2], "n2 + vr: 0.000000 dr: 1.000000");
    }

    #[test]
    fn test_json_lines_sink() {
        let mut sink = JsonLinesSink::new(Vec::new());
        circuit().report(&mut sink).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(first["kind"], "variable");
        assert_eq!(first["variable_id"], 2);
        let last: serde_json::Value = serde_json::from_str(text.lines().last().unwrap()).unwrap();
        assert!(last.get("variable_id").is_none());
    }
}
