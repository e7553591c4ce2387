use log::{debug, info, warn};
use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use super::declaration::Declaration;
use crate::nodes::{circuit::Circuit, node::Node};
use crate::utils::errors::{CircuitError, Result};

/// Extra slots reserved on top of a caller's size hint.
pub const SIZE_HINT_MARGIN: usize = 20;

/// # CircuitBuilder
/// Turns a stream of declaration lines into a [`Circuit`]. Nodes are
/// numbered in file order and gates may only reference nodes declared
/// before them. The node declared last before the end sentinel is the root.
#[derive(Debug, Default)]
pub struct CircuitBuilder {
    size_hint: Option<usize>,
    nodes: Option<Vec<Node>>,
    root: Option<usize>,
    line: usize,
}

impl CircuitBuilder {
    pub fn new() -> Self {
        CircuitBuilder::default()
    }

    /// Advisory node count used to size storage at the begin sentinel.
    pub fn with_size_hint(mut self, size_hint: Option<usize>) -> Self {
        self.size_hint = size_hint;
        self
    }

    pub fn is_complete(&self) -> bool {
        self.root.is_some()
    }

    /// Number of lines consumed so far.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Consumes one line. Returns `true` once the end sentinel has been
    /// seen; later lines are ignored.
    pub fn feed(&mut self, line: &str) -> Result<bool> {
        self.line += 1;
        if self.is_complete() {
            return Ok(true);
        }
        let Some(declaration) = Declaration::parse(self.line, line)? else {
            return Ok(false);
        };

        match declaration {
            Declaration::Begin => {
                if self.nodes.is_some() {
                    return Err(CircuitError::malformed(self.line, "repeated begin sentinel"));
                }
                self.nodes = Some(self.allocate());
            }
            Declaration::End => {
                let len = self.open_nodes()?.len();
                if len == 0 {
                    return Err(CircuitError::malformed(
                        self.line,
                        "end sentinel without any declaration",
                    ));
                }
                self.root = Some(len - 1);
                return Ok(true);
            }
            Declaration::Constant(value) => self.push(Node::new_constant(value))?,
            Declaration::Variable { id, value } => self.push(Node::new_variable(id, value))?,
            Declaration::Sum(children) => {
                self.check_children(&children)?;
                self.push(Node::new_sum(children))?;
            }
            Declaration::Product(children) => {
                self.check_children(&children)?;
                self.push(Node::new_product(children))?;
            }
        }
        Ok(false)
    }

    pub fn finish(self) -> Result<Circuit> {
        match (self.nodes, self.root) {
            (Some(nodes), Some(root)) => {
                info!("built circuit with {} nodes, root {}", nodes.len(), root);
                Ok(Circuit::new(nodes, root))
            }
            _ => Err(CircuitError::UnterminatedCircuit { line: self.line }),
        }
    }

    /// Pulls lines until the end sentinel or the end of the stream.
    pub fn build<I, S>(mut self, lines: I) -> Result<Circuit>
    where
        I: IntoIterator<Item = io::Result<S>>,
        S: AsRef<str>,
    {
        for line in lines {
            let line = line.map_err(CircuitError::SourceUnavailable)?;
            if self.feed(line.as_ref())? {
                break;
            }
        }
        self.finish()
    }

    pub fn build_reader<R: BufRead>(self, reader: R) -> Result<Circuit> {
        self.build(reader.lines())
    }

    pub fn build_path<P: AsRef<Path>>(self, path: P) -> Result<Circuit> {
        let path = path.as_ref();
        debug!("reading circuit from {}", path.display());
        let file = File::open(path).map_err(CircuitError::SourceUnavailable)?;
        self.build_reader(BufReader::new(file))
    }

    /// Storage for the declared nodes. A hint that cannot be honoured is
    /// dropped and the vector grows on demand instead.
    fn allocate(&self) -> Vec<Node> {
        let mut nodes = Vec::new();
        let Some(hint) = self.size_hint else {
            return nodes;
        };
        let capacity = hint.saturating_add(SIZE_HINT_MARGIN);
        match nodes.try_reserve_exact(capacity) {
            Ok(()) => debug!("allocated circuit storage for {} nodes", capacity),
            Err(e) => warn!("ignoring size hint {}: {}", hint, e),
        }
        nodes
    }

    fn open_nodes(&mut self) -> Result<&mut Vec<Node>> {
        let line = self.line;
        self.nodes
            .as_mut()
            .ok_or_else(|| CircuitError::malformed(line, "declaration before begin sentinel"))
    }

    fn check_children(&mut self, children: &[usize]) -> Result<()> {
        let line = self.line;
        let node = self.open_nodes()?.len();
        if children.is_empty() {
            warn!("line {}: gate {} has no children", line, node);
        }
        match children.iter().find(|&&child| child >= node) {
            Some(&child) => Err(CircuitError::DanglingReference { line, node, child }),
            None => Ok(()),
        }
    }

    fn push(&mut self, node: Node) -> Result<()> {
        self.open_nodes()?.push(node);
        Ok(())
    }
}

impl TryFrom<&str> for Circuit {
    type Error = CircuitError;

    fn try_from(source: &str) -> Result<Self> {
        CircuitBuilder::new().build(source.lines().map(Ok::<_, io::Error>))
    }
}
