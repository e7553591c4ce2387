use log::warn;
use std::str::FromStr;

use crate::utils::errors::{CircuitError, Result};

/// # Declaration
/// One line of a circuit file. The leading whitespace-separated token selects
/// the shape of the rest of the line:
///
/// ```text
/// (                 begin sentinel
/// n <value>         constant leaf
/// v <id> <value>    variable leaf
/// + <idx>...        sum gate over earlier nodes
/// * <idx>...        product gate over earlier nodes
/// E                 end sentinel
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Begin,
    Constant(f64),
    Variable { id: usize, value: f64 },
    Sum(Vec<usize>),
    Product(Vec<usize>),
    End,
}

impl Declaration {
    /// Parses one line. Blank lines yield `None`.
    pub fn parse(line_no: usize, line: &str) -> Result<Option<Declaration>> {
        let mut tokens = line.split_whitespace();
        let Some(head) = tokens.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = tokens.collect();

        let declaration = match head {
            "(" => {
                ignore_trailing(line_no, "begin", &rest);
                Declaration::Begin
            }
            "E" => {
                ignore_trailing(line_no, "end", &rest);
                Declaration::End
            }
            "n" => {
                expect_arity(line_no, "constant", &rest, 1)?;
                Declaration::Constant(parse_token(line_no, "constant value", rest[0])?)
            }
            "v" => {
                expect_arity(line_no, "variable", &rest, 2)?;
                Declaration::Variable {
                    id: parse_token(line_no, "variable id", rest[0])?,
                    value: parse_token(line_no, "variable value", rest[1])?,
                }
            }
            "+" => Declaration::Sum(parse_children(line_no, &rest)?),
            "*" => Declaration::Product(parse_children(line_no, &rest)?),
            other => {
                return Err(CircuitError::malformed(
                    line_no,
                    format!("unknown leading token '{}'", other),
                ))
            }
        };
        Ok(Some(declaration))
    }
}

fn ignore_trailing(line_no: usize, sentinel: &str, rest: &[&str]) {
    if !rest.is_empty() {
        warn!(
            "line {}: ignoring {} trailing token(s) after {} sentinel",
            line_no,
            rest.len(),
            sentinel
        );
    }
}

fn expect_arity(line_no: usize, what: &str, rest: &[&str], expected: usize) -> Result<()> {
    if rest.len() != expected {
        return Err(CircuitError::malformed(
            line_no,
            format!(
                "{} expects {} token(s), found {}",
                what,
                expected,
                rest.len()
            ),
        ));
    }
    Ok(())
}

fn parse_token<T: FromStr>(line_no: usize, what: &str, token: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| CircuitError::malformed(line_no, format!("invalid {} '{}'", what, token)))
}

fn parse_children(line_no: usize, rest: &[&str]) -> Result<Vec<usize>> {
    rest.iter()
        .map(|token| parse_token(line_no, "child index", token))
        .collect()
}
