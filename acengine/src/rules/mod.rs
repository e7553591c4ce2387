//! Product-gate rules.
//!
//! Sum gates have one obvious forward and backward rule. Product gates with
//! zero-valued operands do not: the textbook `d(parent) * value(parent) /
//! value(child)` divides by zero. A [`ProductRule`] decides what the forward
//! pass records for a product gate and how the backward pass turns that
//! record into child derivatives. Two rules exist, selected by [`Strategy`].

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::nodes::{node::Node, product::ProductState};
use crate::utils::errors::Result;

pub mod cache;
pub mod flag;

pub use cache::PrefixSuffixRule;
pub use flag::ZeroFlagRule;

pub trait ProductRule {
    fn strategy(&self) -> Strategy;

    /// Value of a product gate from its children's values, in child order,
    /// together with the state the backward rule will need.
    fn forward(&self, values: &[f64]) -> (f64, ProductState);

    /// Adds the contribution of product gate `gate` (at `index`) to the
    /// derivative of each child occurrence. `lower` holds every node with a
    /// smaller index than the gate.
    fn backward(&self, index: usize, gate: &Node, lower: &mut [Node]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Prefix/suffix product cache, no division.
    #[default]
    Cache,
    /// Zero counting with a single-zero flag and division otherwise.
    Flag,
}

impl Strategy {
    pub fn rule(self) -> &'static dyn ProductRule {
        match self {
            Strategy::Cache => &PrefixSuffixRule,
            Strategy::Flag => &ZeroFlagRule,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Cache => write!(f, "cache"),
            Strategy::Flag => write!(f, "flag"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cache" => Ok(Strategy::Cache),
            "flag" => Ok(Strategy::Flag),
            other => Err(format!(
                "unknown strategy '{}', expected 'cache' or 'flag'",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("cache".parse::<Strategy>(), Ok(Strategy::Cache));
        assert_eq!("FLAG".parse::<Strategy>(), Ok(Strategy::Flag));
        assert!("division".parse::<Strategy>().is_err());
        assert_eq!(Strategy::default(), Strategy::Cache);
    }

    #[test]
    fn test_rule_dispatch() {
        assert_eq!(Strategy::Cache.rule().strategy(), Strategy::Cache);
        assert_eq!(Strategy::Flag.rule().strategy(), Strategy::Flag);
        assert_eq!(Strategy::Flag.to_string(), "flag");
    }

    #[test]
    fn test_strategy_serde() {
        let s: Strategy = serde_json::from_str("\"flag\"").unwrap();
        assert_eq!(s, Strategy::Flag);
        assert_eq!(serde_json::to_string(&Strategy::Cache).unwrap(), "\"cache\"");
    }
}
