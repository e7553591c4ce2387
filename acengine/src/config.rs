use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::rules::Strategy;
use crate::utils::errors::{CircuitError, Result};

/// # EngineConfig
/// Knobs for a circuit run. Every field has a default, so a JSON document
/// only needs the fields it changes:
///
/// ```json
/// { "strategy": "flag", "size_hint": 5000 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub strategy: Strategy,
    pub size_hint: Option<usize>,
    /// Finish the run when the output is zero instead of failing with
    /// `DegenerateOutput`.
    pub tolerate_zero_output: bool,
}

impl EngineConfig {
    pub fn new() -> Self {
        EngineConfig::default()
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_size_hint(mut self, size_hint: Option<usize>) -> Self {
        self.size_hint = size_hint;
        self
    }

    pub fn with_tolerate_zero_output(mut self, tolerate: bool) -> Self {
        self.tolerate_zero_output = tolerate;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(CircuitError::SourceUnavailable)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::new();
        assert_eq!(config.strategy, Strategy::Cache);
        assert_eq!(config.size_hint, None);
        assert!(!config.tolerate_zero_output);
    }

    #[test]
    fn test_partial_json() {
        let config = EngineConfig::from_json_str(r#"{ "strategy": "flag", "size_hint": 5000 }"#).unwrap();
        assert_eq!(
            config,
            EngineConfig::new()
                .with_strategy(Strategy::Flag)
                .with_size_hint(Some(5000))
        );
        assert_eq!(EngineConfig::from_json_str("{}").unwrap(), EngineConfig::new());
    }

    #[test]
    fn test_invalid_json() {
        let err = EngineConfig::from_json_str(r#"{ "strategy": "division" }"#).unwrap_err();
        assert!(matches!(err, CircuitError::InvalidConfig(_)));
    }
}
