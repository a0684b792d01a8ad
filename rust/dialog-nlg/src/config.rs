//! Pipeline configuration.
//!
//! All fields have defaults, so a JSON document only needs to name what it
//! overrides:
//!
//! ```
//! use dialog_nlg::PipelineConfig;
//!
//! let config = PipelineConfig::from_json(r#"{ "reference": { "pronoun_window": 0 } }"#).unwrap();
//! assert_eq!(config.reference.pronoun_window, 0);
//! assert_eq!(config.aggregation.conjunction, "and");
//! ```

use crate::error::LoadError;
use serde::{Deserialize, Serialize};

/// Settings for referring expression generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// How many other entity mentions may separate a mention from its
    /// antecedent before a pronoun is ruled out. `0` allows a pronoun only
    /// for the most recently mentioned entity.
    pub pronoun_window: usize,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        ReferenceConfig { pronoun_window: 1 }
    }
}

/// Settings for clause aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub enabled: bool,
    /// The word that joins coordinated phrases.
    pub conjunction: String,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        AggregationConfig {
            enabled: true,
            conjunction: "and".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub reference: ReferenceConfig,
    pub aggregation: AggregationConfig,
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(PipelineConfig::from_json("{}").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config =
            PipelineConfig::from_json(r#"{ "aggregation": { "conjunction": "or" } }"#).unwrap();
        assert!(config.aggregation.enabled);
        assert_eq!(config.aggregation.conjunction, "or");
        assert_eq!(config.reference.pronoun_window, 1);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            PipelineConfig::from_json("{ reference: 1 }"),
            Err(LoadError::Json(_))
        ));
    }
}
