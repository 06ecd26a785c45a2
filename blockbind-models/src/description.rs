//! Serialisable description of a linear model.

use serde::{Deserialize, Serialize};

/// One contribution to a computed variable: `gain * value(id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Term {
    pub id: String,
    #[serde(default = "unit_gain")]
    pub gain: f64,
}

fn unit_gain() -> f64 {
    1.0
}

/// A single variable of the model.
///
/// Inputs, and variables without terms, hold whatever was last written to
/// them, starting from `initial`. Every other variable is
/// `offset + sum(gain * term)` over its terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableDescription {
    pub id: String,
    #[serde(default)]
    pub input: bool,
    /// Canonical unit, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(default)]
    pub initial: f64,
    #[serde(default)]
    pub offset: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub terms: Vec<Term>,
}

impl VariableDescription {
    pub fn input(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            input: true,
            units: None,
            initial: 0.0,
            offset: 0.0,
            terms: Vec::new(),
        }
    }

    pub fn computed(id: impl Into<String>, offset: f64, terms: &[(&str, f64)]) -> Self {
        Self {
            id: id.into(),
            input: false,
            units: None,
            initial: 0.0,
            offset,
            terms: terms
                .iter()
                .map(|(id, gain)| Term {
                    id: id.to_string(),
                    gain: *gain,
                })
                .collect(),
        }
    }
}

/// The top-level document: an ordered list of `[[variable]]` tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDescription {
    #[serde(default, rename = "variable")]
    pub variables: Vec<VariableDescription>,
}

impl ModelDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an input variable.
    pub fn input(mut self, id: impl Into<String>) -> Self {
        self.variables.push(VariableDescription::input(id));
        self
    }

    /// Add a computed variable.
    pub fn computed(mut self, id: impl Into<String>, offset: f64, terms: &[(&str, f64)]) -> Self {
        self.variables
            .push(VariableDescription::computed(id, offset, terms));
        self
    }
}
