//! What a block consumes from its host runtime.

use crate::binding::PortDirection;
use crate::errors::{BindError, BindResult};
use crate::matrix::CharArray;
use log::warn;
use serde::{Deserialize, Serialize};

/// A single block parameter as the host stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterValue {
    /// A character array.
    Text(CharArray),
    /// A numeric array. Never valid for any block parameter, but hosts will
    /// happily deliver one when misconfigured.
    Numeric { rows: usize, cols: usize },
}

impl ParameterValue {
    pub fn as_text(&self) -> Option<&CharArray> {
        match self {
            ParameterValue::Text(array) => Some(array),
            ParameterValue::Numeric { .. } => None,
        }
    }
}

impl From<CharArray> for ParameterValue {
    fn from(value: CharArray) -> Self {
        ParameterValue::Text(value)
    }
}

/// The three parameters configuring a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockParameters {
    /// Path of the model description.
    pub model_path: ParameterValue,
    /// One row per input port.
    pub inputs: ParameterValue,
    /// One row per output port.
    pub outputs: ParameterValue,
}

impl BlockParameters {
    /// Port widths fixed by the identifier matrices, as `(inputs, outputs)`.
    ///
    /// Hosts size their port buffers from this before setup runs.
    pub fn port_widths(&self) -> BindResult<(usize, usize)> {
        let inputs = self.identifier_array(PortDirection::Input)?;
        let outputs = self.identifier_array(PortDirection::Output)?;
        Ok((inputs.rows, outputs.rows))
    }

    pub(crate) fn identifier_array(&self, port: PortDirection) -> BindResult<&CharArray> {
        let (value, name) = match port {
            PortDirection::Input => (&self.inputs, "Input variable IDs"),
            PortDirection::Output => (&self.outputs, "Output variable IDs"),
        };
        let array = value.as_text().ok_or_else(|| BindError::NonTextualParameter {
            parameter: name.to_string(),
        })?;
        if array.declared_len().is_none() {
            return Err(BindError::OversizedParameter {
                parameter: name.to_string(),
                rows: array.rows,
                cols: array.cols,
            });
        }
        Ok(array)
    }

    pub(crate) fn model_path(&self) -> BindResult<String> {
        self.model_path
            .as_text()
            .ok_or_else(|| BindError::NonTextualParameter {
                parameter: "Model filename".to_string(),
            })?
            .to_text()
            .ok_or(BindError::UnreadableModelPath)
    }
}

/// The host's channel for non-fatal diagnostics.
pub trait DiagnosticSink {
    fn warning(&mut self, message: &str);
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn warning(&mut self, message: &str) {
        warn!("{}", message.trim_end());
    }
}

/// Keeps every diagnostic it receives.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub messages: Vec<String>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiagnosticSink for CollectingSink {
    fn warning(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

impl<F: FnMut(&str)> DiagnosticSink for F {
    fn warning(&mut self, message: &str) {
        self(message)
    }
}
