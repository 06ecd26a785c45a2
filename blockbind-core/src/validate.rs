//! Consistency checks between a block's declared ports and a model.
//!
//! Nothing in here is fatal. Mismatches are collected per category into sorted
//! sets so the resulting messages are reproducible regardless of declaration
//! order, and are only turned into text when handed to the host.

use crate::binding::{resolve, PortDirection};
use crate::identifier::VariableId;
use crate::model::Model;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Elements of `first` that are not present in `second`.
pub fn exclusive_to_first(
    first: &BTreeSet<VariableId>,
    second: &BTreeSet<VariableId>,
) -> BTreeSet<VariableId> {
    first.difference(second).cloned().collect()
}

/// Everything found wrong with a block's configuration during setup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// The host truncated the input identifier strings during extraction.
    pub truncated_inputs: bool,
    /// The host truncated the output identifier strings during extraction.
    pub truncated_outputs: bool,
    /// Inputs declared by the model that the block does not supply.
    pub missing_inputs: BTreeSet<VariableId>,
    /// Block inputs that the model knows, but not as inputs.
    pub mismarked_inputs: BTreeSet<VariableId>,
    /// Block outputs the model does not provide.
    pub missing_outputs: BTreeSet<VariableId>,
}

impl Diagnostics {
    pub fn is_empty(&self) -> bool {
        self.warnings().is_empty()
    }

    /// One warning per category with something to report.
    pub fn warnings(&self) -> Vec<Warning<'_>> {
        let mut warnings = Vec::new();
        if self.truncated_inputs {
            warnings.push(Warning::Truncated(PortDirection::Input));
        }
        if self.truncated_outputs {
            warnings.push(Warning::Truncated(PortDirection::Output));
        }
        if !self.missing_inputs.is_empty() {
            warnings.push(Warning::MissingInputs(&self.missing_inputs));
        }
        if !self.mismarked_inputs.is_empty() {
            warnings.push(Warning::MismarkedInputs(&self.mismarked_inputs));
        }
        if !self.missing_outputs.is_empty() {
            warnings.push(Warning::MissingOutputs(&self.missing_outputs));
        }
        warnings
    }
}

/// A single non-fatal diagnostic.
///
/// The `Display` implementation produces the message for the host's warning
/// channel: a heading line followed by one identifier per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning<'a> {
    Truncated(PortDirection),
    MissingInputs(&'a BTreeSet<VariableId>),
    MismarkedInputs(&'a BTreeSet<VariableId>),
    MissingOutputs(&'a BTreeSet<VariableId>),
}

impl fmt::Display for Warning<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (heading, ids) = match self {
            Warning::Truncated(PortDirection::Input) => {
                return write!(f, "Input variable ID strings are truncated.")
            }
            Warning::Truncated(PortDirection::Output) => {
                return write!(f, "Output variable ID strings are truncated.")
            }
            Warning::MissingInputs(ids) => (
                "The following input variables are expected by the model but not supplied:",
                ids,
            ),
            Warning::MismarkedInputs(ids) => (
                "The following input variables are not marked as inputs within the model:",
                ids,
            ),
            Warning::MissingOutputs(ids) => (
                "The following output variables are not provided by the model:",
                ids,
            ),
        };
        writeln!(f, "{heading}")?;
        for id in ids.iter() {
            writeln!(f, "{id}")?;
        }
        Ok(())
    }
}

/// Check a block's input and output identifiers against a model.
///
/// The identifier slices are only read; duplicates collapse into the sets
/// used for reporting. A side with no identifiers is not checked.
pub fn validate<M: Model>(model: &M, inputs: &[VariableId], outputs: &[VariableId]) -> Diagnostics {
    let mut diagnostics = Diagnostics::default();

    if !inputs.is_empty() {
        let model_inputs: BTreeSet<VariableId> = model
            .declared_variables()
            .into_iter()
            .filter(|x| x.is_input)
            .map(|x| x.id)
            .collect();
        let block_inputs: BTreeSet<VariableId> = inputs.iter().cloned().collect();

        diagnostics.missing_inputs = exclusive_to_first(&model_inputs, &block_inputs);
        diagnostics.mismarked_inputs = block_inputs
            .into_iter()
            .filter(|id| match resolve(model, id) {
                Some(handle) => !model.is_input(handle),
                None => false,
            })
            .collect();
    }

    diagnostics.missing_outputs = outputs
        .iter()
        .filter(|id| resolve(model, id).is_none())
        .cloned()
        .collect();

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::example_model::TestModel;

    fn set(ids: &[&str]) -> BTreeSet<VariableId> {
        ids.iter().map(|x| VariableId::from(*x)).collect()
    }

    fn ids(ids: &[&str]) -> Vec<VariableId> {
        ids.iter().map(|x| VariableId::from(*x)).collect()
    }

    #[test]
    fn exclusive_to_first_laws() {
        let a = set(&["gamma", "alpha", "beta"]);
        let b = set(&["beta", "delta"]);

        assert_eq!(exclusive_to_first(&a, &b), set(&["alpha", "gamma"]));
        assert_eq!(exclusive_to_first(&a, &b), exclusive_to_first(&a, &b));
        assert!(exclusive_to_first(&a, &a).is_empty());
        assert_eq!(exclusive_to_first(&a, &BTreeSet::new()), a);
    }

    #[test]
    fn exclusive_to_first_is_sorted() {
        let result = exclusive_to_first(&set(&["zeta", "eta", "theta"]), &set(&[]));
        let names: Vec<String> = result.iter().map(|x| x.to_string()).collect();
        assert_eq!(names, ["eta", "theta", "zeta"]);
    }

    #[test]
    fn consistent_block_has_no_diagnostics() {
        let model = TestModel::new();
        let diagnostics = validate(&model, &ids(&["alpha", "gamma"]), &ids(&["beta", "mach"]));
        assert!(diagnostics.is_empty());
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn each_category_is_reported() {
        let model = TestModel::new();
        // `beta` exists but is an output, `gamma` is never supplied, `q` does not exist
        let diagnostics = validate(&model, &ids(&["alpha", "beta"]), &ids(&["mach", "q"]));

        assert_eq!(diagnostics.missing_inputs, set(&["gamma"]));
        assert_eq!(diagnostics.mismarked_inputs, set(&["beta"]));
        assert_eq!(diagnostics.missing_outputs, set(&["q"]));
        assert_eq!(diagnostics.warnings().len(), 3);
    }

    #[test]
    fn unknown_input_is_not_mismarked() {
        let model = TestModel::new();
        let diagnostics = validate(&model, &ids(&["alpha", "gamma", "unknown"]), &[]);
        assert!(diagnostics.mismarked_inputs.is_empty());
        assert!(diagnostics.missing_inputs.is_empty());
    }

    #[test]
    fn duplicates_collapse() {
        let model = TestModel::new();
        let diagnostics = validate(&model, &ids(&["alpha", "alpha"]), &ids(&["q", "q", "r"]));
        assert_eq!(diagnostics.missing_outputs, set(&["q", "r"]));
        assert_eq!(diagnostics.missing_inputs, set(&["gamma"]));
    }

    #[test]
    fn empty_sides_are_not_checked() {
        let model = TestModel::new();
        let diagnostics = validate(&model, &[], &[]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn empty_identifier_is_a_missing_output() {
        let model = TestModel::new();
        let diagnostics = validate(&model, &[], &ids(&["beta", ""]));
        assert_eq!(diagnostics.missing_outputs, set(&[""]));
    }

    #[test]
    fn message_format() {
        let diagnostics = Diagnostics {
            missing_outputs: set(&["q", "alpha_dot"]),
            ..Default::default()
        };
        let messages: Vec<String> = diagnostics
            .warnings()
            .iter()
            .map(|x| x.to_string())
            .collect();
        assert_eq!(
            messages,
            ["The following output variables are not provided by the model:\nalpha_dot\nq\n"]
        );
    }

    #[test]
    fn truncation_messages() {
        let diagnostics = Diagnostics {
            truncated_inputs: true,
            truncated_outputs: true,
            ..Default::default()
        };
        let messages: Vec<String> = diagnostics
            .warnings()
            .iter()
            .map(|x| x.to_string())
            .collect();
        assert_eq!(
            messages,
            [
                "Input variable ID strings are truncated.",
                "Output variable ID strings are truncated."
            ]
        );
    }
}
