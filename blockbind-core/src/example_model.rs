use crate::identifier::VariableId;
use crate::model::{DeclaredVariable, Model};
use std::path::Path;
use thiserror::Error;

// ============================================================================
// TestModel - a minimal in-memory variable directory for unit tests
// ============================================================================

/// Path that [`TestModel::load`] accepts.
pub(crate) const TEST_MODEL_PATH: &str = "test-model";

#[derive(Error, Debug)]
pub(crate) enum TestModelError {
    #[error("Could not open model description \"{0}\"")]
    NotFound(String),
}

#[derive(Debug)]
struct TestVariable {
    id: VariableId,
    is_input: bool,
    value: f64,
    /// Computed as `value of source + offset` whenever read
    source: Option<(usize, f64)>,
}

/// Variables:
/// - `alpha`, `gamma`: inputs
/// - `beta`: output, `alpha + 1`
/// - `mach`: output, `gamma * 1` (offset 0)
#[derive(Debug)]
pub(crate) struct TestModel {
    variables: Vec<TestVariable>,
    pub reads: usize,
}

impl TestModel {
    pub fn new() -> Self {
        let variable = |id: &str, is_input, source| TestVariable {
            id: VariableId::from(id),
            is_input,
            value: 0.0,
            source,
        };
        Self {
            variables: vec![
                variable("alpha", true, None),
                variable("beta", false, Some((0, 1.0))),
                variable("gamma", true, None),
                variable("mach", false, Some((2, 0.0))),
            ],
            reads: 0,
        }
    }
}

impl Model for TestModel {
    type Handle = usize;
    type Error = TestModelError;

    fn load(path: &Path) -> Result<Self, Self::Error> {
        match path.to_str() {
            Some(TEST_MODEL_PATH) => Ok(Self::new()),
            _ => Err(TestModelError::NotFound(path.display().to_string())),
        }
    }

    fn find(&self, id: &str) -> Option<usize> {
        self.variables.iter().position(|x| x.id.as_bytes() == id.as_bytes())
    }

    fn declared_variables(&self) -> Vec<DeclaredVariable> {
        self.variables
            .iter()
            .map(|x| DeclaredVariable::new(x.id.clone(), x.is_input))
            .collect()
    }

    fn is_input(&self, handle: usize) -> bool {
        self.variables[handle].is_input
    }

    fn set_value(&mut self, handle: usize, value: f64) {
        self.variables[handle].value = value;
    }

    fn get_value(&mut self, handle: usize) -> f64 {
        self.reads += 1;
        let variable = &self.variables[handle];
        match variable.source {
            Some((source, offset)) => self.variables[source].value + offset,
            None => variable.value,
        }
    }
}
