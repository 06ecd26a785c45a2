//! Block lifecycle.
//!
//! A [`Block`] is created bound to a model by [`Block::setup`], stepped any
//! number of times, and torn down once:
//!
//! ```text
//! Uninitialized --setup--> Bound --step--> Bound --teardown--> TornDown
//! ```
//!
//! All of the per-block storage (the model, the identifiers and the resolved
//! handles) lives in a single [`BlockState`] owned by the block, so nothing
//! has to be looked up from shared or host-provided slots between calls.

use crate::binding::{PortBinding, PortDirection};
use crate::errors::{BindError, BindResult};
use crate::host::{BlockParameters, DiagnosticSink};
use crate::identifier::VariableId;
use crate::model::Model;
use crate::transfer::{check_width, transfer};
use crate::validate::{validate, Diagnostics};
use log::{debug, info, warn};
use std::path::Path;

/// Where a block is in its lifecycle.
///
/// An uninitialized block has no value at all: [`Block::setup`] either
/// returns a bound block or an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Bound,
    TornDown,
}

/// Everything a bound block owns.
#[derive(Debug)]
pub struct BlockState<M: Model> {
    model: M,
    inputs: PortBinding<M::Handle>,
    outputs: PortBinding<M::Handle>,
}

impl<M: Model> BlockState<M> {
    /// Bind a loaded model to the decoded port identifiers.
    pub fn bind(model: M, input_ids: Vec<VariableId>, output_ids: Vec<VariableId>) -> Self {
        let inputs = PortBinding::bind(&model, input_ids);
        let outputs = PortBinding::bind(&model, output_ids);
        Self {
            model,
            inputs,
            outputs,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn inputs(&self) -> &PortBinding<M::Handle> {
        &self.inputs
    }

    pub fn outputs(&self) -> &PortBinding<M::Handle> {
        &self.outputs
    }

    /// Release the model, then the input and output bindings.
    fn release(self) {
        let BlockState {
            model,
            inputs,
            outputs,
        } = self;
        drop(model);
        drop(inputs);
        drop(outputs);
    }
}

/// A host block bound to a model.
#[derive(Debug)]
pub struct Block<M: Model> {
    state: Option<BlockState<M>>,
    diagnostics: Diagnostics,
}

impl<M: Model> Block<M> {
    /// Load the model, decode and bind the port identifiers and check them.
    ///
    /// Only parameter type errors and model construction failures are fatal.
    /// Everything else is reported through `sink` (and logged) and setup
    /// carries on.
    pub fn setup(params: &BlockParameters, sink: &mut impl DiagnosticSink) -> BindResult<Self> {
        let input_array = params.identifier_array(PortDirection::Input)?;
        let output_array = params.identifier_array(PortDirection::Output)?;
        let path = params.model_path()?;

        let model = load_model::<M>(Path::new(&path))?;

        let inputs = input_array.identifiers();
        let outputs = output_array.identifiers();
        let input_ids = inputs.matrix.decode();
        let output_ids = outputs.matrix.decode();
        debug!("Input variable IDs: {:?}", input_ids);
        debug!("Output variable IDs: {:?}", output_ids);

        let mut diagnostics = validate(&model, &input_ids, &output_ids);
        diagnostics.truncated_inputs = inputs.truncated;
        diagnostics.truncated_outputs = outputs.truncated;

        let block = Self::from_state(BlockState::bind(model, input_ids, output_ids), diagnostics);
        block.report(sink);
        Ok(block)
    }

    /// Wrap an already bound state.
    pub fn from_state(state: BlockState<M>, diagnostics: Diagnostics) -> Self {
        debug!(
            "Bound {}/{} inputs and {}/{} outputs",
            state.inputs.resolved_count(),
            state.inputs.len(),
            state.outputs.resolved_count(),
            state.outputs.len(),
        );
        Self {
            state: Some(state),
            diagnostics,
        }
    }

    fn report(&self, sink: &mut impl DiagnosticSink) {
        for warning in self.diagnostics.warnings() {
            let message = warning.to_string();
            warn!("{}", message.trim_end());
            sink.warning(&message);
        }
    }

    pub fn lifecycle(&self) -> LifecycleState {
        match self.state {
            Some(_) => LifecycleState::Bound,
            None => LifecycleState::TornDown,
        }
    }

    pub fn state(&self) -> BindResult<&BlockState<M>> {
        self.state.as_ref().ok_or(BindError::TornDown)
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn model(&self) -> BindResult<&M> {
        self.state().map(|x| &x.model)
    }

    pub fn input_ids(&self) -> BindResult<&[VariableId]> {
        self.state().map(|x| x.inputs.ids())
    }

    pub fn output_ids(&self) -> BindResult<&[VariableId]> {
        self.state().map(|x| x.outputs.ids())
    }

    /// Port widths as `(inputs, outputs)`.
    pub fn port_widths(&self) -> BindResult<(usize, usize)> {
        self.state().map(|x| (x.inputs.len(), x.outputs.len()))
    }

    /// Run one evaluation step from a contiguous input buffer.
    pub fn step(&mut self, input: &[f64], output: &mut [f64]) -> BindResult<()> {
        let state = self.state.as_ref().ok_or(BindError::TornDown)?;
        check_width(PortDirection::Input, state.inputs.len(), input.len())?;
        self.step_with(|i| input[i], output)
    }

    /// Run one evaluation step, reading input port `i` through `input(i)`.
    pub fn step_with<F: Fn(usize) -> f64>(&mut self, input: F, output: &mut [f64]) -> BindResult<()> {
        let state = self.state.as_mut().ok_or(BindError::TornDown)?;
        transfer(&mut state.model, &state.inputs, &state.outputs, input, output)
    }

    /// Release the model and the bindings. Valid exactly once.
    pub fn teardown(&mut self) -> BindResult<()> {
        let state = self.state.take().ok_or(BindError::TornDown)?;
        state.release();
        info!("Block torn down");
        Ok(())
    }
}

fn load_model<M: Model>(path: &Path) -> BindResult<M> {
    match M::load(path) {
        Ok(model) => {
            info!("Loaded model from {}", path.display());
            Ok(model)
        }
        Err(e) => Err(BindError::ModelLoad(e.to_string())),
    }
}
