//! Per-step value transfer between host buffers and model variables.

use crate::binding::{PortBinding, PortDirection};
use crate::errors::{BindError, BindResult};
use crate::model::Model;

/// Write the host inputs into the model, then read the outputs back.
///
/// `input` returns the host value for input port `i`; it is only called for
/// ports with a resolved handle. `output` must be exactly as long as the
/// output binding. Output slots of unresolved ports are left untouched.
///
/// No evaluation is triggered here. A lazy model recomputes on read.
pub fn transfer<M, F>(
    model: &mut M,
    inputs: &PortBinding<M::Handle>,
    outputs: &PortBinding<M::Handle>,
    input: F,
    output: &mut [f64],
) -> BindResult<()>
where
    M: Model,
    F: Fn(usize) -> f64,
{
    check_width(PortDirection::Output, outputs.len(), output.len())?;

    for (i, handle) in inputs.handles().iter().enumerate() {
        if let Some(handle) = handle {
            model.set_value(*handle, input(i));
        }
    }

    for (slot, handle) in output.iter_mut().zip(outputs.handles().iter()) {
        if let Some(handle) = handle {
            *slot = model.get_value(*handle);
        }
    }

    Ok(())
}

/// [`transfer`] from a contiguous host input buffer.
pub fn transfer_slice<M: Model>(
    model: &mut M,
    inputs: &PortBinding<M::Handle>,
    outputs: &PortBinding<M::Handle>,
    input: &[f64],
    output: &mut [f64],
) -> BindResult<()> {
    check_width(PortDirection::Input, inputs.len(), input.len())?;
    transfer(model, inputs, outputs, |i| input[i], output)
}

pub(crate) fn check_width(port: PortDirection, expected: usize, actual: usize) -> BindResult<()> {
    if expected != actual {
        return Err(BindError::PortWidthMismatch {
            port: port.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}
