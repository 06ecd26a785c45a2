//! # C ABI for host simulation runtimes
//!
//! A host (an S-Function shim, a co-simulation master, a test rig written in
//! C) drives a block through four calls that mirror its own block lifecycle:
//!
//! 1. `blockbind_port_widths` while sizing ports,
//! 2. `blockbind_block_setup` when the simulation starts,
//! 3. `blockbind_block_outputs` on every evaluation step,
//! 4. `blockbind_block_terminate` when the simulation ends.
//!
//! The block is an opaque pointer owned by the host between setup and
//! terminate. Fatal errors are returned as C strings through an `err_out`
//! pointer and must be released with `blockbind_string_free`. Non-fatal
//! diagnostics are delivered through an optional callback during setup.
//!
//! ## Safety
//!
//! Passing `NULL` where a block or parameter pointer is expected aborts
//! through a panic. Calling anything on a block after
//! `blockbind_block_terminate` is undefined behaviour, as with any freed
//! pointer.

use crate::LinearBlock;
use blockbind_core::errors::{BindError, BindResult};
use blockbind_core::host::{BlockParameters, DiagnosticSink, LogSink, ParameterValue};
use blockbind_core::matrix::CharArray;
use log::error;
use std::ffi::{c_char, c_void, CString};
use std::ptr;

/// `FfiCharArray::class` of a character array.
pub const BLOCKBIND_CLASS_CHAR: u32 = 0;
/// `FfiCharArray::class` of a numeric array.
pub const BLOCKBIND_CLASS_NUMERIC: u32 = 1;

/// A host parameter.
///
/// `data` points to `len` characters in column-major order. For a correctly
/// extracted character array `len == rows * cols`; hosts that truncate pass
/// a shorter `len`. `data` is ignored for non-character classes and may be
/// `NULL` when `len` is zero.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FfiCharArray {
    pub class: u32,
    pub rows: usize,
    pub cols: usize,
    pub data: *const u8,
    pub len: usize,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FfiBlockParameters {
    pub model_path: FfiCharArray,
    pub inputs: FfiCharArray,
    pub outputs: FfiCharArray,
}

/// Receives each setup diagnostic as a NUL-terminated string, valid only for
/// the duration of the call.
pub type FfiWarningCallback = Option<unsafe extern "C" fn(message: *const c_char, context: *mut c_void)>;

/// Opaque block handle.
#[derive(Debug)]
pub struct FfiBlock {
    inner: LinearBlock,
}

impl FfiCharArray {
    unsafe fn to_parameter(self) -> ParameterValue {
        if self.class != BLOCKBIND_CLASS_CHAR {
            return ParameterValue::Numeric {
                rows: self.rows,
                cols: self.cols,
            };
        }
        let data = if self.data.is_null() || self.len == 0 {
            Vec::new()
        } else {
            std::slice::from_raw_parts(self.data, self.len).to_vec()
        };
        ParameterValue::Text(CharArray::new(self.rows, self.cols, data))
    }
}

impl FfiBlockParameters {
    unsafe fn to_parameters(self) -> BlockParameters {
        BlockParameters {
            model_path: self.model_path.to_parameter(),
            inputs: self.inputs.to_parameter(),
            outputs: self.outputs.to_parameter(),
        }
    }
}

struct CallbackSink {
    callback: unsafe extern "C" fn(*const c_char, *mut c_void),
    context: *mut c_void,
}

impl DiagnosticSink for CallbackSink {
    fn warning(&mut self, message: &str) {
        let message = to_c_string(message);
        unsafe { (self.callback)(message.as_ptr(), self.context) }
    }
}

fn to_c_string(message: &str) -> CString {
    CString::new(message.replace('\0', " ")).unwrap_or_default()
}

/// Report `result`'s error through `err_out`. Returns 0 on success, 1 on error.
unsafe fn report<T>(result: &BindResult<T>, err_out: *mut *mut c_char) -> i32 {
    match result {
        Ok(_) => 0,
        Err(e) => {
            error!("{}", e);
            if !err_out.is_null() {
                *err_out = to_c_string(&e.to_string()).into_raw();
            }
            1
        }
    }
}

/// Port widths fixed by the identifier parameters.
///
/// Returns 0 and writes both widths on success, 1 and an error message
/// otherwise.
///
/// # Safety
///
/// `params` must point to valid parameters whose `data` pointers are valid
/// for `len` bytes. `n_inputs` and `n_outputs` must be valid for writes.
/// `err_out` may be `NULL`.
#[no_mangle]
pub unsafe extern "C" fn blockbind_port_widths(
    params: *const FfiBlockParameters,
    n_inputs: *mut usize,
    n_outputs: *mut usize,
    err_out: *mut *mut c_char,
) -> i32 {
    assert!(
        !params.is_null(),
        "called `blockbind_port_widths` with null pointer"
    );
    assert!(
        !n_inputs.is_null() && !n_outputs.is_null(),
        "called `blockbind_port_widths` with null width pointer"
    );

    let result = (*params).to_parameters().port_widths();
    if let Ok((inputs, outputs)) = result {
        *n_inputs = inputs;
        *n_outputs = outputs;
    }
    report(&result, err_out)
}

/// Load the model and bind the block.
///
/// Returns `NULL` on a fatal error, with the message written to `err_out`.
/// Diagnostics go to `warn` when given, otherwise to the log.
///
/// # Safety
///
/// `params` must point to valid parameters whose `data` pointers are valid
/// for `len` bytes. `err_out` may be `NULL`.
#[no_mangle]
pub unsafe extern "C" fn blockbind_block_setup(
    params: *const FfiBlockParameters,
    warn: FfiWarningCallback,
    context: *mut c_void,
    err_out: *mut *mut c_char,
) -> *mut FfiBlock {
    assert!(
        !params.is_null(),
        "called `blockbind_block_setup` with null pointer"
    );
    let params = (*params).to_parameters();

    let result = match warn {
        Some(callback) => LinearBlock::setup(&params, &mut CallbackSink { callback, context }),
        None => LinearBlock::setup(&params, &mut LogSink),
    };
    if report(&result, err_out) != 0 {
        return ptr::null_mut();
    }
    match result {
        Ok(inner) => Box::into_raw(Box::new(FfiBlock { inner })),
        Err(_) => ptr::null_mut(),
    }
}

/// Run one evaluation step.
///
/// `inputs` holds one pointer per input port, as hosts with non-contiguous
/// port storage hand them out. Returns 0 on success, 1 on error.
///
/// # Safety
///
/// `block` must come from `blockbind_block_setup` and not have been
/// terminated. `inputs` must hold `n_inputs` valid pointers and `outputs`
/// must be valid for `n_outputs` writes. `err_out` may be `NULL`.
#[no_mangle]
pub unsafe extern "C" fn blockbind_block_outputs(
    block: *mut FfiBlock,
    inputs: *const *const f64,
    n_inputs: usize,
    outputs: *mut f64,
    n_outputs: usize,
    err_out: *mut *mut c_char,
) -> i32 {
    assert!(
        !block.is_null(),
        "called `blockbind_block_outputs` with null pointer"
    );
    let block = &mut (*block).inner;

    let result = block.port_widths().and_then(|(expected, _)| {
        if expected != n_inputs {
            return Err(BindError::PortWidthMismatch {
                port: "input".to_string(),
                expected,
                actual: n_inputs,
            });
        }
        let output: &mut [f64] = if n_outputs == 0 {
            &mut []
        } else {
            std::slice::from_raw_parts_mut(outputs, n_outputs)
        };
        block.step_with(|i| **inputs.add(i), output)
    });
    report(&result, err_out)
}

/// Tear the block down and free it.
///
/// # Safety
///
/// `block` must come from `blockbind_block_setup` and must not be used
/// afterwards. `NULL` is ignored.
#[no_mangle]
pub unsafe extern "C" fn blockbind_block_terminate(block: *mut FfiBlock) {
    if block.is_null() {
        return;
    }
    let mut block = Box::from_raw(block);
    if let Err(e) = block.inner.teardown() {
        error!("{}", e);
    }
}

/// Free a string returned through an `err_out` pointer.
///
/// # Safety
///
/// `message` must come from this library and must not be freed twice.
/// `NULL` is ignored.
#[no_mangle]
pub unsafe extern "C" fn blockbind_string_free(message: *mut c_char) {
    if !message.is_null() {
        drop(CString::from_raw(message));
    }
}
