//! Shared library that host simulation runtimes load to run a
//! [`LinearModel`] as a block.
//!
//! The binding logic lives in `blockbind-core` and the model in
//! `blockbind-models`. This crate only wires the two together and exposes
//! them through the C ABI in [`ffi`].

pub mod ffi;

pub use blockbind_core::{Block, LifecycleState, VariableId};
pub use blockbind_models::{LinearModel, LinearModelError};

/// The block type exported through [`ffi`].
pub type LinearBlock = Block<LinearModel>;
