//! The contract a model interpreter exposes to a block.
//!
//! A block never evaluates anything itself. It looks variables up by name,
//! writes inputs and reads outputs. Any propagation from inputs to outputs
//! (eager or lazy) is the model's own business.

use crate::identifier::VariableId;
use std::path::Path;

/// A variable as declared by the model, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredVariable {
    pub id: VariableId,
    /// The model marks this variable as an input (independent variable).
    pub is_input: bool,
}

impl DeclaredVariable {
    pub fn new(id: impl Into<VariableId>, is_input: bool) -> Self {
        Self {
            id: id.into(),
            is_input,
        }
    }
}

/// A model exposing a directory of named variables.
pub trait Model: Sized {
    /// Non-owning reference into the model's variable directory.
    ///
    /// Handles stay valid for the lifetime of the model instance that issued
    /// them.
    type Handle: Copy + std::fmt::Debug;

    type Error: std::error::Error;

    /// Construct a model from the description stored at `path`.
    fn load(path: &Path) -> Result<Self, Self::Error>;

    /// Look up a variable by identifier.
    fn find(&self, id: &str) -> Option<Self::Handle>;

    /// Every variable the model declares.
    fn declared_variables(&self) -> Vec<DeclaredVariable>;

    /// Whether the variable behind `handle` is marked as an input.
    fn is_input(&self, handle: Self::Handle) -> bool;

    /// Write a value, in the model's canonical (metric) units.
    fn set_value(&mut self, handle: Self::Handle, value: f64);

    /// Read a value, in the model's canonical (metric) units.
    ///
    /// Lazy models recompute stale values here, hence `&mut self`.
    fn get_value(&mut self, handle: Self::Handle) -> f64;
}
