//! Binding between a host simulation block and a named-variable model.
//!
//! A block declares its input and output ports as fixed-width identifier
//! matrices. At setup those identifiers are decoded, resolved against the
//! model's variable directory and checked for consistency. Every step then
//! copies host inputs into the model and model outputs back into the host.
//!
//! The model itself is an external collaborator reached through the
//! [`model::Model`] trait.

pub mod binding;
pub mod block;
pub mod config;
#[cfg(test)]
mod example_model;
pub mod host;
pub mod identifier;
pub mod matrix;
pub mod model;
pub mod transfer;
pub mod validate;

pub mod errors;

pub use block::{Block, BlockState, LifecycleState};
pub use identifier::VariableId;
