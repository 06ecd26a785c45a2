//! Reference models for blockbind.
//!
//! [`LinearModel`] implements [`blockbind_core::model::Model`] over a small
//! TOML description in which every non-input variable is a linear
//! combination of other variables:
//!
//! ```toml
//! [[variable]]
//! id = "alpha"
//! input = true
//! units = "rad"
//!
//! [[variable]]
//! id = "cl"
//! offset = 0.2
//! terms = [{ id = "alpha", gain = 5.7 }]
//! ```
//!
//! It is enough to drive a block end to end without a full model
//! interpreter, and it evaluates lazily the way such interpreters do.

pub mod description;
pub mod errors;
pub mod linear;

pub use description::ModelDescription;
pub use errors::{LinearModelError, LinearModelResult};
pub use linear::{LinearModel, VariableIndex};
