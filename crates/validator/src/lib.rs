#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod std_impl;

pub use error::*;
pub mod extras;

/// Structural validation of a value, producing a tree of field
/// errors mirroring the shape of the validated data.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidateError>;
}

pub trait HasLength {
    fn length(&self) -> usize;
}
