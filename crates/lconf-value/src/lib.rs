//! Value model for the lconf configuration language: a tree of typed
//! values with fail-fast, typed access.

/// Accessor error types.
pub mod error;

/// Section tree node and the hierarchical access surface.
pub mod section;

/// Scalar values, value kinds, and typed conversion.
pub mod value;

pub use error::AccessError;
pub use section::{Kwarg, Section};
pub use value::{FromScalar, Kind, Scalar};
