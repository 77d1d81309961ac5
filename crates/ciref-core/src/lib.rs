//! Document model and `!reference` marker for pipeline configuration templating.
//!
//! This crate contains:
//! - The generic document tree (mappings, sequences, scalars, markers)
//! - Target paths addressed by reference markers
//! - The `!reference` marker and its argument validation
//! - The error family shared with the resolver

pub mod error;
pub mod path;
pub mod reference;
pub mod value;

pub use error::{ErrorKind, ReferenceError, Result};
pub use path::TargetPath;
pub use reference::Reference;
pub use value::{Mapping, Scalar, Value};
