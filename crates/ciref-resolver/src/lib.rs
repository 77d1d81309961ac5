//! `!reference` resolution for pipeline configuration documents.
//!
//! This crate handles:
//! - Resolver configuration (nesting limit, strict output check)
//! - Replacing every reference marker with the value at its target path
//! - Detecting missing targets and circular reference chains

pub mod config;
pub mod resolver;

pub use ciref_core::{ErrorKind, Mapping, Reference, ReferenceError, Result, TargetPath, Value};
pub use config::{ResolverConfig, ResolverConfigBuilder};
pub use resolver::{ResolutionStats, Resolver};
