//! Core types for tacit
//!
//! This crate defines the foundational types used throughout the system:
//! - Value / Block: Dynamic argument values and trailing blocks
//! - Type / Capability: Single type descriptors
//! - TypeSpec: Per-parameter type shapes (single, union, default, block)
//! - ParameterContract: Ordered, immutable parameter lists
//! - Binding / bind: Validated per-invocation argument bindings
//! - InstanceId: Identity of objects that own call-scope stacks
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binder;
pub mod binding;
pub mod contract;
pub mod error;
pub mod types;
pub mod value;

// Re-export commonly used types
pub use binder::bind;
pub use binding::Binding;
pub use contract::{
    default_of, matches, Capability, ContractBuilder, Declaration, Parameter, ParameterContract,
    Type, TypeSpec, BLOCK_PARAM,
};
pub use error::{Error, Result};
pub use types::InstanceId;
pub use value::{Block, BlockFn, Value};
