//! Contract types
//!
//! This module contains the declaration side of a contracted procedure:
//!
//! - `value_type`: single type descriptors and named capabilities
//! - `type_spec`: per-parameter type shapes and the type matcher
//! - `parameter`: ordered parameter contracts and their builder
//!
//! ## Usage
//!
//! ```
//! use tacit_core::contract::{default_of, ParameterContract, Type, TypeSpec};
//! ```

pub mod parameter;
pub mod type_spec;
pub mod value_type;

// Re-exports
pub use parameter::{ContractBuilder, Declaration, Parameter, ParameterContract, BLOCK_PARAM};
pub use type_spec::{default_of, matches, TypeSpec};
pub use value_type::{Capability, Type};
