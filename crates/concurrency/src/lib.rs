//! Concurrency layer for contracted procedures
//!
//! This crate holds the state that contracted calls share across threads
//! and the state they must never share:
//! - CallScopeStack: thread-local, per-instance stacks of call frames
//! - ScopeGuard: RAII pop, so every push is paired with exactly one pop
//! - ContractRegistry: name → procedure map safe for concurrent redefinition

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod registry;
pub mod scope;

pub use registry::{ContractRegistry, Contracted};
pub use scope::{CallFrame, CallScopeStack, ScopeGuard};
