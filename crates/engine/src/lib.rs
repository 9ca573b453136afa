//! Invocation engine for contracted procedures
//!
//! This crate ties the lower layers together:
//! - ContractType / Instance: defining types and the objects they create
//! - ProcedureBuilder: registration of contracted procedures
//! - ExecutionStrategy: immediate, future and promise execution
//! - Context: bare-name resolution inside a body
//! - FutureHandle / PromiseHandle: results of asynchronous procedures
//! - BackgroundScheduler: worker pool for asynchronous bodies
//! - EngineConfig: `tacit.toml` configuration
//!
//! The engine is the only component that pushes and pops call frames.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod context;
pub mod contract_type;
pub mod handle;
pub mod instance;
pub mod output;
pub mod procedure;
pub mod scheduler;
pub mod strategy;

pub use config::{EngineConfig, CONFIG_FILE_NAME};
pub use context::Context;
pub use contract_type::ContractType;
pub use handle::{FutureHandle, HandleState, PromiseHandle, Resolver};
pub use instance::Instance;
pub use output::Output;
pub use procedure::{Body, Procedure, ProcedureBuilder, ProcedureTable};
pub use scheduler::{default_scheduler, BackgroundScheduler, SchedulerStats, Spawn, Task, ThreadPerTask};
pub use strategy::ExecutionStrategy;
