//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::sync::{Arc, Once};
pub use tacit::{
    default_of, BackgroundScheduler, ContractType, EngineConfig, Error, Instance, Output,
    ParameterContract, Spawn, ThreadPerTask, Type, Value,
};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Route engine logs through the test harness; filter with RUST_LOG.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Fixtures
// ============================================================================

/// A small dedicated worker pool, so suites don't share queue state.
pub fn test_scheduler() -> Arc<BackgroundScheduler> {
    Arc::new(BackgroundScheduler::new(4, 1024).expect("Failed to start test scheduler"))
}

/// A fresh type backed by its own worker pool.
pub fn new_type(name: &str) -> ContractType {
    init_tracing();
    ContractType::with_scheduler(name, test_scheduler())
}

/// `(message: String, level: Symbol = :debug)`
pub fn log_contract() -> ParameterContract {
    ParameterContract::builder()
        .param("message", Type::String)
        .param("level", default_of(Value::symbol("debug"), [Type::Symbol]))
        .build()
        .expect("Failed to build log contract")
}

/// A type with `log` returning "<message> <level>".
pub fn greeter() -> ContractType {
    let greeter = new_type("Greeter");
    greeter
        .define("log", log_contract(), |ctx| {
            Ok(Value::from(format!("{} {}", ctx.get("message")?, ctx.get("level")?)))
        })
        .expect("Failed to define log");
    greeter
}

/// Call and wait, panicking on any error.
pub fn call_ok(instance: &Arc<Instance>, name: &str, args: Vec<Value>) -> Value {
    instance
        .call(name, args)
        .and_then(Output::wait)
        .unwrap_or_else(|e| panic!("{} failed: {}", name, e))
}
