//! Execution strategies
//!
//! All three strategies share one discipline: bind on the caller's thread,
//! push the frame on the thread that runs the body, pop it on every exit.
//!
//! - `Immediate` runs the body on the caller's thread and returns its result
//! - `Future` and `Promise` hand the body to the instance's scheduler and
//!   return a handle at once; the worker pushes the frame onto its own stack
//!
//! Binding failures always surface synchronously, before anything is
//! scheduled. Body failures propagate for `Immediate` and are captured into
//! the handle otherwise. A body that panics on a worker rejects its handle
//! with `Panicked`.

use crate::context::Context;
use crate::handle::{FutureHandle, PromiseHandle, Resolver};
use crate::instance::Instance;
use crate::output::Output;
use crate::procedure::Procedure;
use crate::scheduler::Task;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tacit_concurrency::{CallFrame, CallScopeStack};
use tacit_core::{bind, Binding, Block, Error, Result, Value};
use tracing::{debug, error};

/// How a procedure's body is run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExecutionStrategy {
    /// Synchronously, on the calling thread
    #[default]
    Immediate,
    /// On a scheduler worker; the caller gets a `FutureHandle`
    Future,
    /// On a scheduler worker; the caller gets a `PromiseHandle`
    Promise,
}

impl ExecutionStrategy {
    /// Lowercase name
    pub const fn name(&self) -> &'static str {
        match self {
            ExecutionStrategy::Immediate => "immediate",
            ExecutionStrategy::Future => "future",
            ExecutionStrategy::Promise => "promise",
        }
    }
}

impl std::fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Bind `args` and run `procedure` against `instance` per its strategy
pub(crate) fn invoke(
    instance: &Arc<Instance>,
    procedure: Arc<Procedure>,
    args: Vec<Value>,
    block: Option<Block>,
) -> Result<Output> {
    let binding = bind_arguments(&procedure, args, block)?;

    match procedure.strategy() {
        ExecutionStrategy::Immediate => run_body(instance, &procedure, binding).map(Output::Value),
        ExecutionStrategy::Future => {
            let (future, resolver) = FutureHandle::pending();
            schedule(instance, procedure, binding, resolver)?;
            Ok(Output::Future(future))
        }
        ExecutionStrategy::Promise => {
            let (promise, resolver) = PromiseHandle::pending();
            schedule(instance, procedure, binding, resolver)?;
            Ok(Output::Promise(promise))
        }
    }
}

/// `None` for a zero-parameter call with no arguments: no frame is needed
fn bind_arguments(procedure: &Procedure, args: Vec<Value>, block: Option<Block>) -> Result<Option<Binding>> {
    if procedure.contract().is_empty() && args.is_empty() {
        return Ok(None);
    }
    bind(procedure.contract(), args, block)
        .map(Some)
        .map_err(|e| {
            debug!(procedure = procedure.name(), error = %e, "argument binding failed");
            e
        })
}

fn run_body(instance: &Arc<Instance>, procedure: &Procedure, binding: Option<Binding>) -> Result<Value> {
    let _scope = binding.map(|binding| {
        let frame = CallFrame::new(
            Arc::clone(procedure.name_arc()),
            Arc::clone(procedure.contract()),
            binding,
        );
        CallScopeStack::enter(instance.id(), frame)
    });
    let context = Context::new(instance, procedure);
    (procedure.body())(&context)
}

fn schedule(
    instance: &Arc<Instance>,
    procedure: Arc<Procedure>,
    binding: Option<Binding>,
    resolver: Resolver,
) -> Result<()> {
    let instance = Arc::clone(instance);
    let scheduler = Arc::clone(instance.scheduler());
    let task: Task = Box::new(move || {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| run_body(&instance, &procedure, binding)))
            .unwrap_or_else(|payload| {
                let reason = panic_reason(payload.as_ref());
                error!(procedure = procedure.name(), %reason, "contracted body panicked");
                Err(Error::Panicked { reason })
            });
        resolver.settle(outcome);
    });
    // A refused task is dropped unrun; its resolver rejects the unreturned handle
    scheduler.spawn(task)
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "(non-string panic)".to_string()
    }
}
