//! Future and promise handles
//!
//! Both handle kinds observe a single completion cell that accepts exactly
//! one outcome, a value or an error. The completing side is a [`Resolver`];
//! resolving consumes it, so a second outcome cannot be delivered through
//! the same resolver. A resolver dropped without resolving rejects its cell,
//! so a waiter can never block on a body that will not run.

use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tacit_core::{Error, Result, Value};
use tracing::warn;

type Outcome = Result<Value>;
type Callback = Box<dyn FnOnce(&Outcome) + Send + 'static>;

/// Observable state of a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    /// No outcome yet
    Pending,
    /// Completed with a value
    Fulfilled,
    /// Completed with an error
    Rejected,
}

#[derive(Default)]
struct CellState {
    outcome: Option<Outcome>,
    callbacks: Vec<Callback>,
}

#[derive(Default)]
struct Completion {
    state: Mutex<CellState>,
    ready: Condvar,
}

impl Completion {
    /// Store the outcome, wake waiters, then run callbacks outside the lock
    fn complete(&self, outcome: Outcome) -> bool {
        let callbacks = {
            let mut state = self.state.lock();
            if state.outcome.is_some() {
                warn!("completion already settled; outcome discarded");
                return false;
            }
            state.outcome = Some(outcome.clone());
            std::mem::take(&mut state.callbacks)
        };
        self.ready.notify_all();
        for callback in callbacks {
            callback(&outcome);
        }
        true
    }

    fn on_complete(&self, callback: Callback) {
        let mut state = self.state.lock();
        if let Some(outcome) = state.outcome.clone() {
            drop(state);
            callback(&outcome);
        } else {
            state.callbacks.push(callback);
        }
    }

    fn peek(&self) -> Option<Outcome> {
        self.state.lock().outcome.clone()
    }

    fn wait(&self) -> Outcome {
        let mut state = self.state.lock();
        loop {
            if let Some(outcome) = &state.outcome {
                return outcome.clone();
            }
            self.ready.wait(&mut state);
        }
    }

    fn wait_timeout(&self, timeout: Duration) -> Option<Outcome> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        loop {
            if let Some(outcome) = &state.outcome {
                return Some(outcome.clone());
            }
            if self.ready.wait_until(&mut state, deadline).timed_out() {
                return state.outcome.clone();
            }
        }
    }

    fn state(&self) -> HandleState {
        match &self.state.lock().outcome {
            None => HandleState::Pending,
            Some(Ok(_)) => HandleState::Fulfilled,
            Some(Err(_)) => HandleState::Rejected,
        }
    }
}

/// Completing side of a handle
///
/// Exactly one of [`resolve`](Self::resolve), [`reject`](Self::reject) or
/// [`settle`](Self::settle) can be called.
pub struct Resolver {
    completion: Option<Arc<Completion>>,
}

impl Resolver {
    /// Fulfil with `value`
    pub fn resolve(self, value: Value) {
        self.settle(Ok(value));
    }

    /// Reject with `error`
    pub fn reject(self, error: Error) {
        self.settle(Err(error));
    }

    /// Deliver `outcome` as-is
    pub fn settle(mut self, outcome: Result<Value>) {
        if let Some(completion) = self.completion.take() {
            completion.complete(outcome);
        }
    }
}

impl Drop for Resolver {
    fn drop(&mut self) {
        if let Some(completion) = self.completion.take() {
            completion.complete(Err(Error::body("resolver dropped before settling")));
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("settled", &self.completion.is_none())
            .finish()
    }
}

macro_rules! observer_methods {
    () => {
        /// Current state, without blocking
        pub fn state(&self) -> HandleState {
            self.completion.state()
        }

        /// Whether an outcome has been delivered
        pub fn is_complete(&self) -> bool {
            self.state() != HandleState::Pending
        }

        /// Block until the outcome is available
        pub fn wait(&self) -> Result<Value> {
            self.completion.wait()
        }

        /// Block for at most `timeout`; `None` if still pending
        pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<Value>> {
            self.completion.wait_timeout(timeout)
        }

        /// Outcome if already delivered
        pub fn try_outcome(&self) -> Option<Result<Value>> {
            self.completion.peek()
        }

        /// Block, then return the value; `None` on rejection
        pub fn value(&self) -> Option<Value> {
            self.wait().ok()
        }

        /// Block, then return the error; `None` on fulfilment
        pub fn reason(&self) -> Option<Error> {
            self.wait().err()
        }
    };
}

/// Handle to the eventual result of a future procedure
#[derive(Clone)]
pub struct FutureHandle {
    completion: Arc<Completion>,
}

impl FutureHandle {
    pub(crate) fn pending() -> (Self, Resolver) {
        let completion = Arc::new(Completion::default());
        (
            Self {
                completion: Arc::clone(&completion),
            },
            Resolver {
                completion: Some(completion),
            },
        )
    }

    observer_methods!();
}

impl fmt::Debug for FutureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FutureHandle")
            .field("state", &self.state())
            .finish()
    }
}

/// Handle to the eventual result of a promise procedure
///
/// ```
/// use tacit_engine::PromiseHandle;
/// use tacit_core::Value;
///
/// let (promise, resolver) = PromiseHandle::pending();
/// let doubled = promise.then(|v| Ok(Value::Int(v.as_int().unwrap_or(0) * 2)));
/// resolver.resolve(Value::Int(21));
/// assert_eq!(doubled.wait().unwrap(), Value::Int(42));
/// ```
#[derive(Clone)]
pub struct PromiseHandle {
    completion: Arc<Completion>,
}

impl PromiseHandle {
    /// A pending promise and the resolver that completes it
    pub fn pending() -> (Self, Resolver) {
        let completion = Arc::new(Completion::default());
        (
            Self {
                completion: Arc::clone(&completion),
            },
            Resolver {
                completion: Some(completion),
            },
        )
    }

    /// A promise already fulfilled with `value`
    pub fn fulfilled(value: Value) -> Self {
        let (promise, resolver) = Self::pending();
        resolver.resolve(value);
        promise
    }

    /// A promise already rejected with `error`
    pub fn rejected(error: Error) -> Self {
        let (promise, resolver) = Self::pending();
        resolver.reject(error);
        promise
    }

    observer_methods!();

    /// Derived promise: `f` applied to the value; rejection passes through
    ///
    /// `f` runs on the thread that completes this promise, or immediately
    /// if it is already complete.
    pub fn then<F>(&self, f: F) -> PromiseHandle
    where
        F: FnOnce(Value) -> Result<Value> + Send + 'static,
    {
        let (derived, resolver) = Self::pending();
        self.completion.on_complete(Box::new(move |outcome| match outcome {
            Ok(value) => resolver.settle(f(value.clone())),
            Err(error) => resolver.reject(error.clone()),
        }));
        derived
    }

    /// Derived promise: `f` applied to the error; fulfilment passes through
    pub fn rescue<F>(&self, f: F) -> PromiseHandle
    where
        F: FnOnce(Error) -> Result<Value> + Send + 'static,
    {
        let (derived, resolver) = Self::pending();
        self.completion.on_complete(Box::new(move |outcome| match outcome {
            Ok(value) => resolver.resolve(value.clone()),
            Err(error) => resolver.settle(f(error.clone())),
        }));
        derived
    }
}

impl fmt::Debug for PromiseHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromiseHandle")
            .field("state", &self.state())
            .finish()
    }
}
