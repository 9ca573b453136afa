//! Invocation results

use crate::handle::{FutureHandle, PromiseHandle};
use tacit_core::{Result, Value};

/// What a call returns, depending on the procedure's strategy
#[derive(Debug, Clone)]
pub enum Output {
    /// Immediate: the body's result
    Value(Value),
    /// Future: a handle to the eventual result
    Future(FutureHandle),
    /// Promise: a handle to the eventual result
    Promise(PromiseHandle),
}

impl Output {
    /// The result, blocking on a handle if necessary
    pub fn wait(self) -> Result<Value> {
        match self {
            Output::Value(value) => Ok(value),
            Output::Future(future) => future.wait(),
            Output::Promise(promise) => promise.wait(),
        }
    }

    /// Whether the body runs elsewhere
    pub fn is_async(&self) -> bool {
        !matches!(self, Output::Value(_))
    }

    /// Immediate result, if any
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Output::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Immediate result, if any
    pub fn into_value(self) -> Option<Value> {
        match self {
            Output::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Future handle, if any
    pub fn into_future(self) -> Option<FutureHandle> {
        match self {
            Output::Future(future) => Some(future),
            _ => None,
        }
    }

    /// Promise handle, if any
    pub fn into_promise(self) -> Option<PromiseHandle> {
        match self {
            Output::Promise(promise) => Some(promise),
            _ => None,
        }
    }
}

impl From<Value> for Output {
    fn from(value: Value) -> Self {
        Output::Value(value)
    }
}
