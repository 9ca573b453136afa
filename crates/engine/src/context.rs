//! Body execution context
//!
//! A [`Context`] is what a procedure body sees. Bare parameter names are
//! resolved through it:
//!
//! 1. the innermost call frame of this instance on this thread, if the
//!    executing procedure declares any parameters
//! 2. the instance's ordinary fields
//! 3. otherwise `UnresolvedName`
//!
//! Because only the innermost frame is consulted, a body always sees its
//! own invocation's arguments, never its caller's.

use crate::instance::Instance;
use crate::output::Output;
use crate::procedure::Procedure;
use std::marker::PhantomData;
use std::sync::Arc;
use tacit_concurrency::CallScopeStack;
use tacit_core::{Block, Error, Result, Value, BLOCK_PARAM};

/// View of the running invocation, handed to its body
///
/// Tied to the thread the body runs on, so it is neither `Send` nor `Sync`.
pub struct Context<'a> {
    instance: &'a Arc<Instance>,
    procedure: &'a Procedure,
    _not_send: PhantomData<*const ()>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(instance: &'a Arc<Instance>, procedure: &'a Procedure) -> Self {
        Self {
            instance,
            procedure,
            _not_send: PhantomData,
        }
    }

    /// Resolve a bare name, failing with `UnresolvedName` on a miss
    pub fn get(&self, name: &str) -> Result<Value> {
        self.lookup(name).ok_or_else(|| Error::UnresolvedName {
            name: name.to_string(),
        })
    }

    /// Resolve a bare name
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if !self.procedure.contract().is_empty() {
            if let Some(value) = CallScopeStack::resolve(self.instance.id(), name) {
                return Some(value);
            }
        }
        self.instance.field(name)
    }

    /// The block bound to the `block` parameter
    pub fn block(&self) -> Result<Block> {
        self.get(BLOCK_PARAM)?
            .as_block()
            .cloned()
            .ok_or_else(|| Error::UnresolvedName {
                name: BLOCK_PARAM.to_string(),
            })
    }

    /// Call the bound block with `args`
    pub fn yield_block(&self, args: &[Value]) -> Result<Value> {
        self.block()?.call(args)
    }

    /// Invoke another procedure (or this one, recursively) on the same instance
    pub fn call(&self, name: &str, args: Vec<Value>) -> Result<Output> {
        self.instance.call(name, args)
    }

    /// Invoke a procedure on the same instance, passing a trailing block
    pub fn call_with_block(&self, name: &str, args: Vec<Value>, block: Block) -> Result<Output> {
        self.instance.call_with_block(name, args, block)
    }

    /// Instance the body runs against
    pub fn instance(&self) -> &Arc<Instance> {
        self.instance
    }

    /// Name of the executing procedure
    pub fn procedure_name(&self) -> &str {
        self.procedure.name()
    }

    /// Frames active for this instance on this thread
    pub fn depth(&self) -> usize {
        CallScopeStack::depth(self.instance.id())
    }
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("instance", &self.instance.id())
            .field("procedure", &self.procedure.name())
            .finish()
    }
}
