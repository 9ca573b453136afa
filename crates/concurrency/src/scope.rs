//! Thread-local call-scope stacks
//!
//! Every (owning instance, thread) pair has its own LIFO stack of
//! [`CallFrame`]s. A body resolves a bare parameter name against the top
//! frame of the stack for its own instance on the thread it is running on,
//! which is always the frame its own invocation pushed.
//!
//! # Isolation
//!
//! Stacks live in thread-local storage keyed by [`InstanceId`], so:
//! - two threads calling into the same instance never see each other's frames
//! - two instances on the same thread never see each other's frames
//! - no lock is taken on the push/resolve/pop path
//!
//! A stack is created lazily on first push and removed when its last frame
//! is popped, so idle (instance, thread) pairs hold no memory.
//!
//! # Example
//!
//! ```ignore
//! let _guard = CallScopeStack::enter(owner, frame);
//! // ... run the body; CallScopeStack::resolve(owner, "message") sees the frame ...
//! // guard drops here → frame popped, even if the body panicked
//! ```

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;
use tacit_core::{Binding, InstanceId, ParameterContract, Value};
use tracing::trace;

thread_local! {
    /// Per-thread stacks, one per owning instance that has an active call
    static CALL_SCOPES: RefCell<FxHashMap<InstanceId, Vec<CallFrame>>> =
        RefCell::new(FxHashMap::default());
}

/// One active invocation: which procedure is running, and its binding
#[derive(Debug, Clone)]
pub struct CallFrame {
    procedure: Arc<str>,
    contract: Arc<ParameterContract>,
    binding: Binding,
}

impl CallFrame {
    /// Create a frame for `procedure`, validated against `contract`
    pub fn new(procedure: Arc<str>, contract: Arc<ParameterContract>, binding: Binding) -> Self {
        Self {
            procedure,
            contract,
            binding,
        }
    }

    /// Name of the executing procedure
    pub fn procedure(&self) -> &str {
        &self.procedure
    }

    /// Contract the binding was produced from
    pub fn contract(&self) -> &ParameterContract {
        &self.contract
    }

    /// Bound arguments
    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Value bound to `name`, if the procedure declares it
    pub fn resolve(&self, name: &str) -> Option<&Value> {
        if !self.contract.contains(name) {
            return None;
        }
        self.binding.get(name)
    }
}

/// Call-scope stack operations
///
/// Provides thread-local, per-instance stacks of [`CallFrame`]s. All
/// operations act on the calling thread's stacks only.
pub struct CallScopeStack;

impl CallScopeStack {
    /// Push a frame and return a guard that pops it when dropped
    ///
    /// This is the only way the engine pushes frames: the guard guarantees
    /// exactly one pop per push on every exit path, unwinding included.
    pub fn enter(owner: InstanceId, frame: CallFrame) -> ScopeGuard {
        Self::push(owner, frame);
        ScopeGuard {
            owner,
            _not_send: PhantomData,
        }
    }

    /// Push a frame onto `owner`'s stack for this thread
    ///
    /// Returns the stack depth after the push.
    pub fn push(owner: InstanceId, frame: CallFrame) -> usize {
        CALL_SCOPES.with(|scopes| {
            let mut scopes = scopes.borrow_mut();
            let stack = scopes.entry(owner).or_default();
            trace!(%owner, procedure = frame.procedure(), depth = stack.len() + 1, "push call frame");
            stack.push(frame);
            stack.len()
        })
    }

    /// Pop the top frame of `owner`'s stack for this thread
    pub fn pop(owner: InstanceId) -> Option<CallFrame> {
        CALL_SCOPES.with(|scopes| Self::pop_from(&mut scopes.borrow_mut(), owner))
    }

    fn pop_from(scopes: &mut FxHashMap<InstanceId, Vec<CallFrame>>, owner: InstanceId) -> Option<CallFrame> {
        let stack = scopes.get_mut(&owner)?;
        let frame = stack.pop();
        let depth = stack.len();
        if depth == 0 {
            scopes.remove(&owner);
        }
        if let Some(frame) = &frame {
            trace!(%owner, procedure = frame.procedure(), depth, "pop call frame");
        }
        frame
    }

    /// Resolve a bare name against the innermost frame of `owner`'s stack
    ///
    /// Only the top frame is consulted. `None` means a miss: the stack is
    /// empty, or the executing procedure does not declare `name`.
    pub fn resolve(owner: InstanceId, name: &str) -> Option<Value> {
        CALL_SCOPES.with(|scopes| {
            let scopes = scopes.borrow();
            scopes
                .get(&owner)
                .and_then(|stack| stack.last())
                .and_then(|frame| frame.resolve(name).cloned())
        })
    }

    /// Run `f` against a copy of the innermost frame of `owner`'s stack
    ///
    /// The stack is released before `f` runs, so `f` may invoke contracted
    /// procedures on the same instance.
    pub fn with_top<R>(owner: InstanceId, f: impl FnOnce(&CallFrame) -> R) -> Option<R> {
        let top = CALL_SCOPES.with(|scopes| {
            scopes
                .borrow()
                .get(&owner)
                .and_then(|stack| stack.last())
                .cloned()
        });
        top.as_ref().map(f)
    }

    /// Current depth of `owner`'s stack on this thread
    pub fn depth(owner: InstanceId) -> usize {
        CALL_SCOPES.with(|scopes| scopes.borrow().get(&owner).map_or(0, Vec::len))
    }

    /// Number of instances with an active stack on this thread
    pub fn active_stacks() -> usize {
        CALL_SCOPES.with(|scopes| scopes.borrow().len())
    }

    /// Drop every stack on this thread (for testing)
    #[cfg(test)]
    pub fn clear() {
        CALL_SCOPES.with(|scopes| scopes.borrow_mut().clear());
    }
}

/// RAII guard returned by [`CallScopeStack::enter`]
///
/// Pops its frame on drop. The guard is `!Send`: it must be dropped on the
/// thread whose stack it pushed onto.
#[must_use = "dropping the guard pops the frame immediately"]
pub struct ScopeGuard {
    owner: InstanceId,
    _not_send: PhantomData<*const ()>,
}

impl ScopeGuard {
    /// Instance whose stack this guard pushed onto
    pub fn owner(&self) -> InstanceId {
        self.owner
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        // try_with: the thread-local may already be gone during thread teardown
        let _ = CALL_SCOPES.try_with(|scopes| {
            if let Ok(mut scopes) = scopes.try_borrow_mut() {
                CallScopeStack::pop_from(&mut scopes, self.owner);
            }
        });
    }
}
