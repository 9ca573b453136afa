//! Instances of contract types
//!
//! An [`Instance`] is the owner of call-scope stacks: its [`InstanceId`]
//! keys the per-thread stacks, so two instances never see each other's
//! bound arguments. It also carries ordinary fields, consulted when a bare
//! name is not a parameter of the executing procedure.

use crate::output::Output;
use crate::procedure::ProcedureTable;
use crate::scheduler::Spawn;
use crate::strategy;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use tacit_core::{Block, Error, InstanceId, Result, Value};

/// An object whose procedures are contracted
pub struct Instance {
    id: InstanceId,
    type_name: Arc<str>,
    procedures: Arc<ProcedureTable>,
    fields: RwLock<FxHashMap<String, Value>>,
    scheduler: Arc<dyn Spawn>,
}

impl Instance {
    pub(crate) fn new(
        type_name: Arc<str>,
        procedures: Arc<ProcedureTable>,
        scheduler: Arc<dyn Spawn>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: InstanceId::new(),
            type_name,
            procedures,
            fields: RwLock::new(FxHashMap::default()),
            scheduler,
        })
    }

    /// Identity keying this instance's call-scope stacks
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Name of the defining type
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Invoke the procedure registered as `name`
    ///
    /// # Errors
    ///
    /// `UndefinedProcedure` for an unknown name; `Arity` or `TypeMismatch`
    /// if the arguments do not satisfy the contract; for immediate
    /// procedures, whatever the body returns.
    pub fn call(self: &Arc<Self>, name: &str, args: Vec<Value>) -> Result<Output> {
        self.dispatch(name, args, None)
    }

    /// Invoke `name`, passing `block` as the trailing block
    pub fn call_with_block(self: &Arc<Self>, name: &str, args: Vec<Value>, block: Block) -> Result<Output> {
        self.dispatch(name, args, Some(block))
    }

    fn dispatch(self: &Arc<Self>, name: &str, args: Vec<Value>, block: Option<Block>) -> Result<Output> {
        let procedure = self
            .procedures
            .lookup(name)
            .ok_or_else(|| Error::UndefinedProcedure {
                name: name.to_string(),
            })?;
        strategy::invoke(self, procedure, args, block)
    }

    /// Whether `name` resolves to a procedure
    pub fn responds_to(&self, name: &str) -> bool {
        self.procedures.contains(name)
    }

    /// Set an ordinary field, returning the previous value
    pub fn set_field(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.write().insert(name.into(), value.into())
    }

    /// Read an ordinary field
    pub fn field(&self, name: &str) -> Option<Value> {
        self.fields.read().get(name).cloned()
    }

    pub(crate) fn scheduler(&self) -> &Arc<dyn Spawn> {
        &self.scheduler
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("type_name", &self.type_name)
            .finish()
    }
}
