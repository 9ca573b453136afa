//! Defining types for contracted procedures
//!
//! A [`ContractType`] owns the procedure table shared by all of its
//! instances, plus a separate table of type-level ("class") procedures that
//! run against the type's own singleton instance.
//!
//! # Example
//!
//! ```
//! use tacit_engine::ContractType;
//! use tacit_core::{default_of, ParameterContract, Type, Value};
//!
//! let greeter = ContractType::new("Greeter");
//! greeter
//!     .define(
//!         "log",
//!         ParameterContract::builder()
//!             .param("message", Type::String)
//!             .param("level", default_of(Value::symbol("debug"), [Type::Symbol]))
//!             .build()
//!             .unwrap(),
//!         |ctx| Ok(Value::from(format!("{} {}", ctx.get("message")?, ctx.get("level")?))),
//!     )
//!     .unwrap();
//!
//! let obj = greeter.instantiate();
//! let out = obj.call("log", vec!["hello".into()]).unwrap().wait().unwrap();
//! assert_eq!(out, Value::from("hello debug"));
//! ```

use crate::context::Context;
use crate::instance::Instance;
use crate::output::Output;
use crate::procedure::{Body, Procedure, ProcedureBuilder, ProcedureTable};
use crate::scheduler::{default_scheduler, Spawn};
use crate::strategy::ExecutionStrategy;
use std::fmt;
use std::sync::Arc;
use tacit_core::{Block, Error, ParameterContract, Result, Value};

/// A type whose instances carry contracted procedures
pub struct ContractType {
    name: Arc<str>,
    procedures: Arc<ProcedureTable>,
    class_procedures: Arc<ProcedureTable>,
    class_object: Arc<Instance>,
    scheduler: Arc<dyn Spawn>,
}

impl ContractType {
    /// New type using the process-wide default scheduler
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self::with_scheduler(name, default_scheduler())
    }

    /// New type whose future/promise bodies run on `scheduler`
    pub fn with_scheduler(name: impl Into<Arc<str>>, scheduler: Arc<dyn Spawn>) -> Self {
        let name: Arc<str> = name.into();
        Self::assemble(
            Arc::clone(&name),
            Arc::new(ProcedureTable::new(Arc::clone(&name))),
            Arc::new(ProcedureTable::new(name)),
            scheduler,
        )
    }

    /// New type composed from `parent`
    ///
    /// Lookups fall through to the parent's procedures, instance and class
    /// level alike. Procedures registered on the new type shadow the
    /// parent's. The parent's scheduler is reused.
    pub fn inherit(name: impl Into<Arc<str>>, parent: &ContractType) -> Self {
        let name: Arc<str> = name.into();
        Self::assemble(
            Arc::clone(&name),
            Arc::new(ProcedureTable::with_parent(Arc::clone(&name), Arc::clone(&parent.procedures))),
            Arc::new(ProcedureTable::with_parent(name, Arc::clone(&parent.class_procedures))),
            Arc::clone(&parent.scheduler),
        )
    }

    fn assemble(
        name: Arc<str>,
        procedures: Arc<ProcedureTable>,
        class_procedures: Arc<ProcedureTable>,
        scheduler: Arc<dyn Spawn>,
    ) -> Self {
        let class_object = Instance::new(
            Arc::clone(&name),
            Arc::clone(&class_procedures),
            Arc::clone(&scheduler),
        );
        Self {
            name,
            procedures,
            class_procedures,
            class_object,
            scheduler,
        }
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start registering an instance procedure
    pub fn procedure(&self, name: impl Into<String>) -> ProcedureBuilder<'_> {
        ProcedureBuilder::new(&self.procedures, name)
    }

    /// Start registering a type-level procedure
    pub fn class_procedure(&self, name: impl Into<String>) -> ProcedureBuilder<'_> {
        ProcedureBuilder::new(&self.class_procedures, name)
    }

    /// Register an immediate instance procedure
    pub fn define<F>(&self, name: impl Into<String>, contract: ParameterContract, body: F) -> Result<()>
    where
        F: Fn(&Context<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        install(&self.procedures, name.into(), contract, ExecutionStrategy::Immediate, Arc::new(body))
    }

    /// Register a future instance procedure
    pub fn future<F>(&self, name: impl Into<String>, contract: ParameterContract, body: F) -> Result<()>
    where
        F: Fn(&Context<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        install(&self.procedures, name.into(), contract, ExecutionStrategy::Future, Arc::new(body))
    }

    /// Register a promise instance procedure
    pub fn promise<F>(&self, name: impl Into<String>, contract: ParameterContract, body: F) -> Result<()>
    where
        F: Fn(&Context<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        install(&self.procedures, name.into(), contract, ExecutionStrategy::Promise, Arc::new(body))
    }

    /// Register an immediate type-level procedure
    pub fn class_define<F>(&self, name: impl Into<String>, contract: ParameterContract, body: F) -> Result<()>
    where
        F: Fn(&Context<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        install(&self.class_procedures, name.into(), contract, ExecutionStrategy::Immediate, Arc::new(body))
    }

    /// Register a future type-level procedure
    pub fn class_future<F>(&self, name: impl Into<String>, contract: ParameterContract, body: F) -> Result<()>
    where
        F: Fn(&Context<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        install(&self.class_procedures, name.into(), contract, ExecutionStrategy::Future, Arc::new(body))
    }

    /// Register a promise type-level procedure
    pub fn class_promise<F>(&self, name: impl Into<String>, contract: ParameterContract, body: F) -> Result<()>
    where
        F: Fn(&Context<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        install(&self.class_procedures, name.into(), contract, ExecutionStrategy::Promise, Arc::new(body))
    }

    /// New instance sharing this type's procedures
    pub fn instantiate(&self) -> Arc<Instance> {
        Instance::new(
            Arc::clone(&self.name),
            Arc::clone(&self.procedures),
            Arc::clone(&self.scheduler),
        )
    }

    /// The type's singleton instance, against which class procedures run
    pub fn class_object(&self) -> &Arc<Instance> {
        &self.class_object
    }

    /// Invoke a type-level procedure
    pub fn call_class(&self, name: &str, args: Vec<Value>) -> Result<Output> {
        self.class_object.call(name, args)
    }

    /// Invoke a type-level procedure with a trailing block
    pub fn call_class_with_block(&self, name: &str, args: Vec<Value>, block: Block) -> Result<Output> {
        self.class_object.call_with_block(name, args, block)
    }

    /// Contract registered for the instance procedure `name`
    pub fn contract(&self, name: &str) -> Option<Arc<ParameterContract>> {
        self.procedures.contract(name)
    }

    /// Contract registered for the type-level procedure `name`
    pub fn class_contract(&self, name: &str) -> Option<Arc<ParameterContract>> {
        self.class_procedures.contract(name)
    }

    /// Whether instances respond to `name`
    pub fn responds_to(&self, name: &str) -> bool {
        self.procedures.contains(name)
    }

    /// Instance procedure names, sorted
    pub fn procedure_names(&self) -> Vec<String> {
        self.procedures.names()
    }
}

fn install(
    table: &ProcedureTable,
    name: String,
    contract: ParameterContract,
    strategy: ExecutionStrategy,
    body: Body,
) -> Result<()> {
    if name.is_empty() {
        return Err(Error::contract_definition("procedure names must not be empty"));
    }
    table.register(Procedure::new(name, contract, strategy, body));
    Ok(())
}

impl fmt::Debug for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractType")
            .field("name", &self.name)
            .field("procedures", &self.procedures.names())
            .field("class_procedures", &self.class_procedures.names())
            .finish()
    }
}
