//! Registered procedures and per-type procedure tables

use crate::context::Context;
use crate::strategy::ExecutionStrategy;
use std::fmt;
use std::sync::Arc;
use tacit_concurrency::{ContractRegistry, Contracted};
use tacit_core::{ContractBuilder, Declaration, Error, ParameterContract, Result, TypeSpec, Value};
use tracing::debug;

/// A procedure body
///
/// Bodies read their arguments by name through the [`Context`].
pub type Body = Arc<dyn Fn(&Context<'_>) -> Result<Value> + Send + Sync>;

/// A contracted procedure: name, frozen contract, execution strategy, body
pub struct Procedure {
    name: Arc<str>,
    contract: Arc<ParameterContract>,
    strategy: ExecutionStrategy,
    body: Body,
}

impl Procedure {
    /// Assemble a procedure
    pub fn new(
        name: impl Into<Arc<str>>,
        contract: ParameterContract,
        strategy: ExecutionStrategy,
        body: Body,
    ) -> Self {
        Self {
            name: name.into(),
            contract: Arc::new(contract),
            strategy,
            body,
        }
    }

    /// Procedure name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    /// Frozen parameter contract
    pub fn contract(&self) -> &Arc<ParameterContract> {
        &self.contract
    }

    /// How invocations run
    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    pub(crate) fn body(&self) -> &Body {
        &self.body
    }
}

impl Contracted for Procedure {
    fn contract(&self) -> &Arc<ParameterContract> {
        &self.contract
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Procedure")
            .field("name", &self.name)
            .field("contract", &self.contract.to_string())
            .field("strategy", &self.strategy)
            .finish()
    }
}

/// Procedures registered on one defining type
///
/// Lookups that miss fall through to the parent table, if the type was
/// composed from another with `ContractType::inherit`.
#[derive(Debug)]
pub struct ProcedureTable {
    owner: Arc<str>,
    registry: ContractRegistry<Procedure>,
    parent: Option<Arc<ProcedureTable>>,
}

impl ProcedureTable {
    /// Empty table for the type named `owner`, with no parent
    pub fn new(owner: impl Into<Arc<str>>) -> Self {
        Self {
            owner: owner.into(),
            registry: ContractRegistry::new(),
            parent: None,
        }
    }

    /// Empty table for `owner` that falls through to `parent`
    pub fn with_parent(owner: impl Into<Arc<str>>, parent: Arc<ProcedureTable>) -> Self {
        Self {
            owner: owner.into(),
            registry: ContractRegistry::new(),
            parent: Some(parent),
        }
    }

    /// Name of the defining type
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Install `procedure`, replacing any procedure of the same name
    pub fn register(&self, procedure: Procedure) -> Option<Arc<Procedure>> {
        let name = procedure.name().to_string();
        let strategy = procedure.strategy();
        let arity = procedure.contract().len();
        let previous = self.registry.register(name.clone(), procedure);
        debug!(
            owner = %self.owner,
            procedure = %name,
            arity,
            %strategy,
            replaced = previous.is_some(),
            "registered procedure"
        );
        previous
    }

    /// Procedure registered here or in an ancestor
    pub fn lookup(&self, name: &str) -> Option<Arc<Procedure>> {
        self.registry
            .get(name)
            .or_else(|| self.parent.as_ref().and_then(|parent| parent.lookup(name)))
    }

    /// Contract of the procedure `name` resolves to
    pub fn contract(&self, name: &str) -> Option<Arc<ParameterContract>> {
        self.registry
            .contract(name)
            .or_else(|| self.parent.as_ref().and_then(|parent| parent.contract(name)))
    }

    /// Whether `name` resolves to a procedure
    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name) || self.parent.as_ref().is_some_and(|p| p.contains(name))
    }

    /// Every resolvable name, sorted and deduplicated
    pub fn names(&self) -> Vec<String> {
        let mut names = self.registry.names();
        if let Some(parent) = &self.parent {
            names.extend(parent.names());
            names.sort();
            names.dedup();
        }
        names
    }
}

/// Incremental registration of a procedure
///
/// Obtained from `ContractType::procedure` or
/// `ContractType::class_procedure`.
#[must_use = "a procedure is only installed by `register()`"]
pub struct ProcedureBuilder<'a> {
    table: &'a ProcedureTable,
    name: String,
    contract: ContractBuilder,
    strategy: ExecutionStrategy,
    body: Option<Body>,
}

impl<'a> ProcedureBuilder<'a> {
    pub(crate) fn new(table: &'a ProcedureTable, name: impl Into<String>) -> Self {
        Self {
            table,
            name: name.into(),
            contract: ParameterContract::builder(),
            strategy: ExecutionStrategy::default(),
            body: None,
        }
    }

    /// Append a named parameter
    pub fn param(mut self, name: impl Into<String>, spec: impl Into<TypeSpec>) -> Self {
        self.contract = self.contract.param(name, spec);
        self
    }

    /// Accept a trailing block as the `block` parameter
    pub fn accepts_block(mut self) -> Self {
        self.contract = self.contract.accepts_block();
        self
    }

    /// Append raw declarations, in order
    pub fn declarations(mut self, declarations: impl IntoIterator<Item = Declaration>) -> Self {
        for declaration in declarations {
            self.contract = self.contract.declare(declaration);
        }
        self
    }

    /// Execution strategy (defaults to `Immediate`)
    pub fn strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Procedure body
    pub fn body<F>(mut self, body: F) -> Self
    where
        F: Fn(&Context<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(body));
        self
    }

    /// Freeze the contract and install the procedure
    ///
    /// # Errors
    ///
    /// `ContractDefinition` when no body was given, the name is empty, or a
    /// declaration is invalid. Nothing is installed on error.
    pub fn register(self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::contract_definition("procedure names must not be empty"));
        }
        let body = self.body.ok_or_else(|| {
            Error::contract_definition(format!("procedure `{}` has no body", self.name))
        })?;
        let contract = self.contract.build()?;
        self.table
            .register(Procedure::new(self.name, contract, self.strategy, body));
        Ok(())
    }
}
