//! Parameter contracts
//!
//! A [`ParameterContract`] is the ordered, immutable parameter list of one
//! contracted procedure. Insertion order is positional order. A contract is
//! built once, at registration, and shared behind an `Arc` by every
//! invocation; nothing mutates it afterwards.
//!
//! ## The block parameter
//!
//! Declaring [`Declaration::Block`] (or calling `accepts_block()` on the
//! builder) adds a synthetic parameter named [`BLOCK_PARAM`] with the
//! `BlockMarker` spec. A parameter explicitly named `block` also receives
//! the trailing block. The `BlockMarker` spec is only valid on that name.

use super::type_spec::TypeSpec;
use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// Name of the parameter that receives the trailing block
pub const BLOCK_PARAM: &str = "block";

/// One entry of a caller-supplied parameter declaration
#[derive(Debug, Clone)]
pub enum Declaration {
    /// A named, typed parameter
    Param {
        /// Parameter name
        name: String,
        /// Acceptable type shape
        spec: TypeSpec,
    },
    /// Bare marker: the procedure accepts a trailing block
    Block,
}

impl Declaration {
    /// Shorthand for a named parameter declaration
    pub fn param(name: impl Into<String>, spec: impl Into<TypeSpec>) -> Self {
        Declaration::Param {
            name: name.into(),
            spec: spec.into(),
        }
    }
}

/// A declared parameter
#[derive(Debug, Clone)]
pub struct Parameter {
    name: Arc<str>,
    spec: TypeSpec,
}

impl Parameter {
    /// Parameter name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the name, cheap to copy into bindings
    pub fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    /// Declared type-spec
    pub fn spec(&self) -> &TypeSpec {
        &self.spec
    }
}

/// Ordered parameter list of a contracted procedure
///
/// An empty contract is valid and denotes a zero-argument procedure.
#[derive(Debug, Clone, Default)]
pub struct ParameterContract {
    params: Vec<Parameter>,
}

impl ParameterContract {
    /// Contract with no parameters
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start building a contract
    pub fn builder() -> ContractBuilder {
        ContractBuilder::default()
    }

    /// Build a contract from an ordered declaration list
    ///
    /// # Errors
    ///
    /// `ContractDefinition` for an empty or duplicated parameter name, a
    /// `BlockMarker` on a parameter not named [`BLOCK_PARAM`], or a
    /// type-spec of unrecognized shape.
    pub fn from_declarations(declarations: impl IntoIterator<Item = Declaration>) -> Result<Self> {
        let mut params: Vec<Parameter> = Vec::new();
        for declaration in declarations {
            let (name, spec) = match declaration {
                Declaration::Param { name, spec } => (name, spec),
                Declaration::Block => (BLOCK_PARAM.to_string(), TypeSpec::BlockMarker),
            };
            if name.is_empty() {
                return Err(Error::contract_definition("parameter names must not be empty"));
            }
            if params.iter().any(|p| *p.name == *name) {
                return Err(Error::contract_definition(format!(
                    "parameter `{}` is declared more than once",
                    name
                )));
            }
            if matches!(spec, TypeSpec::BlockMarker) && name != BLOCK_PARAM {
                return Err(Error::contract_definition(format!(
                    "parameter `{}` cannot take the block marker; only `{}` receives the trailing block",
                    name, BLOCK_PARAM
                )));
            }
            spec.validate().map_err(|e| match e {
                Error::ContractDefinition { reason } => {
                    Error::contract_definition(format!("parameter `{}`: {}", name, reason))
                }
                other => other,
            })?;
            params.push(Parameter {
                name: Arc::from(name),
                spec,
            });
        }
        Ok(Self { params })
    }

    /// Parameters in positional order
    pub fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    /// Parameter names in positional order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name())
    }

    /// Type-spec declared for `name`
    pub fn spec(&self, name: &str) -> Option<&TypeSpec> {
        self.params.iter().find(|p| p.name() == name).map(|p| &p.spec)
    }

    /// Position of `name`
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name() == name)
    }

    /// Whether `name` is a declared parameter
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Whether a trailing block is folded into the arguments
    pub fn accepts_block(&self) -> bool {
        self.contains(BLOCK_PARAM)
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True for zero-argument procedures
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl fmt::Display for ParameterContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (idx, param) in self.params.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", param.name, param.spec)?;
            if param.spec.is_default() {
                write!(f, " = ..")?;
            }
        }
        write!(f, ")")
    }
}

/// Incremental construction of a [`ParameterContract`]
///
/// ```
/// use tacit_core::{default_of, ParameterContract, Type, Value};
///
/// let contract = ParameterContract::builder()
///     .param("message", Type::String)
///     .param("level", default_of(Value::symbol("debug"), [Type::Symbol]))
///     .build()
///     .unwrap();
/// assert_eq!(contract.names().collect::<Vec<_>>(), ["message", "level"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct ContractBuilder {
    declarations: Vec<Declaration>,
}

impl ContractBuilder {
    /// Append a named parameter
    pub fn param(mut self, name: impl Into<String>, spec: impl Into<TypeSpec>) -> Self {
        self.declarations.push(Declaration::param(name, spec));
        self
    }

    /// Append the trailing-block parameter
    pub fn accepts_block(mut self) -> Self {
        self.declarations.push(Declaration::Block);
        self
    }

    /// Append a raw declaration
    pub fn declare(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Declarations collected so far
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Freeze the declarations into a contract
    pub fn build(self) -> Result<ParameterContract> {
        ParameterContract::from_declarations(self.declarations)
    }
}
