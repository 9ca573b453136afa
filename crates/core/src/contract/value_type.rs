//! Single type descriptors
//!
//! A [`Type`] is the runtime descriptor a parameter is declared against.
//! Built-in descriptors follow the [`Value`] variants, with two widening
//! descriptors on top:
//!
//! | Type | Matches |
//! |------|---------|
//! | `Any` | every value, including `Null` |
//! | `Number` | `Int` and `Float` |
//! | `Capability` | whatever its predicate accepts |
//!
//! Every other descriptor matches exactly the variant of the same name.

use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// A type descriptor, usable as a first-class value when building contracts
#[derive(Clone)]
pub enum Type {
    /// Any value at all
    Any,
    /// `Value::Null`
    Null,
    /// `Value::Bool`
    Bool,
    /// `Value::Int`
    Int,
    /// `Value::Float`
    Float,
    /// `Value::Int` or `Value::Float`
    Number,
    /// `Value::String`
    String,
    /// `Value::Symbol`
    Symbol,
    /// `Value::Bytes`
    Bytes,
    /// `Value::Array`
    Array,
    /// `Value::Object`
    Object,
    /// `Value::Block`
    Block,
    /// A named, user-supplied capability check
    Capability(Capability),
}

impl Type {
    /// All built-in descriptors (for iteration)
    pub const BUILTIN: [Type; 12] = [
        Type::Any,
        Type::Null,
        Type::Bool,
        Type::Int,
        Type::Float,
        Type::Number,
        Type::String,
        Type::Symbol,
        Type::Bytes,
        Type::Array,
        Type::Object,
        Type::Block,
    ];

    /// Human-readable name, used in diagnostics
    pub fn name(&self) -> &str {
        match self {
            Type::Any => "Any",
            Type::Null => "Null",
            Type::Bool => "Bool",
            Type::Int => "Int",
            Type::Float => "Float",
            Type::Number => "Number",
            Type::String => "String",
            Type::Symbol => "Symbol",
            Type::Bytes => "Bytes",
            Type::Array => "Array",
            Type::Object => "Object",
            Type::Block => "Block",
            Type::Capability(cap) => cap.name(),
        }
    }

    /// Parse a built-in descriptor from its name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::BUILTIN.iter().find(|t| t.name() == name).cloned()
    }

    /// Whether `value` is an instance of this type
    pub fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (Type::Any, _) => true,
            (Type::Null, Value::Null) => true,
            (Type::Bool, Value::Bool(_)) => true,
            (Type::Int, Value::Int(_)) => true,
            (Type::Float, Value::Float(_)) => true,
            (Type::Number, Value::Int(_) | Value::Float(_)) => true,
            (Type::String, Value::String(_)) => true,
            (Type::Symbol, Value::Symbol(_)) => true,
            (Type::Bytes, Value::Bytes(_)) => true,
            (Type::Array, Value::Array(_)) => true,
            (Type::Object, Value::Object(_)) => true,
            (Type::Block, Value::Block(_)) => true,
            (Type::Capability(cap), value) => cap.check(value),
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Capability(cap) => write!(f, "Capability({})", cap.name()),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// Named predicate standing in for a user-defined type
///
/// ```
/// use tacit_core::{Capability, Type, Value};
///
/// let non_empty = Type::Capability(Capability::new("NonEmptyString", |v| {
///     v.as_str().map(|s| !s.is_empty()).unwrap_or(false)
/// }));
/// assert!(non_empty.admits(&Value::from("x")));
/// assert!(!non_empty.admits(&Value::from("")));
/// ```
#[derive(Clone)]
pub struct Capability {
    name: Arc<str>,
    check: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl Capability {
    /// Create a capability from a name and predicate
    pub fn new<F>(name: impl Into<Arc<str>>, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// Capability name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the predicate
    pub fn check(&self, value: &Value) -> bool {
        (self.check)(value)
    }
}
