//! Type-specs and the type matcher
//!
//! A [`TypeSpec`] is the declared acceptable shape of one parameter:
//!
//! - `Single(T)`: the value must be an instance of `T`
//! - `Union(T1..Tn)`: the value must be an instance of any `Ti`
//! - `Default(value, spec)`: like `spec`, but the parameter may be omitted
//! - `BlockMarker`: the parameter receives the trailing block
//!
//! [`matches`] is the pure predicate deciding whether a value satisfies a
//! spec. Specs are immutable once attached to a contract.

use super::value_type::Type;
use crate::error::{Error, Result};
use crate::value::Value;
use std::fmt;

/// Declared type shape of a single parameter
#[derive(Debug, Clone)]
pub enum TypeSpec {
    /// Exactly one acceptable type
    Single(Type),
    /// Any of several types, tried in declaration order
    Union(Vec<Type>),
    /// Default value used when the caller omits the argument
    Default {
        /// Value appended for an omitted argument
        value: Value,
        /// Spec the argument (supplied or defaulted) is validated against
        inner: Box<TypeSpec>,
    },
    /// Slot that receives the trailing block
    BlockMarker,
}

impl TypeSpec {
    /// The spec an argument is actually validated against
    ///
    /// Unwraps one `Default` layer; every other shape is returned as is.
    pub fn effective(&self) -> &TypeSpec {
        match self {
            TypeSpec::Default { inner, .. } => inner,
            other => other,
        }
    }

    /// Default value, if this is a `Default` spec
    pub fn default_value(&self) -> Option<&Value> {
        match self {
            TypeSpec::Default { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Whether this spec carries a default
    pub fn is_default(&self) -> bool {
        matches!(self, TypeSpec::Default { .. })
    }

    /// Reject shapes the matcher cannot evaluate
    ///
    /// Empty unions and a `Default` wrapping another `Default` or a
    /// `BlockMarker` are unrecognized.
    pub fn validate(&self) -> Result<()> {
        match self {
            TypeSpec::Single(_) | TypeSpec::BlockMarker => Ok(()),
            TypeSpec::Union(types) if types.is_empty() => Err(Error::contract_definition(
                "a union type-spec must list at least one type",
            )),
            TypeSpec::Union(_) => Ok(()),
            TypeSpec::Default { inner, .. } => match inner.as_ref() {
                TypeSpec::Default { .. } | TypeSpec::BlockMarker => Err(
                    Error::contract_definition(format!("unrecognized default type-spec: {}", self)),
                ),
                inner => inner.validate(),
            },
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Single(ty) => write!(f, "{ty}"),
            TypeSpec::Union(types) => {
                write!(f, "[")?;
                for (idx, ty) in types.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{ty}")?;
                }
                write!(f, "]")
            }
            TypeSpec::Default { inner, .. } => write!(f, "{inner}"),
            TypeSpec::BlockMarker => write!(f, "Block"),
        }
    }
}

impl From<Type> for TypeSpec {
    fn from(ty: Type) -> Self {
        TypeSpec::Single(ty)
    }
}

impl From<Vec<Type>> for TypeSpec {
    fn from(types: Vec<Type>) -> Self {
        TypeSpec::Union(types)
    }
}

impl<const N: usize> From<[Type; N]> for TypeSpec {
    fn from(types: [Type; N]) -> Self {
        TypeSpec::Union(types.into())
    }
}

/// Wrap a default value and its acceptable types into a `Default` spec
///
/// One type yields a `Single` inner spec, several yield a `Union`. Passing
/// no types produces an empty union, which contract construction rejects.
pub fn default_of(value: impl Into<Value>, types: impl IntoIterator<Item = Type>) -> TypeSpec {
    let mut types: Vec<Type> = types.into_iter().collect();
    let inner = if types.len() == 1 {
        TypeSpec::Single(types.remove(0))
    } else {
        TypeSpec::Union(types)
    };
    TypeSpec::Default {
        value: value.into(),
        inner: Box::new(inner),
    }
}

/// Decide whether `value` satisfies `spec`
///
/// Unions short-circuit on the first matching type. A `Default` spec is
/// matched through its inner spec. Unrecognized shapes fail with
/// `ContractDefinition`.
pub fn matches(value: &Value, spec: &TypeSpec) -> Result<bool> {
    match spec {
        TypeSpec::Single(ty) => Ok(ty.admits(value)),
        TypeSpec::Union(types) if types.is_empty() => Err(Error::contract_definition(
            "a union type-spec must list at least one type",
        )),
        TypeSpec::Union(types) => Ok(types.iter().any(|ty| ty.admits(value))),
        TypeSpec::Default { inner, .. } => match inner.as_ref() {
            TypeSpec::Default { .. } | TypeSpec::BlockMarker => Err(Error::contract_definition(
                format!("unrecognized default type-spec: {}", spec),
            )),
            inner => matches(value, inner),
        },
        TypeSpec::BlockMarker => Ok(value.is_block()),
    }
}
