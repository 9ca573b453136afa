//! Error types for tacit
//!
//! All failures raised while defining or invoking contracted procedures are
//! represented by the [`Error`] enum. We use `thiserror` for automatic
//! `Display` and `Error` trait implementations.
//!
//! Errors are `Clone` so an asynchronous handle can hand the same failure to
//! every waiter, and serializable so they can cross a process boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for tacit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Contract definition and invocation errors
///
/// # Categories
///
/// | Category | Variants | Raised |
/// |----------|----------|--------|
/// | Definition | `ContractDefinition` | at registration |
/// | Binding | `Arity`, `TypeMismatch` | synchronously at call time, before any frame is pushed |
/// | Lookup | `UndefinedProcedure`, `UnresolvedName` | at call time / inside a body |
/// | Body | `Body`, `Panicked` | from inside a body |
/// | System | `Scheduler`, `Config` | infrastructure |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum Error {
    /// Registration without a body, or a type-spec of unrecognized shape
    #[error("contract definition error: {reason}")]
    ContractDefinition {
        /// What was wrong with the definition
        reason: String,
    },

    /// Effective argument count differs from the contract's parameter count
    #[error("wrong number of arguments ({received} for {expected})")]
    Arity {
        /// Parameters declared by the contract
        expected: usize,
        /// Arguments present after block folding and default resolution
        received: usize,
    },

    /// An argument does not satisfy its parameter's type-spec
    #[error("expected `{parameter}` to be a kind of {expected} but was {actual}")]
    TypeMismatch {
        /// Offending parameter
        parameter: String,
        /// Declared type-spec, rendered
        expected: String,
        /// Runtime type of the supplied value
        actual: String,
    },

    /// No procedure registered under this name
    #[error("undefined procedure: {name}")]
    UndefinedProcedure {
        /// Requested procedure name
        name: String,
    },

    /// A bare name matched neither a bound parameter nor an instance field
    #[error("unresolved name: {name}")]
    UnresolvedName {
        /// The name that failed to resolve
        name: String,
    },

    /// Failure raised explicitly by a procedure body
    #[error("body failed: {reason}")]
    Body {
        /// Failure description
        reason: String,
    },

    /// A body panicked while running on a worker
    #[error("body panicked: {reason}")]
    Panicked {
        /// Panic payload, when it was a string
        reason: String,
    },

    /// The scheduling collaborator refused to accept a body
    #[error("scheduler rejected task: {reason}")]
    Scheduler {
        /// Why the submission was refused
        reason: String,
    },

    /// Configuration could not be read or is invalid
    #[error("configuration error: {reason}")]
    Config {
        /// What was wrong
        reason: String,
    },
}

impl Error {
    /// Build a `ContractDefinition` error
    pub fn contract_definition(reason: impl Into<String>) -> Self {
        Error::ContractDefinition {
            reason: reason.into(),
        }
    }

    /// Build a `Body` error; the usual way for a body to fail
    pub fn body(reason: impl Into<String>) -> Self {
        Error::Body {
            reason: reason.into(),
        }
    }

    /// Build a `Config` error
    pub fn config(reason: impl Into<String>) -> Self {
        Error::Config {
            reason: reason.into(),
        }
    }

    /// Build a `Scheduler` error
    pub fn scheduler(reason: impl Into<String>) -> Self {
        Error::Scheduler {
            reason: reason.into(),
        }
    }

    /// True for failures raised while binding arguments
    ///
    /// These always surface synchronously to the direct caller, whatever the
    /// execution strategy.
    pub fn is_binding_error(&self) -> bool {
        matches!(self, Error::Arity { .. } | Error::TypeMismatch { .. })
    }
}
