//! tacit - contracted procedures for Rust
//!
//! A contracted procedure is registered at runtime with a named, typed
//! parameter list (with optional defaults and a trailing block) and a body
//! that reads its arguments by name. Every call validates argument count and
//! types, resolves defaults, and runs the body immediately, as a future, or
//! as a promise.
//!
//! # Quick Start
//!
//! ```
//! use tacit::{default_of, ContractType, Type, Value};
//!
//! let greeter = ContractType::new("Greeter");
//! greeter
//!     .procedure("log")
//!     .param("message", Type::String)
//!     .param("level", default_of(Value::symbol("debug"), [Type::Symbol]))
//!     .body(|ctx| Ok(Value::from(format!("[{}] {}", ctx.get("level")?, ctx.get("message")?))))
//!     .register()
//!     .unwrap();
//!
//! let obj = greeter.instantiate();
//! let line = obj.call("log", vec!["hello".into()]).unwrap().wait().unwrap();
//! assert_eq!(line, Value::from("[debug] hello"));
//! ```
//!
//! # Architecture
//!
//! - `tacit-core`: values, type-specs, contracts and the argument binder
//! - `tacit-concurrency`: thread-local call-scope stacks and the registry
//! - `tacit-engine`: types, instances, strategies, handles and scheduling

pub use tacit_concurrency::{CallFrame, CallScopeStack};
pub use tacit_core::*;
pub use tacit_engine::*;
