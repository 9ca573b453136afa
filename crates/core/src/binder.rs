//! Argument binding
//!
//! [`bind`] turns a raw argument list (plus an optional trailing block) into
//! a [`Binding`] for one invocation, in four steps:
//!
//! 1. **Block folding**: a trailing block is placed in the `block`
//!    parameter's slot. Omitted defaulted parameters in front of that slot
//!    are filled first so the block lands in position. A block passed to a
//!    contract without a `block` parameter is ignored.
//! 2. **Default resolution**: when fewer arguments than parameters remain,
//!    the default of every unsupplied trailing `Default` parameter is
//!    appended, in contract order.
//! 3. **Positional count**: the effective count must equal the parameter
//!    count, otherwise `Arity`.
//! 4. **Types**: each argument is matched against its parameter's spec; the
//!    first failure is returned as `TypeMismatch`.
//!
//! Defaults are resolved into the per-call argument list only. The contract
//! is never touched, so concurrent invocations cannot observe each other's
//! defaulting.

use crate::binding::Binding;
use crate::contract::{matches, ParameterContract, BLOCK_PARAM};
use crate::error::{Error, Result};
use crate::value::{Block, Value};

/// Validate `args` against `contract` and produce the invocation's binding
///
/// Fails before any scope mutation, so a failed bind never pushes a frame.
pub fn bind(contract: &ParameterContract, mut args: Vec<Value>, block: Option<Block>) -> Result<Binding> {
    if let Some(block) = block {
        fold_block(contract, &mut args, block);
    }

    let expected = contract.len();
    if args.len() < expected {
        let supplied = args.len();
        args.extend(
            contract.parameters()[supplied..]
                .iter()
                .filter_map(|param| param.spec().default_value().cloned()),
        );
    }

    if args.len() != expected {
        return Err(Error::Arity {
            expected,
            received: args.len(),
        });
    }

    let mut binding = Binding::with_capacity(expected);
    for (param, value) in contract.parameters().iter().zip(args) {
        if !matches(&value, param.spec())? {
            return Err(Error::TypeMismatch {
                parameter: param.name().to_string(),
                expected: param.spec().to_string(),
                actual: value.type_name().to_string(),
            });
        }
        binding.push(param.name_arc().clone(), value);
    }
    Ok(binding)
}

fn fold_block(contract: &ParameterContract, args: &mut Vec<Value>, block: Block) {
    let Some(slot) = contract.index_of(BLOCK_PARAM) else {
        return;
    };
    if slot < args.len() {
        args.insert(slot, Value::Block(block));
        return;
    }
    let gap = &contract.parameters()[args.len()..slot];
    if gap.iter().all(|param| param.spec().is_default()) {
        args.extend(gap.iter().filter_map(|param| param.spec().default_value().cloned()));
    }
    args.push(Value::Block(block));
}
