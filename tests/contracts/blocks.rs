//! Trailing block folding

use crate::common::*;
use tacit::Block;

fn each() -> ContractType {
    let t = new_type("Collection");
    t.procedure("each")
        .param("items", Type::Array)
        .accepts_block()
        .body(|ctx| {
            let items = ctx.get("items")?;
            let mut out = Vec::new();
            for item in items.as_array().unwrap_or_default() {
                out.push(ctx.yield_block(std::slice::from_ref(item))?);
            }
            Ok(Value::Array(out))
        })
        .register()
        .unwrap();
    t
}

#[test]
fn block_is_bound_and_callable() {
    let obj = each().instantiate();
    let double = Block::new(|args| Ok(Value::Int(args[0].as_int().unwrap_or_default() * 2)));

    let out = obj
        .call_with_block("each", vec![Value::from(vec![Value::Int(1), Value::Int(2)])], double)
        .unwrap()
        .wait()
        .unwrap();
    assert_eq!(out, Value::from(vec![Value::Int(2), Value::Int(4)]));
}

#[test]
fn missing_block_is_arity_error() {
    let obj = each().instantiate();
    assert_eq!(
        obj.call("each", vec![Value::from(Vec::<Value>::new())]).unwrap_err(),
        Error::Arity {
            expected: 2,
            received: 1
        }
    );
}

#[test]
fn block_lands_after_omitted_defaults() {
    let t = new_type("Logger");
    t.procedure("log")
        .param("message", Type::String)
        .param("level", default_of(Value::symbol("debug"), [Type::Symbol]))
        .accepts_block()
        .body(|ctx| {
            let decorated = ctx.yield_block(&[ctx.get("message")?])?;
            Ok(Value::from(format!("{} {}", ctx.get("level")?, decorated)))
        })
        .register()
        .unwrap();
    let obj = t.instantiate();
    let shout = Block::new(|args| Ok(Value::from(args[0].to_string().to_uppercase())));

    let out = obj
        .call_with_block("log", vec!["hi".into()], shout)
        .unwrap()
        .wait()
        .unwrap();
    assert_eq!(out, Value::from("debug HI"));
}

#[test]
fn block_ignored_when_not_declared() {
    let obj = greeter().instantiate();
    let out = obj
        .call_with_block("log", vec!["hi".into()], Block::new(|_| Ok(Value::Null)))
        .unwrap()
        .wait()
        .unwrap();
    assert_eq!(out, Value::from("hi debug"));
}

#[test]
fn block_failure_propagates_after_pop() {
    let obj = each().instantiate();
    let failing = Block::new(|_| Err(Error::body("block refused")));

    let err = obj
        .call_with_block("each", vec![Value::from(vec![Value::Int(1)])], failing)
        .unwrap_err();
    assert_eq!(err, Error::body("block refused"));
    assert_eq!(tacit::CallScopeStack::depth(obj.id()), 0);
}
