//! Recursive and nested calls resolve against their own frame

use crate::common::*;
use tacit::CallScopeStack;

fn mapper() -> ContractType {
    let t = new_type("Mapper");
    t.procedure("hello")
        .param("message", [Type::String, Type::Array])
        .body(|ctx| match ctx.get("message")? {
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(ctx.call("hello", vec![item])?.wait()?);
                }
                // Our own frame is back on top once the recursive calls return
                assert!(ctx.get("message")?.is_array());
                Ok(Value::Array(out))
            }
            name => Ok(Value::from(format!("hello {}", name))),
        })
        .register()
        .unwrap();
    t
}

#[test]
fn recursion_maps_over_array() {
    let obj = mapper().instantiate();
    let out = call_ok(&obj, "hello", vec![Value::from(vec![Value::from("tom"), Value::from("jerry")])]);
    assert_eq!(
        out,
        Value::from(vec![Value::from("hello tom"), Value::from("hello jerry")])
    );
}

#[test]
fn nested_arrays_recurse_deeper() {
    let obj = mapper().instantiate();
    let input = Value::from(vec![
        Value::from("a"),
        Value::from(vec![Value::from("b"), Value::from("c")]),
    ]);
    assert_eq!(
        call_ok(&obj, "hello", vec![input]).to_string(),
        "[hello a, [hello b, hello c]]"
    );
}

#[test]
fn stack_depth_tracks_recursion_and_unwinds() {
    let t = new_type("Counter");
    t.procedure("countdown")
        .param("n", Type::Int)
        .body(|ctx| {
            let n = ctx.get("n")?.as_int().unwrap_or_default();
            assert_eq!(ctx.depth() as i64, 5 - n);
            if n > 1 {
                ctx.call("countdown", vec![Value::Int(n - 1)])?.wait()
            } else {
                Ok(Value::Int(ctx.depth() as i64))
            }
        })
        .register()
        .unwrap();
    let obj = t.instantiate();

    assert_eq!(call_ok(&obj, "countdown", vec![Value::Int(4)]), Value::Int(4));
    assert_eq!(CallScopeStack::depth(obj.id()), 0);
}

#[test]
fn inner_procedure_does_not_see_caller_parameters() {
    let t = new_type("Nested");
    t.procedure("outer")
        .param("message", Type::String)
        .body(|ctx| {
            let inner = ctx.call("inner", vec![Value::Int(1)])?.wait()?;
            Ok(Value::from(format!("{} / {}", ctx.get("message")?, inner)))
        })
        .register()
        .unwrap();
    t.procedure("inner")
        .param("count", Type::Int)
        .body(|ctx| Ok(Value::Bool(ctx.lookup("message").is_some())))
        .register()
        .unwrap();
    let obj = t.instantiate();

    assert_eq!(call_ok(&obj, "outer", vec!["hi".into()]), Value::from("hi / false"));
}

#[test]
fn zero_parameter_procedure_falls_through_to_fields() {
    let t = new_type("Nested");
    t.procedure("outer")
        .param("message", Type::String)
        .body(|ctx| ctx.call("peek", vec![])?.wait())
        .register()
        .unwrap();
    t.procedure("peek")
        .body(|ctx| ctx.get("message"))
        .register()
        .unwrap();
    let obj = t.instantiate();
    obj.set_field("message", "from field");

    assert_eq!(call_ok(&obj, "outer", vec!["from arg".into()]), Value::from("from field"));
}
