//! Explicit composition of defining types

use crate::common::*;

#[test]
fn child_inherits_parent_procedures() {
    let parent = greeter();
    let child = ContractType::inherit("LoudGreeter", &parent);

    let obj = child.instantiate();
    assert_eq!(obj.type_name(), "LoudGreeter");
    assert!(child.responds_to("log"));
    assert_eq!(call_ok(&obj, "log", vec!["hi".into()]), Value::from("hi debug"));
}

#[test]
fn child_registration_shadows_parent() {
    let parent = greeter();
    let child = ContractType::inherit("LoudGreeter", &parent);
    child
        .define("log", log_contract(), |ctx| {
            Ok(Value::from(format!("{}!", ctx.get("message")?.to_string().to_uppercase())))
        })
        .unwrap();

    assert_eq!(call_ok(&child.instantiate(), "log", vec!["hi".into()]), Value::from("HI!"));
    assert_eq!(call_ok(&parent.instantiate(), "log", vec!["hi".into()]), Value::from("hi debug"));
}

#[test]
fn nothing_propagates_upward_or_implicitly() {
    let parent = greeter();
    let child = ContractType::inherit("Child", &parent);
    child
        .define("extra", ParameterContract::empty(), |_| Ok(Value::Null))
        .unwrap();
    let unrelated = new_type("Unrelated");

    assert!(!parent.responds_to("extra"));
    assert!(!unrelated.responds_to("log"));
}

#[test]
fn later_parent_registrations_are_visible_to_child() {
    let parent = greeter();
    let child = ContractType::inherit("Child", &parent);
    parent
        .define("ping", ParameterContract::empty(), |_| Ok(Value::from("pong")))
        .unwrap();

    assert_eq!(call_ok(&child.instantiate(), "ping", vec![]), Value::from("pong"));
    assert_eq!(child.procedure_names(), vec!["log", "ping"]);
}

#[test]
fn class_procedures_are_inherited() {
    let parent = greeter();
    parent
        .class_define("kind", ParameterContract::empty(), |ctx| {
            Ok(Value::from(ctx.instance().type_name().to_string()))
        })
        .unwrap();
    let child = ContractType::inherit("Child", &parent);

    assert_eq!(child.call_class("kind", vec![]).unwrap().wait().unwrap(), Value::from("Child"));
}
