//! Registration and contract construction

use crate::common::*;
use tacit::{Declaration, TypeSpec};

#[test]
fn register_without_body_is_contract_definition_error() {
    let t = new_type("Logger");
    let err = t
        .procedure("log")
        .param("message", Type::String)
        .register()
        .unwrap_err();

    assert!(matches!(err, Error::ContractDefinition { .. }));
    assert!(!t.responds_to("log"));
}

#[test]
fn empty_union_is_rejected_at_registration() {
    let t = new_type("Logger");
    let err = t
        .procedure("log")
        .param("message", Vec::<Type>::new())
        .body(|_| Ok(Value::Null))
        .register()
        .unwrap_err();

    match err {
        Error::ContractDefinition { reason } => assert!(reason.contains("`message`")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(t.contract("log").is_none());
}

#[test]
fn nested_default_is_rejected() {
    let nested = TypeSpec::Default {
        value: Value::Int(1),
        inner: Box::new(default_of(Value::Int(2), [Type::Int])),
    };
    let err = ParameterContract::builder()
        .param("n", nested)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::ContractDefinition { .. }));
}

#[test]
fn declarations_preserve_positional_order() {
    let t = new_type("Mailer");
    t.procedure("send")
        .declarations([
            Declaration::param("to", Type::String),
            Declaration::param("subject", [Type::String, Type::Symbol]),
            Declaration::Block,
        ])
        .body(|_| Ok(Value::Null))
        .register()
        .unwrap();

    let contract = t.contract("send").unwrap();
    assert_eq!(
        contract.names().collect::<Vec<_>>(),
        vec!["to", "subject", "block"]
    );
    assert!(contract.accepts_block());
}

#[test]
fn contract_introspection_renders_specs() {
    let t = greeter();
    assert_eq!(
        t.contract("log").unwrap().to_string(),
        "(message: String, level: Symbol = ..)"
    );
    assert_eq!(t.procedure_names(), vec!["log"]);
}

#[test]
fn block_marker_on_other_name_is_rejected_at_registration() {
    let t = new_type("Walker");
    let err = t
        .procedure("each")
        .param("items", Type::Array)
        .param("callback", TypeSpec::BlockMarker)
        .body(|ctx| ctx.yield_block(&[]))
        .register()
        .unwrap_err();

    match err {
        Error::ContractDefinition { reason } => assert!(reason.contains("`callback`")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!t.responds_to("each"));
}
