//! Future and promise strategies

use crate::common::*;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;
use tacit::{CallScopeStack, HandleState};

fn message_contract() -> ParameterContract {
    ParameterContract::builder()
        .param("message", Type::String)
        .build()
        .unwrap()
}

#[test]
fn future_binding_error_is_synchronous() {
    let t = new_type("Async");
    t.future("shout", message_contract(), |ctx| {
        Ok(Value::from(ctx.get("message")?.to_string().to_uppercase()))
    })
    .unwrap();
    let obj = t.instantiate();

    assert!(matches!(
        obj.call("shout", vec![Value::Int(1)]),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(obj.call("shout", vec![]), Err(Error::Arity { .. })));
}

#[test]
fn future_delivers_body_result() {
    let t = new_type("Async");
    t.future("shout", message_contract(), |ctx| {
        Ok(Value::from(ctx.get("message")?.to_string().to_uppercase()))
    })
    .unwrap();
    let obj = t.instantiate();

    let future = obj.call("shout", vec!["hi".into()]).unwrap().into_future().unwrap();
    assert_eq!(future.wait().unwrap(), Value::from("HI"));
    assert_eq!(future.state(), HandleState::Fulfilled);
}

#[test]
fn promise_delivers_body_result_and_chains() {
    let t = greeter();
    t.promise("greet", message_contract(), |ctx| {
        Ok(Value::from(format!("hello {}", ctx.get("message")?)))
    })
    .unwrap();
    let obj = t.instantiate();

    let promise = obj.call("greet", vec!["tom".into()]).unwrap().into_promise().unwrap();
    let shouted = promise.then(|v| Ok(Value::from(v.to_string().to_uppercase())));

    assert_eq!(promise.wait().unwrap(), Value::from("hello tom"));
    assert_eq!(shouted.wait().unwrap(), Value::from("HELLO TOM"));
}

#[test]
fn body_failure_is_captured_not_raised() {
    let t = new_type("Async");
    t.future("fail", message_contract(), |ctx| {
        Err(Error::body(format!("cannot handle {}", ctx.get("message")?)))
    })
    .unwrap();
    let obj = t.instantiate();

    let output = obj.call("fail", vec!["x".into()]);
    let future = output.unwrap().into_future().unwrap();
    assert_eq!(future.reason(), Some(Error::body("cannot handle x")));
}

#[test]
fn panicking_body_rejects_promise() {
    let t = new_type("Async");
    t.promise("explode", ParameterContract::empty(), |_| panic!("worker blew up"))
        .unwrap();
    let promise = t.instantiate().call("explode", vec![]).unwrap().into_promise().unwrap();

    assert_eq!(
        promise.wait(),
        Err(Error::Panicked {
            reason: "worker blew up".into()
        })
    );
}

#[test]
fn worker_pushes_frame_on_its_own_stack() {
    let t = new_type("Async");
    t.future("background", message_contract(), |ctx| {
        let thread = thread::current().name().unwrap_or_default().to_string();
        Ok(Value::from(vec![ctx.get("message")?, Value::from(thread), Value::Int(ctx.depth() as i64)]))
    })
    .unwrap();
    t.define("foreground", message_contract(), |ctx| {
        let inner = ctx.call("background", vec!["inner".into()])?.wait()?;
        // Caller's frame untouched by the worker's push and pop
        assert_eq!(ctx.get("message")?, Value::from("outer"));
        assert_eq!(ctx.depth(), 1);
        Ok(inner)
    })
    .unwrap();
    let obj = t.instantiate();

    let out = call_ok(&obj, "foreground", vec!["outer".into()]);
    let parts = out.as_array().unwrap();
    assert_eq!(parts[0], Value::from("inner"));
    assert!(parts[1].as_str().unwrap().starts_with("tacit-worker-"));
    assert_eq!(parts[2], Value::Int(1));
    assert_eq!(CallScopeStack::depth(obj.id()), 0);
}

#[test]
fn concurrent_futures_see_their_own_arguments() {
    let t = new_type("Async");
    t.future("echo", message_contract(), |ctx| {
        thread::sleep(Duration::from_millis(1));
        ctx.get("message")
    })
    .unwrap();
    let obj = t.instantiate();

    let futures: Vec<_> = (0..64)
        .map(|i| {
            let future = obj
                .call("echo", vec![format!("m{}", i).into()])
                .unwrap()
                .into_future()
                .unwrap();
            (i, future)
        })
        .collect();

    for (i, future) in futures {
        assert_eq!(future.wait().unwrap(), Value::from(format!("m{}", i)));
    }
}

#[test]
fn refused_submission_is_synchronous_scheduler_error() {
    init_tracing();
    let scheduler = Arc::new(BackgroundScheduler::new(1, 1).unwrap());
    let t = ContractType::with_scheduler("Busy", scheduler.clone());
    t.future("echo", message_contract(), |ctx| ctx.get("message"))
        .unwrap();
    let obj = t.instantiate();

    // Occupy the only worker
    let barrier = Arc::new(Barrier::new(2));
    let b = Arc::clone(&barrier);
    scheduler.submit(move || {
        b.wait();
    })
    .unwrap();
    thread::sleep(Duration::from_millis(50));

    let queued = obj.call("echo", vec!["queued".into()]).unwrap().into_future().unwrap();
    let refused = obj.call("echo", vec!["refused".into()]);
    assert!(matches!(refused, Err(Error::Scheduler { .. })));

    barrier.wait();
    assert_eq!(queued.wait().unwrap(), Value::from("queued"));
}

#[test]
fn thread_per_task_scheduler_runs_bodies() {
    init_tracing();
    let t = ContractType::with_scheduler("Spawner", Arc::new(ThreadPerTask));
    t.promise("echo", message_contract(), |ctx| ctx.get("message"))
        .unwrap();
    let promise = t
        .instantiate()
        .call("echo", vec!["spawned".into()])
        .unwrap()
        .into_promise()
        .unwrap();
    assert_eq!(promise.wait_timeout(Duration::from_secs(5)).unwrap().unwrap(), Value::from("spawned"));
}
