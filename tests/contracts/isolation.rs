//! Concurrent invocations never observe each other's bindings

use crate::common::*;
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 8;

#[test]
fn concurrent_calls_on_one_instance_are_isolated() {
    let t = new_type("Echo");
    let barrier = Arc::new(Barrier::new(THREADS));
    let b = Arc::clone(&barrier);
    t.procedure("echo")
        .param("message", Type::String)
        .body(move |ctx| {
            let before = ctx.get("message")?;
            // Every thread is inside the body, frame pushed, at this point
            b.wait();
            let after = ctx.get("message")?;
            assert_eq!(before, after);
            Ok(after)
        })
        .register()
        .unwrap();
    let obj = t.instantiate();

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let obj = Arc::clone(&obj);
            thread::spawn(move || {
                let message = format!("thread-{}", i);
                let out = call_ok(&obj, "echo", vec![message.clone().into()]);
                assert_eq!(out, Value::from(message));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn interleaved_calls_stress() {
    let t = greeter();
    let obj = t.instantiate();

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let obj = Arc::clone(&obj);
            thread::spawn(move || {
                for j in 0..500 {
                    let message = format!("{}:{}", i, j);
                    let out = call_ok(&obj, "log", vec![message.clone().into()]);
                    assert_eq!(out, Value::from(format!("{} debug", message)));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn instances_on_one_thread_are_isolated() {
    let t = new_type("Pair");
    t.procedure("relay")
        .param("message", Type::String)
        .body(|ctx| ctx.get("message"))
        .register()
        .unwrap();

    let a = t.instantiate();
    let b = t.instantiate();
    assert_ne!(a.id(), b.id());

    let partner = Arc::downgrade(&b);
    t.procedure("cross")
        .param("message", Type::String)
        .body(move |ctx| {
            // Our frame stays active while the partner pushes its own
            let partner = partner.upgrade().ok_or_else(|| Error::body("partner dropped"))?;
            let theirs = partner.call("relay", vec!["b's message".into()])?.wait()?;
            let ours = ctx.get("message")?;
            Ok(Value::from(format!("{} | {}", ours, theirs)))
        })
        .register()
        .unwrap();

    assert_eq!(
        call_ok(&a, "cross", vec!["a's message".into()]),
        Value::from("a's message | b's message")
    );
}
