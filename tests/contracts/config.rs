//! Worker pools configured from a `tacit.toml` file

use crate::common::*;
use parking_lot::Mutex;
use std::sync::Arc;
use tacit::CONFIG_FILE_NAME;

#[test]
fn pool_from_config_file_runs_future_bodies() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        "worker_threads = 2\nmax_queue_depth = 16\nthread_name_prefix = \"mailer\"\n",
    )
    .unwrap();

    let config = EngineConfig::from_file(&path).unwrap();
    assert_eq!(config.worker_threads, 2);
    let scheduler = Arc::new(BackgroundScheduler::from_config(&config).unwrap());
    assert_eq!(scheduler.stats().worker_count, 2);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let t = ContractType::with_scheduler("Mailer", scheduler.clone());
    t.future(
        "send",
        ParameterContract::builder()
            .param("to", Type::String)
            .build()
            .unwrap(),
        move |ctx| {
            let worker = std::thread::current().name().unwrap_or_default().to_string();
            recorder.lock().push(worker);
            ctx.get("to")
        },
    )
    .unwrap();
    let obj = t.instantiate();

    let handles: Vec<_> = (0..4)
        .map(|i| obj.call("send", vec![format!("user-{}", i).into()]).unwrap())
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.wait().unwrap(), Value::from(format!("user-{}", i)));
    }

    let seen = seen.lock();
    assert_eq!(seen.len(), 4);
    assert!(seen.iter().all(|name| name.starts_with("mailer-")));
}

#[test]
fn invalid_config_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "worker_threads = 0\n").unwrap();

    let err = EngineConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

#[test]
fn default_file_is_written_once_and_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    EngineConfig::write_default_if_missing(&path).unwrap();
    std::fs::write(&path, "max_queue_depth = 8\n").unwrap();
    EngineConfig::write_default_if_missing(&path).unwrap();

    let config = EngineConfig::from_file(&path).unwrap();
    assert_eq!(config.max_queue_depth, 8);
    assert_eq!(config.thread_name_prefix, "tacit-worker");
}
