//! Execution tests: ordering, argument forwarding, failure and termination.
//!
//! Commands append to `$OUT` so each test can check exactly what ran.

use std::time::{Duration, Instant};

use futures::stream;
use yo::{Engine, Error};

use crate::fixtures::Scratch;

fn no_signals() -> stream::Empty<&'static str> {
    stream::empty()
}

/// Given a single-command task
/// When it runs as the root with extra args
/// Then the args are appended, each quoted
#[tokio::test]
async fn test_single_task_with_args() {
    let scratch = Scratch::new();
    let defs = scratch.defs("say: echo said >> \"$OUT\"\n");
    let engine = Engine::new(defs);

    let args = vec!["hello world".to_string(), "it's".to_string()];
    engine.run("say", &args, no_signals()).await.unwrap();

    assert_eq!(scratch.lines(), vec!["said hello world it's"]);
}

/// Given a sequence [A, B, C]
/// When it runs with extra args
/// Then A, B, C run in order and only C gets the args
#[tokio::test]
async fn test_sequence_order_and_args() {
    let scratch = Scratch::new();
    let defs = scratch.defs(
        "steps:\n  - echo A >> \"$OUT\"\n  - echo B >> \"$OUT\"\n  - echo C >> \"$OUT\"\n",
    );
    let engine = Engine::new(defs);

    engine
        .run("steps", &["x".to_string()], no_signals())
        .await
        .unwrap();

    assert_eq!(scratch.lines(), vec!["A", "B", "C x"]);
}

/// Given a sequence whose second step fails
/// When it runs
/// Then the third step never starts and the failure surfaces
#[tokio::test]
async fn test_sequence_stops_on_failure() {
    let scratch = Scratch::new();
    let defs = scratch.defs(
        "steps:\n  - echo A >> \"$OUT\"\n  - exit 7\n  - echo C >> \"$OUT\"\n",
    );
    let engine = Engine::new(defs);

    let err = engine.run("steps", &[], no_signals()).await.unwrap_err();
    match err {
        Error::CommandFailed { command, status } => {
            assert_eq!(command, "exit 7");
            assert_eq!(status.code(), Some(7));
        }
        other => panic!("Expected CommandFailed, got {:?}", other),
    }
    assert_eq!(scratch.lines(), vec!["A"]);
}

/// Given a sequence referencing another sequence
/// When the outer one runs with args
/// Then the args reach the last command of the inner sequence
#[tokio::test]
async fn test_args_reach_last_step_of_nested_sequence() {
    let scratch = Scratch::new();
    let defs = scratch.defs(
        "inner:\n  - echo i1 >> \"$OUT\"\n  - echo i2 >> \"$OUT\"\n\
         outer:\n  - echo o1 >> \"$OUT\"\n  - inner\n",
    );
    let engine = Engine::new(defs);

    engine
        .run("outer", &["tail".to_string()], no_signals())
        .await
        .unwrap();

    assert_eq!(scratch.lines(), vec!["o1", "i1", "i2 tail"]);
}

/// Given a concurrent list
/// When it runs
/// Then every child runs and the shared reference's state is visible by name
#[tokio::test]
async fn test_concurrent_runs_all_children() {
    let scratch = Scratch::new();
    let defs = scratch.defs(
        "bar:\n  - echo hi >> \"$OUT\"\n  - echo there >> \"$OUT\"\n\
         baz_c:\n  - echo solo >> \"$OUT\"\n  - bar\n",
    );
    let engine = Engine::new(defs);

    engine.run("baz", &[], no_signals()).await.unwrap();

    let mut lines = scratch.lines();
    let hi = lines.iter().position(|l| l == "hi").unwrap();
    let there = lines.iter().position(|l| l == "there").unwrap();
    assert!(hi < there, "bar keeps its own order: {:?}", lines);
    lines.sort();
    assert_eq!(lines, vec!["hi", "solo", "there"]);

    // `bar` as a root is the same node that ran inside `baz`
    let bar = engine.select("bar").unwrap();
    for step in bar.children() {
        assert!(step.as_task().unwrap().exit_status().unwrap().success());
    }
}

/// Given a concurrent list with a long sleeper and a fast failure
/// When it runs
/// Then the failure is reported without waiting for the sleeper
#[tokio::test]
async fn test_concurrent_first_failure_wins() {
    let scratch = Scratch::new();
    let defs = scratch.defs("race_c:\n  - sleep 20\n  - exit 5\n");
    let engine = Engine::new(defs);

    let start = Instant::now();
    let err = engine.run("race", &[], no_signals()).await.unwrap_err();
    assert!(matches!(err, Error::CommandFailed { .. }), "got {:?}", err);
    assert!(start.elapsed() < Duration::from_secs(10));

    let root = engine.select("race").unwrap();
    assert!(root.children()[0].as_task().unwrap().is_running());
    root.terminate();
}

/// Given a concurrent root
/// When extra args are supplied
/// Then it is a usage error and nothing runs
#[tokio::test]
async fn test_concurrent_root_rejects_args() {
    let scratch = Scratch::new();
    let defs = scratch.defs("both_c:\n  - echo a >> \"$OUT\"\n  - echo b >> \"$OUT\"\n");
    let engine = Engine::new(defs);

    let err = engine
        .run("both", &["x".to_string()], no_signals())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ConcurrentArgs));
    assert!(scratch.lines().is_empty());
}

/// Given a sequence terminated before it runs
/// When it runs
/// Then no child executes
#[tokio::test]
async fn test_terminated_sequence_runs_nothing() {
    let scratch = Scratch::new();
    let defs = scratch.defs("steps:\n  - echo A >> \"$OUT\"\n  - echo B >> \"$OUT\"\n");
    let engine = Engine::new(defs);

    let root = engine.select("steps").unwrap();
    root.terminate();
    root.terminate();
    engine.run("steps", &[], no_signals()).await.unwrap();

    assert!(scratch.lines().is_empty());
}

/// Given a finished task
/// When it is terminated twice
/// Then nothing happens
#[tokio::test]
async fn test_terminate_after_completion_is_noop() {
    let scratch = Scratch::new();
    let defs = scratch.defs("once: echo done >> \"$OUT\"\n");
    let engine = Engine::new(defs);

    engine.run("once", &[], no_signals()).await.unwrap();
    let root = engine.select("once").unwrap();
    root.terminate();
    root.terminate();
    assert_eq!(scratch.lines(), vec!["done"]);
}

/// Given a sequence whose first step is running
/// When a cancellation event arrives
/// Then the step is terminated and the next step never starts
#[cfg(unix)]
#[tokio::test]
async fn test_cancellation_stops_sequence() {
    let scratch = Scratch::new();
    let defs = scratch.defs("slow:\n  - sleep 30\n  - echo after >> \"$OUT\"\n");
    let engine = Engine::new(defs);
    let root = engine.select("slow").unwrap();

    let first = root.children()[0].clone();
    let cancellations = Box::pin(stream::once(async move {
        while !first.as_task().unwrap().is_running() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        "SIGINT"
    }));

    let start = Instant::now();
    let err = engine.run("slow", &[], cancellations).await.unwrap_err();
    assert!(matches!(err, Error::Terminated { .. }), "got {:?}", err);
    assert!(start.elapsed() < Duration::from_secs(10));
    assert!(scratch.lines().is_empty());
}

/// Given a concurrent list of sleepers
/// When a cancellation event arrives
/// Then every child is signalled and the run ends
#[cfg(unix)]
#[tokio::test]
async fn test_cancellation_reaches_concurrent_children() {
    let scratch = Scratch::new();
    let defs = scratch.defs("pair_c:\n  - sleep 30\n  - sleep 30\n");
    let engine = Engine::new(defs);
    let root = engine.select("pair").unwrap();

    let watched = root.clone();
    let cancellations = Box::pin(stream::once(async move {
        while !watched
            .children()
            .iter()
            .all(|c| c.as_task().unwrap().is_running())
        {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        "SIGTERM"
    }));

    let start = Instant::now();
    let err = engine.run("pair", &[], cancellations).await.unwrap_err();
    assert!(matches!(err, Error::Terminated { .. }), "got {:?}", err);
    assert!(start.elapsed() < Duration::from_secs(10));
}

/// Given a command that cannot be launched
/// When it runs
/// Then a spawn error surfaces
#[tokio::test]
async fn test_spawn_error() {
    let defs = yo::Resolver::from_host()
        .with_shell(yo::shell::Shell::new("/nonexistent/yo-shell"))
        .resolve_yaml("x: echo hi\n")
        .unwrap();
    let engine = Engine::new(defs);

    let err = engine.run("x", &[], no_signals()).await.unwrap_err();
    assert!(matches!(err, Error::Spawn { .. }), "got {:?}", err);
}
