//! End-to-end behavior of transitions, listeners and graph export.

use futures::future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use switchyard::{
    Channel, ConfigError, DotOptions, ListenerError, StateMachine, StateMachineBuilder,
    TransitionError, TransitionTableBuilder,
};

type ApprovalMachine = StateMachine<String, Vec<&'static str>, &'static str>;

fn build_fsm() -> ApprovalMachine {
    StateMachineBuilder::new()
        .initial("pending")
        .event("approve", ["pending"], "approved")
        .event("reject", ["pending", "approved"], "rejected")
        .event("pend", ["approved", "rejected"], "pending")
        .build()
        .unwrap()
}

#[test]
fn builds_an_operation_for_each_event() {
    let fsm = build_fsm();

    assert!(fsm.operation("approve").is_some());
    assert!(fsm.operation("reject").is_some());
    assert!(fsm.operation("pend").is_some());
    assert_eq!(fsm.operations().count(), 3);
}

#[test]
fn reserved_event_names_are_rejected() {
    let result: Result<StateMachine<String>, _> = StateMachine::from_json(
        r#"{"events": {"is": {"from": "start", "to": "end"}}}"#,
    );

    let err = result.unwrap_err();
    assert!(matches!(err, ConfigError::IllegalEventName(_)));
    assert_eq!(
        err.to_string(),
        "Illegal event name \"is\"; can't overwrite property"
    );
}

#[tokio::test]
async fn calls_bound_event_handlers() {
    let fsm = build_fsm();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    fsm.on("approve", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        future::ready(Ok("handled"))
    });

    fsm.fire("approve", vec![]).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn resolves_with_handler_results_in_registration_order() {
    let fsm = build_fsm();

    fsm.on("approve", |_| async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok("first")
    });
    fsm.on("approve", |_| future::ready(Ok("second")));

    let results = fsm.fire("approve", vec![]).await.unwrap();

    assert_eq!(results, vec!["first", "second"]);
}

#[tokio::test]
async fn transition_listener_results_are_not_returned() {
    let fsm = build_fsm();
    fsm.on_transition(|_| future::ready(Ok("generic")));
    fsm.on("approve", |_| future::ready(Ok("specific")));

    let results = fsm.fire("approve", vec![]).await.unwrap();

    assert_eq!(results, vec!["specific"]);
}

#[tokio::test]
async fn once_handler_is_only_called_once() {
    let fsm = build_fsm();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    fsm.once("approve", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        future::ready(Ok("once"))
    });

    let (first, second) = tokio::join!(fsm.fire("approve", vec![]), fsm.fire("approve", vec![]));

    assert!(first.is_ok());
    assert!(second.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(fsm.listener_count(&Channel::event("approve")), 0);
}

#[tokio::test]
async fn once_handler_does_not_fire_on_later_transitions() {
    let fsm = build_fsm();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    fsm.once("reject", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        future::ready(Ok("once"))
    });

    fsm.fire("reject", vec![]).await.unwrap();
    fsm.fire("pend", vec![]).await.unwrap();
    let results = fsm.fire("reject", vec![]).await.unwrap();

    assert!(results.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_transitions_are_not_serialized() {
    let fsm = build_fsm();
    fsm.on("approve", |_| async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok("approved")
    });
    fsm.on("reject", |_| async {
        tokio::time::sleep(Duration::from_millis(80)).await;
        Ok("rejected")
    });

    let (approve, reject) = tokio::join!(fsm.fire("approve", vec![]), fsm.fire("reject", vec![]));

    // Both saw "pending" when fired; the slower one commits last.
    assert!(approve.is_ok());
    assert!(reject.is_ok());
    assert!(fsm.is("rejected"));
}

#[tokio::test]
async fn passes_event_info_and_arguments_to_handlers() {
    let fsm = build_fsm();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let log = Arc::clone(&seen);
    fsm.on("approve", move |event| {
        log.lock()
            .unwrap()
            .push((event.event, event.from, event.to, event.args));
        future::ready(Ok("seen"))
    });

    fsm.fire("approve", vec!["first arg", "second arg"])
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (event, from, to, args) = &seen[0];
    assert_eq!(event, "approve");
    assert_eq!(from, "pending");
    assert_eq!(to, "approved");
    assert_eq!(args, &vec!["first arg", "second arg"]);
}

#[tokio::test]
async fn generic_listeners_see_every_event() {
    let fsm = build_fsm();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let log = Arc::clone(&seen);
    fsm.on_transition(move |event| {
        log.lock().unwrap().push(event.event);
        future::ready(Ok("generic"))
    });

    fsm.fire("approve", vec![]).await.unwrap();
    fsm.fire("reject", vec![]).await.unwrap();
    fsm.fire("pend", vec![]).await.unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["approve", "reject", "pend"]);
}

#[tokio::test]
async fn transition_name_registers_a_generic_listener() {
    let fsm = build_fsm();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let log = Arc::clone(&seen);
    fsm.on("transition", move |event| {
        log.lock().unwrap().push(event.event);
        future::ready(Ok("generic"))
    });
    fsm.on("approve", |_| future::ready(Ok("specific")));

    assert_eq!(fsm.listener_count(&Channel::Transition), 1);

    let results = fsm.fire("approve", vec![]).await.unwrap();
    fsm.fire("reject", vec![]).await.unwrap();

    assert_eq!(results, vec!["specific"]);
    assert_eq!(*seen.lock().unwrap(), vec!["approve", "reject"]);
}

#[tokio::test]
async fn once_with_transition_name_fires_on_the_next_transition_only() {
    let fsm = build_fsm();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    fsm.once("transition", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        future::ready(Ok("once"))
    });

    fsm.fire("approve", vec![]).await.unwrap();
    fsm.fire("pend", vec![]).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn dropped_transition_never_commits() {
    let fsm = build_fsm();
    fsm.on("approve", |_| future::pending());

    let attempt = tokio::time::timeout(Duration::from_millis(20), fsm.fire("approve", vec![])).await;

    assert!(attempt.is_err());
    assert!(fsm.is("pending"));
    assert!(fsm.can("approve"));
}

#[tokio::test]
async fn updates_the_state_after_transition() {
    let fsm = build_fsm();

    assert_eq!(fsm.state(), "pending");
    fsm.fire("approve", vec![]).await.unwrap();

    assert!(fsm.is("approved"));
    assert_eq!(fsm.state(), "approved");
}

#[tokio::test]
async fn state_is_committed_only_after_listeners_finish() {
    let fsm = Arc::new(build_fsm());
    let observed = Arc::new(Mutex::new(None));

    let machine = Arc::downgrade(&fsm);
    let slot = Arc::clone(&observed);
    fsm.on("approve", move |_| {
        let state = machine.upgrade().map(|m| m.state());
        *slot.lock().unwrap() = state;
        future::ready(Ok("checked"))
    });

    fsm.fire("approve", vec![]).await.unwrap();

    assert_eq!(observed.lock().unwrap().as_deref(), Some("pending"));
    assert!(fsm.is("approved"));
}

#[tokio::test]
async fn inaccessible_transition_rejects_with_state_transition_error() {
    let fsm = build_fsm();

    let err = fsm.fire("pend", vec![]).await.unwrap_err();

    assert!(matches!(err, TransitionError::Inaccessible(_)));
    assert_eq!(err.to_string(), "Cannot transition from pending via pend");
    assert!(fsm.is("pending"));
}

#[tokio::test]
async fn rejecting_handler_rejects_transition_and_keeps_state() {
    let fsm = build_fsm();
    fsm.on("approve", |_| future::ready(Ok("fine")));
    fsm.on("approve", |_| future::ready(Err(ListenerError::new("ledger offline"))));

    let err = fsm.fire("approve", vec![]).await.unwrap_err();

    assert_eq!(err, TransitionError::Listener(ListenerError::new("ledger offline")));
    assert_eq!(err.to_string(), "ledger offline");
    assert!(fsm.is("pending"));
    // can() still reflects the unchanged state.
    assert!(fsm.can("approve"));
    assert!(!fsm.can("pend"));
}

#[tokio::test]
async fn machine_can_be_shared_across_tasks() {
    let fsm = Arc::new(build_fsm());
    fsm.on("approve", |_| async {
        tokio::task::yield_now().await;
        Ok("from task")
    });

    let machine = Arc::clone(&fsm);
    let handle = tokio::spawn(async move { machine.fire("approve", vec![]).await });

    let results = handle.await.unwrap().unwrap();
    assert_eq!(results, vec!["from task"]);
    assert!(fsm.is("approved"));
}

#[test]
fn is_matches_only_the_current_state() {
    let fsm = build_fsm();
    assert!(fsm.is("pending"));
    assert!(!fsm.is("approved"));
    assert!(!fsm.is("rejected"));
}

#[test]
fn can_reports_accessible_events() {
    let fsm = build_fsm();
    assert!(fsm.can("approve"));
    assert!(!fsm.can("pend"));
}

#[test]
fn dot_export_without_accepting_states() {
    let table = TransitionTableBuilder::<String>::new()
        .event("warn", ["green"], "yellow")
        .event("panic", ["yellow"], "red")
        .event("calm", ["red"], "yellow")
        .event("clear", ["yellow"], "green")
        .build()
        .unwrap();

    let dot = table.to_dot(&DotOptions::new()).unwrap();

    assert!(!dot.contains("doublecircle"));
    assert!(dot.contains("red -> yellow [label=\"calm\"]"));
}

#[test]
fn dot_export_marks_accepting_states() {
    let fsm: StateMachine<String> = StateMachineBuilder::new()
        .initial("green")
        .event("warn", ["green"], "yellow")
        .event("panic", ["yellow"], "red")
        .event("clear", ["yellow"], "green")
        .build()
        .unwrap();

    let dot = fsm.to_dot(&DotOptions::new()).unwrap();

    assert!(dot.contains("node [shape=doublecircle fixedsize=true width=1]; red;"));
}

#[test]
fn dot_export_of_no_events_is_none() {
    let table = TransitionTableBuilder::<String>::new().build().unwrap();
    assert_eq!(table.to_dot(&DotOptions::new()), None);
}

#[tokio::test]
async fn traffic_light_cycles() {
    let fsm: StateMachine<String> = StateMachine::from_json(
        r#"{
            "initial": "green",
            "events": {
                "warn": { "from": "green", "to": "yellow" },
                "panic": { "from": "yellow", "to": "red" },
                "calm": { "from": "red", "to": "yellow" },
                "clear": { "from": "yellow", "to": "green" }
            }
        }"#,
    )
    .unwrap();

    assert!(fsm.is("green"));
    fsm.fire("warn", ()).await.unwrap();
    assert!(!fsm.is("green"));
    fsm.fire("panic", ()).await.unwrap();
    fsm.fire("calm", ()).await.unwrap();
    fsm.fire("clear", ()).await.unwrap();
    assert!(fsm.is("green"));
}
