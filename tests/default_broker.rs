//! Integration tests for the process-wide default broker.
//!
//! NOTE: All tests use #[serial] because they share the same default broker.
//! Running them in parallel would cause interference. Each test resets it with
//! `clear()` first.

use pubsub_registry::{
    broker, clear, publish, publish_args, publish_sender, publish_sender_args, subscribe,
    subscribe_args, subscribe_sender_args, unsubscribe, unsubscribe_args,
};
use serial_test::serial;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

struct ViewModel;
struct OtherViewModel;

#[derive(Debug, PartialEq)]
struct Sender {
    id: u32,
}

#[test]
#[serial]
fn test_ping_then_unsubscribe() {
    clear();

    let a = Arc::new(ViewModel);
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = hits.clone();

    subscribe(&a, "ping", move || {
        hits_clone.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();

    publish("ping");
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    unsubscribe(&a, "ping");
    publish("ping");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
#[serial]
fn test_int_and_string_handlers_on_same_topic() {
    clear();

    let a = Arc::new(ViewModel);
    let log = Arc::new(Mutex::new(Vec::new()));

    let log_clone = log.clone();
    subscribe_args(&a, "evt", move |v: &i32| {
        log_clone.lock().unwrap().push(format!("int:{v}"))
    })
    .unwrap();
    let log_clone = log.clone();
    subscribe_args(&a, "evt", move |v: &String| {
        log_clone.lock().unwrap().push(format!("string:{v}"))
    })
    .unwrap();

    publish_args("evt", 5i32);
    assert_eq!(*log.lock().unwrap(), vec!["int:5"]);

    publish_args("evt", "x".to_string());
    assert_eq!(*log.lock().unwrap(), vec!["int:5", "string:x"]);
}

#[test]
#[serial]
fn test_sender_and_args_handler() {
    clear();

    let b = Arc::new(OtherViewModel);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let seen_clone = seen.clone();
    subscribe_sender_args(&b, "evt", move |sender: &Sender, v: &i32| {
        seen_clone.lock().unwrap().push((sender.id, *v));
    })
    .unwrap();

    let sender = Sender { id: 11 };
    publish_sender_args(&sender, "evt", 7i32);
    publish_args("evt", 7i32);
    publish_sender(&sender, "evt");

    assert_eq!(*seen.lock().unwrap(), vec![(11, 7)]);
}

#[test]
#[serial]
fn test_dropped_subscriber_entry_goes_after_one_publish() {
    clear();

    let a = Arc::new(ViewModel);
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = hits.clone();

    subscribe_args(&a, "tick", move |_: &u64| {
        hits_clone.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();
    assert_eq!(broker().len(), 1);

    drop(a);
    publish_args("tick", 1u64);

    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(broker().len(), 0);
}

#[test]
#[serial]
fn test_unsubscribe_without_registration_is_noop() {
    clear();

    let a = Arc::new(ViewModel);
    let b = Arc::new(OtherViewModel);
    subscribe(&b, "ping", || {}).unwrap();
    subscribe_args(&b, "ping", |_: &bool| {}).unwrap();

    unsubscribe(&a, "ping");
    unsubscribe_args::<bool, _>(&a, "ping");
    unsubscribe(&a, "never-registered");

    assert_eq!(broker().subscriber_count("ping"), 2);
}

#[test]
#[serial]
fn test_clear_resets_between_cases() {
    clear();

    let a = Arc::new(ViewModel);
    subscribe(&a, "ping", || {}).unwrap();
    assert!(!broker().is_empty());

    clear();
    assert!(broker().is_empty());
}
