//! Integration tests for payload types.
//!
//! Any `'static` type can be a sender or an argument: primitives, strings,
//! tuples, structs, closures and trait objects. Matching is by exact type.

use pubsub_registry::Broker;
use std::sync::{Arc, Mutex};

struct Listener;

trait Shape: Send + Sync {
    fn area(&self) -> f64;
}

struct Square(f64);

impl Shape for Square {
    fn area(&self) -> f64 {
        self.0 * self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Order {
    id: u64,
    item: String,
}

fn recorder<T: Send + 'static>() -> (Arc<Mutex<Vec<T>>>, Arc<Mutex<Vec<T>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    (seen.clone(), seen)
}

#[test]
fn test_primitive_types_are_distinct() {
    let broker = Broker::new();
    let listener = Arc::new(Listener);
    let (seen, seen_clone) = recorder::<String>();

    let s = seen_clone.clone();
    broker
        .subscribe_args(&listener, "n", move |v: &u8| s.lock().unwrap().push(format!("u8 {v}")))
        .unwrap();
    let s = seen_clone.clone();
    broker
        .subscribe_args(&listener, "n", move |v: &f64| {
            s.lock().unwrap().push(format!("f64 {v}"))
        })
        .unwrap();
    let s = seen_clone;
    broker
        .subscribe_args(&listener, "n", move |v: &bool| {
            s.lock().unwrap().push(format!("bool {v}"))
        })
        .unwrap();

    broker.publish_args("n", 1u8);
    broker.publish_args("n", 1u16);
    broker.publish_args("n", 2.5f64);
    broker.publish_args("n", 2.5f32);
    broker.publish_args("n", true);

    assert_eq!(*seen.lock().unwrap(), vec!["u8 1", "f64 2.5", "bool true"]);
}

#[test]
fn test_str_and_string_are_distinct() {
    let broker = Broker::new();
    let listener = Arc::new(Listener);
    let (seen, seen_clone) = recorder::<String>();

    broker
        .subscribe_args(&listener, "msg", move |v: &&'static str| {
            seen_clone.lock().unwrap().push(v.to_string())
        })
        .unwrap();

    broker.publish_args("msg", "hello".to_string());
    broker.publish_args("msg", "hello");

    assert_eq!(*seen.lock().unwrap(), vec!["hello".to_string()]);
}

#[test]
fn test_struct_and_tuple_payloads() {
    let broker = Broker::new();
    let listener = Arc::new(Listener);
    let (orders, orders_clone) = recorder::<Order>();
    let (points, points_clone) = recorder::<(i32, i32)>();

    broker
        .subscribe_args(&listener, "order", move |o: &Order| {
            orders_clone.lock().unwrap().push(o.clone())
        })
        .unwrap();
    broker
        .subscribe_args(&listener, "moved", move |p: &(i32, i32)| {
            points_clone.lock().unwrap().push(*p)
        })
        .unwrap();

    let order = Order {
        id: 7,
        item: "book".to_string(),
    };
    broker.publish_args("order", order.clone());
    broker.publish_args("moved", (3, -4));
    broker.publish_args("moved", (3i64, -4i64));

    assert_eq!(*orders.lock().unwrap(), vec![order]);
    assert_eq!(*points.lock().unwrap(), vec![(3, -4)]);
}

#[test]
fn test_trait_object_payloads() {
    let broker = Broker::new();
    let listener = Arc::new(Listener);
    let (areas, areas_clone) = recorder::<f64>();

    broker
        .subscribe_args(&listener, "shape", move |s: &Arc<dyn Shape>| {
            areas_clone.lock().unwrap().push(s.area())
        })
        .unwrap();

    // Only the exact erased type matches; the concrete type does not.
    broker.publish_args("shape", Arc::new(Square(3.0)) as Arc<dyn Shape>);
    broker.publish_args("shape", Arc::new(Square(5.0)));

    assert_eq!(*areas.lock().unwrap(), vec![9.0]);
}

#[test]
fn test_function_payloads() {
    let broker = Broker::new();
    let listener = Arc::new(Listener);
    let (results, results_clone) = recorder::<i32>();

    broker
        .subscribe_args(&listener, "apply", move |f: &fn(i32) -> i32| {
            results_clone.lock().unwrap().push(f(21))
        })
        .unwrap();

    let double: fn(i32) -> i32 = |x| x * 2;
    broker.publish_args("apply", double);

    assert_eq!(*results.lock().unwrap(), vec![42]);
}

#[test]
fn test_sender_types_are_matched_exactly() {
    struct Button;
    struct Slider;

    let broker = Broker::new();
    let listener = Arc::new(Listener);
    let (seen, seen_clone) = recorder::<&'static str>();

    let s = seen_clone.clone();
    broker
        .subscribe_sender(&listener, "changed", move |_: &Button| s.lock().unwrap().push("button"))
        .unwrap();
    let s = seen_clone;
    broker
        .subscribe_sender_args(&listener, "changed", move |_: &Slider, v: &f32| {
            s.lock().unwrap().push(if *v > 0.5 { "slider high" } else { "slider low" })
        })
        .unwrap();

    broker.publish_sender(&Button, "changed");
    broker.publish_sender(&Slider, "changed");
    broker.publish_sender_args(&Slider, "changed", 0.9f32);
    broker.publish_sender_args(&Button, "changed", 0.9f32);

    assert_eq!(*seen.lock().unwrap(), vec!["button", "slider high"]);
}
