//! Named brokers example for pubsub-registry.
//!
//! Demonstrates `define_broker!`, which creates an isolated process-wide broker
//! per invocation, and the trace callback for monitoring broker operations.
//!
//! Run with: `cargo run --example named_brokers`

use pubsub_registry::define_broker;
use std::sync::Arc;

define_broker!(orders);
define_broker!(audit);

struct Warehouse;
struct Auditor;

fn main() {
    // Forward every orders event to the audit broker.
    orders::set_trace_callback(|event| audit::publish_args("event", event.to_string()));

    let auditor = Arc::new(Auditor);
    audit::subscribe_args(&auditor, "event", |line: &String| println!("[audit] {line}")).unwrap();

    let warehouse = Arc::new(Warehouse);
    orders::subscribe_args(&warehouse, "placed", |id: &u64| {
        println!("[warehouse] packing order {id}")
    })
    .unwrap();

    orders::publish_args("placed", 1001u64);
    orders::publish_args("placed", 1002u64);

    drop(warehouse);
    orders::publish_args("placed", 1003u64);

    orders::clear_trace_callback();
    println!(
        "orders: {} entries, audit: {} entries",
        orders::broker().len(),
        audit::broker().len()
    );
}
