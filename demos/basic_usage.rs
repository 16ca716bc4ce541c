//! Basic usage example for pubsub-registry.
//!
//! Demonstrates:
//! - Subscribing plain and typed callbacks on the default broker
//! - Publishing with and without arguments
//! - Unsubscribing explicitly
//! - Automatic removal of dropped subscribers
//!
//! Run with: `cargo run --example basic_usage`

use pubsub_registry::{broker, publish, publish_args, subscribe, subscribe_args, unsubscribe};
use std::sync::Arc;

struct StatusBar;
struct Logger;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("pubsub_registry=debug")
        .init();

    println!("=== pubsub-registry: Basic Usage ===\n");

    // -------------------------------------------------------------------------
    // 1. Subscribe
    // -------------------------------------------------------------------------
    println!("1. Subscribing...");

    let status_bar = Arc::new(StatusBar);
    let logger = Arc::new(Logger);

    subscribe(&status_bar, "saved", || println!("   [status bar] document saved")).unwrap();
    subscribe_args(&logger, "saved", |path: &String| {
        println!("   [logger] saved {path}")
    })
    .unwrap();

    println!("   Registered: StatusBar on \"saved\", Logger on \"saved\" with String");

    // -------------------------------------------------------------------------
    // 2. Publish
    // -------------------------------------------------------------------------
    println!("\n2. Publishing...");

    publish("saved");
    publish_args("saved", "/tmp/report.txt".to_string());
    publish_args("saved", 42u32); // nobody subscribed for u32

    // -------------------------------------------------------------------------
    // 3. Unsubscribe
    // -------------------------------------------------------------------------
    println!("\n3. Unsubscribing StatusBar...");

    unsubscribe(&status_bar, "saved");
    publish("saved");
    println!("   Live subscriptions on \"saved\": {}", broker().subscriber_count("saved"));

    // -------------------------------------------------------------------------
    // 4. Drop a subscriber
    // -------------------------------------------------------------------------
    println!("\n4. Dropping Logger...");

    drop(logger);
    println!("   Entries before next publish: {}", broker().len());
    publish_args("saved", "/tmp/ignored.txt".to_string());
    println!("   Entries after next publish:  {}", broker().len());

    println!("\n=== Example Complete ===");
}
