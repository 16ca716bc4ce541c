//! Typed topics example for pubsub-registry.
//!
//! Demonstrates the four call shapes on an explicit `Broker`:
//! - plain: `subscribe` / `publish`
//! - args: `subscribe_args` / `publish_args`
//! - sender: `subscribe_sender` / `publish_sender`
//! - sender + args: `subscribe_sender_args` / `publish_sender_args`
//!
//! Run with: `cargo run --example typed_topics`

use pubsub_registry::Broker;
use std::sync::Arc;

/// A sender: published alongside the topic so receivers know who changed.
struct Slider {
    name: &'static str,
}

/// A subscriber reacting to slider changes.
struct Preview;

fn main() {
    let broker = Broker::new();
    let preview = Arc::new(Preview);

    broker
        .subscribe(&preview, "changed", || println!("something changed"))
        .unwrap();
    broker
        .subscribe_args(&preview, "changed", |value: &f32| println!("value is now {value}"))
        .unwrap();
    broker
        .subscribe_sender(&preview, "changed", |slider: &Slider| {
            println!("{} was touched", slider.name)
        })
        .unwrap();
    broker
        .subscribe_sender_args(&preview, "changed", |slider: &Slider, value: &f32| {
            println!("{} moved to {value}", slider.name)
        })
        .unwrap();

    let volume = Slider { name: "volume" };

    broker.publish("changed");
    broker.publish_args("changed", 0.5f32);
    broker.publish_sender(&volume, "changed");
    broker.publish_sender_args(&volume, "changed", 0.75f32);

    // f64 is not f32: nothing runs.
    broker.publish_args("changed", 0.5f64);

    println!("{} registrations held", broker.len());
}
