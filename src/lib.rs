//! # PubSub Registry
//!
//! A thread-safe, in-process publish/subscribe broker. Components exchange
//! notifications by topic name without holding references to each other.
//!
//! A subscriber registers a callback against a topic, optionally narrowed by a
//! sender type and/or an arguments type. A publisher announces the topic with
//! matching values and every live subscriber registered for exactly those types
//! is called synchronously.
//!
//! ## Quick Start
//!
//! ```rust
//! use pubsub_registry::{publish_args, subscribe_args};
//! use std::sync::{Arc, Mutex};
//!
//! struct Logger {
//!     lines: Mutex<Vec<String>>,
//! }
//!
//! let logger = Arc::new(Logger { lines: Mutex::new(Vec::new()) });
//!
//! let weak = Arc::downgrade(&logger);
//! subscribe_args(&logger, "log", move |line: &String| {
//!     if let Some(logger) = weak.upgrade() {
//!         logger.lines.lock().unwrap().push(line.clone());
//!     }
//! })
//! .unwrap();
//!
//! publish_args("log", "started".to_string());
//! assert_eq!(*logger.lines.lock().unwrap(), vec!["started".to_string()]);
//! ```
//!
//! ## Features
//!
//! - **Typed topics**: four call shapes (plain, sender, args, sender + args);
//!   types must match exactly, nothing is coerced
//! - **Weak subscribers**: the broker never keeps a subscriber alive; entries of
//!   dropped subscribers are purged on the next operation
//! - **Re-entrant**: callbacks run outside the lock and may subscribe, publish
//!   or unsubscribe
//! - **Tracing support**: `tracing` logs plus an optional callback for
//!   monitoring broker operations
//!
//! ## Main Functions
//!
//! The free functions below act on the process-wide default broker. Build an
//! explicit [`Broker`] for independent instances, or use [`define_broker!`] for
//! more named process-wide ones.
//!
//! - [`subscribe`], [`subscribe_args`], [`subscribe_sender`], [`subscribe_sender_args`]
//! - [`publish`], [`publish_args`], [`publish_sender`], [`publish_sender_args`]
//! - [`unsubscribe`], [`unsubscribe_args`], [`unsubscribe_sender`], [`unsubscribe_sender_args`]
//! - [`set_trace_callback`] - Set up tracing for broker operations

#[macro_use]
mod macros;

mod broker;
mod broker_error;
mod broker_event;
mod key;
mod store;
mod subscription;

pub use broker::{Broker, TraceCallback};
pub use broker_error::BrokerError;
pub use broker_event::BrokerEvent;
pub use key::{CompositeKey, Qualifiers, TypeTag};
pub use subscription::SubscriberHandle;

define_broker!(default_broker);

pub use default_broker::{
    broker, clear_trace_callback, publish, publish_args, publish_sender,
    publish_sender_args, set_trace_callback, subscribe, subscribe_args, subscribe_sender,
    subscribe_sender_args, unsubscribe, unsubscribe_args, unsubscribe_sender,
    unsubscribe_sender_args,
};

#[doc(hidden)]
pub use default_broker::clear;
