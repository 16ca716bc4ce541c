//! Macros for creating named, process-wide brokers.
//!
//! This module provides a simple macro-based approach to create brokers that
//! live in a `static`, are created on first use and are reachable through free
//! functions without passing an instance around.

/// Creates a named process-wide broker with a single macro invocation.
///
/// The macro generates a module containing:
/// - A lazily created `static` [`Broker`](crate::Broker) (hidden)
/// - `broker()` returning that instance
/// - Free functions mirroring every broker operation
///
/// # Examples
///
/// ```rust
/// use pubsub_registry::define_broker;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// define_broker!(ui_events);
///
/// struct Toolbar;
///
/// static CLICKS: AtomicUsize = AtomicUsize::new(0);
///
/// let toolbar = Arc::new(Toolbar);
/// ui_events::subscribe(&toolbar, "clicked", || {
///     CLICKS.fetch_add(1, Ordering::SeqCst);
/// })
/// .unwrap();
///
/// ui_events::publish("clicked");
/// assert_eq!(CLICKS.load(Ordering::SeqCst), 1);
/// ```
///
/// # Multiple Brokers
///
/// Every invocation creates its own isolated broker:
///
/// ```rust
/// use pubsub_registry::define_broker;
/// use std::sync::Arc;
///
/// define_broker!(network);
/// define_broker!(storage);
///
/// struct Monitor;
/// let monitor = Arc::new(Monitor);
///
/// network::subscribe_args(&monitor, "bytes", |_: &u64| {}).unwrap();
///
/// assert_eq!(network::broker().subscriber_count("bytes"), 1);
/// assert_eq!(storage::broker().subscriber_count("bytes"), 0);
/// ```
#[macro_export]
macro_rules! define_broker {
    ($name:ident) => {
        pub mod $name {
            #![allow(dead_code)]

            use std::any::Any;
            use std::sync::LazyLock;

            use $crate::{Broker, BrokerError, BrokerEvent, SubscriberHandle};

            // Created on first use, lives until process exit.
            static BROKER: LazyLock<Broker> = LazyLock::new(Broker::new);

            /// The broker behind this module's free functions.
            pub fn broker() -> &'static Broker {
                &BROKER
            }

            /// Register a plain callback.
            pub fn subscribe<H: SubscriberHandle>(
                subscriber: &H,
                topic: &str,
                callback: impl Fn() + Send + Sync + 'static,
            ) -> Result<(), BrokerError> {
                BROKER.subscribe(subscriber, topic, callback)
            }

            /// Register a callback taking arguments of type `A`.
            pub fn subscribe_args<A: Any, H: SubscriberHandle>(
                subscriber: &H,
                topic: &str,
                callback: impl Fn(&A) + Send + Sync + 'static,
            ) -> Result<(), BrokerError> {
                BROKER.subscribe_args(subscriber, topic, callback)
            }

            /// Register a callback taking a sender of type `S`.
            pub fn subscribe_sender<S: Any, H: SubscriberHandle>(
                subscriber: &H,
                topic: &str,
                callback: impl Fn(&S) + Send + Sync + 'static,
            ) -> Result<(), BrokerError> {
                BROKER.subscribe_sender(subscriber, topic, callback)
            }

            /// Register a callback taking a sender of type `S` and arguments of type `A`.
            pub fn subscribe_sender_args<S: Any, A: Any, H: SubscriberHandle>(
                subscriber: &H,
                topic: &str,
                callback: impl Fn(&S, &A) + Send + Sync + 'static,
            ) -> Result<(), BrokerError> {
                BROKER.subscribe_sender_args(subscriber, topic, callback)
            }

            pub fn publish(topic: &str) {
                BROKER.publish(topic)
            }

            pub fn publish_args<A: Any>(topic: &str, args: A) {
                BROKER.publish_args(topic, args)
            }

            pub fn publish_sender<S: Any>(sender: &S, topic: &str) {
                BROKER.publish_sender(sender, topic)
            }

            pub fn publish_sender_args<S: Any, A: Any>(sender: &S, topic: &str, args: A) {
                BROKER.publish_sender_args(sender, topic, args)
            }

            pub fn unsubscribe<H: SubscriberHandle>(subscriber: &H, topic: &str) {
                BROKER.unsubscribe(subscriber, topic)
            }

            pub fn unsubscribe_args<A: Any, H: SubscriberHandle>(subscriber: &H, topic: &str) {
                BROKER.unsubscribe_args::<A, H>(subscriber, topic)
            }

            pub fn unsubscribe_sender<S: Any, H: SubscriberHandle>(subscriber: &H, topic: &str) {
                BROKER.unsubscribe_sender::<S, H>(subscriber, topic)
            }

            pub fn unsubscribe_sender_args<S: Any, A: Any, H: SubscriberHandle>(
                subscriber: &H,
                topic: &str,
            ) {
                BROKER.unsubscribe_sender_args::<S, A, H>(subscriber, topic)
            }

            /// Set a tracing callback for this broker.
            pub fn set_trace_callback(
                callback: impl Fn(&BrokerEvent<'_>) + Send + Sync + 'static,
            ) {
                BROKER.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                BROKER.clear_trace_callback()
            }

            /// Drop every registration. Meant for resetting state between tests.
            #[doc(hidden)]
            pub fn clear() {
                BROKER.clear()
            }
        }
    };
}
