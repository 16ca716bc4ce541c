//! The broker: typed subscribe, publish and unsubscribe over one locked store.
//!
//! # Examples
//!
//! ```
//! use pubsub_registry::Broker;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! struct StatusBar;
//!
//! let broker = Broker::new();
//! let status_bar = Arc::new(StatusBar);
//! let hits = Arc::new(AtomicUsize::new(0));
//!
//! let counter = hits.clone();
//! broker
//!     .subscribe_args(&status_bar, "progress", move |pct: &u8| {
//!         counter.fetch_add(*pct as usize, Ordering::SeqCst);
//!     })
//!     .unwrap();
//!
//! broker.publish_args("progress", 40u8);
//! broker.publish_args("progress", 40u32); // different type, not delivered
//! assert_eq!(hits.load(Ordering::SeqCst), 40);
//!
//! drop(status_bar);
//! broker.publish_args("progress", 10u8); // subscriber gone, not delivered
//! assert_eq!(hits.load(Ordering::SeqCst), 40);
//! assert!(broker.is_empty());
//! ```

use std::any::{type_name, Any};
use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use crate::key::{CompositeKey, Qualifiers};
use crate::store::{Scan, SubscriptionStore};
use crate::subscription::{Callback, SubscriberHandle, Subscription};
use crate::{BrokerError, BrokerEvent};

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives every `BrokerEvent` the broker emits. It must be
/// thread-safe because a broker is shared across threads.
pub type TraceCallback = dyn Fn(&BrokerEvent<'_>) + Send + Sync + 'static;

/// An in-process publish/subscribe broker.
///
/// Subscribers are identified by an `Arc<T>` (or `Weak<T>`) and held weakly:
/// dropping the last `Arc` unregisters every callback the subscriber owns on
/// the next broker call. Callbacks are stored strongly, so a callback that
/// captures an `Arc` of its own subscriber keeps that subscriber alive; capture
/// a `Weak` instead.
///
/// A slot is keyed by topic, sender type, arguments type and the subscriber's
/// *type*. Registering again under the same key replaces the earlier callback.
#[derive(Default)]
pub struct Broker {
    store: SubscriptionStore,
    trace: Mutex<Option<Arc<TraceCallback>>>,
}

impl Broker {
    /// Creates an empty broker with no tracing callback.
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------------------------------
    // Tracing
    // ---------------------------------------------------------------------------------------------

    /// Set a tracing callback for broker operations.
    ///
    /// The callback is cloned out of its lock before it runs and is never run
    /// while the store is locked, so it may call back into this broker.
    pub fn set_trace_callback(&self, callback: impl Fn(&BrokerEvent<'_>) + Send + Sync + 'static) {
        self.replace_trace(Some(Arc::new(callback)));
    }

    /// Clear the tracing callback.
    pub fn clear_trace_callback(&self) {
        self.replace_trace(None);
    }

    // The old hook is returned so it drops after the lock is released.
    fn replace_trace(&self, callback: Option<Arc<TraceCallback>>) -> Option<Arc<TraceCallback>> {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        std::mem::replace(&mut *guard, callback)
    }

    fn emit_event(&self, event: &BrokerEvent<'_>) {
        let callback = self
            .trace
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    fn report_reaped(&self, removed: usize) {
        if removed > 0 {
            debug!(removed, "purged subscriptions of dropped subscribers");
            self.emit_event(&BrokerEvent::Reap { removed });
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Subscribe
    // ---------------------------------------------------------------------------------------------

    fn subscribe_with<H: SubscriberHandle>(
        &self,
        subscriber: &H,
        qualifiers: Qualifiers<'_>,
        callback: Callback,
    ) -> Result<(), BrokerError> {
        let subscriber_type = type_name::<H::Target>();
        let weak = subscriber.to_weak();
        if weak.strong_count() == 0 {
            debug!(
                topic = qualifiers.topic,
                subscriber = subscriber_type,
                "rejected subscription of a dropped subscriber"
            );
            return Err(BrokerError::InvalidSubscriber {
                type_name: subscriber_type,
            });
        }

        let key = qualifiers.with_subscriber::<H::Target>();
        let subscription = Subscription::new(key.clone(), weak, callback);
        let (replaced, reaped) = self.store.put(subscription);
        self.report_reaped(reaped);

        debug!(
            topic = key.topic(),
            sender = ?key.sender(),
            args = ?key.args(),
            subscriber = key.subscriber().name(),
            replaced,
            "subscription stored"
        );
        self.emit_event(&BrokerEvent::Subscribe {
            topic: qualifiers.topic,
            subscriber: key.subscriber().name(),
            replaced,
        });
        Ok(())
    }

    /// Registers `callback` for plain publishes of `topic`.
    ///
    /// # Errors
    ///
    /// [`BrokerError::InvalidSubscriber`] if `subscriber` is a `Weak` whose
    /// target was already dropped. Nothing is stored in that case.
    pub fn subscribe<H: SubscriberHandle>(
        &self,
        subscriber: &H,
        topic: &str,
        callback: impl Fn() + Send + Sync + 'static,
    ) -> Result<(), BrokerError> {
        self.subscribe_with(subscriber, Qualifiers::topic(topic), Callback::plain(callback))
    }

    /// Registers `callback` for publishes of `topic` carrying arguments of type `A`.
    pub fn subscribe_args<A: Any, H: SubscriberHandle>(
        &self,
        subscriber: &H,
        topic: &str,
        callback: impl Fn(&A) + Send + Sync + 'static,
    ) -> Result<(), BrokerError> {
        self.subscribe_with(subscriber, Qualifiers::args::<A>(topic), Callback::args(callback))
    }

    /// Registers `callback` for publishes of `topic` by a sender of type `S`.
    pub fn subscribe_sender<S: Any, H: SubscriberHandle>(
        &self,
        subscriber: &H,
        topic: &str,
        callback: impl Fn(&S) + Send + Sync + 'static,
    ) -> Result<(), BrokerError> {
        self.subscribe_with(
            subscriber,
            Qualifiers::sender::<S>(topic),
            Callback::sender(callback),
        )
    }

    /// Registers `callback` for publishes of `topic` by a sender of type `S`
    /// carrying arguments of type `A`.
    pub fn subscribe_sender_args<S: Any, A: Any, H: SubscriberHandle>(
        &self,
        subscriber: &H,
        topic: &str,
        callback: impl Fn(&S, &A) + Send + Sync + 'static,
    ) -> Result<(), BrokerError> {
        self.subscribe_with(
            subscriber,
            Qualifiers::sender_args::<S, A>(topic),
            Callback::sender_args(callback),
        )
    }

    // ---------------------------------------------------------------------------------------------
    // Publish
    // ---------------------------------------------------------------------------------------------

    fn publish_with(
        &self,
        qualifiers: Qualifiers<'_>,
        sender: Option<&dyn Any>,
        args: Option<&dyn Any>,
    ) {
        let Scan { deliveries, reaped } = self.store.scan_live_matching(&qualifiers);
        self.report_reaped(reaped);

        let mut delivered = 0;
        for delivery in &deliveries {
            if delivery.deliver(sender, args) {
                delivered += 1;
            }
        }

        trace!(
            topic = qualifiers.topic,
            matched = deliveries.len(),
            delivered,
            "topic published"
        );
        self.emit_event(&BrokerEvent::Publish {
            topic: qualifiers.topic,
            delivered,
        });
    }

    /// Invokes every live callback registered for plain publishes of `topic`.
    ///
    /// Callbacks run on the calling thread after the store lock is released,
    /// in no particular order. A callback may subscribe, unsubscribe or publish;
    /// changes it makes are seen by later publishes, not by this one.
    ///
    /// # Panics
    ///
    /// A panic inside a callback is not caught. It unwinds out of this call and
    /// the callbacks not yet run for this publish are skipped. The broker stays
    /// usable afterwards.
    pub fn publish(&self, topic: &str) {
        self.publish_with(Qualifiers::topic(topic), None, None);
    }

    /// Publishes `topic` with `args`. Only callbacks registered for exactly
    /// `A` run; see [`publish`](Self::publish) for ordering and panics.
    pub fn publish_args<A: Any>(&self, topic: &str, args: A) {
        self.publish_with(Qualifiers::args::<A>(topic), None, Some(&args));
    }

    /// Publishes `topic` from `sender`. Only callbacks registered for exactly
    /// `S` run.
    pub fn publish_sender<S: Any>(&self, sender: &S, topic: &str) {
        self.publish_with(Qualifiers::sender::<S>(topic), Some(sender), None);
    }

    /// Publishes `topic` from `sender` with `args`.
    pub fn publish_sender_args<S: Any, A: Any>(&self, sender: &S, topic: &str, args: A) {
        self.publish_with(
            Qualifiers::sender_args::<S, A>(topic),
            Some(sender),
            Some(&args),
        );
    }

    // ---------------------------------------------------------------------------------------------
    // Unsubscribe
    // ---------------------------------------------------------------------------------------------

    fn unsubscribe_with<H: SubscriberHandle>(&self, qualifiers: Qualifiers<'_>) {
        let key = qualifiers.with_subscriber::<H::Target>();
        let (removed, reaped) = self.store.remove_where(|k| *k == key);
        self.report_reaped(reaped);

        debug!(
            topic = key.topic(),
            sender = ?key.sender(),
            args = ?key.args(),
            subscriber = key.subscriber().name(),
            removed,
            "unsubscribed"
        );
        self.emit_event(&BrokerEvent::Unsubscribe {
            topic: qualifiers.topic,
            subscriber: key.subscriber().name(),
            removed,
        });
    }

    /// Removes the plain registration of the subscriber's type for `topic`.
    /// A missing registration is not an error.
    pub fn unsubscribe<H: SubscriberHandle>(&self, _subscriber: &H, topic: &str) {
        self.unsubscribe_with::<H>(Qualifiers::topic(topic));
    }

    /// Removes the `A`-typed registration of the subscriber's type for `topic`.
    pub fn unsubscribe_args<A: Any, H: SubscriberHandle>(&self, _subscriber: &H, topic: &str) {
        self.unsubscribe_with::<H>(Qualifiers::args::<A>(topic));
    }

    /// Removes the `S`-sender registration of the subscriber's type for `topic`.
    pub fn unsubscribe_sender<S: Any, H: SubscriberHandle>(&self, _subscriber: &H, topic: &str) {
        self.unsubscribe_with::<H>(Qualifiers::sender::<S>(topic));
    }

    /// Removes the `(S, A)` registration of the subscriber's type for `topic`.
    pub fn unsubscribe_sender_args<S: Any, A: Any, H: SubscriberHandle>(
        &self,
        _subscriber: &H,
        topic: &str,
    ) {
        self.unsubscribe_with::<H>(Qualifiers::sender_args::<S, A>(topic));
    }

    // ---------------------------------------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------------------------------------

    /// Number of stored entries. Entries of dropped subscribers count until
    /// the next subscribe, publish, unsubscribe or [`reap`](Self::reap).
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether no entries are stored, counting those not yet reaped.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Number of live registrations for `topic`, across all shapes.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.store.count_topic(topic)
    }

    /// Whether a live registration occupies `key`.
    ///
    /// ```
    /// use pubsub_registry::{Broker, Qualifiers};
    /// use std::sync::Arc;
    ///
    /// struct Panel;
    ///
    /// let broker = Broker::new();
    /// let panel = Arc::new(Panel);
    /// broker.subscribe_args(&panel, "resize", |_: &(u32, u32)| {}).unwrap();
    ///
    /// let key = Qualifiers::args::<(u32, u32)>("resize").with_subscriber::<Panel>();
    /// assert!(broker.contains(&key));
    /// ```
    pub fn contains(&self, key: &CompositeKey) -> bool {
        self.store.contains(key)
    }

    /// Purges entries of dropped subscribers now. Returns how many were removed.
    pub fn reap(&self) -> usize {
        let removed = self.store.reap();
        self.report_reaped(removed);
        removed
    }

    /// Removes every registration, then emits [`BrokerEvent::Clear`]. The
    /// tracing callback is kept.
    pub fn clear(&self) {
        self.store.clear();
        debug!("broker cleared");
        self.emit_event(&BrokerEvent::Clear {});
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
