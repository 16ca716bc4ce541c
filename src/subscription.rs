//! Subscription records and the type-erased callbacks they hold.
//!
//! Callbacks are registered with one of four typed shapes and stored behind a
//! single erased signature taking an optional sender and optional arguments as
//! `&dyn Any`. At invocation the payloads are downcast back to the declared
//! types; a payload of any other type is skipped, never coerced.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::{Arc, Weak};

use crate::key::CompositeKey;

/// Something that identifies a subscriber without owning it.
///
/// Implemented for `Arc<T>` and `Weak<T>`. The broker only ever keeps the
/// `Weak` half, so subscribing never extends the subscriber's lifetime.
pub trait SubscriberHandle {
    type Target: Any + Send + Sync;

    fn to_weak(&self) -> Weak<Self::Target>;
}

impl<T: Any + Send + Sync> SubscriberHandle for Arc<T> {
    type Target = T;

    fn to_weak(&self) -> Weak<T> {
        Arc::downgrade(self)
    }
}

impl<T: Any + Send + Sync> SubscriberHandle for Weak<T> {
    type Target = T;

    fn to_weak(&self) -> Weak<T> {
        self.clone()
    }
}

type ErasedFn = dyn Fn(Option<&dyn Any>, Option<&dyn Any>) + Send + Sync;

fn erase<F>(f: F) -> Arc<ErasedFn>
where
    F: Fn(Option<&dyn Any>, Option<&dyn Any>) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A stored callback in one of the four call shapes.
#[derive(Clone)]
pub struct Callback {
    inner: Arc<ErasedFn>,
    shape: &'static str,
}

impl Callback {
    /// A callback taking no payload.
    pub fn plain(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            inner: erase(move |_, _| f()),
            shape: "Fn()",
        }
    }

    /// A callback taking the published arguments.
    pub fn args<A: Any>(f: impl Fn(&A) + Send + Sync + 'static) -> Self {
        Self {
            inner: erase(move |_, args| {
                if let Some(args) = args.and_then(|a| a.downcast_ref::<A>()) {
                    f(args);
                }
            }),
            shape: type_name::<fn(&A)>(),
        }
    }

    /// A callback taking the publishing sender.
    pub fn sender<S: Any>(f: impl Fn(&S) + Send + Sync + 'static) -> Self {
        Self {
            inner: erase(move |sender, _| {
                if let Some(sender) = sender.and_then(|s| s.downcast_ref::<S>()) {
                    f(sender);
                }
            }),
            shape: type_name::<fn(&S)>(),
        }
    }

    /// A callback taking both the sender and the arguments.
    pub fn sender_args<S: Any, A: Any>(f: impl Fn(&S, &A) + Send + Sync + 'static) -> Self {
        Self {
            inner: erase(move |sender, args| {
                let sender = sender.and_then(|s| s.downcast_ref::<S>());
                let args = args.and_then(|a| a.downcast_ref::<A>());
                if let (Some(sender), Some(args)) = (sender, args) {
                    f(sender, args);
                }
            }),
            shape: type_name::<fn(&S, &A)>(),
        }
    }

    /// Calls the callback. Panics raised by the callback propagate.
    pub fn invoke(&self, sender: Option<&dyn Any>, args: Option<&dyn Any>) {
        (self.inner)(sender, args)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback").field("shape", &self.shape).finish()
    }
}

/// One registered callback and the subscriber that owns it.
pub struct Subscription {
    key: CompositeKey,
    subscriber: Weak<dyn Any + Send + Sync>,
    callback: Callback,
}

impl Subscription {
    pub fn new<T: Any + Send + Sync>(
        key: CompositeKey,
        subscriber: Weak<T>,
        callback: Callback,
    ) -> Self {
        let subscriber: Weak<dyn Any + Send + Sync> = subscriber;
        Self {
            key,
            subscriber,
            callback,
        }
    }

    pub fn key(&self) -> &CompositeKey {
        &self.key
    }

    /// Whether the owning subscriber still exists.
    pub fn is_alive(&self) -> bool {
        self.subscriber.strong_count() > 0
    }

    pub(crate) fn delivery(&self) -> Delivery {
        Delivery {
            subscriber: self.subscriber.clone(),
            callback: self.callback.clone(),
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("alive", &self.is_alive())
            .field("callback", &self.callback)
            .finish()
    }
}

/// A matched callback, detached from the store so it can run without the lock.
#[derive(Clone)]
pub struct Delivery {
    subscriber: Weak<dyn Any + Send + Sync>,
    callback: Callback,
}

impl Delivery {
    /// Invokes the callback if its subscriber is still alive.
    ///
    /// The subscriber is held for the duration of the call only. Returns
    /// `false` when the subscriber was dropped after the scan.
    pub fn deliver(&self, sender: Option<&dyn Any>, args: Option<&dyn Any>) -> bool {
        let Some(_subscriber) = self.subscriber.upgrade() else {
            return false;
        };
        self.callback.invoke(sender, args);
        true
    }
}
