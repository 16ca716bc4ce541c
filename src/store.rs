//! The locked map of subscriptions.
//!
//! Every structural change and every scan runs inside one critical section
//! over the whole map. Scans purge entries of dropped subscribers before
//! reading, and hand back a detached snapshot so callbacks run after the lock
//! is released. Entries taken out of the map are likewise dropped only after
//! the lock is released.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::key::{CompositeKey, Qualifiers};
use crate::subscription::{Delivery, Subscription};

type Slots = HashMap<CompositeKey, Subscription>;

/// Result of a scan: the matched callbacks and the number of dead entries
/// purged on the way.
#[derive(Default)]
pub struct Scan {
    pub deliveries: Vec<Delivery>,
    pub reaped: usize,
}

#[derive(Default)]
pub struct SubscriptionStore {
    slots: Mutex<Slots>,
}

impl SubscriptionStore {
    // A callback never runs under this lock, so poisoning only follows a panic
    // inside the store itself; the map is still consistent then.
    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(|p| p.into_inner())
    }

    // Entries leave the map through these helpers and are dropped by the
    // caller once the guard is gone. Dropping a callback drops its captures,
    // and those may call back into the store.
    fn take_where(
        slots: &mut Slots,
        mut predicate: impl FnMut(&CompositeKey, &Subscription) -> bool,
    ) -> Vec<Subscription> {
        let keys: Vec<CompositeKey> = slots
            .iter()
            .filter(|(key, sub)| predicate(key, sub))
            .map(|(key, _)| key.clone())
            .collect();
        keys.iter().filter_map(|key| slots.remove(key)).collect()
    }

    fn reap_locked(slots: &mut Slots) -> Vec<Subscription> {
        Self::take_where(slots, |_, sub| !sub.is_alive())
    }

    /// Inserts or replaces the slot for the subscription's key, after purging
    /// dead entries. Returns `(replaced, reaped)`.
    pub fn put(&self, subscription: Subscription) -> (bool, usize) {
        let mut slots = self.lock();
        let mut garbage = Self::reap_locked(&mut slots);
        let reaped = garbage.len();
        let previous = slots.insert(subscription.key().clone(), subscription);
        drop(slots);

        let replaced = previous.is_some();
        garbage.extend(previous);
        (replaced, reaped)
    }

    /// Removes every entry whose key satisfies `predicate`, after purging dead
    /// entries. Returns `(removed, reaped)`.
    pub fn remove_where(
        &self,
        mut predicate: impl FnMut(&CompositeKey) -> bool,
    ) -> (usize, usize) {
        let mut slots = self.lock();
        let dead = Self::reap_locked(&mut slots);
        let removed = Self::take_where(&mut slots, |key, _| predicate(key));
        drop(slots);

        (removed.len(), dead.len())
    }

    /// Purges dead entries, then snapshots the callbacks of every live entry
    /// matching `qualifiers`.
    pub fn scan_live_matching(&self, qualifiers: &Qualifiers<'_>) -> Scan {
        let mut slots = self.lock();
        let dead = Self::reap_locked(&mut slots);
        let deliveries = slots
            .iter()
            .filter(|(key, _)| key.matches(qualifiers))
            .map(|(_, sub)| sub.delivery())
            .collect();
        drop(slots);

        Scan {
            deliveries,
            reaped: dead.len(),
        }
    }

    /// Purges dead entries. Returns how many were removed.
    pub fn reap(&self) -> usize {
        let dead = Self::reap_locked(&mut self.lock());
        dead.len()
    }

    /// Number of stored entries, including any not yet reaped.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether a live entry occupies `key`.
    pub fn contains(&self, key: &CompositeKey) -> bool {
        self.lock().get(key).is_some_and(|sub| sub.is_alive())
    }

    /// Number of live entries for `topic`, in any shape.
    pub fn count_topic(&self, topic: &str) -> usize {
        self.lock()
            .iter()
            .filter(|(key, sub)| key.topic() == topic && sub.is_alive())
            .count()
    }

    /// Removes every entry. The entries are dropped after the lock is released.
    pub fn clear(&self) {
        let slots = std::mem::take(&mut *self.lock());
        drop(slots);
    }
}
