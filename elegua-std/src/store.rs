//! Default reactive store.
//!
//! [`Writable`] is a value with a subscriber list. Besides the plain
//! [`Store`] contract it exposes a two-phase write ([`Writable::replace`]
//! then [`Writable::notify`]) so an owner can update several related stores
//! before any subscriber runs.

use elegua_core::{Readable, Store, Subscriber, Subscription};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

struct Inner<T> {
    value: RwLock<T>,
    subscribers: Mutex<Vec<(u64, Subscriber<T>)>>,
    next_id: AtomicU64,
}

/// A shared, writable reactive value.
///
/// Clones share the same value and subscriber list. No lock is held while
/// subscribers run, so a subscriber may read (or write) the store it is
/// subscribed to.
pub struct Writable<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Writable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Writable<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Creates a store holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: RwLock::new(value),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Writes `value` without notifying. Returns whether the value changed.
    pub fn replace(&self, value: T) -> bool {
        let mut current = self.inner.value.write();
        if *current == value {
            return false;
        }
        *current = value;
        true
    }

    /// Runs every subscriber with the current value.
    pub fn notify(&self) {
        let value = self.inner.value.read().clone();
        let subscribers: Vec<Subscriber<T>> = self
            .inner
            .subscribers
            .lock()
            .iter()
            .map(|(_, s)| Arc::clone(s))
            .collect();
        for subscriber in subscribers {
            subscriber(&value);
        }
    }

    /// A read-only view sharing this store.
    pub fn read_only(&self) -> ReadOnly<T> {
        ReadOnly(self.clone())
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }
}

impl<T> Readable<T> for Writable<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn get(&self) -> T {
        self.inner.value.read().clone()
    }

    fn subscribe(&self, subscriber: Subscriber<T>) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .subscribers
            .lock()
            .push((id, Arc::clone(&subscriber)));

        subscriber(&self.get());

        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.subscribers.lock().retain(|(sid, _)| *sid != id);
            }
        })
    }
}

impl<T> Store<T> for Writable<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn set(&self, value: T) {
        if self.replace(value) {
            self.notify();
        }
    }

    fn update(&self, f: &dyn Fn(&T) -> T) {
        let next = f(&self.get());
        self.set(next);
    }
}

impl<T: fmt::Debug> fmt::Debug for Writable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writable")
            .field("value", &*self.inner.value.read())
            .field("subscribers", &self.inner.subscribers.lock().len())
            .finish()
    }
}

/// A read-only facade over a [`Writable`].
///
/// This is what the engine hands out: consumers can read and subscribe but
/// every write goes through the owner's narrow write methods.
pub struct ReadOnly<T>(Writable<T>);

impl<T> Clone for ReadOnly<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Readable<T> for ReadOnly<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn get(&self) -> T {
        self.0.get()
    }

    fn subscribe(&self, subscriber: Subscriber<T>) -> Subscription {
        self.0.subscribe(subscriber)
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadOnly<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReadOnly").field(&self.0).finish()
    }
}
