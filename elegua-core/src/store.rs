//! # Reactive store capability
//!
//! The engine publishes its state (url, path, hash, query, match, params)
//! through these traits. The concrete store is an injected implementation;
//! `elegua-std` ships the default one.
//!
//! Contract:
//! - `subscribe` runs the subscriber once, immediately, with the current value;
//!   then once per committed change.
//! - Writing a value equal to the current one notifies nobody.
//! - Dropping the returned [`Subscription`] unsubscribes.

use std::fmt;
use std::sync::Arc;

/// A subscriber callback.
pub type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A read-only reactive value.
pub trait Readable<T>: Send + Sync {
    /// Returns a snapshot of the current value.
    fn get(&self) -> T;

    /// Registers `subscriber`, calling it once with the current value.
    fn subscribe(&self, subscriber: Subscriber<T>) -> Subscription;

    /// Closure convenience over [`Readable::subscribe`].
    fn subscribe_fn<F>(&self, f: F) -> Subscription
    where
        Self: Sized,
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(f))
    }
}

/// A writable reactive value.
pub trait Store<T>: Readable<T> {
    /// Replaces the value, notifying subscribers if it changed.
    fn set(&self, value: T);

    /// Computes the next value from the current one.
    fn update(&self, f: &dyn Fn(&T) -> T);
}

/// Handle to a registered subscriber.
///
/// Dropping the handle unsubscribes. Use [`Subscription::detach`] to keep the
/// subscriber registered for the lifetime of the store.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Creates a handle that runs `cancel` when unsubscribed.
    pub fn new<F>(cancel: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle with nothing to cancel.
    pub fn empty() -> Self {
        Self { cancel: None }
    }

    /// Unsubscribes now.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Leaves the subscriber registered and discards the handle.
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
