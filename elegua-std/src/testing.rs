//! Testing utilities for Elegua.
//!
//! This module provides doubles that make hooks, stores and platform
//! listeners easy to assert on.
//!
//! # Features
//!
//! - [`RecordingHook`]: A hook that records all events it receives
//! - [`EventRecorder`]: A platform listener that records event kinds
//! - [`Recorder`]: A store subscriber that records every value it sees

use elegua_core::{BoxError, EventKind, Hook, HookResult, Message, PlatformEvent, Subscriber};
use parking_lot::Mutex;
use std::sync::Arc;

// ============================================================================
// Recording Hook
// ============================================================================

/// A hook that records all events it receives.
///
/// # Example
///
/// ```rust,ignore
/// let guard = RecordingHook::<NavigationRequest>::with_result(HookResult::Stop);
/// navigator.set_guard(Arc::new(guard.clone()));
///
/// navigator.goto("/elsewhere")?;
///
/// assert_eq!(guard.count(), 1);
/// ```
pub struct RecordingHook<E: Clone> {
    events: Arc<Mutex<Vec<E>>>,
    result: HookResult,
}

impl<E: Clone> RecordingHook<E> {
    /// Create a new recording hook that returns `Next`.
    pub fn new() -> Self {
        Self::with_result(HookResult::Next)
    }

    /// Create a recording hook that returns a specific result.
    pub fn with_result(result: HookResult) -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            result,
        }
    }

    /// Get a clone of the recorded events.
    pub fn events(&self) -> Vec<E> {
        self.events.lock().clone()
    }

    /// Get the number of recorded events.
    pub fn count(&self) -> usize {
        self.events.lock().len()
    }

    /// Clear all recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl<E: Clone> Default for RecordingHook<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> Clone for RecordingHook<E> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
            result: self.result,
        }
    }
}

impl<E: Message + Clone> Hook<E> for RecordingHook<E> {
    fn on_event(&self, event: &E) -> Result<HookResult, BoxError> {
        self.events.lock().push(event.clone());
        Ok(self.result)
    }
}

// ============================================================================
// Event Recorder
// ============================================================================

/// A platform listener that records the kind of every event it receives.
///
/// Platform events carry interior-mutable flags and are not `Clone`, so only
/// their kinds are kept.
#[derive(Clone)]
pub struct EventRecorder {
    kinds: Arc<Mutex<Vec<EventKind>>>,
    result: HookResult,
}

impl EventRecorder {
    /// Create a recorder that returns `Next`.
    pub fn new() -> Self {
        Self::with_result(HookResult::Next)
    }

    /// Create a recorder that returns a specific result.
    pub fn with_result(result: HookResult) -> Self {
        Self {
            kinds: Arc::new(Mutex::new(Vec::new())),
            result,
        }
    }

    /// Recorded kinds, in dispatch order.
    pub fn kinds(&self) -> Vec<EventKind> {
        self.kinds.lock().clone()
    }

    /// Number of recorded events.
    pub fn count(&self) -> usize {
        self.kinds.lock().len()
    }
}

impl Default for EventRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Hook<PlatformEvent> for EventRecorder {
    fn on_event(&self, event: &PlatformEvent) -> Result<HookResult, BoxError> {
        self.kinds.lock().push(event.kind());
        Ok(self.result)
    }
}

// ============================================================================
// Store Recorder
// ============================================================================

/// Records every value delivered to a store subscriber.
///
/// # Example
///
/// ```rust,ignore
/// let paths = Recorder::new();
/// let _sub = state.path().subscribe(paths.subscriber());
///
/// state.set("/about")?;
///
/// assert_eq!(paths.values(), vec!["/".to_string(), "/about".to_string()]);
/// ```
pub struct Recorder<T> {
    values: Arc<Mutex<Vec<T>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            values: Arc::clone(&self.values),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Recorder<T> {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A subscriber feeding this recorder.
    pub fn subscriber(&self) -> Subscriber<T> {
        let values = Arc::clone(&self.values);
        Arc::new(move |v: &T| values.lock().push(v.clone()))
    }

    /// Records a value directly.
    pub fn record(&self, value: T) {
        self.values.lock().push(value);
    }

    /// Recorded values, oldest first.
    pub fn values(&self) -> Vec<T> {
        self.values.lock().clone()
    }

    /// The most recent value.
    pub fn last(&self) -> Option<T> {
        self.values.lock().last().cloned()
    }

    /// Number of recorded values.
    pub fn count(&self) -> usize {
        self.values.lock().len()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.values.lock().clear();
    }
}

impl<T: Clone + Send + Sync + 'static> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}
