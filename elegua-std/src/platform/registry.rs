//! Listener registry for platform events.

use elegua_core::{EventKind, Hook, HookResult, ListenerId, PlatformEvent};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

struct Entry {
    id: ListenerId,
    kinds: Vec<EventKind>,
    hook: Arc<dyn Hook<PlatformEvent>>,
}

/// A registry of platform event listeners, dispatched in registration order.
#[derive(Default)]
pub struct ListenerRegistry {
    entries: Mutex<Vec<Entry>>,
    next_id: AtomicU64,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook for the given kinds.
    pub fn register(&self, kinds: &[EventKind], hook: Arc<dyn Hook<PlatformEvent>>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.lock().push(Entry {
            id,
            kinds: kinds.to_vec(),
            hook,
        });
        id
    }

    /// Remove a hook. Returns `false` if the id is unknown.
    pub fn unregister(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }

    /// Number of listeners registered for `kind`.
    pub fn count(&self, kind: EventKind) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.kinds.contains(&kind))
            .count()
    }

    /// Dispatch an event to all matching hooks sequentially.
    ///
    /// Dispatch stops at the first hook returning `Stop`. A failing hook is
    /// logged and skipped; it does not prevent later hooks from running.
    pub fn dispatch(&self, event: &PlatformEvent) -> HookResult {
        let kind = event.kind();
        // Snapshot so hooks may (un)register listeners while running.
        let hooks: Vec<Arc<dyn Hook<PlatformEvent>>> = self
            .entries
            .lock()
            .iter()
            .filter(|e| e.kinds.contains(&kind))
            .map(|e| Arc::clone(&e.hook))
            .collect();

        for hook in hooks {
            match hook.on_event(event) {
                Ok(HookResult::Stop) => return HookResult::Stop,
                Ok(HookResult::Next) => continue,
                Err(error) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(%kind, %error, "platform listener failed");
                    #[cfg(not(feature = "tracing"))]
                    let _ = error;
                }
            }
        }
        HookResult::Next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::EventRecorder;

    #[test]
    fn test_dispatch_filters_by_kind() {
        let registry = ListenerRegistry::new();
        let clicks = EventRecorder::new();
        let loads = EventRecorder::new();
        registry.register(&[EventKind::Click], Arc::new(clicks.clone()));
        registry.register(&[EventKind::Load], Arc::new(loads.clone()));

        registry.dispatch(&PlatformEvent::Load);
        registry.dispatch(&PlatformEvent::Load);

        assert_eq!(clicks.count(), 0);
        assert_eq!(loads.count(), 2);
        assert_eq!(loads.kinds(), vec![EventKind::Load, EventKind::Load]);
    }

    #[test]
    fn test_stop_halts_dispatch() {
        let registry = ListenerRegistry::new();
        let first = EventRecorder::with_result(HookResult::Stop);
        let second = EventRecorder::new();
        registry.register(&[EventKind::HashChange], Arc::new(first.clone()));
        registry.register(&[EventKind::HashChange], Arc::new(second.clone()));

        let result = registry.dispatch(&PlatformEvent::HashChange);

        assert_eq!(result, HookResult::Stop);
        assert_eq!(first.count(), 1);
        assert_eq!(second.count(), 0);
    }

    #[test]
    fn test_unregister() {
        let registry = ListenerRegistry::new();
        let hook = EventRecorder::new();
        let id = registry.register(&[EventKind::Load], Arc::new(hook.clone()));

        assert!(registry.unregister(id));
        assert!(!registry.unregister(id));
        registry.dispatch(&PlatformEvent::Load);
        assert_eq!(hook.count(), 0);
        assert_eq!(registry.count(EventKind::Load), 0);
    }
}
