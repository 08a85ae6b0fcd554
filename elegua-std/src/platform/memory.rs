//! In-memory platform: a session history stack plus synchronous event dispatch.
//!
//! [`MemoryPlatform`] stands in for `window` when there is no browser: on a
//! server, in a desktop shell, in tests. User actions (back, forward, clicks,
//! key presses, editing the fragment) are simulated by methods that update the
//! stack the way a browser would and then dispatch the matching event.

use super::registry::ListenerRegistry;
use elegua_core::{
    BeforeUnloadEvent, BoxError, ClickEvent, Element, EventKind, EventSource, History,
    HistoryState, Hook, HookResult, KeyboardEvent, ListenerId, Modifiers, PlatformEvent,
};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use thiserror::Error;
use url::Url;

/// One entry of the session history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Location of the entry.
    pub url: Url,
    /// State pushed with the entry; `None` for entries the platform created.
    pub state: Option<HistoryState>,
    /// Title passed with the entry.
    pub title: String,
}

struct Stack {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl Stack {
    fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.index + 1);
        self.entries.push(entry);
        self.index = self.entries.len() - 1;
    }
}

/// Error returned by a push or replace that was configured to fail.
#[derive(Debug, Error)]
#[error("history entry rejected")]
pub struct HistoryRejected;

/// An in-memory [`History`] and [`EventSource`].
pub struct MemoryPlatform {
    stack: Mutex<Stack>,
    listeners: ListenerRegistry,
    pushes: AtomicUsize,
    replaces: AtomicUsize,
    reject_next: AtomicBool,
}

// The stack always holds the initial entry.
#[allow(clippy::len_without_is_empty)]
impl MemoryPlatform {
    /// Creates a platform whose only history entry is `initial`.
    pub fn new(initial: &str) -> Result<Self, url::ParseError> {
        Ok(Self::with_url(Url::parse(initial)?))
    }

    /// Creates a platform whose only history entry is `url`.
    pub fn with_url(url: Url) -> Self {
        Self {
            stack: Mutex::new(Stack {
                entries: vec![HistoryEntry {
                    url,
                    state: None,
                    title: String::new(),
                }],
                index: 0,
            }),
            listeners: ListenerRegistry::new(),
            pushes: AtomicUsize::new(0),
            replaces: AtomicUsize::new(0),
            reject_next: AtomicBool::new(false),
        }
    }

    /// Snapshot of the history stack.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.stack.lock().entries.clone()
    }

    /// Position of the active entry.
    pub fn index(&self) -> usize {
        self.stack.lock().index
    }

    /// Number of entries in the stack.
    pub fn len(&self) -> usize {
        self.stack.lock().entries.len()
    }

    /// Successful `push_state` calls so far.
    pub fn push_count(&self) -> usize {
        self.pushes.load(Ordering::SeqCst)
    }

    /// Successful `replace_state` calls so far.
    pub fn replace_count(&self) -> usize {
        self.replaces.load(Ordering::SeqCst)
    }

    /// Makes the next push or replace fail with [`HistoryRejected`].
    pub fn reject_next_write(&self) {
        self.reject_next.store(true, Ordering::SeqCst);
    }

    /// Number of listeners registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.count(kind)
    }

    /// Dispatches an event to the registered listeners.
    pub fn dispatch(&self, event: &PlatformEvent) -> HookResult {
        self.listeners.dispatch(event)
    }

    /// Fires `load`.
    pub fn load(&self) -> HookResult {
        self.dispatch(&PlatformEvent::Load)
    }

    /// Steps back one entry and fires `popstate`. Returns `false` at the start.
    pub fn back(&self) -> bool {
        self.traverse(-1)
    }

    /// Steps forward one entry and fires `popstate`. Returns `false` at the end.
    pub fn forward(&self) -> bool {
        self.traverse(1)
    }

    fn traverse(&self, delta: isize) -> bool {
        let state = {
            let mut stack = self.stack.lock();
            let Some(target) = stack.index.checked_add_signed(delta) else {
                return false;
            };
            if target >= stack.entries.len() {
                return false;
            }
            stack.index = target;
            stack.current().state
        };
        self.dispatch(&PlatformEvent::PopState(state));
        true
    }

    /// Simulates the user editing the fragment in the location bar: adds an
    /// entry with the new fragment and fires `hashchange`.
    pub fn change_hash(&self, hash: &str) {
        {
            let mut stack = self.stack.lock();
            let mut url = stack.current().url.clone();
            let hash = hash.trim_start_matches('#');
            url.set_fragment(if hash.is_empty() { None } else { Some(hash) });
            stack.push(HistoryEntry {
                url,
                state: None,
                title: String::new(),
            });
        }
        self.dispatch(&PlatformEvent::HashChange);
    }

    /// Fires `keydown`.
    pub fn key_down(&self, key: &str, modifiers: Modifiers) -> HookResult {
        self.dispatch(&PlatformEvent::KeyDown(KeyboardEvent::new(key, modifiers)))
    }

    /// Fires `keyup`.
    pub fn key_up(&self, key: &str) -> HookResult {
        self.dispatch(&PlatformEvent::KeyUp(KeyboardEvent::new(
            key,
            Modifiers::empty(),
        )))
    }

    /// Fires `click` and returns the event so the caller can inspect whether
    /// the default action was prevented.
    pub fn click(&self, event: ClickEvent) -> ClickEvent {
        let event = PlatformEvent::Click(event);
        self.dispatch(&event);
        match event {
            PlatformEvent::Click(click) => click,
            _ => unreachable!("constructed as a click"),
        }
    }

    /// Clicks an element whose ancestors are `ancestors` (nearest first).
    pub fn click_element(&self, target: Element, ancestors: Vec<Element>) -> ClickEvent {
        let mut path = Vec::with_capacity(ancestors.len() + 1);
        path.push(target);
        path.extend(ancestors);
        self.click(ClickEvent::new(path))
    }

    /// Fires `beforeunload` and returns the event for inspection.
    pub fn before_unload(&self) -> BeforeUnloadEvent {
        let event = PlatformEvent::BeforeUnload(BeforeUnloadEvent::new());
        self.dispatch(&event);
        match event {
            PlatformEvent::BeforeUnload(ev) => ev,
            _ => unreachable!("constructed as beforeunload"),
        }
    }

    fn write(&self, replace: bool, state: HistoryState, title: &str, url: &Url) -> Result<(), BoxError> {
        if self.reject_next.swap(false, Ordering::SeqCst) {
            return Err(Box::new(HistoryRejected));
        }
        let entry = HistoryEntry {
            url: url.clone(),
            state: Some(state),
            title: title.to_string(),
        };
        let mut stack = self.stack.lock();
        if replace {
            let index = stack.index;
            stack.entries[index] = entry;
            self.replaces.fetch_add(1, Ordering::SeqCst);
        } else {
            stack.push(entry);
            self.pushes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

impl History for MemoryPlatform {
    fn location(&self) -> Url {
        self.stack.lock().current().url.clone()
    }

    fn push_state(&self, state: HistoryState, title: &str, url: &Url) -> Result<(), BoxError> {
        self.write(false, state, title, url)
    }

    fn replace_state(&self, state: HistoryState, title: &str, url: &Url) -> Result<(), BoxError> {
        self.write(true, state, title, url)
    }
}

impl EventSource for MemoryPlatform {
    fn add_listener(&self, kinds: &[EventKind], hook: Arc<dyn Hook<PlatformEvent>>) -> ListenerId {
        self.listeners.register(kinds, hook)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.unregister(id)
    }
}

impl fmt::Debug for MemoryPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stack = self.stack.lock();
        f.debug_struct("MemoryPlatform")
            .field("location", &stack.current().url.as_str())
            .field("index", &stack.index)
            .field("entries", &stack.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::EventRecorder;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let platform = MemoryPlatform::new("https://app.test/").unwrap();
        platform
            .push_state(HistoryState::new(1), "", &url("https://app.test/a"))
            .unwrap();
        platform
            .push_state(HistoryState::new(2), "", &url("https://app.test/b"))
            .unwrap();

        assert!(platform.back());
        assert_eq!(platform.location().path(), "/a");

        platform
            .push_state(HistoryState::new(3), "", &url("https://app.test/c"))
            .unwrap();

        let paths: Vec<_> = platform
            .entries()
            .iter()
            .map(|e| e.url.path().to_string())
            .collect();
        assert_eq!(paths, vec!["/", "/a", "/c"]);
        assert_eq!(platform.push_count(), 3);
    }

    #[test]
    fn test_back_and_forward_fire_popstate() {
        let platform = MemoryPlatform::new("https://app.test/").unwrap();
        let recorder = EventRecorder::new();
        platform.add_listener(&[EventKind::PopState], Arc::new(recorder.clone()));

        platform
            .push_state(HistoryState::new(7), "", &url("https://app.test/a"))
            .unwrap();

        assert!(!platform.forward());
        assert!(platform.back());
        assert!(!platform.back());
        assert!(platform.forward());

        assert_eq!(recorder.count(), 2);
        assert_eq!(platform.location().path(), "/a");
    }

    #[test]
    fn test_replace_keeps_length() {
        let platform = MemoryPlatform::new("https://app.test/").unwrap();
        platform
            .replace_state(HistoryState::new(1), "title", &url("https://app.test/r"))
            .unwrap();

        assert_eq!(platform.len(), 1);
        assert_eq!(platform.replace_count(), 1);
        assert_eq!(platform.entries()[0].title, "title");
    }

    #[test]
    fn test_reject_next_write() {
        let platform = MemoryPlatform::new("https://app.test/").unwrap();
        platform.reject_next_write();

        let res = platform.push_state(HistoryState::new(1), "", &url("https://app.test/x"));

        assert!(res.is_err());
        assert_eq!(platform.len(), 1);
        assert_eq!(platform.push_count(), 0);
        assert!(
            platform
                .push_state(HistoryState::new(1), "", &url("https://app.test/x"))
                .is_ok()
        );
    }

    #[test]
    fn test_change_hash() {
        let platform = MemoryPlatform::new("https://app.test/page").unwrap();
        let recorder = EventRecorder::new();
        platform.add_listener(&[EventKind::HashChange], Arc::new(recorder.clone()));

        platform.change_hash("#section");

        assert_eq!(platform.location().fragment(), Some("section"));
        assert_eq!(recorder.count(), 1);
        assert_eq!(platform.len(), 2);
    }
}
