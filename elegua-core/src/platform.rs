//! # Platform boundary
//!
//! Everything the engine needs from the host environment: the session history
//! stack, the current location and a registry for navigation-related events.
//! A browser binding implements these over `window.history` and
//! `addEventListener`; `elegua-std` ships an in-memory implementation for
//! headless use and tests.

use crate::{error::BoxError, hook::Hook, message::Message};
use bitflags::bitflags;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use parking_lot::Mutex;
use std::sync::Arc;
use url::Url;

/// State object stored alongside a history entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryState {
    /// Monotonic per-engine counter of pushed or replaced entries.
    pub serial: u64,
}

impl HistoryState {
    /// Creates a state with the given serial.
    pub const fn new(serial: u64) -> Self {
        Self { serial }
    }
}

/// The session history stack and current location.
pub trait History: Send + Sync {
    /// The location currently shown by the platform.
    fn location(&self) -> Url;

    /// Adds a new entry on top of the current one.
    fn push_state(&self, state: HistoryState, title: &str, url: &Url) -> Result<(), BoxError>;

    /// Overwrites the current entry.
    fn replace_state(&self, state: HistoryState, title: &str, url: &Url) -> Result<(), BoxError>;
}

bitflags! {
    /// Keyboard modifiers held during an input event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Control.
        const CTRL = 1 << 0;
        /// Shift.
        const SHIFT = 1 << 1;
        /// Alt / Option.
        const ALT = 1 << 2;
        /// Meta / Command / Windows.
        const META = 1 << 3;
    }
}

/// Kinds of platform events a listener can register for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The document finished loading.
    Load,
    /// The active history entry changed (back/forward).
    PopState,
    /// The fragment of the location changed.
    HashChange,
    /// A key was pressed.
    KeyDown,
    /// A key was released.
    KeyUp,
    /// A click reached the document.
    Click,
    /// The page is about to be unloaded.
    BeforeUnload,
}

impl EventKind {
    /// The DOM event name.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Load => "load",
            EventKind::PopState => "popstate",
            EventKind::HashChange => "hashchange",
            EventKind::KeyDown => "keydown",
            EventKind::KeyUp => "keyup",
            EventKind::Click => "click",
            EventKind::BeforeUnload => "beforeunload",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DOM element as seen by the click handler: tag name and attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag_name: String,
    attributes: Vec<(String, String)>,
}

impl Element {
    /// Creates an element without attributes.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: Vec::new(),
        }
    }

    /// Creates an `<a href=…>` element.
    pub fn anchor(href: impl Into<String>) -> Self {
        Self::new("a").with_attribute("href", href)
    }

    /// Adds or replaces an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    /// The tag name as given.
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Whether this is an anchor element.
    pub fn is_anchor(&self) -> bool {
        self.tag_name.eq_ignore_ascii_case("a")
    }

    /// Looks up an attribute; names compare case-insensitively.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the attribute is present (with any value).
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }
}

/// A key press or release.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyboardEvent {
    /// The key value, e.g. `"Control"`.
    pub key: String,
    /// Modifiers held while the event fired.
    pub modifiers: Modifiers,
}

impl KeyboardEvent {
    /// Creates a keyboard event.
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }
}

/// A click that bubbled up to the document.
///
/// `path` lists the target first, followed by its ancestors up to the root.
#[derive(Debug)]
pub struct ClickEvent {
    path: Vec<Element>,
    modifiers: Modifiers,
    default_prevented: AtomicBool,
}

impl ClickEvent {
    /// Creates a click on `path[0]`.
    pub fn new(path: Vec<Element>) -> Self {
        Self {
            path,
            modifiers: Modifiers::empty(),
            default_prevented: AtomicBool::new(false),
        }
    }

    /// Sets the modifiers reported by the mouse event itself.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// The element that was clicked.
    pub fn target(&self) -> Option<&Element> {
        self.path.first()
    }

    /// Target followed by ancestors.
    pub fn path(&self) -> &[Element] {
        &self.path
    }

    /// Modifiers reported by the mouse event.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Cancels the platform's default action.
    pub fn prevent_default(&self) {
        self.default_prevented.store(true, Ordering::SeqCst);
    }

    /// Whether a listener cancelled the default action.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.load(Ordering::SeqCst)
    }
}

/// An attempt to unload or navigate away from the page.
#[derive(Debug, Default)]
pub struct BeforeUnloadEvent {
    default_prevented: AtomicBool,
    return_value: Mutex<Option<String>>,
}

impl BeforeUnloadEvent {
    /// Creates a fresh event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the platform to confirm before leaving.
    pub fn prevent_default(&self) {
        self.default_prevented.store(true, Ordering::SeqCst);
    }

    /// Whether a listener asked for confirmation.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.load(Ordering::SeqCst)
    }

    /// Sets the legacy `returnValue` message.
    pub fn set_return_value(&self, value: impl Into<String>) {
        *self.return_value.lock() = Some(value.into());
    }

    /// The `returnValue` set by a listener, if any.
    pub fn return_value(&self) -> Option<String> {
        self.return_value.lock().clone()
    }
}

/// A navigation-related platform event.
#[derive(Debug)]
pub enum PlatformEvent {
    /// The document finished loading.
    Load,
    /// The active history entry changed; carries the entry's state.
    PopState(Option<HistoryState>),
    /// The location fragment changed.
    HashChange,
    /// A key was pressed.
    KeyDown(KeyboardEvent),
    /// A key was released.
    KeyUp(KeyboardEvent),
    /// A click reached the document.
    Click(ClickEvent),
    /// The page is about to unload.
    BeforeUnload(BeforeUnloadEvent),
}

impl PlatformEvent {
    /// The registration kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            PlatformEvent::Load => EventKind::Load,
            PlatformEvent::PopState(_) => EventKind::PopState,
            PlatformEvent::HashChange => EventKind::HashChange,
            PlatformEvent::KeyDown(_) => EventKind::KeyDown,
            PlatformEvent::KeyUp(_) => EventKind::KeyUp,
            PlatformEvent::Click(_) => EventKind::Click,
            PlatformEvent::BeforeUnload(_) => EventKind::BeforeUnload,
        }
    }
}

impl Message for PlatformEvent {}

/// Identifier of a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// A registry of platform event listeners.
pub trait EventSource: Send + Sync {
    /// Registers `hook` for the given kinds.
    fn add_listener(&self, kinds: &[EventKind], hook: Arc<dyn Hook<PlatformEvent>>) -> ListenerId;

    /// Removes a listener; returns `false` if it was not registered.
    fn remove_listener(&self, id: ListenerId) -> bool;
}
