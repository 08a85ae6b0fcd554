//! Leave-page confirmation.

use elegua_core::{
    BoxError, EventKind, EventSource, Hook, HookResult, ListenerId, PlatformEvent,
};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Answer to "may the page unload?".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UnloadDecision {
    /// Let the page go.
    #[default]
    Allow,
    /// Ask the user to confirm, with the platform's default text.
    Block,
    /// Ask the user to confirm, with this text where the platform shows it.
    BlockWithMessage(String),
}

impl UnloadDecision {
    /// Whether the unload is blocked.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, UnloadDecision::Allow)
    }
}

impl From<bool> for UnloadDecision {
    /// `true` blocks.
    fn from(block: bool) -> Self {
        if block {
            UnloadDecision::Block
        } else {
            UnloadDecision::Allow
        }
    }
}

impl From<String> for UnloadDecision {
    fn from(message: String) -> Self {
        UnloadDecision::BlockWithMessage(message)
    }
}

impl From<&str> for UnloadDecision {
    fn from(message: &str) -> Self {
        UnloadDecision::BlockWithMessage(message.to_string())
    }
}

impl<T: Into<UnloadDecision>> From<Option<T>> for UnloadDecision {
    /// `None` allows.
    fn from(value: Option<T>) -> Self {
        value.map_or(UnloadDecision::Allow, Into::into)
    }
}

struct UnloadHook<F> {
    callback: F,
}

impl<F, D> Hook<PlatformEvent> for UnloadHook<F>
where
    F: Fn() -> D + Send + Sync + 'static,
    D: Into<UnloadDecision>,
{
    fn on_event(&self, event: &PlatformEvent) -> Result<HookResult, BoxError> {
        let PlatformEvent::BeforeUnload(ev) = event else {
            return Ok(HookResult::Next);
        };
        match (self.callback)().into() {
            UnloadDecision::Allow => {}
            UnloadDecision::Block => {
                ev.prevent_default();
                ev.set_return_value("");
            }
            UnloadDecision::BlockWithMessage(message) => {
                ev.prevent_default();
                ev.set_return_value(message);
            }
        }
        Ok(HookResult::Next)
    }
}

/// Asks a callback before the page unloads, for as long as it is attached.
///
/// # Example
///
/// ```rust,ignore
/// let dirty = form.dirty_flag();
/// let _guard = UnloadGuard::attach(platform.clone(), move || {
///     dirty.load(Ordering::SeqCst).then_some("You have unsaved changes")
/// });
/// ```
pub struct UnloadGuard {
    source: Arc<dyn EventSource>,
    listener: Mutex<Option<ListenerId>>,
}

impl UnloadGuard {
    /// Registers `callback` for `beforeunload`.
    pub fn attach<F, D>(source: Arc<dyn EventSource>, callback: F) -> Self
    where
        F: Fn() -> D + Send + Sync + 'static,
        D: Into<UnloadDecision> + 'static,
    {
        let id = source.add_listener(&[EventKind::BeforeUnload], Arc::new(UnloadHook { callback }));
        Self {
            source,
            listener: Mutex::new(Some(id)),
        }
    }

    /// Removes the registration. Returns whether it was still attached.
    pub fn detach(&self) -> bool {
        match self.listener.lock().take() {
            Some(id) => self.source.remove_listener(id),
            None => false,
        }
    }

    /// Whether the callback is still registered.
    pub fn is_attached(&self) -> bool {
        self.listener.lock().is_some()
    }
}

impl Drop for UnloadGuard {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for UnloadGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnloadGuard")
            .field("attached", &self.is_attached())
            .finish()
    }
}
