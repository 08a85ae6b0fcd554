//! Closures as hooks.

use elegua_core::{BoxError, Hook, HookResult, IntoResponse, Message};
use std::fmt;

/// Adapts a closure into a [`Hook`].
///
/// The closure's return value is converted with [`IntoResponse`], so a guard
/// can simply return `bool` (`true` stops, i.e. vetoes).
///
/// # Example
///
/// ```rust,ignore
/// let dirty = Arc::new(AtomicBool::new(false));
/// let guard = FnHook::new(move |_req: &NavigationRequest| dirty.load(Ordering::SeqCst));
/// ```
pub struct FnHook<F> {
    f: F,
}

impl<F> FnHook<F> {
    /// Wraps `f`.
    pub const fn new(f: F) -> Self {
        Self { f }
    }
}

impl<E, F, R> Hook<E> for FnHook<F>
where
    E: Message,
    F: Fn(&E) -> R + Send + Sync + 'static,
    R: IntoResponse,
{
    fn on_event(&self, event: &E) -> Result<HookResult, BoxError> {
        (self.f)(event).into_response()
    }
}

impl<F> fmt::Debug for FnHook<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHook").finish_non_exhaustive()
    }
}
