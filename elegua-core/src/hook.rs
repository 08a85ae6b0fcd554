//! # Hook
//!
//! The lowest-level entry point for event processing in Elegua.
//!
//! Hooks are analogous to DOM event handlers: simple, universal, and the
//! foundation everything else is built on. The link interceptor is a hook on
//! platform events, a navigation guard is a hook on navigation requests, and
//! observers such as the logging hook are hooks on whatever they observe.
//!
//! # Use Cases
//!
//! - Observing events (logging, recording in tests)
//! - Vetoing navigations (`Stop` cancels)
//! - Translating platform events into state writes

use crate::{error::BoxError, message::Message};
use std::sync::Arc;

/// Result of hook execution indicating whether to continue or stop propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookResult {
    /// The event was observed or partially handled; continue to the next hook.
    Next,
    /// The event was fully handled (or, for guards, vetoed); stop propagation.
    Stop,
}

impl HookResult {
    /// Returns `true` for [`HookResult::Stop`].
    pub fn is_stop(self) -> bool {
        matches!(self, HookResult::Stop)
    }
}

/// The primitive kernel for event processing.
///
/// Hooks receive an event and decide whether to continue propagation
/// (`Next`) or stop it (`Stop`). Execution is synchronous: a hook runs to
/// completion inside the dispatch of the event that triggered it.
///
/// The trait is object safe; registries store hooks as `Arc<dyn Hook<E>>`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Hook<{E}>`",
    label = "missing `Hook` implementation",
    note = "Hooks must implement `on_event` for the specific event type `{E}`."
)]
pub trait Hook<E: Message>: Send + Sync + 'static {
    /// Called when an event is dispatched.
    fn on_event(&self, event: &E) -> Result<HookResult, BoxError>;
}

// Allow boxed and shared hooks to be used where Hook is expected.
impl<E: Message, H: Hook<E> + ?Sized> Hook<E> for Box<H> {
    fn on_event(&self, event: &E) -> Result<HookResult, BoxError> {
        (**self).on_event(event)
    }
}

impl<E: Message, H: Hook<E> + ?Sized> Hook<E> for Arc<H> {
    fn on_event(&self, event: &E) -> Result<HookResult, BoxError> {
        (**self).on_event(event)
    }
}
