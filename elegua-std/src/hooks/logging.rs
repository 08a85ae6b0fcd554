//! Logging Hook - Observability for navigation events.

use elegua_core::{BoxError, Hook, HookResult, Message};
use std::fmt::Debug;

/// A Hook that logs events for observability.
///
/// This hook logs event information and continues processing. It uses the
/// `tracing` crate when the `tracing` feature is enabled and is a no-op
/// otherwise.
///
/// # Example
///
/// ```rust,ignore
/// use elegua_std::hooks::LoggingHook;
///
/// // Log every platform event the app sees
/// platform.add_listener(&ALL_KINDS, Arc::new(LoggingHook::named("platform")));
/// ```
pub struct LoggingHook {
    name: &'static str,
}

impl LoggingHook {
    /// Create a new `LoggingHook` with a default name.
    pub fn new() -> Self {
        Self { name: "event" }
    }

    /// Create a new `LoggingHook` with a custom name.
    ///
    /// The name is used in log messages to identify the source.
    pub fn named(name: &'static str) -> Self {
        Self { name }
    }

    /// The name used in log messages.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Default for LoggingHook {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Hook<E> for LoggingHook
where
    E: Message + Debug,
{
    fn on_event(&self, event: &E) -> Result<HookResult, BoxError> {
        #[cfg(feature = "tracing")]
        {
            tracing::debug!(name = %self.name, event = ?event, "observed event");
        }

        #[cfg(not(feature = "tracing"))]
        {
            let _ = (self.name, event);
        }

        Ok(HookResult::Next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elegua_core::PlatformEvent;

    #[test]
    fn test_logging_hook_continues() {
        let hook = LoggingHook::new();
        let result = hook.on_event(&PlatformEvent::Load).unwrap();
        assert_eq!(result, HookResult::Next);
    }

    #[test]
    fn test_logging_hook_named() {
        let hook = LoggingHook::named("platform");
        assert_eq!(hook.name(), "platform");
        let result = hook.on_event(&"payload".to_string()).unwrap();
        assert_eq!(result, HookResult::Next);
    }
}
