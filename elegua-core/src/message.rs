//! Payloads that can be handed to a [`Hook`](crate::Hook).

/// Marks a type as something hooks can observe.
///
/// Platform listeners receive [`PlatformEvent`](crate::PlatformEvent); the
/// navigation guard receives the engine's navigation request. Both are
/// dispatched from shared listener tables, so payloads must be
/// `Send + Sync + 'static`.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Debug)]
/// struct TitleChanged(String);
///
/// impl Message for TitleChanged {}
///
/// let hook: Arc<dyn Hook<TitleChanged>> = Arc::new(LoggingHook::named("title"));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be observed by a hook",
    label = "add `impl Message for {Self}`",
    note = "hook payloads are shared across listener tables and must be `Send + Sync + 'static`"
)]
pub trait Message: Send + Sync + 'static {}

impl Message for () {}
impl Message for String {}
impl Message for &'static str {}
impl<T: Message> Message for std::sync::Arc<T> {}
impl<T: Message> Message for Option<T> {}
