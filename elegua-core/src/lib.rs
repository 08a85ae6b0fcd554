//! # elegua-core
//!
//! Core traits for the Elegua client-side navigation engine.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! platform bindings (a browser shim, a headless test double, a desktop
//! webview) that don't need the full engine.
//!
//! # Layers
//!
//! ## Hook ([`Hook`])
//!
//! The lowest-level entry point. A hook receives an event and answers `Next`
//! or `Stop`. Platform listeners, navigation guards and observers are all
//! hooks. Hooks are synchronous: the engine runs inside a single-threaded
//! event loop and every handler finishes before the next event is dispatched.
//!
//! ## Stores ([`Readable`], [`Store`])
//!
//! The reactive-value capability the engine publishes its state through.
//! Subscribing runs the callback once with the current value and again on
//! every committed change.
//!
//! ## Platform ([`History`], [`EventSource`])
//!
//! The navigation primitives the engine consumes: the session history stack,
//! the current location and a registry for platform events.
//!
//! ## Routing ([`Router`])
//!
//! Key-to-value lookup shared by route tables.
//!
//! # Error Types
//!
//! - [`EleguaError`] - Top-level error type
//! - [`CompileError`] - Malformed route patterns
//! - [`NavigationError`] - Failed transitions

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod hook;
mod message;
pub mod platform;
mod response;
mod router;
mod store;

// Re-exports
pub use error::{BoxError, CompileError, EleguaError, NavigationError};
pub use hook::{Hook, HookResult};
pub use message::Message;
pub use platform::{
    BeforeUnloadEvent, ClickEvent, Element, EventKind, EventSource, History, HistoryState,
    KeyboardEvent, ListenerId, Modifiers, PlatformEvent,
};
pub use response::IntoResponse;
pub use router::{RouteResult, Router};
pub use store::{Readable, Store, Subscriber, Subscription};
