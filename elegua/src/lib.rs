//! # elegua - Client-Side Navigation Engine
//!
//! `elegua` keeps a reactive view of the current location (url, path, hash,
//! query) in step with the platform history, intercepts in-app link clicks,
//! and resolves paths against ordered route patterns.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use elegua::prelude::*;
//! use std::sync::Arc;
//!
//! let platform = Arc::new(MemoryPlatform::new("https://app.test/")?);
//! let navigator = Arc::new(Navigator::new(platform.clone()));
//! let interceptor = NavigationInterceptor::new(navigator.clone(), platform.clone());
//! interceptor.start();
//!
//! let table = routes![
//!     "/" => Page::Home,
//!     "/blog/:slug" => Page::Post;
//!     fallback => Page::NotFound,
//! ]?;
//!
//! let _sub = navigator.state().path().subscribe_fn(move |path| {
//!     render(path);
//! });
//!
//! navigator.goto("/blog/hello")?;
//! let page = navigator.dynamic(&navigator.state().path().get(), &table);
//! ```
//!
//! ## Pieces
//!
//! - [`UrlState`]: the location and its derived stores, one write path.
//! - [`RoutePattern`] / [`MatchState`]: compile, match, publish.
//! - [`RouteTable`]: first-match-wins resolution with a fallback.
//! - [`Navigator`]: the context tying these together, plus the guard.
//! - [`NavigationInterceptor`]: platform events in, navigations out.
//! - [`UnloadGuard`]: leave-page confirmation.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod config;
pub mod interceptor;
pub mod location;
pub mod matcher;
pub mod navigator;
pub mod resolver;
pub mod unload;
pub mod url_state;

pub use config::InterceptorConfig;
pub use interceptor::{ClickOutcome, NavigationInterceptor};
pub use location::{Location, QueryView};
pub use matcher::{
    IntoRoutePattern, MatchResult, MatchState, Params, PatternKind, RouteMatch, RoutePattern,
    named_path,
};
pub use navigator::{NavigationRequest, NavigationSource, Navigator, NavigatorBuilder};
pub use resolver::{Route, RouteTable, RouteTableBuilder};
pub use unload::{UnloadDecision, UnloadGuard};
pub use url_state::{Transition, UrlState};

pub use elegua_core::{
    BeforeUnloadEvent, BoxError, ClickEvent, CompileError, EleguaError, Element, EventKind,
    EventSource, History, HistoryState, Hook, HookResult, IntoResponse, KeyboardEvent,
    ListenerId, Message, Modifiers, NavigationError, PlatformEvent, Readable, RouteResult,
    Router, Store, Subscriber, Subscription,
};

/// Reactive store implementations.
pub mod store {
    pub use elegua_std::store::{ReadOnly, Writable};
}

/// Platform implementations.
pub mod platform {
    pub use elegua_std::platform::{HistoryEntry, HistoryRejected, ListenerRegistry, MemoryPlatform};
}

/// Standard hook implementations.
pub mod hooks {
    pub use elegua_std::hooks::{FnHook, LoggingHook};
}

/// Testing utilities.
pub mod testing {
    pub use elegua_std::testing::{EventRecorder, Recorder, RecordingHook};
}

/// Prelude module - common imports for Elegua.
///
/// # Usage
///
/// ```rust,ignore
/// use elegua::prelude::*;
/// ```
pub mod prelude {
    pub use crate::platform::MemoryPlatform;
    pub use crate::{
        CompileError, Element, Hook, HookResult, InterceptorConfig, Location, Modifiers,
        NavigationError, NavigationInterceptor, NavigationRequest, Navigator, Readable,
        RoutePattern, RouteTable, Transition, UnloadDecision, UnloadGuard, UrlState, routes,
    };
}
