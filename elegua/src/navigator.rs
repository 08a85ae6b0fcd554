//! The navigation context.
//!
//! A [`Navigator`] ties together one [`UrlState`], one [`MatchState`] and an
//! optional guard. Several navigators may coexist; nothing here is global.

use crate::location::Location;
use crate::matcher::{MatchState, RoutePattern, named_path};
use crate::resolver::RouteTable;
use crate::url_state::{HistoryMode, Transition, UrlState};
use elegua_core::{CompileError, History, Hook, HookResult, Message, NavigationError};
use elegua_std::hooks::FnHook;
use parking_lot::{Mutex, RwLock};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Where a navigation request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationSource {
    /// [`Navigator::goto`].
    Programmatic,
    /// [`Navigator::replace`].
    Replace,
    /// An intercepted anchor click.
    Link,
}

/// What the guard is asked about.
#[derive(Debug, Clone)]
pub struct NavigationRequest {
    /// The current location.
    pub from: Location,
    /// The requested href, unresolved. Empty for a link without one.
    pub href: String,
    /// What triggered the request.
    pub source: NavigationSource,
}

impl NavigationRequest {
    /// The href resolved against `from`, if it parses.
    pub fn target(&self) -> Option<Location> {
        self.from.join(&self.href).ok()
    }
}

impl Message for NavigationRequest {}

type Guard = Arc<dyn Hook<NavigationRequest>>;

/// Location state, match state and the navigation guard.
pub struct Navigator {
    state: Arc<UrlState>,
    matches: MatchState,
    guard: RwLock<Option<Guard>>,
    patterns: Mutex<HashMap<String, RoutePattern>>,
}

impl Navigator {
    /// A navigator over `history` with no guard.
    pub fn new(history: Arc<dyn History>) -> Self {
        Self::from_state(UrlState::new(history))
    }

    /// Starts a builder.
    pub fn builder(history: Arc<dyn History>) -> NavigatorBuilder {
        NavigatorBuilder::new(history)
    }

    fn from_state(state: UrlState) -> Self {
        Self {
            state: Arc::new(state),
            matches: MatchState::new(),
            guard: RwLock::new(None),
            patterns: Mutex::new(HashMap::new()),
        }
    }

    /// The location state.
    pub fn state(&self) -> &Arc<UrlState> {
        &self.state
    }

    /// The published result of the last successful match.
    pub fn matches(&self) -> &MatchState {
        &self.matches
    }

    /// Compiles a `:name` template.
    pub fn named_path(&self, pattern: &str) -> Result<Regex, CompileError> {
        named_path(pattern)
    }

    /// Matches `path` against a string pattern, publishing the result on
    /// success. Compiled patterns are cached per navigator.
    pub fn resolve(&self, path: &str, pattern: &str) -> Result<bool, CompileError> {
        let compiled = {
            let mut cache = self.patterns.lock();
            match cache.get(pattern) {
                Some(compiled) => compiled.clone(),
                None => {
                    let compiled = RoutePattern::parse(pattern)?;
                    cache.insert(pattern.to_string(), compiled.clone());
                    compiled
                }
            }
        };
        Ok(self.resolve_pattern(path, &compiled))
    }

    /// Matches `path` against a compiled pattern, publishing on success.
    pub fn resolve_pattern(&self, path: &str, pattern: &RoutePattern) -> bool {
        let matched = self.matches.resolve(path, pattern);
        trace_log!(path, pattern = pattern.source(), matched, "resolve");
        matched
    }

    /// Picks the handler for `path`: the first matching route (its match is
    /// published), else the table's fallback.
    pub fn dynamic<'t, H>(&self, path: &str, table: &'t RouteTable<H>) -> Option<&'t H> {
        match table.find(path) {
            Some((route, m)) => {
                self.matches.publish(&m);
                Some(route.handler())
            }
            None => table.fallback(),
        }
    }

    /// Navigates to `href`, pushing a history entry, unless the guard vetoes.
    pub fn goto(&self, href: &str) -> Result<Transition, NavigationError> {
        self.navigate(href, NavigationSource::Programmatic, HistoryMode::Push)
    }

    /// Navigates to `href`, overwriting the current entry, unless the guard
    /// vetoes.
    pub fn replace(&self, href: &str) -> Result<Transition, NavigationError> {
        self.navigate(href, NavigationSource::Replace, HistoryMode::Replace)
    }

    pub(crate) fn navigate(
        &self,
        href: &str,
        source: NavigationSource,
        mode: HistoryMode,
    ) -> Result<Transition, NavigationError> {
        let token = self.state.begin()?;
        let from = self.state.get();
        let target = from.join(href)?;

        let request = NavigationRequest {
            from,
            href: href.to_string(),
            source,
        };
        if self.is_vetoed(&request) {
            debug_log!(href, source = ?source, "navigation vetoed");
            return Ok(Transition::Vetoed);
        }

        self.state.commit(&token, target, mode)
    }

    /// Installs a predicate guard; `true` vetoes. `None` removes the guard.
    pub fn prevent_change<F>(&self, guard: Option<F>)
    where
        F: Fn(&NavigationRequest) -> bool + Send + Sync + 'static,
    {
        *self.guard.write() = guard.map(|f| Arc::new(FnHook::new(f)) as Guard);
    }

    /// Installs a hook guard; [`HookResult::Stop`] vetoes.
    pub fn set_guard(&self, guard: Arc<dyn Hook<NavigationRequest>>) {
        *self.guard.write() = Some(guard);
    }

    /// Removes the guard.
    pub fn clear_guard(&self) {
        *self.guard.write() = None;
    }

    /// Whether a guard is installed.
    pub fn has_guard(&self) -> bool {
        self.guard.read().is_some()
    }

    /// Asks the guard. An erroring guard counts as a veto.
    pub(crate) fn is_vetoed(&self, request: &NavigationRequest) -> bool {
        // Cloned out so the guard may replace itself.
        let Some(guard) = self.guard.read().clone() else {
            return false;
        };
        match guard.on_event(request) {
            Ok(HookResult::Next) => false,
            Ok(HookResult::Stop) => true,
            Err(_e) => {
                warn_log!(error = %_e, href = %request.href, "navigation guard failed");
                true
            }
        }
    }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("state", &self.state)
            .field("matches", &self.matches)
            .field("guard", &self.has_guard())
            .finish()
    }
}

/// Builder for [`Navigator`].
pub struct NavigatorBuilder {
    history: Arc<dyn History>,
    guard: Option<Guard>,
    title: String,
}

impl NavigatorBuilder {
    /// Starts from `history`, no guard and an empty title.
    pub fn new(history: Arc<dyn History>) -> Self {
        Self {
            history,
            guard: None,
            title: String::new(),
        }
    }

    /// Installs a hook guard.
    pub fn guard(mut self, guard: Arc<dyn Hook<NavigationRequest>>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Title passed with every history write.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builds the navigator, seeding it from the history's location.
    pub fn build(self) -> Navigator {
        let navigator = Navigator::from_state(UrlState::with_title(self.history, self.title));
        *navigator.guard.write() = self.guard;
        navigator
    }
}
