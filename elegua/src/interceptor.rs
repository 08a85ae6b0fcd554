//! Link and history interception.
//!
//! [`NavigationInterceptor`] listens on an [`EventSource`] and keeps the
//! navigator in step with the platform:
//!
//! - `load`: seed the location once (`start` also syncs).
//! - `popstate`, `hashchange`: follow the platform without writing history.
//! - `keydown`, `keyup`: remember the held modifiers.
//! - `click`: take over same-origin anchor clicks and commit them through
//!   the navigator, unless the user asked for the platform's behavior.

use crate::config::InterceptorConfig;
use crate::navigator::{NavigationRequest, NavigationSource, Navigator};
use crate::url_state::HistoryMode;
use elegua_core::{
    BoxError, ClickEvent, Element, EventKind, EventSource, Hook, HookResult, KeyboardEvent,
    ListenerId, Modifiers, PlatformEvent,
};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

const EVENTS: &[EventKind] = &[
    EventKind::Load,
    EventKind::PopState,
    EventKind::HashChange,
    EventKind::KeyDown,
    EventKind::KeyUp,
    EventKind::Click,
];

/// What happened to a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing was intercepted; the platform handles the click.
    Ignored,
    /// The guard vetoed; the default action was prevented.
    Vetoed,
    /// The default action was prevented and nothing was written.
    Suppressed,
    /// The default action was prevented and the location committed.
    Navigated,
}

struct Handler {
    navigator: Arc<Navigator>,
    config: InterceptorConfig,
    last_key: Mutex<Option<KeyboardEvent>>,
    seeded: AtomicBool,
}

impl Handler {
    fn seed(&self) {
        if self.seeded.swap(true, Ordering::AcqRel) {
            return;
        }
        self.sync();
    }

    fn sync(&self) {
        if let Err(_e) = self.navigator.state().sync_from_platform() {
            warn_log!(error = %_e, "failed to follow platform location");
        }
    }

    fn held_modifiers(&self, click: &ClickEvent) -> Modifiers {
        let keyboard = self
            .last_key
            .lock()
            .as_ref()
            .map(|k| k.modifiers | key_modifier(&k.key))
            .unwrap_or_default();
        keyboard | click.modifiers()
    }

    fn click(&self, click: &ClickEvent) -> ClickOutcome {
        let Some(anchor) = click.path().iter().find(|e| e.is_anchor()) else {
            return ClickOutcome::Ignored;
        };

        if self.held_modifiers(click).intersects(self.config.modifiers()) {
            trace_log!("click with new-tab modifier left to platform");
            return ClickOutcome::Ignored;
        }

        let state = self.navigator.state();
        let token = match state.begin() {
            Ok(token) => token,
            Err(_) => {
                click.prevent_default();
                return ClickOutcome::Suppressed;
            }
        };

        let from = state.get();
        let href = anchor.attribute("href").unwrap_or("").trim().to_string();
        let request = NavigationRequest {
            from: from.clone(),
            href,
            source: NavigationSource::Link,
        };
        if self.navigator.is_vetoed(&request) {
            click.prevent_default();
            debug_log!(href = %request.href, "link navigation vetoed");
            return ClickOutcome::Vetoed;
        }

        if !self.takes_over(anchor) {
            return ClickOutcome::Ignored;
        }

        if request.href.is_empty() {
            click.prevent_default();
            return ClickOutcome::Suppressed;
        }

        let target = match from.join(&request.href) {
            Ok(target) => target,
            Err(_e) => {
                trace_log!(error = %_e, "unresolvable href left to platform");
                return ClickOutcome::Ignored;
            }
        };
        if !matches!(target.as_url().scheme(), "http" | "https") || !target.same_origin(&from) {
            trace_log!(href = target.href(), "foreign link left to platform");
            return ClickOutcome::Ignored;
        }

        click.prevent_default();
        match state.commit(&token, target, HistoryMode::Push) {
            Ok(_) => ClickOutcome::Navigated,
            Err(_e) => {
                warn_log!(error = %_e, "link navigation failed");
                ClickOutcome::Suppressed
            }
        }
    }

    /// Anchor-level opt-outs: the opt-out attribute and a foreign `target`.
    fn takes_over(&self, anchor: &Element) -> bool {
        if anchor.has_attribute(self.config.opt_out()) {
            return false;
        }
        if self.config.respects_target() {
            if let Some(target) = anchor.attribute("target") {
                let target = target.trim();
                if !target.is_empty() && !target.eq_ignore_ascii_case("_self") {
                    return false;
                }
            }
        }
        true
    }
}

fn key_modifier(key: &str) -> Modifiers {
    match key {
        "Control" => Modifiers::CTRL,
        "Shift" => Modifiers::SHIFT,
        "Alt" => Modifiers::ALT,
        "Meta" | "OS" => Modifiers::META,
        _ => Modifiers::empty(),
    }
}

impl Hook<PlatformEvent> for Handler {
    fn on_event(&self, event: &PlatformEvent) -> Result<HookResult, BoxError> {
        match event {
            PlatformEvent::Load => self.seed(),
            PlatformEvent::PopState(_) | PlatformEvent::HashChange => self.sync(),
            PlatformEvent::KeyDown(key) => *self.last_key.lock() = Some(key.clone()),
            PlatformEvent::KeyUp(_) => *self.last_key.lock() = None,
            PlatformEvent::Click(click) => {
                let _outcome = self.click(click);
                trace_log!(outcome = ?_outcome, "click handled");
            }
            PlatformEvent::BeforeUnload(_) => {}
        }
        Ok(HookResult::Next)
    }
}

/// Connects a [`Navigator`] to platform events.
///
/// Nothing is registered until [`start`](Self::start); dropping the
/// interceptor stops it.
///
/// # Example
///
/// ```rust,ignore
/// let platform = Arc::new(MemoryPlatform::new("https://app.test/")?);
/// let navigator = Arc::new(Navigator::new(platform.clone()));
/// let interceptor = NavigationInterceptor::new(navigator.clone(), platform.clone());
/// interceptor.start();
///
/// platform.click_element(Element::anchor("/about"), vec![]);
/// assert_eq!(navigator.state().path().get(), "/about");
/// ```
pub struct NavigationInterceptor {
    handler: Arc<Handler>,
    source: Arc<dyn EventSource>,
    listener: Mutex<Option<ListenerId>>,
}

impl NavigationInterceptor {
    /// An interceptor with the default configuration.
    pub fn new(navigator: Arc<Navigator>, source: Arc<dyn EventSource>) -> Self {
        Self::with_config(navigator, source, InterceptorConfig::default())
    }

    /// An interceptor with `config`.
    pub fn with_config(
        navigator: Arc<Navigator>,
        source: Arc<dyn EventSource>,
        config: InterceptorConfig,
    ) -> Self {
        Self {
            handler: Arc::new(Handler {
                navigator,
                config,
                last_key: Mutex::new(None),
                seeded: AtomicBool::new(false),
            }),
            source,
            listener: Mutex::new(None),
        }
    }

    /// Syncs the location from the platform and registers the listeners. A
    /// second call while running does nothing.
    pub fn start(&self) {
        let mut listener = self.listener.lock();
        if listener.is_some() {
            return;
        }
        // The platform may have moved while stopped; `load` must not re-seed.
        self.handler.seeded.store(true, Ordering::Release);
        self.handler.sync();
        let hook: Arc<dyn Hook<PlatformEvent>> = self.handler.clone();
        *listener = Some(self.source.add_listener(EVENTS, hook));
        debug_log!("navigation interceptor started");
    }

    /// Removes the listeners. Returns whether it was running.
    pub fn stop(&self) -> bool {
        let Some(id) = self.listener.lock().take() else {
            return false;
        };
        *self.handler.last_key.lock() = None;
        debug_log!("navigation interceptor stopped");
        self.source.remove_listener(id)
    }

    /// Whether listeners are registered.
    pub fn is_running(&self) -> bool {
        self.listener.lock().is_some()
    }

    /// The navigator this interceptor drives.
    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.handler.navigator
    }

    /// The active configuration.
    pub fn config(&self) -> &InterceptorConfig {
        &self.handler.config
    }

    /// Runs the click algorithm directly, as if `click` had been dispatched.
    pub fn handle_click(&self, click: &ClickEvent) -> ClickOutcome {
        self.handler.click(click)
    }
}

impl Drop for NavigationInterceptor {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for NavigationInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationInterceptor")
            .field("running", &self.is_running())
            .field("config", &self.handler.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elegua_core::Readable;
    use elegua_std::platform::MemoryPlatform;

    fn setup(config: InterceptorConfig) -> (Arc<MemoryPlatform>, NavigationInterceptor) {
        let platform = Arc::new(MemoryPlatform::new("https://app.test/").unwrap());
        let navigator = Arc::new(Navigator::new(platform.clone()));
        let interceptor = NavigationInterceptor::with_config(navigator, platform.clone(), config);
        (platform, interceptor)
    }

    #[test]
    fn test_start_is_idempotent() {
        let (platform, interceptor) = setup(InterceptorConfig::default());
        interceptor.start();
        interceptor.start();
        assert_eq!(platform.listener_count(EventKind::Click), 1);

        assert!(interceptor.stop());
        assert!(!interceptor.stop());
        assert_eq!(platform.listener_count(EventKind::Click), 0);
    }

    #[test]
    fn test_drop_unregisters() {
        let (platform, interceptor) = setup(InterceptorConfig::default());
        interceptor.start();
        drop(interceptor);
        assert_eq!(platform.listener_count(EventKind::PopState), 0);
    }

    #[test]
    fn test_click_outcomes() {
        let (_, interceptor) = setup(InterceptorConfig::default());

        let click = ClickEvent::new(vec![Element::new("span"), Element::anchor("/docs")]);
        assert_eq!(interceptor.handle_click(&click), ClickOutcome::Navigated);
        assert!(click.default_prevented());

        let click = ClickEvent::new(vec![Element::new("button")]);
        assert_eq!(interceptor.handle_click(&click), ClickOutcome::Ignored);

        let click = ClickEvent::new(vec![Element::new("a")]);
        assert_eq!(interceptor.handle_click(&click), ClickOutcome::Suppressed);
        assert!(click.default_prevented());

        let click = ClickEvent::new(vec![Element::anchor("mailto:someone@app.test")]);
        assert_eq!(interceptor.handle_click(&click), ClickOutcome::Ignored);
        assert!(!click.default_prevented());
    }

    #[test]
    fn test_target_can_be_ignored() {
        let (_, interceptor) = setup(InterceptorConfig::new().respect_target(false));
        let click = ClickEvent::new(vec![Element::anchor("/x").with_attribute("target", "_blank")]);
        assert_eq!(interceptor.handle_click(&click), ClickOutcome::Navigated);

        let (_, interceptor) = setup(InterceptorConfig::default());
        let click = ClickEvent::new(vec![Element::anchor("/x").with_attribute("target", "_blank")]);
        assert_eq!(interceptor.handle_click(&click), ClickOutcome::Ignored);
        let click = ClickEvent::new(vec![Element::anchor("/y").with_attribute("target", "_self")]);
        assert_eq!(interceptor.handle_click(&click), ClickOutcome::Navigated);
    }

    #[test]
    fn test_restart_follows_platform() {
        let (platform, interceptor) = setup(InterceptorConfig::default());
        interceptor.start();
        let navigator = interceptor.navigator().clone();
        navigator.goto("/a").unwrap();

        interceptor.stop();
        assert!(platform.back());
        assert_eq!(navigator.state().path().get(), "/a");

        interceptor.start();
        assert_eq!(navigator.state().path().get(), "/");

        platform.click_element(Element::anchor("/b"), vec![]);
        assert_eq!(navigator.state().path().get(), "/b");
        assert_eq!(navigator.state().old_url().get().path(), "/");
    }

    #[test]
    fn test_click_during_commit_is_suppressed() {
        use elegua_std::testing::Recorder;

        let (platform, interceptor) = setup(InterceptorConfig::default());
        interceptor.start();
        let navigator = interceptor.navigator().clone();
        let prevented = Recorder::new();

        let rec = prevented.clone();
        let clicker = platform.clone();
        let _sub = navigator.state().path().subscribe_fn(move |path: &String| {
            if path == "/busy" {
                let click = clicker.click_element(Element::anchor("/other"), vec![]);
                rec.record(click.default_prevented());
            }
        });

        navigator.goto("/busy").unwrap();

        assert_eq!(prevented.values(), vec![true]);
        assert_eq!(navigator.state().path().get(), "/busy");
        assert_eq!(platform.push_count(), 1);
    }

    #[test]
    fn test_modifier_key_names() {
        assert_eq!(key_modifier("Control"), Modifiers::CTRL);
        assert_eq!(key_modifier("Meta"), Modifiers::META);
        assert_eq!(key_modifier("a"), Modifiers::empty());
    }

    #[test]
    fn test_load_seeds_once() {
        use elegua_core::{History, HistoryState};

        let (platform, interceptor) = setup(InterceptorConfig::default());
        interceptor.start();
        let navigator = interceptor.navigator().clone();

        platform.change_hash("moved");
        assert_eq!(navigator.state().hash().get(), "moved");

        let silent = url::Url::parse("https://app.test/silent").unwrap();
        platform.push_state(HistoryState::new(99), "", &silent).unwrap();
        platform.load();
        assert_eq!(navigator.state().path().get(), "/");
    }
}
