//! URL state synchronization.
//!
//! [`UrlState`] owns the one live [`Location`] and the stores derived from it
//! (`old_url`, `path`, `hash`, `query`). Every write funnels through one
//! commit path:
//!
//! 1. Resolve the target against the current location.
//! 2. If it equals the current location (canonical comparison), stop.
//! 3. Write the platform history entry. A failure aborts here.
//! 4. Write every store without notifying.
//! 5. Notify in the order url, old url, path, hash, query. Old url is
//!    notified on every commit; the others only when their value changed.
//!
//! A write issued while a commit is running (from a subscriber, or from a
//! guard) is rejected with [`NavigationError::InFlight`].

use crate::location::{Location, QueryView};
use elegua_core::{History, HistoryState, NavigationError, Readable};
use elegua_std::store::{ReadOnly, Writable};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The location changed and subscribers were notified.
    Committed,
    /// The target equals the current location; nothing happened.
    Unchanged,
    /// The guard refused the navigation; nothing happened.
    Vetoed,
}

impl Transition {
    /// Whether the location changed.
    pub fn is_committed(self) -> bool {
        matches!(self, Transition::Committed)
    }
}

/// How a commit touches the platform history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HistoryMode {
    Push,
    Replace,
    /// The platform already moved; only the stores follow.
    Skip,
}

/// Exclusive access to the write path. Released on drop.
pub(crate) struct InFlight<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Reactive, history-synchronized current location.
pub struct UrlState {
    history: Arc<dyn History>,
    title: String,
    url: Writable<Location>,
    old_url: Writable<Location>,
    path: Writable<String>,
    hash: Writable<String>,
    query: Writable<QueryView>,
    in_flight: AtomicBool,
    serial: AtomicU64,
}

impl UrlState {
    /// Seeds the state from the platform's current location.
    pub fn new(history: Arc<dyn History>) -> Self {
        Self::with_title(history, "")
    }

    /// Like [`new`](Self::new), passing `title` with every history write.
    pub fn with_title(history: Arc<dyn History>, title: impl Into<String>) -> Self {
        let location = Location::from_url(history.location());
        Self {
            title: title.into(),
            old_url: Writable::new(location.clone()),
            path: Writable::new(location.path().to_string()),
            hash: Writable::new(location.hash().to_string()),
            query: Writable::new(location.query()),
            url: Writable::new(location),
            history,
            in_flight: AtomicBool::new(false),
            serial: AtomicU64::new(0),
        }
    }

    /// The current location.
    pub fn get(&self) -> Location {
        self.url.get()
    }

    /// Navigates to `href`, resolved against the current location, pushing a
    /// history entry.
    pub fn set(&self, href: &str) -> Result<Transition, NavigationError> {
        let token = self.begin()?;
        let target = self.get().join(href)?;
        self.commit(&token, target, HistoryMode::Push)
    }

    /// Navigates to an already parsed location, pushing a history entry.
    pub fn set_location(&self, location: Location) -> Result<Transition, NavigationError> {
        let token = self.begin()?;
        self.commit(&token, location, HistoryMode::Push)
    }

    /// Like [`set`](Self::set), but overwrites the current history entry.
    pub fn replace(&self, href: &str) -> Result<Transition, NavigationError> {
        let token = self.begin()?;
        let target = self.get().join(href)?;
        self.commit(&token, target, HistoryMode::Replace)
    }

    /// Changes only the path.
    pub fn set_path(&self, path: &str) -> Result<Transition, NavigationError> {
        let token = self.begin()?;
        let target = self.get().with_path(path);
        self.commit(&token, target, HistoryMode::Push)
    }

    /// Changes only the fragment. A leading `#` is optional; an empty hash
    /// removes the fragment.
    pub fn set_hash(&self, hash: &str) -> Result<Transition, NavigationError> {
        let token = self.begin()?;
        let target = self.get().with_hash(hash);
        self.commit(&token, target, HistoryMode::Push)
    }

    /// Sets a query parameter: the first occurrence takes the value, later
    /// ones are dropped, and it is appended when absent.
    pub fn set_query_param(&self, name: &str, value: &str) -> Result<Transition, NavigationError> {
        self.edit_query(|q| q.set(name, value))
    }

    /// Adds another value for `name`.
    pub fn append_query_param(
        &self,
        name: &str,
        value: &str,
    ) -> Result<Transition, NavigationError> {
        self.edit_query(|q| q.append(name, value))
    }

    /// Removes every value for `name`. Unchanged when it was absent.
    pub fn delete_query_param(&self, name: &str) -> Result<Transition, NavigationError> {
        self.edit_query(|q| {
            q.delete(name);
        })
    }

    /// Follows the platform after it moved on its own (back, forward, a
    /// fragment edit). No history entry is written.
    pub fn sync_from_platform(&self) -> Result<Transition, NavigationError> {
        let token = self.begin()?;
        let target = Location::from_url(self.history.location());
        self.commit(&token, target, HistoryMode::Skip)
    }

    /// The current location.
    pub fn url(&self) -> ReadOnly<Location> {
        self.url.read_only()
    }

    /// The location before the last committed transition.
    pub fn old_url(&self) -> ReadOnly<Location> {
        self.old_url.read_only()
    }

    /// The current path.
    pub fn path(&self) -> ReadOnly<String> {
        self.path.read_only()
    }

    /// The current fragment, without `#`.
    pub fn hash(&self) -> ReadOnly<String> {
        self.hash.read_only()
    }

    /// The current query parameters.
    pub fn query(&self) -> ReadOnly<QueryView> {
        self.query.read_only()
    }

    /// Whether a commit is running.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn edit_query(&self, edit: impl FnOnce(&mut QueryView)) -> Result<Transition, NavigationError> {
        let token = self.begin()?;
        let current = self.get();
        let mut query = current.query();
        edit(&mut query);
        self.commit(&token, current.with_query(&query), HistoryMode::Push)
    }

    pub(crate) fn begin(&self) -> Result<InFlight<'_>, NavigationError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn_log!("navigation rejected: another one is in flight");
            return Err(NavigationError::InFlight);
        }
        Ok(InFlight {
            flag: &self.in_flight,
        })
    }

    pub(crate) fn commit(
        &self,
        _token: &InFlight<'_>,
        target: Location,
        mode: HistoryMode,
    ) -> Result<Transition, NavigationError> {
        let current = self.url.get();
        if current == target {
            trace_log!(href = target.href(), "location unchanged");
            return Ok(Transition::Unchanged);
        }

        match mode {
            HistoryMode::Push => self
                .history
                .push_state(self.next_state(), &self.title, target.as_url())
                .map_err(NavigationError::History)?,
            HistoryMode::Replace => self
                .history
                .replace_state(self.next_state(), &self.title, target.as_url())
                .map_err(NavigationError::History)?,
            HistoryMode::Skip => {}
        }

        let url_changed = self.url.replace(target.clone());
        self.old_url.replace(current);
        let path_changed = self.path.replace(target.path().to_string());
        let hash_changed = self.hash.replace(target.hash().to_string());
        let query_changed = self.query.replace(target.query());

        debug_log!(href = target.href(), mode = ?mode, "navigation committed");

        if url_changed {
            self.url.notify();
        }
        // The seeded old url equals the first current url.
        self.old_url.notify();
        if path_changed {
            self.path.notify();
        }
        if hash_changed {
            self.hash.notify();
        }
        if query_changed {
            self.query.notify();
        }
        Ok(Transition::Committed)
    }

    fn next_state(&self) -> HistoryState {
        HistoryState::new(self.serial.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

impl fmt::Debug for UrlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlState")
            .field("url", &self.url.get())
            .field("in_flight", &self.is_in_flight())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elegua_std::platform::MemoryPlatform;
    use elegua_std::testing::Recorder;

    fn setup(initial: &str) -> (Arc<MemoryPlatform>, UrlState) {
        let platform = Arc::new(MemoryPlatform::new(initial).unwrap());
        let state = UrlState::new(platform.clone());
        (platform, state)
    }

    #[test]
    fn test_seeded_from_platform() {
        let (_, state) = setup("https://app.test/docs?page=2#intro");
        assert_eq!(state.path().get(), "/docs");
        assert_eq!(state.hash().get(), "intro");
        assert_eq!(state.query().get().get("page"), Some("2"));
        assert_eq!(state.old_url().get(), state.get());
    }

    #[test]
    fn test_set_decomposes_and_pushes_once() {
        let (platform, state) = setup("https://app.test/");

        assert_eq!(state.set("/blog?x=1#top").unwrap(), Transition::Committed);
        assert_eq!(state.set("/blog?x=1#top").unwrap(), Transition::Unchanged);

        assert_eq!(platform.push_count(), 1);
        assert_eq!(state.path().get(), "/blog");
        assert_eq!(state.hash().get(), "top");
        assert_eq!(state.old_url().get().path(), "/");
        assert_eq!(platform.entries()[1].state, Some(HistoryState::new(1)));
    }

    #[test]
    fn test_query_order_is_not_a_change() {
        let (platform, state) = setup("https://app.test/p?a=1&b=2");
        assert_eq!(state.set("/p?b=2&a=1").unwrap(), Transition::Unchanged);
        assert_eq!(platform.push_count(), 0);
    }

    #[test]
    fn test_history_failure_leaves_state() {
        let (platform, state) = setup("https://app.test/");
        let urls = Recorder::new();
        let _sub = state.url().subscribe(urls.subscriber());
        platform.reject_next_write();

        assert!(matches!(state.set("/x"), Err(NavigationError::History(_))));
        assert_eq!(state.path().get(), "/");
        assert_eq!(urls.count(), 1);
        assert!(!state.is_in_flight());
    }

    #[test]
    fn test_invalid_href_is_rejected() {
        let (_, state) = setup("https://app.test/");
        assert!(matches!(
            state.set("http://[::1"),
            Err(NavigationError::InvalidUrl { .. })
        ));
        assert!(!state.is_in_flight());
    }

    #[test]
    fn test_replace_overwrites_entry() {
        let (platform, state) = setup("https://app.test/");
        state.replace("/login").unwrap();
        assert_eq!(platform.len(), 1);
        assert_eq!(platform.replace_count(), 1);
        assert_eq!(state.path().get(), "/login");
    }

    #[test]
    fn test_hash_setter() {
        let (platform, state) = setup("https://app.test/page");
        state.set_hash("#section").unwrap();
        assert_eq!(state.get().href(), "https://app.test/page#section");
        state.set_hash("").unwrap();
        assert_eq!(state.hash().get(), "");
        assert_eq!(platform.push_count(), 2);
    }

    #[test]
    fn test_query_mutations_push_once_each() {
        let (platform, state) = setup("https://app.test/list");

        state.set_query_param("page", "2").unwrap();
        state.append_query_param("tag", "a").unwrap();
        state.append_query_param("tag", "b").unwrap();
        state.delete_query_param("tag").unwrap();
        assert_eq!(state.delete_query_param("tag").unwrap(), Transition::Unchanged);

        assert_eq!(platform.push_count(), 4);
        assert_eq!(state.get().href(), "https://app.test/list?page=2");
        assert_eq!(state.query().get().get_all("tag"), Vec::<&str>::new());
    }

    #[test]
    fn test_notification_order() {
        let (_, state) = setup("https://app.test/");
        let order: Recorder<&'static str> = Recorder::new();

        let o = order.clone();
        let _a = state.url().subscribe_fn(move |_| o.record("url"));
        let o = order.clone();
        let _b = state.old_url().subscribe_fn(move |_| o.record("old_url"));
        let o = order.clone();
        let _c = state.path().subscribe_fn(move |_| o.record("path"));
        let o = order.clone();
        let _d = state.hash().subscribe_fn(move |_| o.record("hash"));
        let o = order.clone();
        let _e = state.query().subscribe_fn(move |_| o.record("query"));
        order.clear();

        state.set("/a?q=1#h").unwrap();

        assert_eq!(order.values(), vec!["url", "old_url", "path", "hash", "query"]);
    }

    #[test]
    fn test_first_commit_notifies_old_url() {
        let (_, state) = setup("https://app.test/");
        let olds = Recorder::new();
        let _sub = state.old_url().subscribe(olds.subscriber());

        state.set("/next").unwrap();

        let paths: Vec<String> = olds.values().iter().map(|l| l.path().to_string()).collect();
        assert_eq!(paths, vec!["/", "/"]);

        state.set("/third").unwrap();
        assert_eq!(olds.last().map(|l| l.path().to_string()), Some("/next".to_string()));
        assert_eq!(olds.count(), 3);
    }

    #[test]
    fn test_subscriber_sees_consistent_stores() {
        let (_, state) = setup("https://app.test/");
        let state = Arc::new(state);
        let seen = Recorder::new();

        let reader = Arc::clone(&state);
        let rec = seen.clone();
        let _sub = state.url().subscribe_fn(move |url: &Location| {
            rec.record(url.path() == reader.path().get() && url.hash() == reader.hash().get());
        });

        state.set("/one#a").unwrap();
        state.set_path("/two").unwrap();
        state.set_hash("b").unwrap();

        assert_eq!(seen.values(), vec![true; 4]);
    }

    #[test]
    fn test_reentrant_write_is_rejected() {
        let (platform, state) = setup("https://app.test/");
        let state = Arc::new(state);
        let errors = Recorder::new();

        let inner = Arc::clone(&state);
        let rec = errors.clone();
        let _sub = state.path().subscribe_fn(move |path: &String| {
            if path == "/first" {
                rec.record(matches!(inner.set("/second"), Err(NavigationError::InFlight)));
            }
        });

        state.set("/first").unwrap();

        assert_eq!(errors.values(), vec![true]);
        assert_eq!(state.path().get(), "/first");
        assert_eq!(platform.push_count(), 1);
    }

    #[test]
    fn test_sync_from_platform_does_not_push() {
        let (platform, state) = setup("https://app.test/");
        state.set("/a").unwrap();
        platform.back();

        assert_eq!(state.sync_from_platform().unwrap(), Transition::Committed);
        assert_eq!(state.path().get(), "/");
        assert_eq!(state.old_url().get().path(), "/a");
        assert_eq!(platform.push_count(), 1);
        assert_eq!(state.sync_from_platform().unwrap(), Transition::Unchanged);
    }
}
