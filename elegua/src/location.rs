//! Location values.
//!
//! [`Location`] is the canonical current URL; [`QueryView`] is its decoded
//! query string. Both are immutable snapshots: producing a changed location
//! clones and modifies, it never mutates the published value.

use elegua_core::NavigationError;
use std::fmt;
use url::Url;

/// A parsed absolute URL: scheme, host, path, query and hash.
///
/// Equality compares the canonical serialization: parsing already
/// normalizes case, default ports and percent-encoding, and query pairs are
/// additionally ordered by key, so `?a=1&b=2` equals `?b=2&a=1`.
#[derive(Clone)]
pub struct Location {
    url: Url,
}

impl Location {
    /// Parses an absolute URL.
    pub fn parse(href: &str) -> Result<Self, NavigationError> {
        Url::parse(href)
            .map(Self::from_url)
            .map_err(|source| NavigationError::InvalidUrl {
                href: href.to_string(),
                source,
            })
    }

    /// Wraps an already parsed URL.
    pub fn from_url(url: Url) -> Self {
        Self { url }
    }

    /// Resolves `href` against this location. Absolute hrefs are kept as is.
    pub fn join(&self, href: &str) -> Result<Self, NavigationError> {
        self.url
            .join(href)
            .map(Self::from_url)
            .map_err(|source| NavigationError::InvalidUrl {
                href: href.to_string(),
                source,
            })
    }

    /// The underlying URL.
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// Consumes the location, returning the URL.
    pub fn into_url(self) -> Url {
        self.url
    }

    /// Full serialization.
    pub fn href(&self) -> &str {
        self.url.as_str()
    }

    /// The path, always starting with `/` for http(s) URLs.
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// The fragment without its `#`; empty when there is none.
    pub fn hash(&self) -> &str {
        self.url.fragment().unwrap_or("")
    }

    /// Decoded query pairs in document order.
    pub fn query(&self) -> QueryView {
        QueryView::from_url(&self.url)
    }

    /// Whether both locations share scheme, host and port.
    pub fn same_origin(&self, other: &Location) -> bool {
        self.url.origin() == other.url.origin()
    }

    /// A copy with the path replaced.
    pub fn with_path(&self, path: &str) -> Self {
        let mut url = self.url.clone();
        url.set_path(path);
        Self { url }
    }

    /// A copy with the fragment replaced. A leading `#` is ignored; an empty
    /// hash removes the fragment.
    pub fn with_hash(&self, hash: &str) -> Self {
        let hash = hash.strip_prefix('#').unwrap_or(hash);
        let mut url = self.url.clone();
        url.set_fragment(if hash.is_empty() { None } else { Some(hash) });
        Self { url }
    }

    /// A copy with the query replaced by `query`.
    pub fn with_query(&self, query: &QueryView) -> Self {
        let mut url = self.url.clone();
        write_query(&mut url, query.iter());
        Self { url }
    }

    /// Serialization used for equality: query pairs stably sorted by key.
    pub fn canonical(&self) -> String {
        if self.url.query().is_none() {
            return self.url.as_str().to_string();
        }
        let mut url = self.url.clone();
        let query = self.query().sorted();
        write_query(&mut url, query.iter());
        url.into()
    }
}

fn write_query<'a>(url: &mut Url, pairs: impl Iterator<Item = (&'a str, &'a str)>) {
    let mut pairs = pairs.peekable();
    if pairs.peek().is_none() {
        url.set_query(None);
        return;
    }
    url.query_pairs_mut().clear().extend_pairs(pairs);
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url || self.canonical() == other.canonical()
    }
}

impl Eq for Location {}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Location").field(&self.url.as_str()).finish()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl From<Url> for Location {
    fn from(url: Url) -> Self {
        Self::from_url(url)
    }
}

/// Decoded query parameters, in order, with repeated keys preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryView {
    pairs: Vec<(String, String)>,
}

impl QueryView {
    fn from_url(url: &Url) -> Self {
        Self {
            pairs: url.query_pairs().into_owned().collect(),
        }
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `name`, in order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Whether `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == name)
    }

    /// Iterates over `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `URLSearchParams.set`: the first occurrence takes the value, later
    /// ones are removed; appended when absent.
    pub(crate) fn set(&mut self, name: &str, value: &str) {
        let mut seen = false;
        self.pairs.retain_mut(|(k, v)| {
            if k != name {
                return true;
            }
            if seen {
                return false;
            }
            seen = true;
            *v = value.to_string();
            true
        });
        if !seen {
            self.append(name, value);
        }
    }

    pub(crate) fn append(&mut self, name: &str, value: &str) {
        self.pairs.push((name.to_string(), value.to_string()));
    }

    /// Removes every pair named `name`; returns whether any was removed.
    pub(crate) fn delete(&mut self, name: &str) -> bool {
        let before = self.pairs.len();
        self.pairs.retain(|(k, _)| k != name);
        self.pairs.len() != before
    }

    fn sorted(mut self) -> Self {
        // Stable: values of a repeated key keep their relative order.
        self.pairs.sort_by(|a, b| a.0.cmp(&b.0));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(s: &str) -> Location {
        Location::parse(s).unwrap()
    }

    #[test]
    fn test_decomposition() {
        let l = loc("https://app.test/blog/post?tag=rust&tag=web#comments");
        assert_eq!(l.path(), "/blog/post");
        assert_eq!(l.hash(), "comments");
        assert_eq!(l.query().get_all("tag"), vec!["rust", "web"]);
        assert_eq!(loc("https://app.test/").hash(), "");
    }

    #[test]
    fn test_join_relative() {
        let base = loc("https://app.test/blog/post");
        assert_eq!(base.join("other").unwrap().path(), "/blog/other");
        assert_eq!(base.join("/about").unwrap().path(), "/about");
        assert_eq!(base.join("#top").unwrap().hash(), "top");
        assert_eq!(
            base.join("https://elsewhere.test/x").unwrap().href(),
            "https://elsewhere.test/x"
        );
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            Location::parse("/relative"),
            Err(NavigationError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_equality_ignores_query_order() {
        assert_eq!(
            loc("https://app.test/p?a=1&b=2"),
            loc("https://app.test/p?b=2&a=1")
        );
        assert_ne!(
            loc("https://app.test/p?a=1&a=2"),
            loc("https://app.test/p?a=2&a=1")
        );
        assert_eq!(loc("HTTPS://App.Test:443/p"), loc("https://app.test/p"));
    }

    #[test]
    fn test_with_hash() {
        let l = loc("https://app.test/p");
        assert_eq!(l.with_hash("#x").href(), "https://app.test/p#x");
        assert_eq!(l.with_hash("x").with_hash("").href(), "https://app.test/p");
    }

    #[test]
    fn test_query_set_semantics() {
        let mut q = loc("https://app.test/?a=1&b=2&a=3").query();
        q.set("a", "9");
        assert_eq!(
            q.iter().collect::<Vec<_>>(),
            vec![("a", "9"), ("b", "2")]
        );
        q.set("c", "new");
        assert_eq!(q.get("c"), Some("new"));
        assert!(q.delete("a"));
        assert!(!q.delete("a"));
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn test_with_empty_query_removes_question_mark() {
        let l = loc("https://app.test/p?a=1");
        let cleared = l.with_query(&QueryView::default());
        assert_eq!(cleared.href(), "https://app.test/p");
    }
}
