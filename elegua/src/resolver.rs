//! Ordered route tables.
//!
//! A [`RouteTable`] holds routes in declaration order and resolves a path to
//! the first route that matches. There is no specificity ranking: put the
//! narrow routes first.

use crate::matcher::{IntoRoutePattern, RouteMatch, RoutePattern};
use elegua_core::{CompileError, RouteResult, Router};
use std::fmt;

/// A compiled pattern and its handler.
#[derive(Debug, Clone)]
pub struct Route<H> {
    pattern: RoutePattern,
    handler: H,
}

impl<H> Route<H> {
    /// Pairs a compiled pattern with a handler.
    pub fn new(pattern: RoutePattern, handler: H) -> Self {
        Self { pattern, handler }
    }

    /// The route's pattern.
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// The route's handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }
}

/// Routes tried in order, with an optional fallback.
#[derive(Clone)]
pub struct RouteTable<H> {
    routes: Vec<Route<H>>,
    fallback: Option<H>,
}

impl<H> RouteTable<H> {
    /// Starts a table.
    pub fn builder() -> RouteTableBuilder<H> {
        RouteTableBuilder::new()
    }

    /// The first route matching `path`, with its captures.
    pub fn find(&self, path: &str) -> Option<(&Route<H>, RouteMatch)> {
        self.routes
            .iter()
            .find_map(|route| route.pattern.matches(path).map(|m| (route, m)))
    }

    /// The handler used when nothing matches.
    pub fn fallback(&self) -> Option<&H> {
        self.fallback.as_ref()
    }

    /// Routes in declaration order.
    pub fn routes(&self) -> &[Route<H>] {
        &self.routes
    }

    /// Number of routes, not counting the fallback.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<H: Send + Sync + 'static> Router<str, H> for RouteTable<H> {
    fn route(&self, path: &str) -> RouteResult<'_, H> {
        match self.find(path) {
            Some((route, _)) => RouteResult::Matched(&route.handler),
            None => RouteResult::NotFound,
        }
    }
}

impl<H> fmt::Debug for RouteTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let patterns: Vec<_> = self.routes.iter().map(|r| r.pattern.source()).collect();
        f.debug_struct("RouteTable")
            .field("routes", &patterns)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

/// Builder for [`RouteTable`].
///
/// Each pattern is compiled when it is added. The first compile error is
/// kept and returned by [`build`](Self::build), so routes can be chained
/// without checking each one.
pub struct RouteTableBuilder<H> {
    routes: Vec<Route<H>>,
    fallback: Option<H>,
    error: Option<CompileError>,
}

impl<H> RouteTableBuilder<H> {
    /// An empty builder.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            fallback: None,
            error: None,
        }
    }

    /// Appends a route. Strings are compiled as literal or `:name` routes;
    /// a [`Regex`](regex::Regex) is used as is.
    pub fn route(mut self, pattern: impl IntoRoutePattern, handler: H) -> Self {
        if self.error.is_some() {
            return self;
        }
        match pattern.into_route_pattern() {
            Ok(pattern) => self.routes.push(Route::new(pattern, handler)),
            Err(e) => self.error = Some(e),
        }
        self
    }

    /// Sets the handler used when nothing matches.
    pub fn fallback(mut self, handler: H) -> Self {
        self.fallback = Some(handler);
        self
    }

    /// Finishes the table, or returns the first compile error.
    pub fn build(self) -> Result<RouteTable<H>, CompileError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        Ok(RouteTable {
            routes: self.routes,
            fallback: self.fallback,
        })
    }
}

impl<H> Default for RouteTableBuilder<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Page {
        Home,
        About,
        Post,
        File,
        NotFound,
    }

    fn table() -> RouteTable<Page> {
        RouteTable::builder()
            .route("/", Page::Home)
            .route("/about", Page::About)
            .route("/blog/:slug", Page::Post)
            .route(Regex::new(r"^/files/(.+)$").unwrap(), Page::File)
            .fallback(Page::NotFound)
            .build()
            .unwrap()
    }

    #[test]
    fn test_find_in_order() {
        let table = table();
        assert_eq!(table.find("/about").map(|(r, _)| *r.handler()), Some(Page::About));

        let (route, m) = table.find("/blog/hello").unwrap();
        assert_eq!(*route.handler(), Page::Post);
        assert_eq!(m.params().get("slug").map(String::as_str), Some("hello"));

        assert!(table.find("/missing").is_none());
        assert_eq!(table.fallback(), Some(&Page::NotFound));
    }

    #[test]
    fn test_first_match_wins() {
        let table = RouteTable::builder()
            .route("/a", 1)
            .route("/:x", 2)
            .build()
            .unwrap();
        assert_eq!(table.find("/a").map(|(r, _)| *r.handler()), Some(1));
        assert_eq!(table.find("/b").map(|(r, _)| *r.handler()), Some(2));
    }

    #[test]
    fn test_router_trait() {
        let table = table();
        assert_eq!(table.route("/").matched(), Some(&Page::Home));
        assert!(table.contains("/files/a.txt"));
        assert!(!table.contains("/nope"));
    }

    #[test]
    fn test_builder_keeps_first_error() {
        let result = RouteTable::builder()
            .route("/ok", 1)
            .route("/bad/:", 2)
            .route("/:id/:id", 3)
            .build();
        assert!(matches!(result, Err(CompileError::InvalidParameter { .. })));
    }

    #[test]
    fn test_routes_macro() {
        let table = crate::routes![
            "/" => Page::Home,
            "/blog/:slug" => Page::Post;
            fallback => Page::NotFound,
        ]
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.fallback(), Some(&Page::NotFound));

        let plain: RouteTable<Page> = crate::routes!["/about" => Page::About].unwrap();
        assert!(plain.fallback().is_none());
    }
}
