//! Route patterns: compilation and matching.
//!
//! A [`RoutePattern`] is produced by an explicit compile step and tagged with
//! how it matches:
//!
//! | Kind | Source | Matching |
//! |------|--------|----------|
//! | `Literal` | a string without `/:` | exact string equality |
//! | `Named` | a string with `:name` segments | anchored regex with named groups |
//! | `Pattern` | a [`Regex`] | the regex as given |
//!
//! Matching is pure. Publishing a match to the navigator's `match`/`params`
//! stores is done by [`MatchState`], and only on success: a failed attempt
//! leaves the previously published result in place.

use elegua_core::CompileError;
use elegua_std::store::{ReadOnly, Writable};
use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};

/// Captured parameters by name.
pub type Params = HashMap<String, String>;

/// Value class of a `:name` segment: a letter or digit, then letters,
/// digits, `_` or `-`.
const PARAM_VALUE: &str = "[A-Za-z0-9][A-Za-z0-9_-]*";

/// The three kinds of route pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Exact equality.
    Literal,
    /// Compiled from `:name` segments.
    Named,
    /// A user-supplied regular expression.
    Pattern,
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub enum RoutePattern {
    /// Matches one path exactly.
    Literal(String),
    /// A `:name` template and its compiled expression.
    Named {
        /// The template as written, e.g. `/blog/:id`.
        source: String,
        /// The anchored expression compiled from it.
        regex: Regex,
    },
    /// A raw expression, used unchanged (not anchored for you).
    Pattern(Regex),
}

impl RoutePattern {
    /// Compiles a string route: `Named` if it contains a `/:` segment marker,
    /// `Literal` otherwise.
    pub fn parse(pattern: &str) -> Result<Self, CompileError> {
        if pattern.contains("/:") {
            Self::named(pattern)
        } else {
            Ok(Self::literal(pattern))
        }
    }

    /// A literal route.
    pub fn literal(pattern: impl Into<String>) -> Self {
        RoutePattern::Literal(pattern.into())
    }

    /// Compiles a `:name` template.
    pub fn named(pattern: &str) -> Result<Self, CompileError> {
        Ok(RoutePattern::Named {
            source: pattern.to_string(),
            regex: named_path(pattern)?,
        })
    }

    /// Wraps a raw expression.
    pub fn regex(regex: Regex) -> Self {
        RoutePattern::Pattern(regex)
    }

    /// Which kind of pattern this is.
    pub fn kind(&self) -> PatternKind {
        match self {
            RoutePattern::Literal(_) => PatternKind::Literal,
            RoutePattern::Named { .. } => PatternKind::Named,
            RoutePattern::Pattern(_) => PatternKind::Pattern,
        }
    }

    /// The pattern as written.
    pub fn source(&self) -> &str {
        match self {
            RoutePattern::Literal(s) => s,
            RoutePattern::Named { source, .. } => source,
            RoutePattern::Pattern(regex) => regex.as_str(),
        }
    }

    /// Attempts to match `path`.
    pub fn matches(&self, path: &str) -> Option<RouteMatch> {
        match self {
            RoutePattern::Literal(s) => (s == path).then_some(RouteMatch::Literal),
            RoutePattern::Named { regex, .. } | RoutePattern::Pattern(regex) => regex
                .captures(path)
                .map(|caps| RouteMatch::Captures(MatchResult::from_captures(regex, &caps))),
        }
    }

    /// Builds a path from a template by substituting `params`.
    pub fn reverse(&self, params: &Params) -> Result<String, CompileError> {
        match self {
            RoutePattern::Literal(s) => Ok(s.clone()),
            RoutePattern::Pattern(regex) => Err(CompileError::NotReversible {
                pattern: regex.as_str().to_string(),
            }),
            RoutePattern::Named { source, .. } => {
                let segments = source
                    .split('/')
                    .map(|segment| match segment.strip_prefix(':') {
                        Some(name) => params.get(name).cloned().ok_or_else(|| {
                            CompileError::MissingParameter {
                                pattern: source.clone(),
                                name: name.to_string(),
                            }
                        }),
                        None => Ok(segment.to_string()),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(segments.join("/"))
            }
        }
    }
}

impl From<Regex> for RoutePattern {
    fn from(regex: Regex) -> Self {
        RoutePattern::Pattern(regex)
    }
}

/// Conversion into a compiled [`RoutePattern`].
///
/// Strings go through [`RoutePattern::parse`]; regexes and compiled patterns
/// pass through.
pub trait IntoRoutePattern {
    /// Performs the conversion.
    fn into_route_pattern(self) -> Result<RoutePattern, CompileError>;
}

impl IntoRoutePattern for RoutePattern {
    fn into_route_pattern(self) -> Result<RoutePattern, CompileError> {
        Ok(self)
    }
}

impl IntoRoutePattern for Regex {
    fn into_route_pattern(self) -> Result<RoutePattern, CompileError> {
        Ok(RoutePattern::Pattern(self))
    }
}

impl IntoRoutePattern for &str {
    fn into_route_pattern(self) -> Result<RoutePattern, CompileError> {
        RoutePattern::parse(self)
    }
}

impl IntoRoutePattern for String {
    fn into_route_pattern(self) -> Result<RoutePattern, CompileError> {
        RoutePattern::parse(&self)
    }
}

/// Compiles a `:name` template such as `/blog/:slug` into an anchored regex.
///
/// Segments are split on `/`. A segment starting with `:` becomes a named
/// group whose value must start with a letter or digit and continue with
/// letters, digits, `_` or `-`; every other segment is matched literally.
/// Names must be identifiers (`[A-Za-z_][A-Za-z0-9_]*`) and unique.
pub fn named_path(pattern: &str) -> Result<Regex, CompileError> {
    let mut seen = HashSet::new();
    let mut parts = Vec::new();

    for segment in pattern.split('/') {
        match segment.strip_prefix(':') {
            Some(name) => {
                if !is_param_name(name) {
                    return Err(CompileError::InvalidParameter {
                        pattern: pattern.to_string(),
                        segment: segment.to_string(),
                    });
                }
                if !seen.insert(name) {
                    return Err(CompileError::DuplicateParameter {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                    });
                }
                parts.push(format!("(?P<{name}>{PARAM_VALUE})"));
            }
            None => parts.push(regex::escape(segment)),
        }
    }

    let source = format!("^{}$", parts.join("/"));
    Regex::new(&source).map_err(|e| CompileError::Regex {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

fn is_param_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Captures from a successful expression match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    groups: Vec<Option<String>>,
    named: Params,
}

impl MatchResult {
    fn from_captures(regex: &Regex, caps: &Captures<'_>) -> Self {
        let groups = caps
            .iter()
            .map(|m| m.map(|m| m.as_str().to_string()))
            .collect();
        let named = regex
            .capture_names()
            .flatten()
            .filter_map(|name| caps.name(name).map(|m| (name.to_string(), m.as_str().to_string())))
            .collect();
        Self { groups, named }
    }

    /// Group `i`; group 0 is the whole match.
    pub fn get(&self, i: usize) -> Option<&str> {
        self.groups.get(i).and_then(|g| g.as_deref())
    }

    /// The whole matched text.
    pub fn whole(&self) -> &str {
        self.get(0).unwrap_or("")
    }

    /// A named group's value.
    pub fn name(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }

    /// All groups in order; groups that did not participate are `None`.
    pub fn groups(&self) -> &[Option<String>] {
        &self.groups
    }

    /// Named groups that participated in the match.
    pub fn named(&self) -> &Params {
        &self.named
    }
}

/// Outcome of a successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch {
    /// A literal route matched; there is nothing captured.
    Literal,
    /// An expression matched.
    Captures(MatchResult),
}

impl RouteMatch {
    /// Named parameters; empty for literal matches.
    pub fn params(&self) -> Params {
        match self {
            RouteMatch::Literal => Params::new(),
            RouteMatch::Captures(m) => m.named.clone(),
        }
    }
}

/// The published result of the last successful match.
///
/// `match_result` is `None` until an expression matches, and is cleared again
/// by a literal match. `params` is the named-group map of the last success,
/// empty after a literal match or an expression without named groups.
#[derive(Clone)]
pub struct MatchState {
    result: Writable<Option<MatchResult>>,
    params: Writable<Params>,
}

impl MatchState {
    /// Nothing matched yet.
    pub fn new() -> Self {
        Self {
            result: Writable::new(None),
            params: Writable::new(Params::new()),
        }
    }

    /// The last expression match.
    pub fn match_result(&self) -> ReadOnly<Option<MatchResult>> {
        self.result.read_only()
    }

    /// The last captured parameters.
    pub fn params(&self) -> ReadOnly<Params> {
        self.params.read_only()
    }

    /// Matches `path` and publishes on success. Returns whether it matched.
    pub fn resolve(&self, path: &str, pattern: &RoutePattern) -> bool {
        match pattern.matches(path) {
            Some(m) => {
                self.publish(&m);
                true
            }
            None => false,
        }
    }

    /// Publishes a match: both stores are written before either notifies.
    pub fn publish(&self, m: &RouteMatch) {
        let (result, params) = match m {
            RouteMatch::Literal => (None, Params::new()),
            RouteMatch::Captures(c) => (Some(c.clone()), c.named.clone()),
        };
        let result_changed = self.result.replace(result);
        let params_changed = self.params.replace(params);
        if result_changed {
            self.result.notify();
        }
        if params_changed {
            self.params.notify();
        }
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchState")
            .field("result", &self.result)
            .field("params", &self.params)
            .finish()
    }
}
