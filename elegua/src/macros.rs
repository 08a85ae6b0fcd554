//! Macros: internal logging shims and the public [`routes!`](crate::routes) builder.

// Forward to `tracing` when the feature is on; expand to nothing otherwise.
macro_rules! trace_log {
    ($($arg:tt)+) => {{
        #[cfg(feature = "tracing")]
        {
            tracing::trace!($($arg)+);
        }
    }};
}

macro_rules! debug_log {
    ($($arg:tt)+) => {{
        #[cfg(feature = "tracing")]
        {
            tracing::debug!($($arg)+);
        }
    }};
}

macro_rules! warn_log {
    ($($arg:tt)+) => {{
        #[cfg(feature = "tracing")]
        {
            tracing::warn!($($arg)+);
        }
    }};
}

/// Builds a [`RouteTable`](crate::RouteTable) from `pattern => handler` pairs.
///
/// Patterns are anything accepted by
/// [`RouteTableBuilder::route`](crate::RouteTableBuilder::route). An optional
/// `; fallback => handler` clause sets the fallback. Evaluates to
/// `Result<RouteTable<H>, CompileError>`.
///
/// # Example
///
/// ```rust,ignore
/// let table = elegua::routes![
///     "/" => Page::Home,
///     "/blog/:slug" => Page::Post,
///     Regex::new(r"^/files/.+$")? => Page::File;
///     fallback => Page::NotFound,
/// ]?;
/// ```
#[macro_export]
macro_rules! routes {
    ($($pattern:expr => $handler:expr),+ ; fallback => $fallback:expr $(,)?) => {{
        let builder = $crate::RouteTable::builder();
        $( let builder = builder.route($pattern, $handler); )+
        builder.fallback($fallback).build()
    }};
    ($($pattern:expr => $handler:expr),* $(,)?) => {{
        let builder = $crate::RouteTable::builder();
        $( let builder = builder.route($pattern, $handler); )*
        builder.build()
    }};
}
