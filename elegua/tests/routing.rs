mod common;

use common::{App, Page};
use elegua::{
    CompileError, Readable, RouteMatch, RoutePattern, RouteResult, RouteTable, Router, routes,
};
use regex::Regex;

fn table() -> RouteTable<Page> {
    routes![
        "/" => Page::Home,
        "/about" => Page::About,
        "/blog/:slug" => Page::Post,
        Regex::new(r"^/files/(?P<rest>.+)$").unwrap() => Page::Files;
        fallback => Page::NotFound,
    ]
    .unwrap()
}

#[test]
fn test_named_path_params() {
    let app = App::new();
    let regex = app.navigator.named_path("/blog/:id").unwrap();

    let caps = regex.captures("/blog/my-post").unwrap();
    assert_eq!(&caps["id"], "my-post");
    assert!(regex.captures("/blog/").is_none());
}

#[test]
fn test_resolve_publishes_params() {
    let app = App::new();
    let params = app.navigator.matches().params();

    assert!(app.navigator.resolve("/blog/my-post", "/blog/:id").unwrap());
    assert_eq!(params.get().get("id").map(String::as_str), Some("my-post"));

    let result = app.navigator.matches().match_result().get().unwrap();
    assert_eq!(result.whole(), "/blog/my-post");
}

#[test]
fn test_first_match_wins() {
    let app = App::new();
    let table = routes!["/a" => "h1", "/:x" => "h2"].unwrap();

    assert_eq!(app.navigator.dynamic("/a", &table), Some(&"h1"));
    assert!(app.navigator.matches().params().get().is_empty());

    assert_eq!(app.navigator.dynamic("/b", &table), Some(&"h2"));
    assert_eq!(
        app.navigator.matches().params().get().get("x").map(String::as_str),
        Some("b")
    );
}

#[test]
fn test_literal_clears_and_mismatch_keeps() {
    let app = App::new();
    let nav = &app.navigator;

    assert!(nav.resolve("/blog/first", "/blog/:id").unwrap());
    let published = nav.matches().match_result().get();
    assert!(published.is_some());

    assert!(!nav.resolve("/other/path", "/blog/:id").unwrap());
    let pattern = RoutePattern::regex(Regex::new(r"^/n/(\d+)$").unwrap());
    assert!(!nav.resolve_pattern("/n/abc", &pattern));
    assert_eq!(nav.matches().match_result().get(), published);

    assert!(nav.resolve("/about", "/about").unwrap());
    assert_eq!(nav.matches().match_result().get(), None);
    assert!(nav.matches().params().get().is_empty());
}

#[test]
fn test_dynamic_with_current_path() {
    let app = App::new();
    let table = table();

    app.navigator.goto("/files/docs/readme.md").unwrap();
    let page = app.navigator.dynamic(&app.path(), &table);
    assert_eq!(page, Some(&Page::Files));
    assert_eq!(
        app.navigator.matches().params().get().get("rest").map(String::as_str),
        Some("docs/readme.md")
    );

    assert_eq!(app.navigator.dynamic("/", &table), Some(&Page::Home));
    assert_eq!(app.navigator.dynamic("/missing", &table), Some(&Page::NotFound));
}

#[test]
fn test_match_is_not_recomputed_on_navigation() {
    let app = App::new();
    let table = table();
    app.navigator.dynamic("/blog/hello", &table);

    app.navigator.goto("/about").unwrap();

    assert_eq!(
        app.navigator.matches().params().get().get("slug").map(String::as_str),
        Some("hello")
    );
}

#[test]
fn test_table_as_router() {
    let table = table();
    assert_eq!(table.route("/about"), RouteResult::Matched(&Page::About));
    assert_eq!(table.route("/nope"), RouteResult::NotFound);

    let (route, m) = table.find("/").unwrap();
    assert_eq!(route.pattern().source(), "/");
    assert_eq!(m, RouteMatch::Literal);
}

#[test]
fn test_bad_pattern_in_table() {
    let result = routes!["/ok" => 1, "/:a/:a" => 2];
    assert!(matches!(
        result,
        Err(CompileError::DuplicateParameter { ref name, .. }) if name == "a"
    ));
}

#[test]
fn test_reverse_round_trips_through_match() {
    let pattern = RoutePattern::parse("/users/:user/repos/:repo").unwrap();
    let Some(m) = pattern.matches("/users/ada/repos/engine") else {
        panic!("expected a match");
    };
    assert_eq!(pattern.reverse(&m.params()).unwrap(), "/users/ada/repos/engine");
}
