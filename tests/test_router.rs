//! Tests for route registration, lookup and dispatch

use waypoint::context::{handler, Context};
use waypoint::http::request::{Method, RequestBuilder};
use waypoint::http::response::{Response, StatusCode};
use waypoint::routing::Router;

fn noop() -> waypoint::HandlerFunc {
    handler(|_c| {})
}

fn named(name: &'static str) -> waypoint::HandlerFunc {
    handler(move |c| c.string(StatusCode::Ok, name))
}

fn test_router() -> Router {
    let mut r = Router::new();
    r.add_route(Method::GET, "/", noop());
    r.add_route(Method::GET, "/hello/:name", noop());
    r.add_route(Method::GET, "/hello/b/c", noop());
    r.add_route(Method::GET, "/hi/:name", noop());
    r.add_route(Method::GET, "/assets/*filepath", noop());
    r.add_route(Method::GET, "/p/:lang/doc", noop());
    r.add_route(Method::GET, "/static/*filepath", noop());
    r
}

fn dispatch(router: &Router, method: Method, target: &str) -> Response {
    let request = RequestBuilder::new().method(method).path(target).build().unwrap();
    let mut response = Response::new();
    let mut c = Context::new(&request, &mut response);
    router.handle(&mut c);
    drop(c);
    response
}

#[test]
fn test_get_route_binds_named_param() {
    let r = test_router();
    let (node, params) = r.get_route(Method::GET, "/hello/geektutu").unwrap();

    assert_eq!(node.pattern(), "/hello/:name");
    assert_eq!(params.get("name").map(String::as_str), Some("geektutu"));
}

#[test]
fn test_get_route_literal_wins() {
    let r = test_router();
    let (node, params) = r.get_route(Method::GET, "/hello/b/c").unwrap();

    assert_eq!(node.pattern(), "/hello/b/c");
    assert!(params.is_empty());
}

#[test]
fn test_get_route_lang_param() {
    let r = test_router();
    let (_, params) = r.get_route(Method::GET, "/p/go/doc").unwrap();

    assert_eq!(params.len(), 1);
    assert_eq!(params["lang"], "go");
}

#[test]
fn test_get_route_wildcard_joins_remainder() {
    let r = test_router();
    let (node, params) = r.get_route(Method::GET, "/static/css/a.css").unwrap();

    assert_eq!(node.pattern(), "/static/*filepath");
    assert_eq!(params["filepath"], "css/a.css");
}

#[test]
fn test_get_route_root() {
    let r = test_router();
    let (node, _) = r.get_route(Method::GET, "/").unwrap();
    assert_eq!(node.pattern(), "/");
}

#[test]
fn test_get_route_method_mismatch() {
    let mut r = Router::new();
    r.add_route(Method::GET, "/x", noop());

    assert!(r.get_route(Method::POST, "/x").is_none());
    assert!(r.root(Method::POST).is_none());
}

#[test]
fn test_get_route_unknown_path() {
    let r = test_router();
    assert!(r.get_route(Method::GET, "/nope").is_none());
    assert!(r.get_route(Method::GET, "/hello").is_none());
}

#[test]
fn test_bare_wildcard_binds_nothing() {
    let mut r = Router::new();
    r.add_route(Method::GET, "/files/*", noop());

    let (node, params) = r.get_route(Method::GET, "/files/a/b").unwrap();
    assert_eq!(node.pattern(), "/files/*");
    assert!(params.is_empty());
}

#[test]
fn test_wildcard_mid_pattern_is_truncated() {
    let mut r = Router::new();
    r.add_route(Method::GET, "/dl/*path/tail", noop());

    let (node, params) = r.get_route(Method::GET, "/dl/x/y/z").unwrap();
    assert_eq!(node.pattern(), "/dl/*path/tail");
    assert_eq!(params["path"], "x/y/z");
}

#[test]
fn test_reregistering_overwrites_handler() {
    let mut r = Router::new();
    r.add_route(Method::GET, "/x", named("first"));
    r.add_route(Method::GET, "/x", named("second"));

    assert_eq!(r.route_count(), 1);
    assert_eq!(r.root(Method::GET).unwrap().children().len(), 1);
    assert_eq!(dispatch(&r, Method::GET, "/x").body_text(), "second");
}

#[test]
fn test_equivalent_spellings_keep_separate_handlers() {
    let mut r = Router::new();
    r.add_route(Method::GET, "/p/doc", named("single"));
    r.add_route(Method::GET, "/p//doc", named("double"));

    assert_eq!(r.route_count(), 2);
    // the trie node remembers the last spelling, which picks the handler
    let (node, _) = r.get_route(Method::GET, "/p/doc").unwrap();
    assert_eq!(node.pattern(), "/p//doc");
    assert_eq!(dispatch(&r, Method::GET, "/p/doc").body_text(), "double");
}

#[test]
fn test_handle_runs_param_handler() {
    let mut r = Router::new();
    r.add_route(
        Method::GET,
        "/hello/:name",
        handler(|c| {
            let body = format!("hello {}", c.param("name").unwrap_or_default());
            c.string(StatusCode::Ok, body);
        }),
    );

    let response = dispatch(&r, Method::GET, "/hello/geek?x=1");
    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body_text(), "hello geek");
}

#[test]
fn test_handle_writes_404_for_unmatched() {
    let r = test_router();
    let response = dispatch(&r, Method::GET, "/missing/page");

    assert_eq!(response.status, StatusCode::NotFound);
    assert_eq!(response.body_text(), "404 NOT FOUND: /missing/page\n");
    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/plain");
}

#[test]
fn test_handle_writes_404_for_method_mismatch() {
    let r = test_router();
    let response = dispatch(&r, Method::DELETE, "/");

    assert_eq!(response.status, StatusCode::NotFound);
    assert_eq!(response.body_text(), "404 NOT FOUND: /\n");
}

#[test]
fn test_handle_binds_percent_decoded_param() {
    let mut r = Router::new();
    r.add_route(
        Method::GET,
        "/p/:name",
        handler(|c| {
            let name = c.param("name").unwrap_or_default().to_string();
            c.string(StatusCode::Ok, name);
        }),
    );

    let response = dispatch(&r, Method::GET, "/p/hello%20world");
    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body_text(), "hello world");
}

#[test]
fn test_wildcard_needs_at_least_one_segment() {
    let r = test_router();

    assert!(r.get_route(Method::GET, "/static").is_none());
    assert!(r.get_route(Method::GET, "/static/").is_none());
    let (_, params) = r.get_route(Method::GET, "/static/x").unwrap();
    assert_eq!(params["filepath"], "x");
}
