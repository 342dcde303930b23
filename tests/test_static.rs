//! Tests for serving files from a directory

use std::fs;

use waypoint::http::request::{Method, RequestBuilder};
use waypoint::http::response::{Response, StatusCode};
use waypoint::Engine;

fn serve(engine: &Engine, target: &str) -> Response {
    let request = RequestBuilder::new().method(Method::GET).path(target).build().unwrap();
    let mut response = Response::new();
    engine.serve(&request, &mut response);
    response
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("css")).unwrap();
    fs::write(dir.path().join("css/a.css"), "body { color: red; }").unwrap();
    fs::write(dir.path().join("index.html"), "<h1>index</h1>").unwrap();
    fs::write(dir.path().join("report.csv"), "a,b\n1,2\n").unwrap();
    fs::write(dir.path().join("clip.mp4"), [0u8, 0, 0, 24]).unwrap();
    fs::write(dir.path().join("blob.unknownext"), "??").unwrap();
    fs::write(dir.path().join("my file.css"), "p { margin: 0; }").unwrap();
    dir
}

#[test]
fn test_static_serves_nested_file_with_mime() {
    let dir = fixture();
    let engine = Engine::new();
    engine.static_files("/assets", dir.path());

    let response = serve(&engine, "/assets/css/a.css");
    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body_text(), "body { color: red; }");
    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/css");
}

#[test]
fn test_static_content_type_follows_extension() {
    let dir = fixture();
    let engine = Engine::new();
    engine.static_files("/assets", dir.path());

    let content_type = |target: &str| {
        serve(&engine, target).headers.get("Content-Type").cloned().unwrap()
    };
    assert_eq!(content_type("/assets/report.csv"), "text/csv");
    assert_eq!(content_type("/assets/clip.mp4"), "video/mp4");
    assert_eq!(content_type("/assets/index.html"), "text/html");
    assert_eq!(content_type("/assets/blob.unknownext"), "application/octet-stream");
}

#[test]
fn test_static_serves_percent_encoded_file_name() {
    let dir = fixture();
    let engine = Engine::new();
    engine.static_files("/assets", dir.path());

    let response = serve(&engine, "/assets/my%20file.css");
    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body_text(), "p { margin: 0; }");
}

#[test]
fn test_static_under_group_prefix() {
    let dir = fixture();
    let engine = Engine::new();
    let v1 = engine.group("/v1");
    v1.static_files("/files/", dir.path());

    let response = serve(&engine, "/v1/files/index.html");
    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body_text(), "<h1>index</h1>");
}

#[test]
fn test_static_missing_file_is_bare_404() {
    let dir = fixture();
    let engine = Engine::new();
    engine.static_files("/assets", dir.path());

    let response = serve(&engine, "/assets/nope.js");
    assert_eq!(response.status, StatusCode::NotFound);
    assert!(response.body.is_empty());
}

#[test]
fn test_static_directory_is_not_served() {
    let dir = fixture();
    let engine = Engine::new();
    engine.static_files("/assets", dir.path());

    assert_eq!(serve(&engine, "/assets/css").status, StatusCode::NotFound);
}

#[test]
fn test_static_rejects_traversal() {
    let dir = fixture();
    let inner = dir.path().join("public");
    fs::create_dir_all(&inner).unwrap();
    let engine = Engine::new();
    engine.static_files("/assets", &inner);

    let response = serve(&engine, "/assets/../index.html");
    assert_eq!(response.status, StatusCode::NotFound);
    assert!(response.body.is_empty());
}
