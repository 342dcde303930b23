//! End-to-end tests over a real TCP connection

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use waypoint::http::response::StatusCode;
use waypoint::server::listener;
use waypoint::Engine;

async fn start(engine: Engine) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(listener::serve(listener, Arc::new(engine)));
    addr
}

async fn roundtrip(addr: std::net::SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    String::from_utf8_lossy(&buf).into_owned()
}

fn demo_engine() -> Engine {
    let engine = Engine::with_default_middleware();
    engine.get("/hello/:name", |c| {
        let body = format!("hello {}", c.param("name").unwrap_or_default());
        c.string(StatusCode::Ok, body);
    });
    engine.get("/panic", |_c| panic!("handler bug"));
    engine.get("/teapot", |c| c.fail(StatusCode::Other(418), "short and stout"));
    engine
}

#[tokio::test]
async fn test_server_routes_request() {
    let addr = start(demo_engine()).await;
    let response = roundtrip(
        addr,
        "GET /hello/geek HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("Content-Length: 10\r\n"));
    assert!(response.ends_with("\r\n\r\nhello geek"));
}

#[tokio::test]
async fn test_server_not_found() {
    let addr = start(demo_engine()).await;
    let response = roundtrip(addr, "GET /nowhere HTTP/1.1\r\nConnection: close\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(response.ends_with("404 NOT FOUND: /nowhere\n"));
}

#[tokio::test]
async fn test_server_recovers_from_panic() {
    let addr = start(demo_engine()).await;
    let response = roundtrip(addr, "GET /panic HTTP/1.1\r\nConnection: close\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
    assert!(response.ends_with(r#"{"message":"Internal Server Error"}"#));
}

#[tokio::test]
async fn test_server_keep_alive_serves_pipelined_requests() {
    let addr = start(demo_engine()).await;
    let response = roundtrip(
        addr,
        "GET /hello/a HTTP/1.1\r\n\r\nGET /hello/b HTTP/1.1\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert_eq!(response.matches("HTTP/1.1 200 OK").count(), 2);
    assert!(response.contains("hello a"));
    assert!(response.ends_with("hello b"));
}

#[tokio::test]
async fn test_server_rejects_malformed_request() {
    let addr = start(demo_engine()).await;
    let response = roundtrip(addr, "BREW /pot HTTP/1.1\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
}

#[tokio::test]
async fn test_server_decodes_encoded_path() {
    let addr = start(demo_engine()).await;
    let response = roundtrip(
        addr,
        "GET /hello/big%20geek HTTP/1.1\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.ends_with("hello big geek"));
}

#[tokio::test]
async fn test_server_writes_unnamed_status() {
    let addr = start(demo_engine()).await;
    let response = roundtrip(addr, "GET /teapot HTTP/1.1\r\nConnection: close\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 418 I'm a teapot\r\n"));
}

#[tokio::test]
async fn test_server_rejects_after_answering_earlier_request() {
    let addr = start(demo_engine()).await;
    let response = roundtrip(
        addr,
        "GET /hello/a HTTP/1.1\r\n\r\nGET /hello/b HTTP/1.1\r\nBroken\r\n\r\nGET /hello/c HTTP/1.1\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("HTTP/1.1 400 Bad Request\r\n"));
    assert!(!response.contains("hello b"));
    assert!(!response.contains("hello c"));
}

#[tokio::test]
async fn test_server_closes_quietly_on_truncated_request() {
    let addr = start(demo_engine()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(b"GET /hello/a HTTP/1.1\r\nHost: x").await.unwrap();
    stream.shutdown().await.unwrap();

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    assert!(buf.is_empty());
}
