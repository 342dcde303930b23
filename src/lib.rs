//! Waypoint - trie-based HTTP router with route groups and middleware chains
//!
//! Core library: routing, execution context, middleware and the HTTP/1.1
//! transport they run on.

pub mod config;
pub mod context;
pub mod engine;
pub mod http;
pub mod middleware;
pub mod routing;
pub mod server;

pub use context::{handler, Context, HandlerFunc, H};
pub use engine::Engine;
pub use serde_json::json;
