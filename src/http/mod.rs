//! HTTP/1.1 transport.
//!
//! The router never touches sockets; this module parses requests off the
//! wire, hands them to [`Engine::serve`](crate::engine::Engine::serve) and writes the buffered
//! [`Response`](response::Response) back.
//!
//! - **`connection`**: per-connection request-response state machine
//! - **`parser`**: parses incoming HTTP requests from byte buffers and decodes the path
//! - **`request`**: request representation, query and form accessors
//! - **`response`**: status codes, the buffered response and the `ResponseSink` trait
//! - **`writer`**: serializes and writes responses to the client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐   malformed   ┌─────────────┐
//!        │   Reading   │ ────────────► │  Rejecting  │ ← queue a 400, close after
//!        └──────┬──────┘               └──────┬──────┘
//!               │ request parsed              │
//!               ▼                             │
//!        ┌──────────────────┐                 │
//!        │   Dispatching    │ Engine::serve   │
//!        └──────┬───────────┘                 │
//!               │ response ready              │
//!               ▼                             │
//!        ┌──────────────────┐                 │
//!        │    Writing       │ ◄───────────────┘
//!        └──────┬───────────┘
//!               │ response sent
//!               ├─ keep-alive → Reading (same connection)
//!               └─ close → Closed
//! ```

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
