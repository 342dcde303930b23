//! Per-request execution context.
//!
//! A [`Context`] owns the handler chain for one request and a cursor into it.
//! Middleware wraps the rest of the chain by calling [`Context::next`];
//! [`Context::fail`] moves the cursor past the end so nothing further starts.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::http::request::{Method, Request};
use crate::http::response::{ResponseSink, StatusCode};

/// A route handler or middleware.
pub type HandlerFunc = Arc<dyn Fn(&mut Context<'_>) + Send + Sync>;

/// Dynamic JSON object used for ad-hoc response payloads.
pub type H = serde_json::Map<String, serde_json::Value>;

/// Wraps a closure into a [`HandlerFunc`].
pub fn handler<F>(f: F) -> HandlerFunc
where
    F: Fn(&mut Context<'_>) + Send + Sync + 'static,
{
    Arc::new(f)
}

pub struct Context<'a> {
    request: &'a Request,
    writer: &'a mut dyn ResponseSink,
    pub method: Method,
    pub path: String,
    status_code: StatusCode,
    params: HashMap<String, String>,
    handlers: Vec<HandlerFunc>,
    /// Index of the running handler; -1 before the chain starts.
    index: isize,
}

impl<'a> Context<'a> {
    pub fn new(request: &'a Request, writer: &'a mut dyn ResponseSink) -> Self {
        Self {
            request,
            writer,
            method: request.method,
            path: request.path.clone(),
            status_code: StatusCode::Ok,
            params: HashMap::new(),
            handlers: Vec::new(),
            index: -1,
        }
    }

    pub(crate) fn set_handlers(&mut self, handlers: Vec<HandlerFunc>) {
        self.handlers = handlers;
    }

    pub(crate) fn push_handler(&mut self, handler: HandlerFunc) {
        self.handlers.push(handler);
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }

    /// Runs the remaining handlers in order.
    ///
    /// Called by the router to start the chain and by middleware to wrap the
    /// handlers after it. Returns once the cursor has passed the end.
    pub fn next(&mut self) {
        self.index += 1;
        while self.index >= 0 && (self.index as usize) < self.handlers.len() {
            let current = Arc::clone(&self.handlers[self.index as usize]);
            current(self);
            self.index += 1;
        }
    }

    /// Stops the chain and writes `{"message": ...}` with `status`.
    ///
    /// Frames already inside a nested `next()` still resume; only handlers
    /// that have not started are skipped.
    pub fn fail(&mut self, status: StatusCode, message: &str) {
        self.index = self.handlers.len() as isize;
        let mut body = H::new();
        body.insert("message".to_string(), message.into());
        self.json(status, &body);
    }

    pub fn is_aborted(&self) -> bool {
        self.index >= self.handlers.len() as isize
    }

    pub fn request(&self) -> &Request {
        self.request
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn query(&self, key: &str) -> Option<String> {
        self.request.query_value(key)
    }

    pub fn post_form(&self, key: &str) -> Option<String> {
        self.request.form_value(key)
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.request.header(key)
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    pub fn status(&mut self, status: StatusCode) {
        self.status_code = status;
        self.writer.set_status(status);
    }

    pub fn set_header(&mut self, key: &str, value: &str) {
        self.writer.set_header(key, value);
    }

    pub fn string(&mut self, status: StatusCode, body: impl AsRef<str>) {
        self.set_header("Content-Type", "text/plain");
        self.status(status);
        self.writer.write_bytes(body.as_ref().as_bytes());
    }

    pub fn json<T: Serialize + ?Sized>(&mut self, status: StatusCode, value: &T) {
        self.set_header("Content-Type", "application/json");
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                self.status(status);
                self.writer.write_bytes(&bytes);
            }
            Err(e) => {
                tracing::error!(error = %e, path = %self.path, "Failed to encode JSON response");
                self.set_header("Content-Type", "text/plain");
                self.status(StatusCode::InternalServerError);
                self.writer.write_bytes(e.to_string().as_bytes());
            }
        }
    }

    pub fn data(&mut self, status: StatusCode, data: &[u8]) {
        self.status(status);
        self.writer.write_bytes(data);
    }

    pub fn html(&mut self, status: StatusCode, html: &str) {
        self.set_header("Content-Type", "text/html");
        self.status(status);
        self.writer.write_bytes(html.as_bytes());
    }
}
