use std::collections::HashMap;

use crate::context::{Context, HandlerFunc};
use crate::http::request::Method;
use crate::http::response::StatusCode;
use crate::routing::trie::Node;

/// Method-keyed tries plus the handler table.
#[derive(Default)]
pub struct Router {
    roots: HashMap<Method, Node>,
    handlers: HashMap<(Method, String), HandlerFunc>,
}

/// Splits a pattern or path into segments.
///
/// Empty segments are dropped and nothing after the first `*` segment is kept.
pub fn parse_pattern(pattern: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    for item in pattern.split('/').filter(|s| !s.is_empty()) {
        parts.push(item);
        if item.starts_with('*') {
            break;
        }
    }
    parts
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `method` and `pattern`.
    ///
    /// The handler is keyed by the pattern exactly as written, so `/p//doc`
    /// and `/p/doc` keep separate entries even though they share a trie node.
    pub fn add_route(&mut self, method: Method, pattern: &str, handler: HandlerFunc) {
        let parts = parse_pattern(pattern);

        self.roots
            .entry(method)
            .or_default()
            .insert(pattern, &parts, 0);
        self.handlers.insert((method, pattern.to_string()), handler);
    }

    /// Resolves `path` to a registered node and its bound parameters.
    pub fn get_route(&self, method: Method, path: &str) -> Option<(&Node, HashMap<String, String>)> {
        let search_parts = parse_pattern(path);
        let root = self.roots.get(&method)?;
        let node = root.search(&search_parts, 0)?;

        let mut params = HashMap::new();
        for (index, part) in parse_pattern(node.pattern()).into_iter().enumerate() {
            if let Some(name) = part.strip_prefix(':') {
                if let Some(value) = search_parts.get(index) {
                    params.insert(name.to_string(), value.to_string());
                }
            }
            if let Some(name) = part.strip_prefix('*') {
                if !name.is_empty() {
                    let rest = search_parts.get(index..).unwrap_or_default();
                    params.insert(name.to_string(), rest.join("/"));
                }
                break;
            }
        }

        Some((node, params))
    }

    /// The handler a request for `method` + `path` would run, with its params.
    pub fn resolve(&self, method: Method, path: &str) -> Option<(HandlerFunc, HashMap<String, String>)> {
        let (node, params) = self.get_route(method, path)?;
        let handler = self.handlers.get(&(method, node.pattern().to_string()))?;
        Some((HandlerFunc::clone(handler), params))
    }

    /// Resolves the context's request and runs its chain.
    pub fn handle(&self, c: &mut Context<'_>) {
        let resolved = self.resolve(c.method, &c.path);
        Self::dispatch(c, resolved);
    }

    /// Appends the resolved route handler to the context and runs the chain.
    ///
    /// Unmatched requests get a plain 404 and the chain never starts.
    pub fn dispatch(c: &mut Context<'_>, resolved: Option<(HandlerFunc, HashMap<String, String>)>) {
        match resolved {
            Some((handler, params)) => {
                c.set_params(params);
                c.push_handler(handler);
                c.next();
            }
            None => {
                let body = format!("404 NOT FOUND: {}\n", c.path);
                c.string(StatusCode::NotFound, body);
            }
        }
    }

    /// Number of handler entries, one per distinct (method, pattern).
    pub fn route_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn root(&self, method: Method) -> Option<&Node> {
        self.roots.get(&method)
    }
}
