//! Top-level entry point tying the router, groups and transport together.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use crate::context::{Context, HandlerFunc};
use crate::http::request::{Method, Request};
use crate::http::response::ResponseSink;
use crate::middleware::{logger, recovery};
use crate::routing::{GroupRegistry, Router, RouterGroup};

/// The application: a root route group plus the router and registry it shares
/// with every group derived from it.
pub struct Engine {
    root: RouterGroup,
    router: Arc<RwLock<Router>>,
    registry: Arc<GroupRegistry>,
}

impl Engine {
    pub fn new() -> Self {
        let router = Arc::new(RwLock::new(Router::new()));
        let registry = Arc::new(GroupRegistry::default());
        let root = RouterGroup::root(Arc::clone(&router), Arc::clone(&registry));
        Self { root, router, registry }
    }

    /// An engine with [`logger`] and [`recovery`] installed on the root group.
    pub fn with_default_middleware() -> Self {
        let engine = Self::new();
        engine.use_middleware([logger(), recovery()]);
        engine
    }

    pub fn root_group(&self) -> &RouterGroup {
        &self.root
    }

    pub fn registry(&self) -> &GroupRegistry {
        &self.registry
    }

    pub fn group(&self, prefix: &str) -> RouterGroup {
        self.root.group(prefix)
    }

    pub fn use_middleware<I>(&self, middlewares: I)
    where
        I: IntoIterator<Item = HandlerFunc>,
    {
        self.root.use_middleware(middlewares);
    }

    pub fn add_route<F>(&self, method: Method, pattern: &str, handler: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.root.add_route(method, pattern, handler);
    }

    pub fn get<F>(&self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.root.get(pattern, handler);
    }

    pub fn post<F>(&self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.root.post(pattern, handler);
    }

    pub fn put<F>(&self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.root.put(pattern, handler);
    }

    pub fn delete<F>(&self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.root.delete(pattern, handler);
    }

    pub fn static_files(&self, relative_path: &str, root: impl Into<PathBuf>) {
        self.root.static_files(relative_path, root);
    }

    /// Runs `f` with read access to the router.
    pub fn with_router<R>(&self, f: impl FnOnce(&Router) -> R) -> R {
        let router = self.router.read().unwrap_or_else(PoisonError::into_inner);
        f(&router)
    }

    /// Dispatches one request, writing the outcome to `writer`.
    pub fn serve(&self, request: &Request, writer: &mut dyn ResponseSink) {
        let middlewares = self.registry.middlewares_for(&request.path);
        let mut c = Context::new(request, writer);
        c.set_handlers(middlewares);

        // The lock is released before any handler runs.
        let resolved = self.with_router(|router| router.resolve(request.method, &request.path));
        Router::dispatch(&mut c, resolved);
    }

    /// Binds `addr` and serves until the listener fails.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        crate::server::listener::run(Arc::new(self), addr).await
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
