//! Route groups and the registry every group shares.
//!
//! Groups form a tree through their parent link, but request-time middleware
//! selection never walks it: it scans the flat [`GroupRegistry`] and picks every
//! group whose prefix is a textual prefix of the request path.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::context::{Context, HandlerFunc};
use crate::http::request::Method;
use crate::routing::router::Router;
use crate::routing::static_files;

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

struct GroupData {
    prefix: String,
    middlewares: RwLock<Vec<HandlerFunc>>,
    parent: Option<Arc<GroupData>>,
}

/// Every group created from one engine, in creation order.
#[derive(Default)]
pub struct GroupRegistry {
    groups: RwLock<Vec<Arc<GroupData>>>,
}

impl GroupRegistry {
    fn register(&self, group: Arc<GroupData>) {
        write(&self.groups).push(group);
    }

    /// Middleware of every group whose prefix starts `path`.
    ///
    /// Matching is plain string prefixing, so `/a` also applies to `/ab/x`.
    pub fn middlewares_for(&self, path: &str) -> Vec<HandlerFunc> {
        let mut middlewares = Vec::new();
        for group in read(&self.groups).iter() {
            if path.starts_with(&group.prefix) {
                middlewares.extend(read(&group.middlewares).iter().cloned());
            }
        }
        middlewares
    }

    pub fn prefixes(&self) -> Vec<String> {
        read(&self.groups).iter().map(|g| g.prefix.clone()).collect()
    }

    pub fn len(&self) -> usize {
        read(&self.groups).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A handle to a route group. Cloning the handle does not create a new group.
#[derive(Clone)]
pub struct RouterGroup {
    data: Arc<GroupData>,
    router: Arc<RwLock<Router>>,
    registry: Arc<GroupRegistry>,
}

impl RouterGroup {
    /// Creates the root group (empty prefix) and registers it.
    pub(crate) fn root(router: Arc<RwLock<Router>>, registry: Arc<GroupRegistry>) -> Self {
        let data = Arc::new(GroupData {
            prefix: String::new(),
            middlewares: RwLock::new(Vec::new()),
            parent: None,
        });
        registry.register(Arc::clone(&data));
        Self { data, router, registry }
    }

    pub fn prefix(&self) -> &str {
        &self.data.prefix
    }

    pub fn parent_prefix(&self) -> Option<&str> {
        self.data.parent.as_deref().map(|p| p.prefix.as_str())
    }

    /// Derives a child group whose prefix is this group's prefix plus `prefix`.
    pub fn group(&self, prefix: &str) -> RouterGroup {
        let data = Arc::new(GroupData {
            prefix: format!("{}{}", self.data.prefix, prefix),
            middlewares: RwLock::new(Vec::new()),
            parent: Some(Arc::clone(&self.data)),
        });
        self.registry.register(Arc::clone(&data));

        RouterGroup {
            data,
            router: Arc::clone(&self.router),
            registry: Arc::clone(&self.registry),
        }
    }

    /// Appends middleware to this group, after any already attached.
    pub fn use_middleware<I>(&self, middlewares: I)
    where
        I: IntoIterator<Item = HandlerFunc>,
    {
        write(&self.data.middlewares).extend(middlewares);
    }

    pub fn add_route<F>(&self, method: Method, comp: &str, handler: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_handler(method, comp, Arc::new(handler));
    }

    fn add_handler(&self, method: Method, comp: &str, handler: HandlerFunc) {
        let pattern = format!("{}{}", self.data.prefix, comp);
        tracing::debug!(method = %method, pattern = %pattern, "Route registered");
        write(&self.router).add_route(method, &pattern, handler);
    }

    pub fn get<F>(&self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::GET, pattern, handler);
    }

    pub fn post<F>(&self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::POST, pattern, handler);
    }

    pub fn put<F>(&self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::PUT, pattern, handler);
    }

    pub fn delete<F>(&self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::DELETE, pattern, handler);
    }

    pub fn patch<F>(&self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::PATCH, pattern, handler);
    }

    pub fn head<F>(&self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::HEAD, pattern, handler);
    }

    pub fn options<F>(&self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::OPTIONS, pattern, handler);
    }

    /// Serves files under `root` at `relative_path/*filepath`.
    pub fn static_files(&self, relative_path: &str, root: impl Into<PathBuf>) {
        let pattern = format!("{}/*filepath", relative_path.trim_end_matches('/'));
        self.add_handler(Method::GET, &pattern, static_files::handler(root.into()));
    }
}
