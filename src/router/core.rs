//! Router core module - exact-match route table for the dispatch hot path.

use crate::guard::GuardedMethod;
use http::Method;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One registered handler: an (HTTP verb, exact path) pair bound to a method.
///
/// `method_name` is the stable identifier used to look up the route's binding
/// metadata. It is kept separate from the invocable because the invocable may
/// be a guard-wrapped version of the original method, while bindings are
/// always keyed by the original name.
pub struct RouteEntry<C> {
    /// HTTP verb
    pub method: Method,
    /// Exact path string; no pattern syntax, no wildcards
    pub path: String,
    /// Stable identifier for binding-metadata lookup
    pub method_name: Arc<str>,
    /// Content types accepted at registration; stored but never enforced
    pub accepts: Vec<String>,
    /// Content types produced at registration; stored but never enforced
    pub produces: Vec<String>,
    handler: GuardedMethod<C>,
}

impl<C> RouteEntry<C> {
    /// Create an entry for the given verb, path, and guarded method
    #[must_use]
    pub fn new(
        method: Method,
        path: impl Into<String>,
        method_name: impl Into<Arc<str>>,
        handler: GuardedMethod<C>,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            method_name: method_name.into(),
            accepts: Vec::new(),
            produces: Vec::new(),
            handler,
        }
    }

    /// The invocable for this route (possibly guard-wrapped)
    #[must_use]
    pub fn handler(&self) -> &GuardedMethod<C> {
        &self.handler
    }
}

impl<C> Clone for RouteEntry<C> {
    fn clone(&self) -> Self {
        Self {
            method: self.method.clone(),
            path: self.path.clone(),
            method_name: Arc::clone(&self.method_name),
            accepts: self.accepts.clone(),
            produces: self.produces.clone(),
            handler: self.handler.clone(),
        }
    }
}

impl<C> std::fmt::Debug for RouteEntry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEntry")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("method_name", &self.method_name)
            .finish_non_exhaustive()
    }
}

/// Two-level mapping (HTTP verb → path → route entry) for one controller type.
///
/// Built at registration time, read-only at dispatch time, so concurrent
/// lookups against the same table are safe.
pub struct RouteTable<C> {
    routes: HashMap<Method, HashMap<String, RouteEntry<C>>>,
}

impl<C> Default for RouteTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for RouteTable<C> {
    fn clone(&self) -> Self {
        Self {
            routes: self.routes.clone(),
        }
    }
}

impl<C> RouteTable<C> {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Insert or replace the entry for `(entry.method, entry.path)`.
    ///
    /// A later registration for the same pair silently replaces the earlier
    /// one; the old handler becomes unreachable.
    pub fn insert(&mut self, entry: RouteEntry<C>) {
        let by_path = self.routes.entry(entry.method.clone()).or_default();
        if by_path.contains_key(&entry.path) {
            warn!(
                method = %entry.method,
                path = %entry.path,
                method_name = %entry.method_name,
                "Replaced existing route - old handler is unreachable"
            );
        } else {
            info!(
                method = %entry.method,
                path = %entry.path,
                method_name = %entry.method_name,
                "Route registered"
            );
        }
        by_path.insert(entry.path.clone(), entry);
    }

    /// Exact-match lookup; `None` is the 404 signal.
    #[must_use]
    pub fn lookup(&self, method: &Method, path: &str) -> Option<&RouteEntry<C>> {
        debug!(method = %method, path = %path, "Route lookup");
        let entry = self.routes.get(method).and_then(|by_path| by_path.get(path));
        if entry.is_none() {
            warn!(method = %method, path = %path, "No route matched");
        }
        entry
    }

    /// Number of registered routes across all verbs
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    /// Whether no routes are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterate over every registered entry
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry<C>> {
        self.routes.values().flat_map(HashMap::values)
    }

    /// Log every registered route; useful when verifying registration
    pub fn dump_routes(&self) {
        for entry in self.iter() {
            info!(
                method = %entry.method,
                path = %entry.path,
                method_name = %entry.method_name,
                "route"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::ArgValue;
    use serde_json::Value;

    fn noop() -> GuardedMethod<()> {
        GuardedMethod::new(|_: &mut (), _: &[ArgValue]| Ok(Value::Null))
    }

    #[test]
    fn test_exact_match_only() {
        let mut table = RouteTable::new();
        table.insert(RouteEntry::new(Method::GET, "/pets", "list_pets", noop()));
        assert!(table.lookup(&Method::GET, "/pets").is_some());
        assert!(table.lookup(&Method::GET, "/pets/").is_none());
        assert!(table.lookup(&Method::GET, "/Pets").is_none());
    }

    #[test]
    fn test_cross_verb_independence() {
        let mut table = RouteTable::new();
        table.insert(RouteEntry::new(Method::GET, "/pets", "list_pets", noop()));
        table.insert(RouteEntry::new(Method::POST, "/pets", "add_pet", noop()));
        assert_eq!(
            table.lookup(&Method::GET, "/pets").map(|e| &*e.method_name),
            Some("list_pets")
        );
        assert_eq!(
            table.lookup(&Method::POST, "/pets").map(|e| &*e.method_name),
            Some("add_pet")
        );
    }
}
