//! Controller registration: the statically-declared replacement for
//! reflection-driven metadata scanning.
//!
//! A [`ControllerSpec`] lists a controller type's routes, parameter bindings,
//! exception guards, and content-type metadata up front via a fluent builder.
//! It is built once per controller *type* (not per instance), is immutable
//! afterwards, and services any number of instances concurrently.
//!
//! ```rust,ignore
//! let spec = ControllerSpec::<TestController>::builder()
//!     .post("/test/post", "post_mapping", TestController::post_mapping)
//!     .bind_body("post_mapping", 1)
//!     .bind_query_param("post_mapping", 4, "p1", TargetType::Text)
//!     .guard("post_mapping", ["Error1"], 500)
//!     .build();
//!
//! let outcome = spec.dispatch(&request, &mut controller);
//! ```

use crate::binding::{ArgValue, BindingStore, ParameterBinding, TargetType};
use crate::dispatcher::{DispatchError, Dispatcher, Request};
use crate::guard::{ExceptionGuard, GuardedMethod, HandlerError};
use crate::router::{RouteEntry, RouteTable};
use http::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// The complete registration record for one controller type: route table plus
/// binding store. Read-only after [`build`](ControllerSpecBuilder::build).
pub struct ControllerSpec<C> {
    routes: RouteTable<C>,
    bindings: BindingStore,
}

impl<C> Clone for ControllerSpec<C> {
    fn clone(&self) -> Self {
        Self {
            routes: self.routes.clone(),
            bindings: self.bindings.clone(),
        }
    }
}

impl<C> ControllerSpec<C> {
    /// Start declaring routes and bindings for controller type `C`
    #[must_use]
    pub fn builder() -> ControllerSpecBuilder<C> {
        ControllerSpecBuilder::new()
    }

    /// The route table for this controller type
    #[must_use]
    pub fn routes(&self) -> &RouteTable<C> {
        &self.routes
    }

    /// The binding store for this controller type
    #[must_use]
    pub fn bindings(&self) -> &BindingStore {
        &self.bindings
    }

    /// Dispatch one request against a controller instance.
    ///
    /// Convenience for [`Dispatcher::dispatch`] with this spec.
    ///
    /// # Errors
    ///
    /// See [`DispatchError`].
    pub fn dispatch(&self, request: &Request, controller: &mut C) -> Result<Value, DispatchError> {
        Dispatcher::new().dispatch(self, request, controller)
    }
}

struct RouteReg<C> {
    method: Method,
    path: String,
    method_name: Arc<str>,
    handler: GuardedMethod<C>,
    accepts: Vec<String>,
    produces: Vec<String>,
}

/// Fluent builder for a [`ControllerSpec`].
///
/// Registration is infallible; conflicting registrations follow last-wins,
/// matching the route table's replacement semantics. Guards may be declared
/// before or after their route - they are attached by method name at build
/// time, in declaration order.
pub struct ControllerSpecBuilder<C> {
    routes: Vec<RouteReg<C>>,
    guards: Vec<(Arc<str>, ExceptionGuard)>,
    bindings: BindingStore,
}

impl<C> Default for ControllerSpecBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ControllerSpecBuilder<C> {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            guards: Vec::new(),
            bindings: BindingStore::new(),
        }
    }

    /// Register a handler method against an (HTTP verb, exact path) pair.
    ///
    /// `method_name` is the stable identifier bindings and guards refer to.
    #[must_use]
    pub fn route<F>(
        mut self,
        method: Method,
        path: impl Into<String>,
        method_name: impl Into<Arc<str>>,
        handler: F,
    ) -> Self
    where
        F: Fn(&mut C, &[ArgValue]) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.routes.push(RouteReg {
            method,
            path: path.into(),
            method_name: method_name.into(),
            handler: GuardedMethod::new(handler),
            accepts: Vec::new(),
            produces: Vec::new(),
        });
        self
    }

    /// Register a GET route
    #[must_use]
    pub fn get<F>(self, path: impl Into<String>, method_name: impl Into<Arc<str>>, handler: F) -> Self
    where
        F: Fn(&mut C, &[ArgValue]) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.route(Method::GET, path, method_name, handler)
    }

    /// Register a POST route
    #[must_use]
    pub fn post<F>(self, path: impl Into<String>, method_name: impl Into<Arc<str>>, handler: F) -> Self
    where
        F: Fn(&mut C, &[ArgValue]) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.route(Method::POST, path, method_name, handler)
    }

    /// Register a PUT route
    #[must_use]
    pub fn put<F>(self, path: impl Into<String>, method_name: impl Into<Arc<str>>, handler: F) -> Self
    where
        F: Fn(&mut C, &[ArgValue]) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.route(Method::PUT, path, method_name, handler)
    }

    /// Register a PATCH route
    #[must_use]
    pub fn patch<F>(self, path: impl Into<String>, method_name: impl Into<Arc<str>>, handler: F) -> Self
    where
        F: Fn(&mut C, &[ArgValue]) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.route(Method::PATCH, path, method_name, handler)
    }

    /// Register a DELETE route
    #[must_use]
    pub fn delete<F>(self, path: impl Into<String>, method_name: impl Into<Arc<str>>, handler: F) -> Self
    where
        F: Fn(&mut C, &[ArgValue]) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.route(Method::DELETE, path, method_name, handler)
    }

    /// Append one exception guard to `method_name`'s chain.
    ///
    /// Declaration order is match order: the first declared guard whose kind
    /// set contains a thrown error's kind wins, and later overlapping guards
    /// are unreachable for the shared kinds.
    #[must_use]
    pub fn guard<I, K>(mut self, method_name: impl Into<Arc<str>>, kinds: I, status: u16) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<std::borrow::Cow<'static, str>>,
    {
        self.guards
            .push((method_name.into(), ExceptionGuard::new(kinds, status)));
        self
    }

    /// Append one parameter binding to `method_name`'s spec
    #[must_use]
    pub fn bind(mut self, method_name: &str, binding: ParameterBinding) -> Self {
        self.bindings.register(method_name, binding);
        self
    }

    /// Bind the parsed JSON body to argument slot `index`
    #[must_use]
    pub fn bind_body(self, method_name: &str, index: usize) -> Self {
        self.bind(method_name, ParameterBinding::body(index))
    }

    /// Bind the whole header map to argument slot `index`
    #[must_use]
    pub fn bind_headers(self, method_name: &str, index: usize) -> Self {
        self.bind(method_name, ParameterBinding::all_headers(index))
    }

    /// Bind the whole query-parameter map to argument slot `index`
    #[must_use]
    pub fn bind_query_params(self, method_name: &str, index: usize) -> Self {
        self.bind(method_name, ParameterBinding::all_query_params(index))
    }

    /// Bind the header `name` to argument slot `index`, coerced to `target`
    #[must_use]
    pub fn bind_header(
        self,
        method_name: &str,
        index: usize,
        name: impl Into<String>,
        target: TargetType,
    ) -> Self {
        self.bind(method_name, ParameterBinding::header(index, name, target))
    }

    /// Bind the query parameter `name` to argument slot `index`, coerced to `target`
    #[must_use]
    pub fn bind_query_param(
        self,
        method_name: &str,
        index: usize,
        name: impl Into<String>,
        target: TargetType,
    ) -> Self {
        self.bind(
            method_name,
            ParameterBinding::query_param(index, name, target),
        )
    }

    /// Record the content types `method_name` accepts.
    ///
    /// Stored as registration metadata only; never enforced at dispatch time.
    #[must_use]
    pub fn accepts<I, S>(mut self, method_name: &str, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let types: Vec<String> = types.into_iter().map(Into::into).collect();
        for reg in self
            .routes
            .iter_mut()
            .filter(|r| &*r.method_name == method_name)
        {
            reg.accepts = types.clone();
        }
        self
    }

    /// Record the content types `method_name` produces.
    ///
    /// Stored as registration metadata only; never enforced at dispatch time.
    #[must_use]
    pub fn produces<I, S>(mut self, method_name: &str, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let types: Vec<String> = types.into_iter().map(Into::into).collect();
        for reg in self
            .routes
            .iter_mut()
            .filter(|r| &*r.method_name == method_name)
        {
            reg.produces = types.clone();
        }
        self
    }

    /// Assemble the immutable spec: attach guards to their methods and insert
    /// every route into the table (last registration wins on collisions).
    #[must_use]
    pub fn build(self) -> ControllerSpec<C> {
        let Self {
            routes,
            guards,
            bindings,
        } = self;

        let mut table = RouteTable::new();
        let route_count = routes.len();
        for reg in routes {
            let RouteReg {
                method,
                path,
                method_name,
                mut handler,
                accepts,
                produces,
            } = reg;
            for (_, guard) in guards.iter().filter(|(name, _)| *name == method_name) {
                handler.push_guard(guard.clone());
            }
            let mut entry = RouteEntry::new(method, path, method_name, handler);
            entry.accepts = accepts;
            entry.produces = produces;
            table.insert(entry);
        }

        info!(
            routes_registered = route_count,
            routes_active = table.len(),
            "Controller spec built"
        );

        ControllerSpec {
            routes: table,
            bindings,
        }
    }
}
