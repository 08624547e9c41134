//! Dispatcher core module - hot path for request dispatch and argument binding.

use crate::binding::{coerce, ArgValue, ArgVec, BindingSpec};
use crate::guard::{HandledException, HandlerError, Invocation};
use crate::registry::ControllerSpec;
use http::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, error, info};

/// Canonical, platform-neutral request shape the dispatcher consumes.
///
/// Produced by an external adapter from whatever the platform delivers (e.g.
/// an API-Gateway event). The body is raw serialized JSON text, not yet
/// parsed; headers and query parameters may be wholly absent.
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// HTTP verb
    pub method: Method,
    /// Request path, matched exactly against registered routes
    pub path: String,
    /// Raw JSON body text, if the request carried one
    pub body: Option<String>,
    /// Header map, if the request carried any
    pub headers: Option<HashMap<String, String>>,
    /// Query-parameter map, if the request carried any
    pub query_params: Option<HashMap<String, String>>,
}

impl Request {
    /// Create a request with no body, headers, or query parameters
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: None,
            query_params: None,
        }
    }

    /// Attach a raw JSON body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach a header map
    #[must_use]
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Attach a query-parameter map
    #[must_use]
    pub fn with_query_params(mut self, query_params: HashMap<String, String>) -> Self {
        self.query_params = Some(query_params);
        self
    }
}

/// How a dispatch fails.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// No handler registered for the `(verb, path)` pair; the 404 signal.
    /// Carries the attempted method and path for diagnostics.
    #[error("no route registered for {method} {path}")]
    RouteNotFound {
        /// Attempted HTTP verb
        method: Method,
        /// Attempted path
        path: String,
    },
    /// Body was present but not valid JSON while a body binding exists
    #[error("request body is not valid JSON: {0}")]
    MalformedBody(#[source] serde_json::Error),
    /// A guard intentionally converted the handler's error into a typed response
    #[error(transparent)]
    Handled(HandledException),
    /// The handler failed and no guard recognized the error kind
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// Stateless dispatch engine.
///
/// Holds no data of its own: the route table and binding store live on the
/// [`ControllerSpec`], and the controller instance is a pure parameter of each
/// call, so one spec can service many concurrently-dispatched instances.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher;

impl Dispatcher {
    /// Create a dispatcher
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Dispatch one request against a controller instance.
    ///
    /// # Errors
    ///
    /// * [`DispatchError::RouteNotFound`] when no route matches exactly
    /// * [`DispatchError::MalformedBody`] when a body binding exists and the
    ///   body is present but not valid JSON
    /// * [`DispatchError::Handled`] when a guard mapped the handler's error
    /// * [`DispatchError::Handler`] when the handler failed unguarded
    pub fn dispatch<C>(
        &self,
        spec: &ControllerSpec<C>,
        request: &Request,
        controller: &mut C,
    ) -> Result<Value, DispatchError> {
        let entry = spec
            .routes()
            .lookup(&request.method, &request.path)
            .ok_or_else(|| DispatchError::RouteNotFound {
                method: request.method.clone(),
                path: request.path.clone(),
            })?;

        let binding_spec = spec.bindings().lookup(&entry.method_name);
        let args = build_args(binding_spec, request)?;

        debug!(
            method_name = %entry.method_name,
            arg_count = args.len(),
            "Invoking handler"
        );
        let start = Instant::now();
        let outcome = entry.handler().invoke(controller, &args);
        let latency_us = start.elapsed().as_micros() as u64;

        match outcome {
            Ok(Invocation::Completed(value)) => {
                info!(
                    method = %request.method,
                    path = %request.path,
                    method_name = %entry.method_name,
                    latency_us,
                    "Handler completed"
                );
                Ok(value)
            }
            Ok(Invocation::Handled(he)) => {
                // Re-raise so the adapter observes a uniform throw-based
                // error channel for both mapped and unmapped failures.
                info!(
                    method = %request.method,
                    path = %request.path,
                    method_name = %entry.method_name,
                    status = he.status(),
                    latency_us,
                    "Handler error mapped by guard"
                );
                Err(DispatchError::Handled(he))
            }
            Err(err) => {
                error!(
                    method = %request.method,
                    path = %request.path,
                    method_name = %entry.method_name,
                    kind = %err.kind(),
                    latency_us,
                    "Handler failed with unguarded error"
                );
                Err(DispatchError::Handler(err))
            }
        }
    }
}

/// Assemble the positional argument vector for one dispatch.
///
/// Every slot starts as the unbound sentinel; bound slots are filled from the
/// request. Absence of a source map (or of a named key within it) is never an
/// error - the slot simply stays unbound.
fn build_args(spec: &BindingSpec, request: &Request) -> Result<ArgVec, DispatchError> {
    let mut args = ArgVec::new();
    args.resize(spec.arg_len(), ArgValue::Unbound);

    if let Some(index) = spec.body_slot() {
        if let Some(body) = request.body.as_deref() {
            let parsed: Value =
                serde_json::from_str(body).map_err(DispatchError::MalformedBody)?;
            args[index] = ArgValue::Json(parsed);
        }
    }

    if let Some(index) = spec.all_headers_slot() {
        if let Some(headers) = &request.headers {
            args[index] = ArgValue::Map(headers.clone());
        }
    }

    if let Some(index) = spec.all_query_params_slot() {
        if let Some(query_params) = &request.query_params {
            args[index] = ArgValue::Map(query_params.clone());
        }
    }

    fill_named_slots(
        spec.header_slots(),
        request.headers.as_ref(),
        &mut args,
    );
    fill_named_slots(
        spec.query_param_slots(),
        request.query_params.as_ref(),
        &mut args,
    );

    Ok(args)
}

/// Fill slots bound to individual keys of a raw request map.
///
/// A missing map (or a missing key) leaves the slot unbound; a present value
/// is coerced per the slot's target type.
fn fill_named_slots<'a>(
    slots: impl Iterator<Item = (&'a str, &'a crate::binding::NamedSlot)>,
    data: Option<&HashMap<String, String>>,
    args: &mut ArgVec,
) {
    let Some(data) = data else {
        return;
    };
    for (name, slot) in slots {
        if let Some(raw) = data.get(name) {
            args[slot.index] = coerce(raw, slot.target);
        }
    }
}
