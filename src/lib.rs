//! # lambrouter
//!
//! **lambrouter** is a declarative request router for serverless HTTP-style
//! handlers: controller methods are registered against an (HTTP verb, exact
//! path) pair, and incoming requests are dispatched to the matching method
//! with arguments automatically extracted and type-coerced from the request's
//! body, headers, and query parameters.
//!
//! ## Overview
//!
//! The crate is the route-registry + dispatch/parameter-binding engine and the
//! exception-to-status mapping layer of a serverless controller framework.
//! The platform adapter - the shim that turns a cloud event (e.g. an
//! API-Gateway payload) into the canonical [`Request`](dispatcher::Request)
//! and the dispatch outcome back into a platform response - is an external
//! collaborator; [`response::HandlerResponse`] encodes the standard outcome
//! translation for adapters that want it.
//!
//! ## Architecture
//!
//! - **[`binding`]** - per-method record of which positional argument slots
//!   receive which piece of request data, and the type coercion rules
//! - **[`router`]** - two-level route table (verb → exact path → entry),
//!   built once per controller type
//! - **[`dispatcher`]** - stateless dispatch engine: route lookup, argument
//!   assembly, invocation, outcome normalization
//! - **[`guard`]** - ordered exception-guard chains that convert recognized
//!   handler errors into typed status-carrying responses
//! - **[`registry`]** - the [`ControllerSpec`] fluent builder: routes,
//!   bindings, and guards declared statically up front, with no runtime
//!   reflection
//! - **[`response`]** - outcome-to-HTTP-response translation for adapters
//!
//! ## Request Flow
//!
//! 1. Adapter produces a canonical [`Request`](dispatcher::Request)
//! 2. Dispatcher looks up the route by `(verb, exact path)` → 404-equivalent
//!    [`DispatchError::RouteNotFound`](dispatcher::DispatchError) on a miss
//! 3. The method's binding spec drives argument assembly: body slots are
//!    JSON-parsed, map slots receive the raw header/query maps, named slots
//!    receive coerced values, everything else stays the unbound sentinel
//! 4. The method is invoked through its guard chain
//! 5. The outcome - success value, guard-mapped exception, or uncaught
//!    failure - is returned as a uniform `Result`
//!
//! ## Example
//!
//! ```rust
//! use lambrouter::{ArgValue, ControllerSpec, Request, TargetType};
//! use http::Method;
//! use serde_json::{json, Value};
//!
//! #[derive(Default)]
//! struct Greeter {
//!     greeted: Option<String>,
//! }
//!
//! fn greet(ctrl: &mut Greeter, args: &[ArgValue]) -> Result<Value, lambrouter::HandlerError> {
//!     let name = args[0].as_text().unwrap_or("world").to_string();
//!     ctrl.greeted = Some(name.clone());
//!     Ok(json!({ "hello": name }))
//! }
//!
//! let spec = ControllerSpec::<Greeter>::builder()
//!     .get("/greet", "greet", greet)
//!     .bind_query_param("greet", 0, "name", TargetType::Text)
//!     .build();
//!
//! let mut controller = Greeter::default();
//! let request = Request::new(Method::GET, "/greet")
//!     .with_query_params([("name".to_string(), "ferris".to_string())].into());
//! let outcome = spec.dispatch(&request, &mut controller);
//! assert_eq!(outcome.unwrap(), json!({ "hello": "ferris" }));
//! ```
//!
//! ## Concurrency
//!
//! A [`ControllerSpec`] is read-only after `build()`, so concurrent dispatches
//! against the same controller type are safe; the dispatcher holds no state of
//! its own and takes the controller instance as a pure parameter. Sharing one
//! *instance* across concurrent dispatches is the caller's responsibility.
//!
//! ## Known gaps (deliberate)
//!
//! - Path parameters (`/users/{id}`) are not supported; lookup is exact-match.
//! - `accepts`/`produces` registration metadata is stored but never enforced.

pub mod binding;
pub mod dispatcher;
pub mod guard;
pub mod registry;
pub mod response;
pub mod router;

pub use binding::{coerce, ArgValue, BindingKind, BindingSpec, ParameterBinding, TargetType};
pub use dispatcher::{DispatchError, Dispatcher, Request};
pub use guard::{ExceptionGuard, HandledException, HandlerError, Invocation};
pub use registry::{ControllerSpec, ControllerSpecBuilder};
pub use response::HandlerResponse;
pub use router::{RouteEntry, RouteTable};
