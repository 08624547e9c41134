//! # Dispatcher Module
//!
//! The dispatcher module is the heart of lambrouter: given a canonical
//! [`Request`] and a controller instance, it resolves the route, reassembles
//! the method's positional argument list from the request's body, headers,
//! and query parameters, invokes the method, and normalizes the outcome.
//!
//! ## Request Flow
//!
//! 1. Route lookup by `(verb, exact path)` → [`DispatchError::RouteNotFound`]
//!    on a miss (the 404-equivalent signal; never silently dropped).
//! 2. Binding-spec lookup by the route's stable method name.
//! 3. Argument assembly: a vector of `max bound index + 1` slots, each
//!    defaulting to the unbound sentinel; the body slot is JSON-parsed
//!    (failure → [`DispatchError::MalformedBody`]), whole-map slots receive
//!    the raw header/query maps, named slots receive coerced values.
//! 4. Invocation through the route's guard chain.
//! 5. Outcome normalization: a guard-handled error is re-raised as
//!    [`DispatchError::Handled`] so callers observe a uniform error channel;
//!    an unrecognized handler error surfaces as [`DispatchError::Handler`].
//!
//! ## Concurrency
//!
//! The dispatcher is stateless and reentrant. The controller spec is read-only
//! after registration, so concurrent dispatches against the same controller
//! type are safe; mutating shared state inside one controller *instance* is
//! the caller's responsibility.
//!
//! ## Error asymmetry
//!
//! Only body JSON-parse failure is a hard dispatch error. Named-value coercion
//! failures are not: a non-numeric string bound to a `Number` slot passes
//! through as `NaN`. This permissive/strict split is intentional and load
//! bearing for callers.

mod core;

pub use core::{DispatchError, Dispatcher, Request};
