//! Guard core module - exception-to-status mapping around handler methods.

use crate::binding::ArgValue;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::debug;

/// An error raised by a controller method body.
///
/// The `kind` is what guards match on; it plays the role the error's class
/// plays in dynamic runtimes. The `message` is carried into the mapped
/// response unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct HandlerError {
    kind: Cow<'static, str>,
    message: String,
}

impl HandlerError {
    /// Create an error of the given kind
    #[must_use]
    pub fn new(kind: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// The error kind guards match on
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The human-readable message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A handler error that a guard intentionally converted into a typed response.
///
/// Not an error from the dispatcher's point of view at the moment of
/// conversion, but re-raised on the error channel so the platform adapter
/// observes a uniform throw-based path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{error} (mapped to status {status})")]
pub struct HandledException {
    status: u16,
    error: HandlerError,
}

impl HandledException {
    /// Create a handled exception carrying the original error
    #[must_use]
    pub fn new(status: u16, error: HandlerError) -> Self {
        Self { status, error }
    }

    /// The status code the matching guard was configured with
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The original error's message
    #[must_use]
    pub fn message(&self) -> &str {
        self.error.message()
    }

    /// The original error
    #[must_use]
    pub fn error(&self) -> &HandlerError {
        &self.error
    }
}

/// Outcome of invoking a guarded method.
///
/// `Handled` is an explicit marker, never a normal return value: the
/// dispatcher uses it to distinguish a mapped exception from genuine success.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    /// The method completed normally with this value
    Completed(Value),
    /// The method failed and a guard converted the error
    Handled(HandledException),
}

/// One (recognized error kinds, status code) mapping rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionGuard {
    kinds: Vec<Cow<'static, str>>,
    status: u16,
}

impl ExceptionGuard {
    /// Create a guard recognizing the given kinds
    #[must_use]
    pub fn new<I, K>(kinds: I, status: u16) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Cow<'static, str>>,
    {
        Self {
            kinds: kinds.into_iter().map(Into::into).collect(),
            status,
        }
    }

    /// Whether this guard recognizes the error kind
    #[must_use]
    pub fn matches(&self, kind: &str) -> bool {
        self.kinds.iter().any(|k| k == kind)
    }

    /// The status code applied when this guard matches
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }
}

/// An invocable handler method: receives the controller instance and the
/// assembled argument slots, returns a JSON value or fails.
pub type HandlerFn<C> =
    Arc<dyn Fn(&mut C, &[ArgValue]) -> Result<Value, HandlerError> + Send + Sync>;

/// A handler method wrapped by an ordered exception-guard chain.
///
/// Composition, not nested wrapping: one wrapper holds the inner invocable and
/// the full guard list, scanned in registration order on failure.
pub struct GuardedMethod<C> {
    inner: HandlerFn<C>,
    guards: Vec<ExceptionGuard>,
}

impl<C> Clone for GuardedMethod<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            guards: self.guards.clone(),
        }
    }
}

impl<C> std::fmt::Debug for GuardedMethod<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardedMethod")
            .field("guards", &self.guards)
            .finish_non_exhaustive()
    }
}

impl<C> GuardedMethod<C> {
    /// Wrap an invocable with an empty guard chain
    pub fn new<F>(inner: F) -> Self
    where
        F: Fn(&mut C, &[ArgValue]) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(inner),
            guards: Vec::new(),
        }
    }

    /// Append one guard to the chain (registration order is match order)
    pub fn push_guard(&mut self, guard: ExceptionGuard) {
        self.guards.push(guard);
    }

    /// The configured guard chain, in match order
    #[must_use]
    pub fn guards(&self) -> &[ExceptionGuard] {
        &self.guards
    }

    /// Invoke the inner method, mapping a recognized failure through the chain.
    ///
    /// # Errors
    ///
    /// Propagates the handler's error unmodified when no guard recognizes its
    /// kind.
    pub fn invoke(&self, controller: &mut C, args: &[ArgValue]) -> Result<Invocation, HandlerError> {
        match (self.inner)(controller, args) {
            Ok(value) => Ok(Invocation::Completed(value)),
            Err(err) => {
                if let Some(guard) = self.guards.iter().find(|g| g.matches(err.kind())) {
                    debug!(
                        kind = %err.kind(),
                        status = guard.status(),
                        "Handler error matched exception guard"
                    );
                    Ok(Invocation::Handled(HandledException::new(
                        guard.status(),
                        err,
                    )))
                } else {
                    Err(err)
                }
            }
        }
    }
}
