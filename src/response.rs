//! Outcome-to-response translation for platform adapters.
//!
//! The dispatcher's boundary contract is `Result<Value, DispatchError>`. An
//! adapter that talks to a concrete platform (e.g. an API-Gateway event loop)
//! usually wants an HTTP-shaped response instead; [`HandlerResponse`] encodes
//! the standard translation once:
//!
//! - success → 200 with the value as the JSON body
//! - guard-mapped exception → its carried status code and message
//! - route miss → 404, malformed body → 400, unguarded handler error → 500
//!
//! Adapters that prefer to propagate uncaught failures to the platform runtime
//! (and let it do its own error reporting) use
//! [`HandlerResponse::try_from_outcome`], which maps only the handled cases.

use crate::dispatcher::DispatchError;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// An HTTP-shaped response: status code, headers, and JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerResponse {
    /// HTTP status code (200, 404, 500, ...)
    pub status: u16,
    /// Response headers
    #[serde(skip_serializing)]
    pub headers: HashMap<String, String>,
    /// Response body as JSON
    pub body: Value,
}

impl HandlerResponse {
    /// Create a response with the given status, headers, and body
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a JSON response with a `content-type` header
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create an error response with an `{"error": message}` body
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    /// Translate a dispatch outcome, mapping every failure to a status code.
    #[must_use]
    pub fn from_outcome(outcome: Result<Value, DispatchError>) -> Self {
        match Self::try_from_outcome(outcome) {
            Ok(resp) => resp,
            Err(DispatchError::RouteNotFound { method, path }) => {
                Self::error(404, &format!("no route registered for {method} {path}"))
            }
            Err(DispatchError::MalformedBody(e)) => {
                Self::error(400, &format!("request body is not valid JSON: {e}"))
            }
            Err(err) => Self::error(500, &err.to_string()),
        }
    }

    /// Translate a dispatch outcome, bubbling uncaught failures.
    ///
    /// Success and guard-mapped exceptions become responses; route misses,
    /// malformed bodies, and unguarded handler errors are returned to the
    /// caller for the platform runtime to report.
    ///
    /// # Errors
    ///
    /// Returns the original [`DispatchError`] for every outcome that is not a
    /// success or a guard-mapped exception.
    pub fn try_from_outcome(
        outcome: Result<Value, DispatchError>,
    ) -> Result<Self, DispatchError> {
        match outcome {
            Ok(value) => Ok(Self::json(200, value)),
            Err(DispatchError::Handled(he)) => Ok(Self::error(he.status(), he.message())),
            Err(err) => Err(err),
        }
    }
}
