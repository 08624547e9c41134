//! Binding core module - argument slot model, coercion, and the binding store.

use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Maximum inline argument slots before heap allocation.
/// Most controller methods have well under 8 bound parameters.
pub const MAX_INLINE_ARGS: usize = 8;

/// Stack-allocated argument vector for the dispatch hot path.
///
/// Uses `SmallVec` to avoid heap allocation for methods with ≤8 argument
/// slots, the same way the router's parameter vectors do.
pub type ArgVec = SmallVec<[ArgValue; MAX_INLINE_ARGS]>;

/// The declared primitive type of an argument slot.
///
/// Used only when coercing named-header and named-query-parameter values;
/// whole-map and body slots ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
    /// Pass the raw string through unchanged
    Text,
    /// Parse as `f64`; an unparseable value yields `NaN`, not an error
    Number,
    /// `"true"` (case-sensitive literal) is `true`, anything else is `false`
    Boolean,
    /// Any other declared type; passed through as the raw string
    Other,
}

/// Which piece of request data a slot receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingKind {
    /// The request body, parsed as JSON
    Body,
    /// The whole header map
    AllHeaders,
    /// The whole query-parameter map
    AllQueryParams,
    /// A single named header
    Header(String),
    /// A single named query parameter
    QueryParam(String),
}

/// One binding rule for one argument slot of one handler method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterBinding {
    /// Target position in the method's argument list
    pub index: usize,
    /// Which request data populates the slot
    pub kind: BindingKind,
    /// Declared primitive type, used for named-value coercion
    pub target: TargetType,
}

impl ParameterBinding {
    /// Bind the parsed JSON body to `index`
    #[must_use]
    pub fn body(index: usize) -> Self {
        Self {
            index,
            kind: BindingKind::Body,
            target: TargetType::Other,
        }
    }

    /// Bind the whole header map to `index`
    #[must_use]
    pub fn all_headers(index: usize) -> Self {
        Self {
            index,
            kind: BindingKind::AllHeaders,
            target: TargetType::Other,
        }
    }

    /// Bind the whole query-parameter map to `index`
    #[must_use]
    pub fn all_query_params(index: usize) -> Self {
        Self {
            index,
            kind: BindingKind::AllQueryParams,
            target: TargetType::Other,
        }
    }

    /// Bind the header `name` to `index`, coerced to `target`
    #[must_use]
    pub fn header(index: usize, name: impl Into<String>, target: TargetType) -> Self {
        Self {
            index,
            kind: BindingKind::Header(name.into()),
            target,
        }
    }

    /// Bind the query parameter `name` to `index`, coerced to `target`
    #[must_use]
    pub fn query_param(index: usize, name: impl Into<String>, target: TargetType) -> Self {
        Self {
            index,
            kind: BindingKind::QueryParam(name.into()),
            target,
        }
    }
}

/// One handler argument slot, as assembled by the dispatcher.
///
/// `Unbound` is the sentinel for "slot intentionally left unbound": it marks
/// both slots nothing was registered for and bindings whose source data was
/// absent from the request. It is distinct from every data-carrying variant,
/// including `Json(Value::Null)`.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Slot has no bound value
    Unbound,
    /// Parsed JSON request body
    Json(Value),
    /// Raw string value (Text/Other targets)
    Text(String),
    /// Numeric value; `NaN` carries an unparseable-but-present input
    Number(f64),
    /// Boolean value from the `"true"` literal comparison
    Bool(bool),
    /// Whole header or query-parameter map
    Map(HashMap<String, String>),
}

impl ArgValue {
    /// Whether this slot carries no value
    #[inline]
    #[must_use]
    pub fn is_unbound(&self) -> bool {
        matches!(self, ArgValue::Unbound)
    }

    /// The parsed body, if this slot carries one
    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ArgValue::Json(v) => Some(v),
            _ => None,
        }
    }

    /// The raw string, if this slot carries one
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArgValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The numeric value, if this slot carries one (may be `NaN`)
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ArgValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean value, if this slot carries one
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The whole header/query map, if this slot carries one
    #[must_use]
    pub fn as_map(&self) -> Option<&HashMap<String, String>> {
        match self {
            ArgValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

/// Coerce a raw request string into an argument value per the slot's target type.
///
/// Coercion never fails: `Boolean` compares against the `"true"` literal
/// (case-sensitive, not general truthiness), `Number` parses as `f64` and
/// passes `NaN` through on failure, and `Text`/`Other` keep the raw string.
#[must_use]
pub fn coerce(raw: &str, target: TargetType) -> ArgValue {
    match target {
        TargetType::Boolean => ArgValue::Bool(raw == "true"),
        TargetType::Number => ArgValue::Number(raw.parse::<f64>().unwrap_or(f64::NAN)),
        TargetType::Text | TargetType::Other => ArgValue::Text(raw.to_string()),
    }
}

/// A named-value slot: the target index plus the coercion target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedSlot {
    /// Target position in the argument list
    pub index: usize,
    /// Coercion applied to the raw string
    pub target: TargetType,
}

/// The accumulated set of bindings for one handler method.
///
/// At most one slot each for body, all-headers, and all-query-params (a later
/// registration for the same kind overwrites the earlier one). Named header
/// and query-parameter bindings are keyed by name, with the same last-write
/// semantics per key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingSpec {
    body: Option<usize>,
    all_headers: Option<usize>,
    all_query_params: Option<usize>,
    headers: HashMap<String, NamedSlot>,
    query_params: HashMap<String, NamedSlot>,
    max_index: Option<usize>,
}

impl BindingSpec {
    /// Merge one binding into the set.
    ///
    /// Registration order does not matter except that a later write for the
    /// same kind (or the same named key) replaces the earlier one.
    pub fn add(&mut self, binding: ParameterBinding) {
        let ParameterBinding {
            index,
            kind,
            target,
        } = binding;
        self.max_index = Some(self.max_index.map_or(index, |m| m.max(index)));
        match kind {
            BindingKind::Body => self.body = Some(index),
            BindingKind::AllHeaders => self.all_headers = Some(index),
            BindingKind::AllQueryParams => self.all_query_params = Some(index),
            BindingKind::Header(name) => {
                self.headers.insert(name, NamedSlot { index, target });
            }
            BindingKind::QueryParam(name) => {
                self.query_params.insert(name, NamedSlot { index, target });
            }
        }
    }

    /// Number of argument slots the method receives (max bound index + 1)
    #[must_use]
    pub fn arg_len(&self) -> usize {
        self.max_index.map_or(0, |m| m + 1)
    }

    /// Whether no bindings were registered (zero-parameter methods are legal)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.max_index.is_none()
    }

    /// Slot receiving the parsed JSON body, if any
    #[must_use]
    pub fn body_slot(&self) -> Option<usize> {
        self.body
    }

    /// Slot receiving the whole header map, if any
    #[must_use]
    pub fn all_headers_slot(&self) -> Option<usize> {
        self.all_headers
    }

    /// Slot receiving the whole query-parameter map, if any
    #[must_use]
    pub fn all_query_params_slot(&self) -> Option<usize> {
        self.all_query_params
    }

    /// Named header bindings, keyed by header name
    pub fn header_slots(&self) -> impl Iterator<Item = (&str, &NamedSlot)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Named query-parameter bindings, keyed by parameter name
    pub fn query_param_slots(&self) -> impl Iterator<Item = (&str, &NamedSlot)> {
        self.query_params.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Per-controller-type store of binding specs, keyed by method name.
///
/// Populated once at registration time and read-only afterwards, so concurrent
/// dispatches can share it freely.
#[derive(Debug, Clone, Default)]
pub struct BindingStore {
    specs: HashMap<Arc<str>, BindingSpec>,
    empty: BindingSpec,
}

impl BindingStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one binding to `method_name`'s spec, merging into any existing set
    pub fn register(&mut self, method_name: &str, binding: ParameterBinding) {
        debug!(
            method_name = %method_name,
            index = binding.index,
            kind = ?binding.kind,
            "Parameter binding registered"
        );
        self.specs
            .entry(Arc::from(method_name))
            .or_default()
            .add(binding);
    }

    /// The accumulated spec for `method_name`, or an empty spec if none was registered
    #[must_use]
    pub fn lookup(&self, method_name: &str) -> &BindingSpec {
        self.specs.get(method_name).unwrap_or(&self.empty)
    }
}
