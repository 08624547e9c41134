//! # Binding Module
//!
//! The binding module holds the per-method record of which positional argument
//! slots receive which piece of request data, and how string values from the
//! request are coerced into the slot's declared primitive type.
//!
//! ## Overview
//!
//! Controller methods do not read the request directly. Instead, each method
//! declares a set of [`ParameterBinding`]s at registration time:
//!
//! - one slot may receive the parsed JSON request body,
//! - one slot may receive the whole header map,
//! - one slot may receive the whole query-parameter map,
//! - any number of slots may receive a single named header or query parameter,
//!   coerced according to the slot's [`TargetType`].
//!
//! At dispatch time the engine asks the [`BindingStore`] for the method's
//! accumulated [`BindingSpec`] and assembles the argument vector from it. Slots
//! with no binding (and bindings whose source data is absent from the request)
//! resolve to [`ArgValue::Unbound`], a sentinel distinct from every data value.
//!
//! ## Coercion
//!
//! Coercion is permissive by design: a non-numeric string bound to a `Number`
//! slot yields `NaN`, not an error. Only a malformed JSON body is a hard
//! dispatch error; see the dispatcher module.

mod core;

pub use core::{
    coerce, ArgValue, ArgVec, BindingKind, BindingSpec, BindingStore, NamedSlot, ParameterBinding,
    TargetType, MAX_INLINE_ARGS,
};
