//! # Router Module
//!
//! The router module provides the two-level route table that maps an
//! (HTTP verb, exact path) pair to a registered handler method.
//!
//! ## Overview
//!
//! The table is built incrementally as controller methods are registered and
//! is read-only afterwards. Lookup is exact-match only: no trailing-slash
//! normalization, no case folding, no pattern syntax. The router is a dispatch
//! table, not a path matcher — path parameters (`/users/{id}`) are
//! deliberately out of scope.
//!
//! ## Replacement semantics
//!
//! Registering the same `(verb, path)` pair twice silently replaces the
//! earlier entry (last-registration-wins). The replacement is logged but is an
//! overwrite, not a contract to rely on.

mod core;

pub use core::{RouteEntry, RouteTable};
