//! # Guard Module
//!
//! The guard module converts errors thrown by controller methods into typed
//! HTTP-like responses, without routing them through the normal success
//! channel.
//!
//! ## Overview
//!
//! Each [`ExceptionGuard`] is configured with a set of recognized error kinds
//! and a status code. Guards wrap a handler method via [`GuardedMethod`], a
//! composition wrapper holding the inner invocable and an ordered guard list.
//! When the inner method fails:
//!
//! 1. The guard list is scanned in registration order.
//! 2. The first guard whose kind set contains the error's kind wins; the error
//!    is converted into [`Invocation::Handled`] carrying a
//!    [`HandledException`] with that guard's status code.
//! 3. If no guard matches, the error propagates unmodified to the dispatcher,
//!    which surfaces it as an uncaught failure.
//!
//! Guard matching is first-match-wins: a later guard whose kind set overlaps
//! an earlier guard's is unreachable for the shared kinds. This shadowing is
//! observed behavior and is preserved, not fixed.
//!
//! [`Invocation`] is an explicit marker channel: a handled exception is never
//! representable as a normal success value, so the dispatcher can always tell
//! "handled-and-mapped" apart from "genuine success".

mod core;

pub use core::{ExceptionGuard, GuardedMethod, HandledException, HandlerError, HandlerFn, Invocation};
