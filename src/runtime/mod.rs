//! Runtime core types: values, function handles, and the host context that
//! builtins run against.
//!
//! # Single-Thread Invariant
//! Heap-backed `Value` variants use `Rc` for cheap sharing and closures keep
//! their private state in `Cell`/`RefCell`, so values are `!Send`. Every
//! builtin runs to completion on the calling thread; deferred work
//! (`delay`, `throttle`) is handed to the host through
//! [`RuntimeContext::schedule`] and runs later on the same thread.
//!
//! Closures may capture values, but captured values must not reference the
//! capturing closure, otherwise the `Rc` graph leaks.
use crate::runtime::value::Value;

pub mod builtin_function;
pub mod builtins;
pub mod closure;
pub mod config;
pub mod event_loop;
pub mod hash_key;
pub mod value;

pub type BuiltinFn = fn(&mut dyn RuntimeContext, Vec<Value>) -> Result<Value, String>;

/// Identifier returned by [`RuntimeContext::schedule`].
pub type TimerId = u64;

/// Capabilities builtins consume from their host.
///
/// Builtins never call user functions, read the clock, draw randomness or
/// defer work on their own; everything goes through this trait so a host can
/// supply its own event loop.
pub trait RuntimeContext {
    /// Calls `callee` with an optional receiver (the caller context).
    ///
    /// Builtins receive the receiver prepended to `args`; closures receive it
    /// separately.
    fn invoke_method(
        &mut self,
        callee: Value,
        receiver: Option<Value>,
        args: Vec<Value>,
    ) -> Result<Value, String>;

    /// Calls `callee` without a receiver.
    fn invoke_value(&mut self, callee: Value, args: Vec<Value>) -> Result<Value, String> {
        self.invoke_method(callee, None, args)
    }

    /// Registers `callback(args...)` to run once, `delay_ms` after now.
    ///
    /// Callbacks registered with the same due time run in registration order.
    fn schedule(&mut self, callback: Value, delay_ms: u64, args: Vec<Value>) -> TimerId;

    /// Current host time in milliseconds.
    fn now_ms(&self) -> u64;

    /// Uniform random index in `0..upper`. `upper` is always at least 1.
    fn random_index(&mut self, upper: usize) -> usize;
}
