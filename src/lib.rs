//! Collection and function utilities for the flux runtime.
//!
//! Every operation is a builtin taking `Vec<Value>` and a host context; see
//! [`runtime::builtins::BUILTINS`] for the full table and
//! [`runtime::event_loop::EventLoop`] for the default host.
pub mod runtime;

pub use runtime::{
    RuntimeContext, TimerId,
    builtins::{BUILTINS, builtin_value, call_builtin, get_builtin},
    config::RuntimeConfig,
    event_loop::EventLoop,
    value::Value,
};
