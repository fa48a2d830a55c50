use std::fmt;

use crate::runtime::{RuntimeContext, value::Value};

/// Signature of native closure bodies: host context, optional receiver, arguments.
pub type NativeFn =
    dyn Fn(&mut dyn RuntimeContext, Option<Value>, Vec<Value>) -> Result<Value, String>;

/// A callable value backed by a Rust closure.
///
/// Any private state (cache, flags) lives inside the boxed body, so two
/// closures never share state even when they wrap the same function.
pub struct Closure {
    pub name: String,
    body: Box<NativeFn>,
}

impl Closure {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut dyn RuntimeContext, Option<Value>, Vec<Value>) -> Result<Value, String>
            + 'static,
    {
        Self {
            name: name.into(),
            body: Box::new(body),
        }
    }

    pub fn call(
        &self,
        ctx: &mut dyn RuntimeContext,
        receiver: Option<Value>,
        args: Vec<Value>,
    ) -> Result<Value, String> {
        (self.body)(ctx, receiver, args)
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Closure({})", self.name)
    }
}

/// Closures compare by identity.
impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}
