use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use crate::runtime::{RuntimeContext, hash_key::HashKey, value::Value};

use super::{
    get_builtin,
    helpers::{
        arg_callable, arg_collection, arg_int, check_arity, check_min_arity, format_hint,
        type_error,
    },
};

/// identity(value, ...) - Returns its first argument; extra arguments are ignored
pub(super) fn builtin_identity(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_min_arity(&args, 1, "identity", "identity(value)")?;
    Ok(args.into_iter().next().unwrap_or(Value::None))
}

/// Resolves `name` on `item`: a callable stored under that key of a hash
/// item first, then the builtin of that name.
fn invoke_named(
    ctx: &mut dyn RuntimeContext,
    item: &Value,
    name: &str,
    args: Vec<Value>,
) -> Result<Value, String> {
    let own_method = match item {
        Value::Hash(entries) => entries
            .get(&HashKey::from(name))
            .filter(|method| method.is_callable())
            .cloned(),
        _ => None,
    };
    if let Some(method) = own_method {
        return ctx.invoke_method(method, Some(item.clone()), args);
    }
    match get_builtin(name) {
        Some(builtin) => ctx.invoke_method(Value::Builtin(*builtin), Some(item.clone()), args),
        None => Err(format!(
            "invoke: no method \"{}\" on {}",
            name,
            item.type_name()
        )),
    }
}

/// invoke(coll, method, args...) - Call method on every value, return the results
///
/// `method` is either a function, called with the value as receiver, or a
/// method name. Errors from the calls are returned unchanged.
pub(super) fn builtin_invoke(
    ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_min_arity(&args, 2, "invoke", "invoke(coll, method, args...)")?;
    let coll = arg_collection(&args, 0, "invoke", "invoke(coll, method, args...)")?;
    let method = &args[1];
    if !method.is_callable() && !matches!(method, Value::String(_)) {
        return Err(type_error(
            "invoke",
            "second argument",
            "Function or String",
            method.type_name(),
            "invoke(coll, method, args...)",
        ));
    }
    let extra = &args[2..];

    let mut results = Vec::with_capacity(coll.len());
    coll.each(|item, _| {
        let result = match method {
            Value::String(name) => invoke_named(ctx, item, name, extra.to_vec())?,
            callable => ctx.invoke_method(callable.clone(), Some(item.clone()), extra.to_vec())?,
        };
        results.push(result);
        Ok(())
    })?;
    Ok(Value::array(results))
}

/// once(fun) - Function that calls fun on its first invocation only
///
/// Later calls return the first result and ignore their arguments. A failed
/// first call leaves the guard armed. A reentrant call made while the first
/// call is still running returns None.
pub(super) fn builtin_once(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity(&args, 1, "once", "once(fun)")?;
    let func = arg_callable(&args, 0, "once", "argument", "once(fun)")?;
    let running = Cell::new(false);
    let result: RefCell<Option<Value>> = RefCell::new(None);

    Ok(Value::closure("once", move |ctx, receiver, call_args| {
        if let Some(cached) = result.borrow().as_ref() {
            return Ok(cached.clone());
        }
        if running.replace(true) {
            return Ok(Value::None);
        }
        let outcome = ctx.invoke_method(func.clone(), receiver, call_args);
        running.set(false);
        let value = outcome?;
        *result.borrow_mut() = Some(value.clone());
        Ok(value)
    }))
}

/// Cache key of `memoize`: the type label plus the string form, so `1`,
/// `1.0` and `"1"` stay distinct.
type MemoKey = (&'static str, String);

fn memo_key(value: &Value) -> Result<MemoKey, String> {
    match value {
        Value::Integer(_) | Value::Float(_) | Value::Boolean(_) | Value::String(_) | Value::None => {
            Ok((value.type_name(), value.to_string_value()))
        }
        other => Err(format!(
            "memoize key must be Int, Float, Bool, String or None, got {}{}",
            other.type_name(),
            format_hint("memoize(fun)(key, args...)")
        )),
    }
}

/// memoize(fun) - Function caching fun's result per first argument
///
/// The cache is never evicted. Failed calls are not cached.
pub(super) fn builtin_memoize(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity(&args, 1, "memoize", "memoize(fun)")?;
    let func = arg_callable(&args, 0, "memoize", "argument", "memoize(fun)")?;
    let cache: RefCell<HashMap<MemoKey, Value>> = RefCell::new(HashMap::new());

    Ok(Value::closure("memoize", move |ctx, receiver, call_args| {
        let key = memo_key(call_args.first().unwrap_or(&Value::None))?;
        let hit = cache.borrow().get(&key).cloned();
        if let Some(hit) = hit {
            return Ok(hit);
        }
        let value = ctx.invoke_method(func.clone(), receiver, call_args)?;
        cache.borrow_mut().insert(key, value.clone());
        Ok(value)
    }))
}

/// delay(fun, wait_ms, args...) - Schedule fun(args...) once after wait_ms
///
/// Returns the timer id. Negative waits count as zero.
pub(super) fn builtin_delay(
    ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_min_arity(&args, 2, "delay", "delay(fun, wait_ms, args...)")?;
    let func = arg_callable(
        &args,
        0,
        "delay",
        "first argument",
        "delay(fun, wait_ms, args...)",
    )?;
    let wait = arg_int(
        &args,
        1,
        "delay",
        "second argument",
        "delay(fun, wait_ms, args...)",
    )?;
    let id = ctx.schedule(func, wait.max(0) as u64, args[2..].to_vec());
    Ok(Value::Integer(id as i64))
}

#[derive(Default)]
struct ThrottleState {
    last_invoked_ms: Option<u64>,
    pending: Option<(Option<Value>, Vec<Value>)>,
    trailing_scheduled: bool,
    last_result: Option<Value>,
}

impl ThrottleState {
    fn last_result(&self) -> Value {
        self.last_result.clone().unwrap_or(Value::None)
    }
}

/// Timer callback running the pending trailing call, if any.
fn throttle_trailing(state: Rc<RefCell<ThrottleState>>, func: Value) -> Value {
    Value::closure("throttle:trailing", move |ctx, _, _| {
        let pending = {
            let mut st = state.borrow_mut();
            st.trailing_scheduled = false;
            st.pending.take()
        };
        let Some((receiver, call_args)) = pending else {
            return Ok(Value::None);
        };
        state.borrow_mut().last_invoked_ms = Some(ctx.now_ms());
        let value = ctx.invoke_method(func.clone(), receiver, call_args)?;
        state.borrow_mut().last_result = Some(value.clone());
        Ok(value)
    })
}

/// throttle(fun, wait_ms) - Function calling fun at most once per wait_ms
///
/// A call outside any window runs fun immediately and opens a window. Calls
/// inside the window are coalesced into one trailing call with the most
/// recent arguments, run when the window closes. Every call returns fun's
/// most recent result (None before the first run).
pub(super) fn builtin_throttle(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity(&args, 2, "throttle", "throttle(fun, wait_ms)")?;
    let func = arg_callable(
        &args,
        0,
        "throttle",
        "first argument",
        "throttle(fun, wait_ms)",
    )?;
    let wait = arg_int(
        &args,
        1,
        "throttle",
        "second argument",
        "throttle(fun, wait_ms)",
    )?
    .max(0) as u64;
    let state = Rc::new(RefCell::new(ThrottleState::default()));

    Ok(Value::closure("throttle", move |ctx, receiver, call_args| {
        let now = ctx.now_ms();
        let window_open = {
            let st = state.borrow();
            st.trailing_scheduled
                || st
                    .last_invoked_ms
                    .is_some_and(|last| now.saturating_sub(last) < wait)
        };

        if !window_open {
            state.borrow_mut().last_invoked_ms = Some(now);
            let value = ctx.invoke_method(func.clone(), receiver, call_args)?;
            state.borrow_mut().last_result = Some(value.clone());
            return Ok(value);
        }

        let delay_ms = {
            let mut st = state.borrow_mut();
            st.pending = Some((receiver, call_args));
            if st.trailing_scheduled {
                None
            } else {
                st.trailing_scheduled = true;
                let last = st.last_invoked_ms.unwrap_or(now);
                Some(last.saturating_add(wait).saturating_sub(now))
            }
        };
        if let Some(delay_ms) = delay_ms {
            let trailing = throttle_trailing(Rc::clone(&state), func.clone());
            ctx.schedule(trailing, delay_ms, vec![]);
        }
        Ok(state.borrow().last_result())
    }))
}
