use crate::runtime::{RuntimeContext, value::Value};

use super::{
    collection::visit,
    helpers::{arg_callable, arg_collection, check_arity_range},
};

/// reduce(coll, fun) or reduce(coll, fun, seed) - Left fold
///
/// Callback signature: fun(accumulator, value, key, coll).
/// Without a seed the first value is the initial accumulator and is never
/// passed to fun as the current value. Reducing an empty collection without
/// a seed returns None; supply a seed when the input may be empty.
pub(super) fn builtin_reduce(
    ctx: &mut dyn RuntimeContext,
    mut args: Vec<Value>,
) -> Result<Value, String> {
    check_arity_range(&args, 2, 3, "reduce", "reduce(coll, fun, seed)")?;
    let mut acc = if args.len() == 3 { args.pop() } else { None };
    let coll = arg_collection(&args, 0, "reduce", "reduce(coll, fun, seed)")?;
    let func = arg_callable(
        &args,
        1,
        "reduce",
        "second argument",
        "reduce(coll, fun, seed)",
    )?;
    let coll_value = coll.to_value();

    coll.each(|item, key| {
        acc = Some(match acc.take() {
            None => item.clone(),
            Some(prev) => ctx
                .invoke_value(
                    func.clone(),
                    vec![prev, item.clone(), key, coll_value.clone()],
                )?,
        });
        Ok(())
    })?;
    Ok(acc.unwrap_or(Value::None))
}

/// Runs the truth test for one value; no predicate means the value itself.
fn truth_test(
    ctx: &mut dyn RuntimeContext,
    pred: Option<&Value>,
    coll_value: &Value,
    item: &Value,
    key: Value,
) -> Result<bool, String> {
    match pred {
        Some(pred) => Ok(visit(ctx, pred, coll_value, item, key)?.is_truthy()),
        None => Ok(item.is_truthy()),
    }
}

fn arg_predicate(args: &[Value], name: &str, signature: &str) -> Result<Option<Value>, String> {
    match args.get(1) {
        None | Some(Value::None) => Ok(None),
        Some(_) => arg_callable(args, 1, name, "second argument", signature).map(Some),
    }
}

/// every(coll) or every(coll, pred) - Whether every value passes pred
///
/// Every value is tested, even after a failure.
pub(super) fn builtin_every(
    ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity_range(&args, 1, 2, "every", "every(coll, pred)")?;
    let coll = arg_collection(&args, 0, "every", "every(coll, pred)")?;
    let pred = arg_predicate(&args, "every", "every(coll, pred)")?;
    let coll_value = coll.to_value();

    let mut result = true;
    coll.each(|item, key| {
        result &= truth_test(ctx, pred.as_ref(), &coll_value, item, key)?;
        Ok(())
    })?;
    Ok(Value::Boolean(result))
}

/// some(coll) or some(coll, pred) - Whether at least one value passes pred
///
/// Each value is judged as a one-element `every`; every value is tested,
/// even after a success.
pub(super) fn builtin_some(
    ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity_range(&args, 1, 2, "some", "some(coll, pred)")?;
    let coll = arg_collection(&args, 0, "some", "some(coll, pred)")?;
    let pred = arg_predicate(&args, "some", "some(coll, pred)")?;
    let coll_value = coll.to_value();

    let mut result = false;
    coll.each(|item, key| {
        result |= truth_test(ctx, pred.as_ref(), &coll_value, item, key)?;
        Ok(())
    })?;
    Ok(Value::Boolean(result))
}
