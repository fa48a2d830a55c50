use crate::runtime::{RuntimeContext, value::Value};

use super::{
    collection::{Collection, visit},
    helpers::{arg_array, arg_callable, arg_collection, check_arity},
};

/// index_of(arr, elem) - Index of the first strictly-equal element, or -1
pub(super) fn builtin_index_of(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity(&args, 2, "index_of", "index_of(arr, elem)")?;
    let arr = arg_array(
        &args,
        0,
        "index_of",
        "first argument",
        "index_of(arr, elem)",
    )?;
    let target = &args[1];
    let index = arr
        .iter()
        .position(|item| item == target)
        .map_or(-1, |idx| idx as i64);
    Ok(Value::Integer(index))
}

/// contains(coll, elem) - Whether any element (hash: any value) strictly equals elem
///
/// Hash keys are never compared.
pub(super) fn builtin_contains(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity(&args, 2, "contains", "contains(coll, elem)")?;
    let target = &args[1];
    let found = match arg_collection(&args, 0, "contains", "contains(coll, elem)")? {
        Collection::Indexed(items) => items
            .iter()
            .fold(false, |found, item| found || item == target),
        Collection::Keyed(entries) => entries.values().any(|item| item == target),
    };
    Ok(Value::Boolean(found))
}

/// find(coll, pred) - First value for which pred is truthy, or None
pub(super) fn builtin_find(
    ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity(&args, 2, "find", "find(coll, pred)")?;
    let coll = arg_collection(&args, 0, "find", "find(coll, pred)")?;
    let pred = arg_callable(&args, 1, "find", "second argument", "find(coll, pred)")?;
    let coll_value = coll.to_value();

    let mut found = None;
    coll.each(|item, key| {
        if found.is_none() && visit(ctx, &pred, &coll_value, item, key)?.is_truthy() {
            found = Some(item.clone());
        }
        Ok(())
    })?;
    Ok(found.unwrap_or(Value::None))
}
