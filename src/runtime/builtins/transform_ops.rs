use std::cmp::Ordering;

use crate::runtime::{RuntimeContext, value::Value};

use super::{
    collection::visit,
    helpers::{
        arg_array, arg_callable, arg_collection, check_arity, compare_numbers, format_hint,
    },
};

/// map(coll, fun) - Apply fun(value, key, coll) to each entry, return new array of results
///
/// Entries are processed in encounter order.
pub(super) fn builtin_map(ctx: &mut dyn RuntimeContext, args: Vec<Value>) -> Result<Value, String> {
    check_arity(&args, 2, "map", "map(coll, fun)")?;
    let coll = arg_collection(&args, 0, "map", "map(coll, fun)")?;
    let func = arg_callable(&args, 1, "map", "second argument", "map(coll, fun)")?;
    let coll_value = coll.to_value();

    let mut results = Vec::with_capacity(coll.len());
    coll.each(|item, key| {
        results.push(visit(ctx, &func, &coll_value, item, key)?);
        Ok(())
    })?;
    Ok(Value::array(results))
}

/// Reads `item[key]`: hash lookup, or array index for integer keys.
/// Anything else yields None.
pub(super) fn pluck_value(item: &Value, key: &Value) -> Value {
    match (item, key) {
        (Value::Hash(entries), key) => key
            .to_hash_key()
            .and_then(|k| entries.get(&k).cloned())
            .unwrap_or(Value::None),
        (Value::Array(items), Value::Integer(idx)) if *idx >= 0 => {
            items.get(*idx as usize).cloned().unwrap_or(Value::None)
        }
        _ => Value::None,
    }
}

/// pluck(coll, key) - Array of item[key] for every item
pub(super) fn builtin_pluck(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity(&args, 2, "pluck", "pluck(coll, key)")?;
    let coll = arg_collection(&args, 0, "pluck", "pluck(coll, key)")?;
    let key = &args[1];
    let plucked = coll
        .values()
        .iter()
        .map(|item| pluck_value(item, key))
        .collect();
    Ok(Value::array(plucked))
}

fn select(
    ctx: &mut dyn RuntimeContext,
    name: &str,
    signature: &str,
    args: &[Value],
    keep_when: bool,
) -> Result<Value, String> {
    check_arity(args, 2, name, signature)?;
    let coll = arg_collection(args, 0, name, signature)?;
    let pred = arg_callable(args, 1, name, "second argument", signature)?;
    let coll_value = coll.to_value();

    let mut results = Vec::new();
    coll.each(|item, key| {
        if visit(ctx, &pred, &coll_value, item, key)?.is_truthy() == keep_when {
            results.push(item.clone());
        }
        Ok(())
    })?;
    Ok(Value::array(results))
}

/// filter(coll, pred) - Keep values where pred(value, key, coll) is truthy
///
/// Truthiness: only `Boolean(false)` and `None` are falsy.
pub(super) fn builtin_filter(
    ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    select(ctx, "filter", "filter(coll, pred)", &args, true)
}

/// reject(coll, pred) - Keep values where pred is falsy; the complement of filter
pub(super) fn builtin_reject(
    ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    select(ctx, "reject", "reject(coll, pred)", &args, false)
}

/// Keeps the first occurrence of every strictly-distinct value.
pub(super) fn uniq_values<'a>(items: impl IntoIterator<Item = &'a Value>) -> Vec<Value> {
    let mut seen: Vec<Value> = Vec::new();
    for item in items {
        if !seen.contains(item) {
            seen.push(item.clone());
        }
    }
    seen
}

/// uniq(arr) - First occurrence of each distinct value, in first-occurrence order
pub(super) fn builtin_uniq(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity(&args, 1, "uniq", "uniq(arr)")?;
    let arr = arg_array(&args, 0, "uniq", "argument", "uniq(arr)")?;
    Ok(Value::array(uniq_values(arr.iter())))
}

/// compact(arr) - The truthy elements of arr
pub(super) fn builtin_compact(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity(&args, 1, "compact", "compact(arr)")?;
    let arr = arg_array(&args, 0, "compact", "argument", "compact(arr)")?;
    let kept = arr.iter().filter(|item| item.is_truthy()).cloned().collect();
    Ok(Value::array(kept))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CriterionKind {
    Number,
    Text,
    Flag,
}

fn criterion_kind(value: &Value) -> Option<CriterionKind> {
    match value {
        Value::Integer(_) | Value::Float(_) => Some(CriterionKind::Number),
        Value::String(_) => Some(CriterionKind::Text),
        Value::Boolean(_) => Some(CriterionKind::Flag),
        _ => None,
    }
}

fn compare_criteria(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::None, Value::None) => Ordering::Equal,
        (Value::None, _) => Ordering::Greater,
        (_, Value::None) => Ordering::Less,
        (Value::String(s1), Value::String(s2)) => s1.cmp(s2),
        (Value::Boolean(b1), Value::Boolean(b2)) => b1.cmp(b2),
        // Mixed kinds were rejected before sorting.
        (a, b) => compare_numbers(a, b),
    }
}

/// sort_by(coll, fun_or_key) - Values sorted ascending by criterion, stable for ties
///
/// The criterion is fun(value, key, coll) when given a function, otherwise
/// value[key]. Criteria must all be numbers, all strings or all booleans.
/// NaN criteria sort after every number; None criteria sort last.
pub(super) fn builtin_sort_by(
    ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity(&args, 2, "sort_by", "sort_by(coll, fun_or_key)")?;
    let coll = arg_collection(&args, 0, "sort_by", "sort_by(coll, fun_or_key)")?;
    let criterion = &args[1];
    let coll_value = coll.to_value();

    let mut keyed: Vec<(Value, Value)> = Vec::with_capacity(coll.len());
    coll.each(|item, key| {
        let rank = if criterion.is_callable() {
            visit(ctx, criterion, &coll_value, item, key)?
        } else {
            pluck_value(item, criterion)
        };
        keyed.push((rank, item.clone()));
        Ok(())
    })?;

    let mut kind = None;
    for (rank, _) in &keyed {
        if matches!(rank, Value::None) {
            continue;
        }
        let this_kind = criterion_kind(rank).ok_or_else(|| {
            format!(
                "sort_by criteria must be Int, Float, String or Bool, got {}{}",
                rank.type_name(),
                format_hint("sort_by(coll, fun_or_key)")
            )
        })?;
        match kind {
            None => kind = Some(this_kind),
            Some(existing) if existing != this_kind => {
                return Err(format!(
                    "sort_by criteria must not mix kinds, got {} after {:?}{}",
                    rank.type_name(),
                    existing,
                    format_hint("sort_by(coll, fun_or_key)")
                ));
            }
            Some(_) => {}
        }
    }

    // `sort_by` on slices is stable.
    keyed.sort_by(|(a, _), (b, _)| compare_criteria(a, b));
    Ok(Value::array(keyed.into_iter().map(|(_, item)| item).collect()))
}
