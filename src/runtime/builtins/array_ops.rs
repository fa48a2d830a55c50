use crate::runtime::{RuntimeContext, value::Value};

use super::{
    helpers::{
        arg_array, arg_count, arg_string, check_arity, check_arity_range, compare_numbers,
        format_hint, type_error,
    },
    transform_ops::uniq_values,
};

/// first(arr) or first(arr, n) - First element (None when empty), or a new
/// array of the first min(n, len) elements
pub(super) fn builtin_first(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity_range(&args, 1, 2, "first", "first(arr, n)")?;
    let arr = arg_array(&args, 0, "first", "first argument", "first(arr, n)")?;
    match arg_count(&args, 1, "first", "first(arr, n)")? {
        None => Ok(arr.first().cloned().unwrap_or(Value::None)),
        Some(n) => Ok(Value::array(arr[..n.min(arr.len())].to_vec())),
    }
}

/// last(arr) or last(arr, n) - Last element (None when empty), or a new
/// array of the last min(n, len) elements
pub(super) fn builtin_last(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity_range(&args, 1, 2, "last", "last(arr, n)")?;
    let arr = arg_array(&args, 0, "last", "first argument", "last(arr, n)")?;
    match arg_count(&args, 1, "last", "last(arr, n)")? {
        None => Ok(arr.last().cloned().unwrap_or(Value::None)),
        Some(n) => Ok(Value::array(arr[arr.len().saturating_sub(n)..].to_vec())),
    }
}

/// rest(arr) or rest(arr, n) - Everything after the first n elements (default 1)
pub(super) fn builtin_rest(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity_range(&args, 1, 2, "rest", "rest(arr, n)")?;
    let arr = arg_array(&args, 0, "rest", "first argument", "rest(arr, n)")?;
    let n = arg_count(&args, 1, "rest", "rest(arr, n)")?.unwrap_or(1);
    Ok(Value::array(arr[n.min(arr.len())..].to_vec()))
}

fn flatten_into(items: &[Value], out: &mut Vec<Value>) {
    for item in items {
        match item {
            Value::Array(nested) => flatten_into(nested, out),
            leaf => out.push(leaf.clone()),
        }
    }
}

/// flatten(arr) - All non-array leaves of arbitrarily nested arrays,
/// depth-first, left to right
pub(super) fn builtin_flatten(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity(&args, 1, "flatten", "flatten(arr)")?;
    let arr = arg_array(&args, 0, "flatten", "argument", "flatten(arr)")?;
    let mut out = Vec::with_capacity(arr.len());
    flatten_into(arr, &mut out);
    Ok(Value::array(out))
}

fn arrays<'a>(args: &'a [Value], name: &str, signature: &str) -> Result<Vec<&'a [Value]>, String> {
    (0..args.len())
        .map(|idx| {
            let label = format!("argument {}", idx + 1);
            arg_array(args, idx, name, &label, signature).map(|arr| arr.as_slice())
        })
        .collect()
}

/// zip(a, b, ...) - Array of tuples [a[i], b[i], ...]
///
/// The result is as long as the longest input; missing slots hold None.
pub(super) fn builtin_zip(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    let inputs = arrays(&args, "zip", "zip(a, b, ...)")?;
    let len = inputs.iter().map(|arr| arr.len()).max().unwrap_or(0);
    let tuples = (0..len)
        .map(|idx| {
            Value::array(
                inputs
                    .iter()
                    .map(|arr| arr.get(idx).cloned().unwrap_or(Value::None))
                    .collect(),
            )
        })
        .collect();
    Ok(Value::array(tuples))
}

/// intersection(a, b, ...) - Distinct elements of a present in every other input
pub(super) fn builtin_intersection(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    let inputs = arrays(&args, "intersection", "intersection(a, b, ...)")?;
    let Some((head, others)) = inputs.split_first() else {
        return Ok(Value::array(vec![]));
    };
    let shared = head
        .iter()
        .filter(|item| others.iter().all(|other| other.contains(item)));
    Ok(Value::array(uniq_values(shared)))
}

/// difference(a, b, ...) - Elements of a not present in any other input
///
/// Order and duplicates of a are preserved.
pub(super) fn builtin_difference(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    let inputs = arrays(&args, "difference", "difference(a, b, ...)")?;
    let Some((head, others)) = inputs.split_first() else {
        return Ok(Value::array(vec![]));
    };
    let kept = head
        .iter()
        .filter(|item| !others.iter().any(|other| other.contains(item)))
        .cloned()
        .collect();
    Ok(Value::array(kept))
}

/// union(a, b, ...) - Distinct elements of all inputs, in first-occurrence order
pub(super) fn builtin_union(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    let inputs = arrays(&args, "union", "union(a, b, ...)")?;
    Ok(Value::array(uniq_values(
        inputs.iter().flat_map(|arr| arr.iter()),
    )))
}

/// shuffle(arr) - New array holding every element once in uniformly random order
///
/// Fisher-Yates over a copy; the input is never touched.
pub(super) fn builtin_shuffle(
    ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity(&args, 1, "shuffle", "shuffle(arr)")?;
    let arr = arg_array(&args, 0, "shuffle", "argument", "shuffle(arr)")?;
    let mut shuffled = arr.to_vec();
    for idx in (1..shuffled.len()).rev() {
        let swap_with = ctx.random_index(idx + 1);
        shuffled.swap(idx, swap_with);
    }
    Ok(Value::array(shuffled))
}

/// sort(arr) or sort(arr, order) - New array of numbers in "asc" (default)
/// or "desc" order
///
/// Ordering is the one `sort_by` uses for numeric criteria, so NaN lands
/// last ascending and first descending.
pub(super) fn builtin_sort(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity_range(&args, 1, 2, "sort", "sort(arr, order)")?;
    let arr = arg_array(&args, 0, "sort", "first argument", "sort(arr, order)")?;
    let order = match args.get(1) {
        None => "asc",
        Some(_) => arg_string(&args, 1, "sort", "second argument", "sort(arr, order)")?,
    };
    let descending = match order {
        "asc" => false,
        "desc" => true,
        other => {
            return Err(format!(
                "sort order must be \"asc\" or \"desc\", got \"{}\"{}",
                other,
                format_hint("sort(arr, order)")
            ));
        }
    };
    if let Some(bad) = arr
        .iter()
        .find(|item| !matches!(item, Value::Integer(_) | Value::Float(_)))
    {
        return Err(type_error(
            "sort",
            "every element",
            "Int or Float",
            bad.type_name(),
            "sort(arr, order)",
        ));
    }

    let mut sorted = arr.to_vec();
    if descending {
        sorted.sort_by(|a, b| compare_numbers(b, a));
    } else {
        sorted.sort_by(compare_numbers);
    }
    Ok(Value::array(sorted))
}
