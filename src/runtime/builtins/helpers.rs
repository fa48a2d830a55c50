use std::{cmp::Ordering, collections::HashMap, rc::Rc};

use crate::runtime::{hash_key::HashKey, value::Value};

use super::collection::Collection;

pub(super) fn format_hint(signature: &str) -> String {
    format!("\n\nHint:\n  {}", signature)
}

pub(super) fn arity_error(name: &str, expected: &str, got: usize, signature: &str) -> String {
    format!(
        "wrong number of arguments\n\n  function: {}/{}\n  expected: {}\n  got: {}{}",
        name,
        expected,
        expected,
        got,
        format_hint(signature)
    )
}

pub(super) fn type_error(
    name: &str,
    label: &str,
    expected: &str,
    got: &str,
    signature: &str,
) -> String {
    format!(
        "{} expected {} to be {}, got {}{}",
        name,
        label,
        expected,
        got,
        format_hint(signature)
    )
}

/// Total order over Int and Float by numeric value.
///
/// NaN sorts after every other number and equal to itself. Non-numbers
/// compare Equal, so callers check element kinds first.
pub(super) fn compare_numbers(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => x.cmp(y),
        (Value::Float(x), Value::Float(y)) => compare_floats(*x, *y),
        (Value::Integer(i), Value::Float(f)) => compare_int_float(*i, *f),
        (Value::Float(f), Value::Integer(i)) => compare_int_float(*i, *f).reverse(),
        _ => Ordering::Equal,
    }
}

fn compare_floats(x: f64, y: f64) -> Ordering {
    match (x.is_nan(), y.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        // -0.0 and 0.0 stay equal, matching Int 0.
        (false, false) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
    }
}

// Exact: `i as f64` rounds once |i| passes 2^53.
fn compare_int_float(i: i64, f: f64) -> Ordering {
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() || f >= I64_BOUND {
        return Ordering::Less;
    }
    if f < -I64_BOUND {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64
            .partial_cmp(&(f - whole))
            .unwrap_or(Ordering::Equal),
        unequal => unequal,
    }
}

pub(super) fn check_arity(
    args: &[Value],
    expected: usize,
    name: &str,
    signature: &str,
) -> Result<(), String> {
    if args.len() != expected {
        return Err(arity_error(
            name,
            &expected.to_string(),
            args.len(),
            signature,
        ));
    }
    Ok(())
}

pub(super) fn check_arity_range(
    args: &[Value],
    min: usize,
    max: usize,
    name: &str,
    signature: &str,
) -> Result<(), String> {
    if args.len() < min || args.len() > max {
        return Err(arity_error(
            name,
            &format!("{}..{}", min, max),
            args.len(),
            signature,
        ));
    }
    Ok(())
}

pub(super) fn check_min_arity(
    args: &[Value],
    min: usize,
    name: &str,
    signature: &str,
) -> Result<(), String> {
    if args.len() < min {
        return Err(arity_error(name, &format!("{}+", min), args.len(), signature));
    }
    Ok(())
}

pub(super) fn arg_string<'a>(
    args: &'a [Value],
    index: usize,
    name: &str,
    label: &str,
    signature: &str,
) -> Result<&'a str, String> {
    match &args[index] {
        Value::String(s) => Ok(s.as_ref()),
        other => Err(type_error(
            name,
            label,
            "String",
            other.type_name(),
            signature,
        )),
    }
}

pub(super) fn arg_array<'a>(
    args: &'a [Value],
    index: usize,
    name: &str,
    label: &str,
    signature: &str,
) -> Result<&'a Rc<Vec<Value>>, String> {
    match &args[index] {
        Value::Array(arr) => Ok(arr),
        other => Err(type_error(
            name,
            label,
            "Array",
            other.type_name(),
            signature,
        )),
    }
}

pub(super) fn arg_int(
    args: &[Value],
    index: usize,
    name: &str,
    label: &str,
    signature: &str,
) -> Result<i64, String> {
    match &args[index] {
        Value::Integer(value) => Ok(*value),
        other => Err(type_error(
            name,
            label,
            "Integer",
            other.type_name(),
            signature,
        )),
    }
}

/// Reads an optional count argument, clamping negatives to zero.
pub(super) fn arg_count(
    args: &[Value],
    index: usize,
    name: &str,
    signature: &str,
) -> Result<Option<usize>, String> {
    match args.get(index) {
        None | Some(Value::None) => Ok(None),
        Some(_) => {
            let n = arg_int(args, index, name, "count", signature)?;
            Ok(Some(n.max(0) as usize))
        }
    }
}

pub(super) fn arg_hash<'a>(
    args: &'a [Value],
    index: usize,
    name: &str,
    label: &str,
    signature: &str,
) -> Result<&'a HashMap<HashKey, Value>, String> {
    match &args[index] {
        Value::Hash(h) => Ok(h.as_ref()),
        other => Err(type_error(
            name,
            label,
            "Hash",
            other.type_name(),
            signature,
        )),
    }
}

pub(super) fn arg_callable(
    args: &[Value],
    index: usize,
    name: &str,
    label: &str,
    signature: &str,
) -> Result<Value, String> {
    let value = &args[index];
    if value.is_callable() {
        Ok(value.clone())
    } else {
        Err(type_error(
            name,
            label,
            "Function",
            value.type_name(),
            signature,
        ))
    }
}

/// Resolves a collection argument. Anything other than an Array or Hash is
/// rejected here, so every collection builtin fails the same way.
pub(super) fn arg_collection<'a>(
    args: &'a [Value],
    index: usize,
    name: &str,
    signature: &str,
) -> Result<Collection<'a>, String> {
    Collection::from_value(&args[index]).ok_or_else(|| {
        type_error(
            name,
            "collection",
            "Array or Hash",
            args[index].type_name(),
            signature,
        )
    })
}
