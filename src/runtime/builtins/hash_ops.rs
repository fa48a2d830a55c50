use std::{collections::HashMap, rc::Rc};

use crate::runtime::{RuntimeContext, hash_key::HashKey, value::Value};

use super::helpers::{arg_collection, arg_hash, arity_error, check_arity, type_error};

pub(super) fn builtin_keys(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity(&args, 1, "keys", "keys(h)")?;
    let hash = arg_hash(&args, 0, "keys", "argument", "keys(h)")?;
    let keys: Vec<Value> = hash.keys().map(HashKey::to_value).collect();
    Ok(Value::array(keys))
}

pub(super) fn builtin_values(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity(&args, 1, "values", "values(h)")?;
    let hash = arg_hash(&args, 0, "values", "argument", "values(h)")?;
    let values: Vec<Value> = hash.values().cloned().collect();
    Ok(Value::array(values))
}

/// size(coll) - Number of elements (Array) or entries (Hash)
pub(super) fn builtin_size(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity(&args, 1, "size", "size(coll)")?;
    let coll = arg_collection(&args, 0, "size", "size(coll)")?;
    Ok(Value::Integer(coll.len() as i64))
}

/// Splits `target, sources...` and copies each source entry into the target
/// with `merge`. None sources are skipped.
fn copy_sources(
    args: Vec<Value>,
    name: &str,
    signature: &str,
    merge: impl Fn(&mut HashMap<HashKey, Value>, &HashKey, &Value),
) -> Result<Value, String> {
    let mut args = args.into_iter();
    let mut target = match args.next() {
        Some(Value::Hash(target)) => target,
        Some(other) => {
            return Err(type_error(
                name,
                "target",
                "Hash",
                other.type_name(),
                signature,
            ));
        }
        None => return Err(arity_error(name, "1+", 0, signature)),
    };

    for (idx, source) in args.enumerate() {
        match source {
            Value::Hash(source) => {
                let entries = Rc::make_mut(&mut target);
                for (key, value) in source.iter() {
                    merge(entries, key, value);
                }
            }
            Value::None => {}
            other => {
                return Err(type_error(
                    name,
                    &format!("source {}", idx + 1),
                    "Hash",
                    other.type_name(),
                    signature,
                ));
            }
        }
    }
    Ok(Value::Hash(target))
}

/// extend(target, sources...) - Copy every source entry into target; later sources win
///
/// Callers must use the returned hash. The target is updated in place only
/// when the caller handed over its only handle; any other handle to target
/// keeps its old contents.
pub(super) fn builtin_extend(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    copy_sources(
        args,
        "extend",
        "extend(target, sources...)",
        |entries, key, value| {
            entries.insert(key.clone(), value.clone());
        },
    )
}

/// defaults(target, sources...) - Fill keys missing from target; earlier sources win
///
/// Like `extend`, the result is the returned hash; a handle to target kept
/// elsewhere does not see the filled keys.
pub(super) fn builtin_defaults(
    _ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    copy_sources(
        args,
        "defaults",
        "defaults(target, sources...)",
        |entries, key, value| {
            entries
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        },
    )
}
