//! Iteration engine shared by every collection builtin.
//!
//! A collection is either an indexed sequence (`Array`) or a keyed mapping
//! (`Hash`). Builtins resolve their argument to a [`Collection`] once and then
//! only talk to [`Collection::each`], so neither shape leaks into callers.

use std::{collections::HashMap, rc::Rc};

use crate::runtime::{RuntimeContext, hash_key::HashKey, value::Value};

use super::helpers::{arg_callable, arg_collection, check_arity};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Collection<'a> {
    Indexed(&'a Rc<Vec<Value>>),
    Keyed(&'a Rc<HashMap<HashKey, Value>>),
}

impl<'a> Collection<'a> {
    pub fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(Collection::Indexed(items)),
            Value::Hash(entries) => Some(Collection::Keyed(entries)),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Collection::Indexed(items) => items.len(),
            Collection::Keyed(entries) => entries.len(),
        }
    }

    /// The collection as handed to visitors as their third argument.
    pub fn to_value(self) -> Value {
        match self {
            Collection::Indexed(items) => Value::Array(Rc::clone(items)),
            Collection::Keyed(entries) => Value::Hash(Rc::clone(entries)),
        }
    }

    /// Calls `visit(value, key)` for every entry: index order for sequences,
    /// map order for mappings. Indexes are passed as `Integer`. Stops at the
    /// first error.
    pub fn each<F>(self, mut visit: F) -> Result<(), String>
    where
        F: FnMut(&Value, Value) -> Result<(), String>,
    {
        match self {
            Collection::Indexed(items) => {
                for (idx, item) in items.iter().enumerate() {
                    visit(item, Value::Integer(idx as i64))?;
                }
            }
            Collection::Keyed(entries) => {
                for (key, item) in entries.iter() {
                    visit(item, key.to_value())?;
                }
            }
        }
        Ok(())
    }

    /// Values in encounter order.
    pub fn values(self) -> Vec<Value> {
        match self {
            Collection::Indexed(items) => items.to_vec(),
            Collection::Keyed(entries) => entries.values().cloned().collect(),
        }
    }
}

/// Calls `visitor(value, key, collection)`. A failure is returned untouched.
pub(super) fn visit(
    ctx: &mut dyn RuntimeContext,
    visitor: &Value,
    collection: &Value,
    item: &Value,
    key: Value,
) -> Result<Value, String> {
    ctx.invoke_value(
        visitor.clone(),
        vec![item.clone(), key, collection.clone()],
    )
}

/// each(coll, fn) - Call fn(value, key, coll) for every entry; returns None
pub(super) fn builtin_each(
    ctx: &mut dyn RuntimeContext,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity(&args, 2, "each", "each(coll, fun)")?;
    let coll = arg_collection(&args, 0, "each", "each(coll, fun)")?;
    let func = arg_callable(&args, 1, "each", "second argument", "each(coll, fun)")?;
    let coll_value = coll.to_value();

    coll.each(|item, key| {
        visit(ctx, &func, &coll_value, item, key)?;
        Ok(())
    })?;
    Ok(Value::None)
}
