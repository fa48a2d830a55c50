use crate::runtime::{RuntimeContext, builtin_function::BuiltinFunction, value::Value};

mod array_ops;
mod collection;
mod function_ops;
mod hash_ops;
mod helpers;
mod reduce_ops;
mod search_ops;
mod transform_ops;

use array_ops::{
    builtin_difference, builtin_first, builtin_flatten, builtin_intersection, builtin_last,
    builtin_rest, builtin_shuffle, builtin_sort, builtin_union, builtin_zip,
};
use collection::builtin_each;
use function_ops::{
    builtin_delay, builtin_identity, builtin_invoke, builtin_memoize, builtin_once,
    builtin_throttle,
};
use hash_ops::{
    builtin_defaults, builtin_extend, builtin_keys, builtin_size, builtin_values,
};
use reduce_ops::{builtin_every, builtin_reduce, builtin_some};
use search_ops::{builtin_contains, builtin_find, builtin_index_of};
use transform_ops::{
    builtin_compact, builtin_filter, builtin_map, builtin_pluck, builtin_reject, builtin_sort_by,
    builtin_uniq,
};

/// All built-in functions, looked up by name.
pub static BUILTINS: &[BuiltinFunction] = &[
    BuiltinFunction {
        name: "each",
        func: builtin_each,
    },
    BuiltinFunction {
        name: "index_of",
        func: builtin_index_of,
    },
    BuiltinFunction {
        name: "contains",
        func: builtin_contains,
    },
    BuiltinFunction {
        name: "find",
        func: builtin_find,
    },
    BuiltinFunction {
        name: "map",
        func: builtin_map,
    },
    BuiltinFunction {
        name: "pluck",
        func: builtin_pluck,
    },
    BuiltinFunction {
        name: "filter",
        func: builtin_filter,
    },
    BuiltinFunction {
        name: "reject",
        func: builtin_reject,
    },
    BuiltinFunction {
        name: "uniq",
        func: builtin_uniq,
    },
    BuiltinFunction {
        name: "compact",
        func: builtin_compact,
    },
    BuiltinFunction {
        name: "reduce",
        func: builtin_reduce,
    },
    BuiltinFunction {
        name: "every",
        func: builtin_every,
    },
    BuiltinFunction {
        name: "some",
        func: builtin_some,
    },
    BuiltinFunction {
        name: "flatten",
        func: builtin_flatten,
    },
    BuiltinFunction {
        name: "zip",
        func: builtin_zip,
    },
    BuiltinFunction {
        name: "intersection",
        func: builtin_intersection,
    },
    BuiltinFunction {
        name: "difference",
        func: builtin_difference,
    },
    BuiltinFunction {
        name: "union",
        func: builtin_union,
    },
    BuiltinFunction {
        name: "once",
        func: builtin_once,
    },
    BuiltinFunction {
        name: "memoize",
        func: builtin_memoize,
    },
    BuiltinFunction {
        name: "delay",
        func: builtin_delay,
    },
    BuiltinFunction {
        name: "throttle",
        func: builtin_throttle,
    },
    BuiltinFunction {
        name: "identity",
        func: builtin_identity,
    },
    BuiltinFunction {
        name: "first",
        func: builtin_first,
    },
    BuiltinFunction {
        name: "last",
        func: builtin_last,
    },
    BuiltinFunction {
        name: "rest",
        func: builtin_rest,
    },
    BuiltinFunction {
        name: "extend",
        func: builtin_extend,
    },
    BuiltinFunction {
        name: "defaults",
        func: builtin_defaults,
    },
    BuiltinFunction {
        name: "invoke",
        func: builtin_invoke,
    },
    BuiltinFunction {
        name: "shuffle",
        func: builtin_shuffle,
    },
    BuiltinFunction {
        name: "sort_by",
        func: builtin_sort_by,
    },
    BuiltinFunction {
        name: "sort",
        func: builtin_sort,
    },
    BuiltinFunction {
        name: "keys",
        func: builtin_keys,
    },
    BuiltinFunction {
        name: "values",
        func: builtin_values,
    },
    BuiltinFunction {
        name: "size",
        func: builtin_size,
    },
];

pub fn get_builtin(name: &str) -> Option<&'static BuiltinFunction> {
    BUILTINS.iter().find(|b| b.name == name)
}

/// Handle to the named builtin, for passing builtins around as values.
pub fn builtin_value(name: &str) -> Option<Value> {
    get_builtin(name).map(|b| Value::Builtin(*b))
}

/// Calls the named builtin directly.
pub fn call_builtin(
    ctx: &mut dyn RuntimeContext,
    name: &str,
    args: Vec<Value>,
) -> Result<Value, String> {
    let builtin = get_builtin(name).ok_or_else(|| format!("unknown builtin: {}", name))?;
    (builtin.func)(ctx, args)
}

#[cfg(test)]
mod function_ops_test;
#[cfg(test)]
mod transform_ops_test;
